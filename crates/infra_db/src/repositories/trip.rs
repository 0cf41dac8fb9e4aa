//! Trip repository
//!
//! Lists of legs come back in `(departure_time, trip_id)` order, the order
//! linkage resolution works in.

use std::collections::{BTreeMap, BTreeSet};

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::{LinkedTripId, PersonId, TripId};
use domain_travel::{LinkedLeg, Trip};

use crate::error::DatabaseError;
use crate::rows::decode;
use crate::schema::TRIPS;

use super::insert_records;

const LEG_ORDER: &str = "ORDER BY \"departure_time\", \"trip_id\"";

#[derive(Debug, Clone)]
pub struct TripRepository {
    pool: PgPool,
}

impl TripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, trips: &[Trip]) -> Result<u64, DatabaseError> {
        insert_records(conn, &TRIPS, trips).await
    }

    pub async fn get(&self, id: TripId) -> Result<Trip, DatabaseError> {
        let row = sqlx::query(&TRIPS.select_sql("WHERE \"trip_id\" = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Trip", id))?;

        decode(&TRIPS, &row)
    }

    pub async fn for_person(&self, id: PersonId) -> Result<Vec<Trip>, DatabaseError> {
        self.list("person_id", id.value()).await
    }

    /// Every leg of a linked trip
    pub async fn linked(&self, id: LinkedTripId) -> Result<Vec<Trip>, DatabaseError> {
        self.list("trip_id_linked", id.value()).await
    }

    /// Stored legs of several linked trips at once, grouped by linked trip
    pub async fn linked_legs(
        &self,
        ids: &BTreeSet<LinkedTripId>,
    ) -> Result<BTreeMap<LinkedTripId, Vec<LinkedLeg>>, DatabaseError> {
        let mut legs: BTreeMap<LinkedTripId, Vec<LinkedLeg>> = BTreeMap::new();
        if ids.is_empty() {
            return Ok(legs);
        }
        let raw: Vec<i64> = ids.iter().map(LinkedTripId::value).collect();
        let rows = sqlx::query(&TRIPS.select_sql(&format!("WHERE \"trip_id_linked\" = ANY($1) {}", LEG_ORDER)))
            .bind(raw)
            .fetch_all(&self.pool)
            .await?;

        for row in &rows {
            let trip: Trip = decode(&TRIPS, row)?;
            legs.entry(trip.trip_id_linked).or_default().push(LinkedLeg::from(&trip));
        }
        Ok(legs)
    }

    async fn list(&self, column: &str, value: i64) -> Result<Vec<Trip>, DatabaseError> {
        let rows = sqlx::query(&TRIPS.select_sql(&format!("WHERE \"{}\" = $1 {}", column, LEG_ORDER)))
            .bind(value)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(|row| decode(&TRIPS, row)).collect()
    }

    pub async fn existing(&self, ids: &BTreeSet<TripId>) -> Result<BTreeSet<TripId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let raw: Vec<i64> = ids.iter().map(TripId::value).collect();
        let found = sqlx::query_scalar::<_, i64>(&format!(
            "SELECT \"trip_id\" FROM {} WHERE \"trip_id\" = ANY($1)",
            TRIPS.qualified()
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().map(TripId::new).collect())
    }
}
