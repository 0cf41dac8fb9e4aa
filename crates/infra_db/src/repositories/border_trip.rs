//! Border trip repository

use std::collections::BTreeSet;

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::{HouseholdId, Stored};
use domain_household::BorderTrip;

use crate::error::DatabaseError;
use crate::rows::decode_stored;
use crate::schema::BORDER_TRIPS;

use super::insert_records;

#[derive(Debug, Clone)]
pub struct BorderTripRepository {
    pool: PgPool,
}

impl BorderTripRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, trips: &[BorderTrip]) -> Result<u64, DatabaseError> {
        insert_records(conn, &BORDER_TRIPS, trips).await
    }

    /// A household's crossings, numbered 1-4
    pub async fn for_household(&self, id: HouseholdId) -> Result<Vec<Stored<BorderTrip>>, DatabaseError> {
        let rows = sqlx::query(&BORDER_TRIPS.select_sql(
            "WHERE \"household_id\" = $1 ORDER BY \"trip_id\"",
        ))
        .bind(id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| decode_stored(&BORDER_TRIPS, "border_trip_id", row))
            .collect()
    }

    pub async fn existing(&self, keys: &BTreeSet<(i32, i16)>) -> Result<BTreeSet<(i32, i16)>, DatabaseError> {
        if keys.is_empty() {
            return Ok(BTreeSet::new());
        }
        let (households, trips): (Vec<i32>, Vec<i16>) = keys.iter().copied().unzip();

        let found = sqlx::query_as::<_, (i32, i16)>(&format!(
            "SELECT b.\"household_id\", b.\"trip_id\" FROM {} b \
             JOIN UNNEST($1::integer[], $2::smallint[]) AS k(household_id, trip_id) \
             ON b.\"household_id\" = k.household_id AND b.\"trip_id\" = k.trip_id",
            BORDER_TRIPS.qualified()
        ))
        .bind(households)
        .bind(trips)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().collect())
    }
}
