//! Vehicle repository
//!
//! Vehicles are addressed by their storage key `(household_id,
//! vehicle_number)`; `(0, 0)` is the sentinel row seeded at provisioning.

use std::collections::BTreeSet;

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::{HouseholdId, Stored};
use domain_household::Vehicle;

use crate::error::DatabaseError;
use crate::rows::decode_stored;
use crate::schema::VEHICLES;

use super::insert_records;

#[derive(Debug, Clone)]
pub struct VehicleRepository {
    pool: PgPool,
}

impl VehicleRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, vehicles: &[Vehicle]) -> Result<u64, DatabaseError> {
        insert_records(conn, &VEHICLES, vehicles).await
    }

    /// Retrieves a vehicle by its storage key
    ///
    /// # Arguments
    ///
    /// * `key` - `(household_id, vehicle_number)`, `(0, 0)` for the sentinel
    pub async fn get(&self, key: (i32, i16)) -> Result<Stored<Vehicle>, DatabaseError> {
        let row = sqlx::query(&VEHICLES.select_sql(
            "WHERE \"household_id\" = $1 AND \"vehicle_number\" = $2",
        ))
        .bind(key.0)
        .bind(key.1)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            DatabaseError::not_found(
                "Vehicle",
                format!("household_id={}, vehicle_number={}", key.0, key.1),
            )
        })?;

        decode_stored(&VEHICLES, "vehicle_id", &row)
    }

    pub async fn in_household(&self, id: HouseholdId) -> Result<Vec<Stored<Vehicle>>, DatabaseError> {
        let rows = sqlx::query(&VEHICLES.select_sql(
            "WHERE \"household_id\" = $1 ORDER BY \"vehicle_number\"",
        ))
        .bind(id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter()
            .map(|row| decode_stored(&VEHICLES, "vehicle_id", row))
            .collect()
    }

    pub async fn existing(&self, keys: &BTreeSet<(i32, i16)>) -> Result<BTreeSet<(i32, i16)>, DatabaseError> {
        if keys.is_empty() {
            return Ok(BTreeSet::new());
        }
        let (households, numbers): (Vec<i32>, Vec<i16>) = keys.iter().copied().unzip();

        let found = sqlx::query_as::<_, (i32, i16)>(&format!(
            "SELECT v.\"household_id\", v.\"vehicle_number\" FROM {} v \
             JOIN UNNEST($1::integer[], $2::smallint[]) AS k(household_id, vehicle_number) \
             ON v.\"household_id\" = k.household_id AND v.\"vehicle_number\" = k.vehicle_number",
            VEHICLES.qualified()
        ))
        .bind(households)
        .bind(numbers)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().collect())
    }
}
