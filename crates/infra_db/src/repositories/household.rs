//! Household repository
//!
//! Households are the root of every batch: persons and border trips carry
//! a foreign key to `households.household_id`.

use std::collections::BTreeSet;

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::HouseholdId;
use domain_household::Household;

use crate::error::DatabaseError;
use crate::rows::decode;
use crate::schema::HOUSEHOLDS;

use super::insert_records;

/// Repository for household records
#[derive(Debug, Clone)]
pub struct HouseholdRepository {
    pool: PgPool,
}

impl HouseholdRepository {
    /// Creates a new HouseholdRepository with the given connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Inserts households inside the caller's transaction
    ///
    /// # Arguments
    ///
    /// * `conn` - Connection of the open batch transaction
    /// * `households` - Normalized household records
    ///
    /// # Returns
    ///
    /// The number of rows inserted
    pub async fn insert_all(
        &self,
        conn: &mut PgConnection,
        households: &[Household],
    ) -> Result<u64, DatabaseError> {
        insert_records(conn, &HOUSEHOLDS, households).await
    }

    /// Retrieves a household by its identifier
    ///
    /// # Arguments
    ///
    /// * `id` - The household identifier
    ///
    /// # Returns
    ///
    /// The household or a NotFound error
    pub async fn get(&self, id: HouseholdId) -> Result<Household, DatabaseError> {
        let row = sqlx::query(&HOUSEHOLDS.select_sql("WHERE \"household_id\" = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Household", id))?;

        decode(&HOUSEHOLDS, &row)
    }

    /// Returns the subset of `ids` that is already stored
    pub async fn existing(&self, ids: &BTreeSet<HouseholdId>) -> Result<BTreeSet<HouseholdId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let raw: Vec<i32> = ids.iter().map(HouseholdId::value).collect();
        let found = sqlx::query_scalar::<_, i32>(&format!(
            "SELECT \"household_id\" FROM {} WHERE \"household_id\" = ANY($1)",
            HOUSEHOLDS.qualified()
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().map(HouseholdId::new).collect())
    }
}
