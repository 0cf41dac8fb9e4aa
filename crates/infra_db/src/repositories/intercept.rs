//! Intercept survey repository

use std::collections::BTreeSet;

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::HouseholdId;
use domain_household::Intercept;

use crate::error::DatabaseError;
use crate::rows::decode;
use crate::schema::INTERCEPT;

use super::insert_records;

#[derive(Debug, Clone)]
pub struct InterceptRepository {
    pool: PgPool,
}

impl InterceptRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, intercepts: &[Intercept]) -> Result<u64, DatabaseError> {
        insert_records(conn, &INTERCEPT, intercepts).await
    }

    pub async fn get(&self, id: HouseholdId) -> Result<Intercept, DatabaseError> {
        let row = sqlx::query(&INTERCEPT.select_sql("WHERE \"household_id\" = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Intercept", id))?;

        decode(&INTERCEPT, &row)
    }

    pub async fn existing(&self, ids: &BTreeSet<HouseholdId>) -> Result<BTreeSet<HouseholdId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeSet::new());
        }
        let raw: Vec<i32> = ids.iter().map(HouseholdId::value).collect();
        let found = sqlx::query_scalar::<_, i32>(&format!(
            "SELECT \"household_id\" FROM {} WHERE \"household_id\" = ANY($1)",
            INTERCEPT.qualified()
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(found.into_iter().map(HouseholdId::new).collect())
    }
}
