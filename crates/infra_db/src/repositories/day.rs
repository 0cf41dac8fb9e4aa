//! Person-day repository
//!
//! `day_id` comes from the table's identity sequence; callers address a day
//! by its natural key `(person_id, travel_date)`.

use std::collections::BTreeSet;

use chrono::NaiveDate;
use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::{PersonId, Stored};
use domain_travel::Day;

use crate::error::DatabaseError;
use crate::rows::decode_stored;
use crate::schema::DAY;

use super::insert_records;

#[derive(Debug, Clone)]
pub struct DayRepository {
    pool: PgPool,
}

impl DayRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, days: &[Day]) -> Result<u64, DatabaseError> {
        insert_records(conn, &DAY, days).await
    }

    pub async fn get(&self, person_id: PersonId, travel_date: NaiveDate) -> Result<Stored<Day>, DatabaseError> {
        let row = sqlx::query(&DAY.select_sql(
            "WHERE \"person_id\" = $1 AND \"travel_date\" = $2",
        ))
        .bind(person_id.value())
        .bind(travel_date)
        .fetch_optional(&self.pool)
        .await?
        .ok_or_else(|| {
            DatabaseError::not_found(
                "Day",
                format!("person_id={}, travel_date={}", person_id, travel_date),
            )
        })?;

        decode_stored(&DAY, "day_id", &row)
    }

    /// Natural keys among `keys` that are already stored
    pub async fn existing(
        &self,
        keys: &BTreeSet<(PersonId, NaiveDate)>,
    ) -> Result<BTreeSet<(PersonId, NaiveDate)>, DatabaseError> {
        if keys.is_empty() {
            return Ok(BTreeSet::new());
        }
        let (persons, dates): (Vec<i64>, Vec<NaiveDate>) =
            keys.iter().map(|(person, date)| (person.value(), *date)).unzip();

        let found = sqlx::query_as::<_, (i64, NaiveDate)>(&format!(
            "SELECT d.\"person_id\", d.\"travel_date\" FROM {} d \
             JOIN UNNEST($1::bigint[], $2::date[]) AS k(person_id, travel_date) \
             ON d.\"person_id\" = k.person_id AND d.\"travel_date\" = k.travel_date",
            DAY.qualified()
        ))
        .bind(persons)
        .bind(dates)
        .fetch_all(&self.pool)
        .await?;

        Ok(found
            .into_iter()
            .map(|(person, date)| (PersonId::new(person), date))
            .collect())
    }
}
