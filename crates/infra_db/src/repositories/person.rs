//! Person repository

use std::collections::{BTreeMap, BTreeSet};

use sqlx::postgres::PgConnection;
use sqlx::PgPool;

use core_kernel::{HouseholdId, PersonId};
use domain_household::Person;

use crate::error::DatabaseError;
use crate::rows::decode;
use crate::schema::PERSONS;

use super::insert_records;

#[derive(Debug, Clone)]
pub struct PersonRepository {
    pool: PgPool,
}

impl PersonRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert_all(&self, conn: &mut PgConnection, persons: &[Person]) -> Result<u64, DatabaseError> {
        insert_records(conn, &PERSONS, persons).await
    }

    pub async fn get(&self, id: PersonId) -> Result<Person, DatabaseError> {
        let row = sqlx::query(&PERSONS.select_sql("WHERE \"person_id\" = $1"))
            .bind(id.value())
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| DatabaseError::not_found("Person", id))?;

        decode(&PERSONS, &row)
    }

    /// Members of a household in person-number order
    pub async fn in_household(&self, id: HouseholdId) -> Result<Vec<Person>, DatabaseError> {
        let rows = sqlx::query(&PERSONS.select_sql(
            "WHERE \"household_id\" = $1 ORDER BY \"person_number\", \"person_id\"",
        ))
        .bind(id.value())
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(|row| decode(&PERSONS, row)).collect()
    }

    /// Stored persons among `ids`, with the household each belongs to
    pub async fn existing(
        &self,
        ids: &BTreeSet<PersonId>,
    ) -> Result<BTreeMap<PersonId, HouseholdId>, DatabaseError> {
        if ids.is_empty() {
            return Ok(BTreeMap::new());
        }
        let raw: Vec<i64> = ids.iter().map(PersonId::value).collect();
        let found = sqlx::query_as::<_, (i64, i32)>(&format!(
            "SELECT \"person_id\", \"household_id\" FROM {} WHERE \"person_id\" = ANY($1)",
            PERSONS.qualified()
        ))
        .bind(raw)
        .fetch_all(&self.pool)
        .await?;

        Ok(found
            .into_iter()
            .map(|(person, household)| (PersonId::new(person), HouseholdId::new(household)))
            .collect())
    }
}
