//! Schema provisioning
//!
//! Creates the PostGIS extension, the `hhtbs2016` schema, every table with
//! its keys and indexes, and the sentinel vehicle row, all in one
//! transaction.
//!
//! - `ProvisionMode::Strict` refuses to touch a store whose schema already
//!   exists.
//! - `ProvisionMode::IfAbsent` creates only what is missing; running it
//!   against a complete store changes nothing.

use sqlx::postgres::PgConnection;
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use domain_household::Vehicle;
use domain_ingest::{ProvisionMode, ProvisionOutcome, SCHEMA};

use crate::error::DatabaseError;
use crate::rows::{encode, seed_row, SqlValue};
use crate::schema::{all_tables, TableDef, VEHICLES};

/// Serializes concurrent provisioning runs
const PROVISION_LOCK_KEY: i64 = 0x6868_7462_7332_3031;

/// Surrogate id of the sentinel vehicle row
pub const SENTINEL_VEHICLE_ID: i64 = 0;

/// Returns true if the survey schema exists
pub async fn schema_exists(conn: &mut PgConnection) -> Result<bool, DatabaseError> {
    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS (SELECT 1 FROM information_schema.schemata WHERE schema_name = $1)",
    )
    .bind(SCHEMA)
    .fetch_one(conn)
    .await?;
    Ok(exists)
}

/// Returns true if the table exists in the survey schema
pub async fn table_exists(conn: &mut PgConnection, table: &TableDef) -> Result<bool, DatabaseError> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT to_regclass($1) IS NOT NULL")
        .bind(table.qualified())
        .fetch_one(conn)
        .await?;
    Ok(exists)
}

/// Inserts the `(0, 0)` "no vehicle" row unless it is already there
pub async fn seed_sentinel_vehicle(conn: &mut PgConnection) -> Result<bool, DatabaseError> {
    let row = encode(&*VEHICLES, &Vehicle::not_applicable())?
        .with("vehicle_id", SqlValue::BigInt(Some(SENTINEL_VEHICLE_ID)));
    seed_row(conn, &VEHICLES, row).await
}

/// Provisions the survey schema
///
/// # Errors
///
/// `DatabaseError::AlreadyExists` in strict mode when the schema is already
/// there; the store is left untouched.
#[instrument(skip(pool))]
pub async fn provision(pool: &PgPool, mode: ProvisionMode) -> Result<ProvisionOutcome, DatabaseError> {
    let mut tx = pool.begin().await?;

    sqlx::query("SELECT pg_advisory_xact_lock($1)")
        .bind(PROVISION_LOCK_KEY)
        .execute(&mut *tx)
        .await?;

    if mode == ProvisionMode::Strict && schema_exists(&mut tx).await? {
        return Err(DatabaseError::AlreadyExists(format!(
            "schema {} is already provisioned",
            SCHEMA
        )));
    }

    sqlx::query("CREATE EXTENSION IF NOT EXISTS postgis")
        .execute(&mut *tx)
        .await?;
    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", SCHEMA))
        .execute(&mut *tx)
        .await?;

    let mut outcome = ProvisionOutcome::default();
    for table in all_tables() {
        if table_exists(&mut tx, table).await? {
            outcome.existing.push(table.name.to_string());
        } else {
            sqlx::query(&table.create_sql()).execute(&mut *tx).await?;
            debug!(table = table.name, "Created table");
            outcome.created.push(table.name.to_string());
        }
        for index in table.index_sql() {
            sqlx::query(&index).execute(&mut *tx).await?;
        }
    }

    outcome.sentinel_seeded = seed_sentinel_vehicle(&mut tx).await?;
    tx.commit().await?;

    info!(
        created = outcome.created.len(),
        existing = outcome.existing.len(),
        sentinel_seeded = outcome.sentinel_seeded,
        "Provisioned schema {}",
        SCHEMA
    );
    Ok(outcome)
}

/// Fails with `NotProvisioned` unless every survey table exists
pub async fn ensure_provisioned(conn: &mut PgConnection) -> Result<(), DatabaseError> {
    for table in all_tables() {
        if !table_exists(conn, table).await? {
            return Err(DatabaseError::NotProvisioned(format!(
                "table {} does not exist",
                table.qualified()
            )));
        }
    }
    Ok(())
}
