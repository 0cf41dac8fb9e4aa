//! Infrastructure Database Layer
//!
//! PostgreSQL/PostGIS storage for the household travel survey, using SQLx.
//!
//! # Architecture
//!
//! - [`schema`]: one declarative [`TableDef`] per table, which generates the
//!   DDL and drives the row mapping
//! - [`rows`]: record ⇄ row conversion and bulk inserts
//! - [`provision`]: creates the `hhtbs2016` schema and seeds the sentinel
//!   vehicle
//! - [`repositories`]: per-table reads and writes
//! - [`adapters`]: [`PostgresSurveyStore`], the `SurveyStore` port adapter
//!
//! Geometry is stored as PostGIS `geometry` in SRID 4326 and exchanged with
//! the domain as WKT (`ST_GeomFromText` / `ST_AsText`).
//!
//! # Example
//!
//! ```rust,ignore
//! use infra_db::{create_pool, DatabaseConfig, PostgresSurveyStore};
//!
//! let pool = create_pool(DatabaseConfig::new("postgres://localhost/hhtbs")).await?;
//! let store = PostgresSurveyStore::new(pool);
//! ```

pub mod pool;
pub mod error;
pub mod schema;
pub mod rows;
pub mod provision;
pub mod repositories;
pub mod adapters;

pub use pool::{create_pool, DatabaseConfig, DatabasePool};
pub use error::DatabaseError;
pub use schema::{all_tables, table, Column, SqlType, TableDef};
pub use rows::{assemble, encode, RowValues, SqlValue};
pub use provision::SENTINEL_VEHICLE_ID;
pub use adapters::PostgresSurveyStore;
