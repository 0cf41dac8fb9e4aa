//! Test Utilities Crate
//!
//! Provides shared test infrastructure, fixtures, and helpers for the
//! household travel survey test suite.
//!
//! # Modules
//!
//! - `fixtures`: Reference survey data (household 500, person 5001, ...)
//! - `builders`: Builder patterns for survey records and batches
//! - `database`: PostGIS test container and connection pooling
//! - `assertions`: Assertion helpers for ingestion outcomes and reports
//! - `generators`: Property-based generators for trip legs

pub mod fixtures;
pub mod builders;
pub mod database;
pub mod assertions;
pub mod generators;

pub use fixtures::*;
pub use builders::*;
pub use database::*;
pub use assertions::*;
pub use generators::*;
