//! Port adapters
//!
//! Implementations of the domain ports over PostgreSQL.

pub mod survey_store;

pub use survey_store::PostgresSurveyStore;
