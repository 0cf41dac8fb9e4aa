//! Survey Ingestion Domain
//!
//! Turns cleaned survey extracts into committed store rows, or into a
//! report of everything wrong with them.
//!
//! - **SurveyBatch**: the records ingested together, all or nothing
//! - **BatchValidator**: schema, missingness, uniqueness, referential and
//!   consistency checks, collected rather than first-fail
//! - **IngestPolicy**: which consistency findings abort a batch
//! - **SurveyStore**: the storage port, with an in-memory implementation
//! - **IngestionService**: validate, commit, and run batches concurrently
//!
//! # Example
//!
//! ```rust
//! use std::sync::Arc;
//! use domain_ingest::{InMemorySurveyStore, IngestPolicy, IngestionService, SurveyBatch};
//!
//! let runtime = tokio::runtime::Runtime::new().unwrap();
//! runtime.block_on(async {
//!     let store = Arc::new(InMemorySurveyStore::provisioned());
//!     let service = IngestionService::new(store, IngestPolicy::default());
//!     let outcome = service.ingest(SurveyBatch::new()).await.unwrap();
//!     assert!(outcome.is_committed());
//! });
//! ```

pub mod batch;
pub mod report;
pub mod policy;
pub mod validation;
pub mod ports;
pub mod memory;
pub mod service;
pub mod error;

pub use batch::{RowCounts, SurveyBatch};
pub use report::{Entity, RecordKey, Severity, ValidationReport, Violation, ViolationKind};
pub use policy::{ConsistencyCheck, IngestPolicy};
pub use validation::BatchValidator;
pub use ports::{
    CommitSummary, ExistingKeys, KeyLookup, ProvisionMode, ProvisionOutcome, SurveyStore, SCHEMA,
    TABLES,
};
pub use memory::InMemorySurveyStore;
pub use service::{IngestOutcome, IngestionService, DEFAULT_CONCURRENCY};
pub use error::IngestError;
