//! Ingestion errors
//!
//! Rejected batches are not errors: they come back as a
//! [`ValidationReport`](crate::report::ValidationReport). These are the
//! failures that prevented a batch from being judged at all.

use thiserror::Error;

use core_kernel::PortError;
use domain_travel::TravelError;

#[derive(Debug, Error)]
pub enum IngestError {
    /// The store could not be read or written
    #[error("Store error: {0}")]
    Store(#[from] PortError),

    /// A batch could not be normalized for storage
    #[error("Travel error: {0}")]
    Travel(#[from] TravelError),

    /// A concurrent ingestion task failed
    #[error("Ingestion worker failed: {0}")]
    Worker(String),
}

impl IngestError {
    /// True if retrying the batch may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, IngestError::Store(e) if e.is_transient())
    }
}
