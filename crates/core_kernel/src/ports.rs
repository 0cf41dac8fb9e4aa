//! Store ports
//!
//! The ingestion service talks to storage only through the `SurveyStore`
//! port defined in `domain_ingest`. The types here are what every store
//! adapter shares: the error it reports, its health, and the per-call
//! metadata that ties a store call back to the batch being ingested.
//!
//! ```text
//!   ingestion service / hhtbs CLI
//!               │
//!               ▼
//!       SurveyStore port
//!          ▲          ▲
//!   PostGIS adapter   in-memory store
//! ```

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

/// Failure reported by a store adapter
///
/// Conflicts are data problems (a key or constraint clash); every other
/// variant means the store could not do its job.
#[derive(Debug, Error)]
pub enum PortError {
    #[error("Not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    /// Input the store refuses before touching any table
    #[error("Validation error: {message}")]
    Validation { message: String },

    #[error("Conflict: {message}")]
    Conflict { message: String },

    /// The store could not be reached or ran out of connections
    #[error("Connection error: {message}")]
    Connection { message: String },

    /// A stored row did not map back onto a survey record
    #[error("Transformation error: {message}")]
    Transformation { message: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

impl PortError {
    pub fn not_found(entity_type: impl Into<String>, id: impl fmt::Display) -> Self {
        PortError::NotFound {
            entity_type: entity_type.into(),
            id: id.to_string(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        PortError::Validation { message: message.into() }
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        PortError::Conflict { message: message.into() }
    }

    pub fn connection(message: impl Into<String>) -> Self {
        PortError::Connection { message: message.into() }
    }

    pub fn transformation(message: impl Into<String>) -> Self {
        PortError::Transformation { message: message.into() }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        PortError::Internal { message: message.into() }
    }

    /// True when retrying the same call later may succeed
    pub fn is_transient(&self) -> bool {
        matches!(self, PortError::Connection { .. })
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, PortError::NotFound { .. })
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, PortError::Conflict { .. })
    }
}

/// Marker for store ports; ingestion workers share them across tasks
pub trait DomainPort: Send + Sync + 'static {}

/// Adapter health
///
/// A reachable store whose survey schema is missing is `Degraded`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdapterHealth {
    Healthy,
    Degraded,
    Unhealthy,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthCheckResult {
    pub adapter_id: String,
    pub status: AdapterHealth,
    pub latency_ms: u64,
    pub message: Option<String>,
    pub checked_at: DateTime<Utc>,
}

impl HealthCheckResult {
    pub fn is_healthy(&self) -> bool {
        self.status == AdapterHealth::Healthy
    }
}

#[async_trait::async_trait]
pub trait HealthCheckable: Send + Sync {
    async fn health_check(&self) -> HealthCheckResult;
}

/// Per-call context passed to store operations
#[derive(Debug, Clone, Default)]
pub struct OperationMetadata {
    /// Shared by every store call made while ingesting one batch
    pub correlation_id: Option<Uuid>,
    /// Label of the batch, e.g. `household_id=500`
    pub batch: Option<String>,
}

impl OperationMetadata {
    /// Metadata for one batch, with a fresh time-ordered correlation id
    pub fn for_batch(label: impl Into<String>) -> Self {
        Self {
            correlation_id: Some(Uuid::now_v7()),
            batch: Some(label.into()),
        }
    }
}
