//! CLI error handling

use std::path::PathBuf;

use core_kernel::PortError;
use domain_ingest::IngestError;
use infra_db::DatabaseError;
use thiserror::Error;

/// Failures that stop a command
///
/// Rejected batches are not errors; they are reported and reflected in the
/// exit status.
#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("Invalid setting {key}: {message}")]
    InvalidSetting { key: String, message: String },

    #[error("Cannot read {}: {source}", path.display())]
    Input {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Cannot parse {} line {line}: {message}", path.display())]
    Parse {
        path: PathBuf,
        line: usize,
        message: String,
    },

    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),

    #[error("Store error: {0}")]
    Store(#[from] PortError),

    #[error("Ingestion error: {0}")]
    Ingest(#[from] IngestError),

    #[error("Cannot write output: {0}")]
    Output(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_setting(key: &str, message: impl Into<String>) -> Self {
        CliError::InvalidSetting {
            key: key.to_string(),
            message: message.into(),
        }
    }
}
