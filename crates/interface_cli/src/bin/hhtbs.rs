//! Household Travel Survey Store - CLI Binary
//!
//! # Usage
//!
//! ```bash
//! # Create the schema once
//! hhtbs provision --if-absent
//!
//! # Ingest extracts, one transaction per household
//! HHTBS_DATABASE_URL=postgres://... hhtbs ingest households.jsonl
//!
//! # Validate without a database
//! hhtbs check extract.json --advisory-geometry
//!
//! # Resolve the legs of a linked trip
//! hhtbs linkage --linked 500100100
//! ```
//!
//! # Environment Variables
//!
//! * `HHTBS_DATABASE_URL` - PostgreSQL connection string
//! * `HHTBS_INGEST_CONCURRENCY` - Batches ingested at once (default: 4)
//! * `HHTBS_GEOMETRY_POLICY` - `fatal` or `advisory` (also `LINKAGE`, `TEMPORAL`, `TRACE`, `AGREEMENT`)
//! * `HHTBS_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `HHTBS_LOG_JSON` - `true` for JSON log lines
//! * `RUST_LOG` - Overrides the log filter
//!
//! # Exit Codes
//!
//! * `0` - Everything committed, validated or resolved cleanly
//! * `1` - The command failed
//! * `2` - At least one batch was rejected, or linkage is inconsistent

use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use interface_cli::{run, Cli, HhtbsConfig};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let config = HhtbsConfig::load(cli.global.config.as_deref())
        .context("Failed to load configuration")?
        .with_overrides(&cli.global);

    init_tracing(&config.log_level, config.log_json);

    let status = run(cli.command, &config).await.context("Command failed")?;
    tracing::debug!(?status, "Command finished");
    Ok(status.exit_code())
}

/// Initializes the tracing subscriber for structured logging.
///
/// Logs go to stderr so that stdout carries only command results.
///
/// # Arguments
///
/// * `log_level` - The minimum log level when `RUST_LOG` is not set
/// * `json` - Emit JSON lines instead of human-readable text
fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry
            .with(tracing_subscriber::fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        registry
            .with(
                tracing_subscriber::fmt::layer()
                    .with_target(true)
                    .with_writer(std::io::stderr),
            )
            .init();
    }
}
