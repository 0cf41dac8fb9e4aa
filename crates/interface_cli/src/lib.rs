//! Survey Store Command Line Interface
//!
//! The `hhtbs` binary provisions the PostGIS store, ingests survey
//! extracts one household at a time, resolves trip linkage from stored legs,
//! and checks extracts offline.
//!
//! # Architecture
//!
//! - **cli**: `clap` argument definitions
//! - **config**: defaults, `hhtbs.toml`, `HHTBS_*` environment, flag overrides
//! - **input**: JSON and JSON Lines extract loading
//! - **commands**: one module per subcommand, returning printable results
//!
//! # Example
//!
//! ```rust,ignore
//! use clap::Parser;
//! use interface_cli::{run, Cli, HhtbsConfig};
//!
//! let cli = Cli::parse();
//! let config = HhtbsConfig::load(cli.global.config.as_deref())?.with_overrides(&cli.global);
//! let status = run(cli.command, &config).await?;
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod input;
pub mod commands;

use std::sync::Arc;

use domain_ingest::{ConsistencyCheck, InMemorySurveyStore, IngestPolicy, IngestionService, Severity, SurveyStore};
use infra_db::{create_pool, PostgresSurveyStore};
use tracing::info;

pub use crate::cli::{Cli, Command};
pub use crate::commands::CommandStatus;
pub use crate::config::HhtbsConfig;
pub use crate::error::CliError;

use crate::commands::linkage::LinkageTarget;
use crate::commands::{check, emit, ingest, linkage, provision};

async fn open_store(config: &HhtbsConfig, concurrency: usize) -> Result<PostgresSurveyStore, CliError> {
    let pool = create_pool(config.database().sized_for(concurrency)).await?;
    Ok(PostgresSurveyStore::new(pool))
}

fn policy_for(config: &HhtbsConfig, advisory_geometry: bool) -> Result<IngestPolicy, CliError> {
    let policy = config.policy()?;
    Ok(if advisory_geometry {
        policy.with_severity(ConsistencyCheck::Geometry, Severity::Advisory)
    } else {
        policy
    })
}

/// Runs one command and prints its result to stdout
///
/// # Arguments
///
/// * `command` - The parsed subcommand
/// * `config` - Settings with command line overrides applied
///
/// # Errors
///
/// Returns an error when the command cannot run at all: unreadable input,
/// unreachable or unprovisioned store, strict provisioning of an existing
/// schema. Rejected data is reported through the returned status instead.
pub async fn run(command: Command, config: &HhtbsConfig) -> Result<CommandStatus, CliError> {
    match command {
        Command::Provision(args) => {
            let store = open_store(config, 1).await?;
            let outcome = provision::run(&store, &args).await?;
            emit(&outcome)?;
            Ok(CommandStatus::Success)
        }
        Command::Ingest(args) => {
            let batches = input::load_household_batches(&args.files)?;
            let concurrency = args.concurrency.unwrap_or(config.ingest_concurrency).max(1);
            let policy = policy_for(config, args.advisory_geometry)?;

            let store: Arc<dyn SurveyStore> = if args.dry_run {
                info!("Dry run: ingesting into an in-memory store");
                Arc::new(InMemorySurveyStore::provisioned())
            } else {
                Arc::new(open_store(config, concurrency).await?)
            };
            let service = IngestionService::new(store, policy).with_concurrency(concurrency);

            info!(batches = batches.len(), concurrency, "Ingesting households");
            let run = ingest::run(&service, batches).await;
            for result in &run.results {
                emit(result)?;
            }
            Ok(run.status())
        }
        Command::Linkage(args) => {
            let target = LinkageTarget::from_args(&args)
                .ok_or_else(|| CliError::invalid_setting("linkage", "give exactly one of --person or --linked"))?;
            let store = open_store(config, 1).await?;
            let resolution = linkage::run(&store, target).await?;
            emit(&resolution)?;
            Ok(linkage::status(&resolution))
        }
        Command::Check(args) => {
            let batches = input::load_household_batches(&args.files)?;
            let reports = check::run(&batches, policy_for(config, args.advisory_geometry)?).await?;
            for report in &reports {
                emit(report)?;
            }
            Ok(check::status(&reports))
        }
    }
}
