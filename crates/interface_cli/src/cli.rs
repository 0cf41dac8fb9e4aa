//! Command line arguments

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// Household travel behavior survey store
#[derive(Debug, Parser)]
#[command(name = "hhtbs", version, about)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

/// Options that override configuration for every command
#[derive(Debug, Clone, Default, Args)]
pub struct GlobalArgs {
    /// Configuration file (default: ./hhtbs.toml if present)
    #[arg(long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// PostgreSQL connection string
    #[arg(long, global = true, value_name = "URL")]
    pub database_url: Option<String>,

    /// Log level: trace, debug, info, warn, error
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub log_json: bool,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Create the survey schema and seed the sentinel vehicle
    Provision(ProvisionArgs),
    /// Validate extracts and commit each household atomically
    Ingest(IngestArgs),
    /// Resolve linked trips from stored trip legs
    Linkage(LinkageArgs),
    /// Validate extracts without a database
    Check(CheckArgs),
}

#[derive(Debug, Args)]
pub struct ProvisionArgs {
    /// Create only what is missing instead of failing on an existing schema
    #[arg(long)]
    pub if_absent: bool,
}

#[derive(Debug, Args)]
pub struct IngestArgs {
    /// JSON or JSON Lines extracts
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Ingest into an in-memory store instead of the database
    #[arg(long)]
    pub dry_run: bool,

    /// Batches ingested at once
    #[arg(long, value_name = "N")]
    pub concurrency: Option<usize>,

    /// Report geometry/coordinate disagreement without rejecting the batch
    #[arg(long)]
    pub advisory_geometry: bool,
}

#[derive(Debug, Args)]
#[group(required = true, multiple = false)]
pub struct LinkageArgs {
    /// Every linked trip of a person
    #[arg(long, value_name = "PERSON_ID")]
    pub person: Option<i64>,

    /// One linked trip
    #[arg(long, value_name = "TRIP_ID_LINKED")]
    pub linked: Option<i64>,
}

#[derive(Debug, Args)]
pub struct CheckArgs {
    /// JSON or JSON Lines extracts
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<PathBuf>,

    /// Report geometry/coordinate disagreement without rejecting the batch
    #[arg(long)]
    pub advisory_geometry: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_command_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_ingest_arguments() {
        let cli = Cli::try_parse_from([
            "hhtbs", "ingest", "a.json", "b.jsonl", "--dry-run", "--concurrency", "8",
        ])
        .unwrap();

        match cli.command {
            Command::Ingest(args) => {
                assert_eq!(args.files.len(), 2);
                assert!(args.dry_run);
                assert_eq!(args.concurrency, Some(8));
                assert!(!args.advisory_geometry);
            }
            other => panic!("Expected ingest, got {other:?}"),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "hhtbs", "provision", "--if-absent", "--database-url", "postgres://db/hhtbs",
        ])
        .unwrap();

        assert_eq!(cli.global.database_url.as_deref(), Some("postgres://db/hhtbs"));
        assert!(matches!(cli.command, Command::Provision(ProvisionArgs { if_absent: true })));
    }

    #[test]
    fn test_linkage_needs_exactly_one_target() {
        assert!(Cli::try_parse_from(["hhtbs", "linkage"]).is_err());
        assert!(Cli::try_parse_from(["hhtbs", "linkage", "--person", "1", "--linked", "2"]).is_err());
        assert!(Cli::try_parse_from(["hhtbs", "linkage", "--linked", "500100100"]).is_ok());
    }

    #[test]
    fn test_ingest_needs_files() {
        assert!(Cli::try_parse_from(["hhtbs", "ingest"]).is_err());
    }
}
