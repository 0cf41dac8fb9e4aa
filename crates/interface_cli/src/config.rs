//! CLI configuration
//!
//! Settings come from, in increasing precedence: built-in defaults, an
//! optional `hhtbs.toml`, `HHTBS_*` environment variables (after `.env` is
//! loaded), and command line flags.

use std::path::Path;
use std::time::Duration;

use config::{Config, Environment, File};
use domain_ingest::{ConsistencyCheck, IngestPolicy, Severity, DEFAULT_CONCURRENCY};
use infra_db::DatabaseConfig;
use serde::Deserialize;

use crate::cli::GlobalArgs;
use crate::error::CliError;

/// Environment variable prefix, e.g. `HHTBS_DATABASE_URL`
pub const ENV_PREFIX: &str = "HHTBS";

/// Configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "hhtbs";

/// CLI configuration
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct HhtbsConfig {
    /// PostgreSQL connection string
    pub database_url: String,
    pub max_connections: u32,
    pub min_connections: u32,
    pub connect_timeout_secs: u64,
    /// Batches ingested at once
    pub ingest_concurrency: usize,
    /// Maximum geometry/coordinate divergence in degrees
    pub coordinate_tolerance: f64,
    pub geometry_policy: String,
    pub linkage_policy: String,
    pub temporal_policy: String,
    pub trace_policy: String,
    pub agreement_policy: String,
    /// Log level: trace, debug, info, warn, error
    pub log_level: String,
    /// Emit logs as JSON lines
    pub log_json: bool,
}

impl Default for HhtbsConfig {
    fn default() -> Self {
        let policy = IngestPolicy::default();
        Self {
            database_url: "postgres://localhost/hhtbs".to_string(),
            max_connections: 10,
            min_connections: 1,
            connect_timeout_secs: 30,
            ingest_concurrency: DEFAULT_CONCURRENCY,
            coordinate_tolerance: policy.tolerance,
            geometry_policy: policy.geometry.to_string(),
            linkage_policy: policy.linkage.to_string(),
            temporal_policy: policy.temporal.to_string(),
            trace_policy: policy.trace.to_string(),
            agreement_policy: policy.agreement.to_string(),
            log_level: "info".to_string(),
            log_json: false,
        }
    }
}

impl HhtbsConfig {
    /// Loads configuration from a file and the environment
    ///
    /// # Arguments
    ///
    /// * `file` - Explicit configuration file; it must exist. Without one,
    ///   `hhtbs.toml` is read if present.
    pub fn load(file: Option<&Path>) -> Result<Self, CliError> {
        let file_source = match file {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let config = Config::builder()
            .add_source(file_source)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()?;

        Self::from_config(config)
    }

    /// Deserializes and checks an assembled configuration
    pub fn from_config(config: Config) -> Result<Self, CliError> {
        let settings: Self = config.try_deserialize()?;
        settings.policy()?;
        if settings.ingest_concurrency == 0 {
            return Err(CliError::invalid_setting("ingest_concurrency", "must be at least 1"));
        }
        if settings.min_connections > settings.max_connections {
            return Err(CliError::invalid_setting(
                "min_connections",
                format!("{} exceeds max_connections {}", settings.min_connections, settings.max_connections),
            ));
        }
        Ok(settings)
    }

    /// The ingestion policy these settings describe
    pub fn policy(&self) -> Result<IngestPolicy, CliError> {
        if !(self.coordinate_tolerance.is_finite() && self.coordinate_tolerance >= 0.0) {
            return Err(CliError::invalid_setting(
                "coordinate_tolerance",
                format!("{} is not a non-negative number of degrees", self.coordinate_tolerance),
            ));
        }

        let graded = [
            ("geometry_policy", ConsistencyCheck::Geometry, &self.geometry_policy),
            ("linkage_policy", ConsistencyCheck::Linkage, &self.linkage_policy),
            ("temporal_policy", ConsistencyCheck::Temporal, &self.temporal_policy),
            ("trace_policy", ConsistencyCheck::Trace, &self.trace_policy),
            ("agreement_policy", ConsistencyCheck::Agreement, &self.agreement_policy),
        ];

        let mut policy = IngestPolicy::default().with_tolerance(self.coordinate_tolerance);
        for (key, check, value) in graded {
            let severity: Severity = value
                .parse()
                .map_err(|message: String| CliError::invalid_setting(key, message))?;
            policy = policy.with_severity(check, severity);
        }
        Ok(policy)
    }

    /// Applies command line overrides
    pub fn with_overrides(mut self, args: &GlobalArgs) -> Self {
        if let Some(url) = &args.database_url {
            self.database_url = url.clone();
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        self.log_json |= args.log_json;
        self
    }

    /// Pool settings for the configured database
    pub fn database(&self) -> DatabaseConfig {
        DatabaseConfig::new(self.database_url.clone())
            .max_connections(self.max_connections)
            .min_connections(self.min_connections)
            .connect_timeout(Duration::from_secs(self.connect_timeout_secs))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use config::FileFormat;

    fn from_toml(toml: &str) -> Result<HhtbsConfig, CliError> {
        let config = Config::builder()
            .add_source(File::from_str(toml, FileFormat::Toml))
            .build()
            .unwrap();
        HhtbsConfig::from_config(config)
    }

    #[test]
    fn test_defaults_match_default_policy() {
        let config = from_toml("").unwrap();
        assert_eq!(config, HhtbsConfig::default());
        assert_eq!(config.policy().unwrap(), IngestPolicy::default());
    }

    #[test]
    fn test_policy_overrides() {
        let config = from_toml(
            r#"
            geometry_policy = "advisory"
            temporal_policy = "FATAL"
            coordinate_tolerance = 0.001
            "#,
        )
        .unwrap();

        let policy = config.policy().unwrap();
        assert_eq!(policy.geometry, Severity::Advisory);
        assert_eq!(policy.temporal, Severity::Fatal);
        assert_eq!(policy.tolerance, 0.001);
    }

    #[test]
    fn test_unknown_severity_is_rejected() {
        let err = from_toml(r#"linkage_policy = "sometimes""#).unwrap_err();
        assert!(err.to_string().contains("linkage_policy"));
    }

    #[test]
    fn test_negative_tolerance_is_rejected() {
        let err = from_toml("coordinate_tolerance = -1.0").unwrap_err();
        assert!(err.to_string().contains("coordinate_tolerance"));
    }

    #[test]
    fn test_zero_concurrency_is_rejected() {
        assert!(from_toml("ingest_concurrency = 0").is_err());
    }

    #[test]
    fn test_pool_bounds_are_checked() {
        assert!(from_toml("max_connections = 2\nmin_connections = 5").is_err());
    }

    #[test]
    fn test_flags_override_settings() {
        let args = GlobalArgs {
            database_url: Some("postgres://override/hhtbs".to_string()),
            log_json: true,
            ..GlobalArgs::default()
        };
        let config = from_toml(r#"log_level = "debug""#).unwrap().with_overrides(&args);

        assert_eq!(config.database_url, "postgres://override/hhtbs");
        assert_eq!(config.log_level, "debug");
        assert!(config.log_json);
    }

    #[test]
    fn test_database_config_keeps_url() {
        let config = from_toml(r#"database_url = "postgres://survey@db/hhtbs""#).unwrap();
        assert_eq!(config.database().url, "postgres://survey@db/hhtbs");
    }
}
