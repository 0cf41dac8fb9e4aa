//! `hhtbs provision`

use domain_ingest::{ProvisionMode, ProvisionOutcome, SurveyStore};
use tracing::info;

use crate::cli::ProvisionArgs;
use crate::error::CliError;

pub fn mode(args: &ProvisionArgs) -> ProvisionMode {
    if args.if_absent {
        ProvisionMode::IfAbsent
    } else {
        ProvisionMode::Strict
    }
}

/// Creates the survey schema
///
/// Strict provisioning of an existing store fails with a conflict and
/// leaves it untouched.
pub async fn run(store: &dyn SurveyStore, args: &ProvisionArgs) -> Result<ProvisionOutcome, CliError> {
    let mode = mode(args);
    let outcome = store.provision(mode, None).await?;
    info!(
        ?mode,
        created = outcome.created.len(),
        existing = outcome.existing.len(),
        sentinel_seeded = outcome.sentinel_seeded,
        "Provisioned survey store"
    );
    Ok(outcome)
}
