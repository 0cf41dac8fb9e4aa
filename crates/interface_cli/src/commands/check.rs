//! `hhtbs check`

use std::sync::Arc;

use domain_ingest::{InMemorySurveyStore, IngestPolicy, IngestionService, SurveyBatch, SurveyStore, ValidationReport};
use tracing::debug;

use super::CommandStatus;
use crate::error::CliError;

/// Validates batches in order against a scratch in-memory store
///
/// Each batch without fatal findings is staged in the scratch store, so
/// later batches are checked against the keys and linked legs of earlier
/// ones. The database is never touched.
pub async fn run(batches: &[SurveyBatch], policy: IngestPolicy) -> Result<Vec<ValidationReport>, CliError> {
    let scratch = InMemorySurveyStore::provisioned();
    let service = IngestionService::new(Arc::new(scratch.clone()), policy);

    let mut reports = Vec::with_capacity(batches.len());
    for batch in batches {
        let report = service.validate(batch, None).await?;
        if report.has_fatal() {
            debug!(batch = %batch.label(), "Not staging rejected batch");
        } else {
            scratch.commit(batch, None).await?;
        }
        reports.push(report);
    }
    Ok(reports)
}

pub fn status(reports: &[ValidationReport]) -> CommandStatus {
    if reports.iter().any(ValidationReport::has_fatal) {
        CommandStatus::Rejected
    } else {
        CommandStatus::Success
    }
}
