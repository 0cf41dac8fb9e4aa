//! `hhtbs ingest`

use domain_ingest::{IngestOutcome, IngestionService, SurveyBatch};
use serde::Serialize;
use tracing::{error, info};

use super::CommandStatus;

/// Result for one household batch
#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum BatchResult {
    Outcome(IngestOutcome),
    /// The batch could not be judged (store unreachable, not provisioned)
    Failed { batch: String, error: String },
}

/// Results of one ingest run, in input order
#[derive(Debug, Default, Serialize)]
pub struct IngestRun {
    pub committed: usize,
    pub rejected: usize,
    pub failed: usize,
    pub results: Vec<BatchResult>,
}

impl IngestRun {
    pub fn status(&self) -> CommandStatus {
        if self.failed > 0 {
            CommandStatus::Failed
        } else if self.rejected > 0 {
            CommandStatus::Rejected
        } else {
            CommandStatus::Success
        }
    }
}

/// Ingests household batches concurrently, each in its own transaction
pub async fn run(service: &IngestionService, batches: Vec<SurveyBatch>) -> IngestRun {
    let labels: Vec<String> = batches.iter().map(SurveyBatch::label).collect();
    let mut run = IngestRun::default();

    for (batch, result) in labels.into_iter().zip(service.ingest_all(batches).await) {
        match result {
            Ok(outcome) => {
                if outcome.is_committed() {
                    run.committed += 1;
                } else {
                    run.rejected += 1;
                }
                run.results.push(BatchResult::Outcome(outcome));
            }
            Err(e) => {
                error!(batch = %batch, error = %e, "Batch could not be ingested");
                run.failed += 1;
                run.results.push(BatchResult::Failed {
                    batch,
                    error: e.to_string(),
                });
            }
        }
    }

    info!(
        committed = run.committed,
        rejected = run.rejected,
        failed = run.failed,
        "Ingest finished"
    );
    run
}
