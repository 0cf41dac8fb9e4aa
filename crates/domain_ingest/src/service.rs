//! Ingestion service
//!
//! Orchestrates one batch end to end:
//!
//! ```text
//!  batch ──► lookup_keys ──► BatchValidator ──► fatal? ──yes──► Rejected(report)
//!                                                  │
//!                                                  no
//!                                                  ▼
//!                                               commit ──conflict──► Rejected(report + StorageConflict)
//!                                                  │
//!                                                  ▼
//!                                   Committed { summary, warnings }
//! ```
//!
//! Batches are independent: [`IngestionService::ingest_all`] runs them
//! concurrently, each in its own store transaction.

use std::sync::Arc;

use serde::Serialize;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{info, instrument, warn};

use core_kernel::OperationMetadata;

use crate::batch::SurveyBatch;
use crate::error::IngestError;
use crate::policy::IngestPolicy;
use crate::ports::{CommitSummary, KeyLookup, SurveyStore};
use crate::report::{ValidationReport, Violation};
use crate::validation::BatchValidator;

/// Default number of batches ingested at once
pub const DEFAULT_CONCURRENCY: usize = 4;

/// What happened to one batch
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum IngestOutcome {
    /// Every row was written; advisory findings are attached
    Committed {
        batch: String,
        summary: CommitSummary,
        warnings: Vec<Violation>,
    },
    /// Nothing was written
    Rejected { report: ValidationReport },
}

impl IngestOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, IngestOutcome::Committed { .. })
    }

    /// The rejection report, if the batch was rejected
    pub fn report(&self) -> Option<&ValidationReport> {
        match self {
            IngestOutcome::Rejected { report } => Some(report),
            IngestOutcome::Committed { .. } => None,
        }
    }
}

/// Validates and commits survey batches against a store
#[derive(Clone)]
pub struct IngestionService {
    store: Arc<dyn SurveyStore>,
    policy: IngestPolicy,
    concurrency: usize,
}

impl IngestionService {
    pub fn new(store: Arc<dyn SurveyStore>, policy: IngestPolicy) -> Self {
        Self {
            store,
            policy,
            concurrency: DEFAULT_CONCURRENCY,
        }
    }

    /// Sets how many batches `ingest_all` runs at once (at least one)
    pub fn with_concurrency(mut self, concurrency: usize) -> Self {
        self.concurrency = concurrency.max(1);
        self
    }

    pub fn policy(&self) -> &IngestPolicy {
        &self.policy
    }

    pub fn store(&self) -> &Arc<dyn SurveyStore> {
        &self.store
    }

    /// Validates a batch against the store without writing anything
    #[instrument(skip(self, batch, metadata), fields(batch = %batch.label()))]
    pub async fn validate(
        &self,
        batch: &SurveyBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<ValidationReport, IngestError> {
        let correlation_id = metadata.as_ref().and_then(|m| m.correlation_id);
        let lookup = KeyLookup::for_batch(batch);
        let existing = self.store.lookup_keys(&lookup, metadata).await?;
        let report = BatchValidator::new(&self.policy)
            .validate(batch, &existing)
            .with_correlation(correlation_id);
        Ok(report)
    }

    /// Validates a batch and commits it if no fatal violation was found
    ///
    /// # Errors
    ///
    /// Only for failures that prevent judging the batch (store unreachable,
    /// not provisioned). A rejected batch is `Ok(IngestOutcome::Rejected)`.
    pub async fn ingest(&self, batch: SurveyBatch) -> Result<IngestOutcome, IngestError> {
        let label = batch.label();
        let metadata = OperationMetadata::for_batch(label.clone());

        let mut report = self.validate(&batch, Some(metadata.clone())).await?;
        if report.has_fatal() {
            warn!(
                batch = %label,
                fatal = report.fatal().count(),
                advisory = report.advisories().count(),
                "Batch rejected"
            );
            return Ok(IngestOutcome::Rejected { report });
        }

        match self.store.commit(&batch, Some(metadata)).await {
            Ok(summary) => {
                info!(
                    batch = %label,
                    rows = summary.rows.total(),
                    warnings = report.violations.len(),
                    "Batch committed"
                );
                Ok(IngestOutcome::Committed {
                    batch: label,
                    summary,
                    warnings: report.into_advisories(),
                })
            }
            Err(e) if e.is_conflict() => {
                warn!(batch = %label, error = %e, "Commit refused by store");
                report.push(Violation::storage_conflict(e.to_string()));
                Ok(IngestOutcome::Rejected { report })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Ingests batches concurrently; results are in input order
    pub async fn ingest_all(&self, batches: Vec<SurveyBatch>) -> Vec<Result<IngestOutcome, IngestError>> {
        let semaphore = Arc::new(Semaphore::new(self.concurrency));
        let mut tasks = JoinSet::new();
        let total = batches.len();

        for (index, batch) in batches.into_iter().enumerate() {
            let service = self.clone();
            let semaphore = Arc::clone(&semaphore);
            tasks.spawn(async move {
                let result = match semaphore.acquire_owned().await {
                    Ok(_permit) => service.ingest(batch).await,
                    Err(e) => Err(IngestError::Worker(e.to_string())),
                };
                (index, result)
            });
        }

        let mut results: Vec<Option<Result<IngestOutcome, IngestError>>> =
            (0..total).map(|_| None).collect();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok((index, result)) => results[index] = Some(result),
                Err(e) => warn!(error = %e, "Ingestion task failed"),
            }
        }

        results
            .into_iter()
            .map(|slot| {
                slot.unwrap_or_else(|| Err(IngestError::Worker("ingestion task did not complete".to_string())))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::memory::InMemorySurveyStore;

    #[tokio::test]
    async fn test_empty_batch_commits_nothing() {
        let service = IngestionService::new(
            Arc::new(InMemorySurveyStore::provisioned()),
            IngestPolicy::default(),
        );
        let outcome = service.ingest(SurveyBatch::new()).await.unwrap();
        match outcome {
            IngestOutcome::Committed { summary, warnings, .. } => {
                assert_eq!(summary.rows.total(), 0);
                assert!(warnings.is_empty());
                assert!(summary.correlation_id.is_some());
            }
            IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
        }
    }

    #[tokio::test]
    async fn test_unprovisioned_store_is_an_error() {
        let service = IngestionService::new(Arc::new(InMemorySurveyStore::new()), IngestPolicy::default());
        assert!(service.ingest(SurveyBatch::new()).await.is_err());
    }

    #[test]
    fn test_concurrency_floor() {
        let service = IngestionService::new(Arc::new(InMemorySurveyStore::new()), IngestPolicy::default())
            .with_concurrency(0);
        assert_eq!(service.concurrency, 1);
    }
}
