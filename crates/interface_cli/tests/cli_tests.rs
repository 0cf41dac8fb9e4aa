//! Command scenarios against the in-memory survey store
//!
//! The database-backed paths share these commands; only the store differs.

use std::path::PathBuf;
use std::sync::Arc;

use core_kernel::{LinkedTripId, PersonId};
use domain_ingest::{
    ConsistencyCheck, InMemorySurveyStore, IngestPolicy, IngestionService, Severity, SurveyBatch,
    SurveyStore, ViolationKind,
};
use interface_cli::cli::ProvisionArgs;
use interface_cli::commands::ingest::BatchResult;
use interface_cli::commands::linkage::LinkageTarget;
use interface_cli::commands::{check, ingest, linkage, provision};
use interface_cli::input::load_household_batches;
use interface_cli::{CliError, CommandStatus};
use test_utils::{
    IdFixtures, PlaceFixtures, TemporalFixtures, TestBatchBuilder, TestHouseholdBuilder,
    TestTripBuilder,
};

/// Writes an extract to a uniquely named temporary file
fn write_extract(extension: &str, content: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("hhtbs-{}.{}", uuid::Uuid::new_v4(), extension));
    std::fs::write(&path, content).unwrap();
    path
}

fn second_leg(departure_hour: u32, departure_minute: u32) -> test_utils::TestTripBuilder {
    TestTripBuilder::new()
        .with_id(IdFixtures::trip().value() + 1)
        .between(
            TemporalFixtures::at(departure_hour, departure_minute),
            TemporalFixtures::at(departure_hour, departure_minute + 20),
        )
}

// ============================================================================
// Extract loading
// ============================================================================

mod extracts {
    use super::*;

    #[test]
    fn test_extract_is_split_per_household() {
        let mut batch = TestBatchBuilder::reference().build();
        batch.extend(TestBatchBuilder::for_household(600).build());
        let path = write_extract("json", &serde_json::to_string(&batch).unwrap());

        let batches = load_household_batches(&[path]).unwrap();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].label(), "household_id=500");
        assert_eq!(batches[1].label(), "household_id=600");
        assert_eq!(batches[1].persons.len(), 1);
    }

    #[test]
    fn test_json_lines_extract() {
        let lines = [
            serde_json::to_string(&TestBatchBuilder::for_household(700).build()).unwrap(),
            serde_json::to_string(&TestBatchBuilder::for_household(701).build()).unwrap(),
        ]
        .join("\n");
        let path = write_extract("jsonl", &lines);

        let batches = load_household_batches(&[path]).unwrap();
        assert_eq!(batches.len(), 2);
    }

    #[test]
    fn test_records_of_one_household_across_files_are_joined() {
        let full = TestBatchBuilder::reference().build();
        let households = SurveyBatch {
            households: full.households.clone(),
            ..SurveyBatch::default()
        };
        let travel = SurveyBatch {
            households: Vec::new(),
            ..full
        };
        let paths = [
            write_extract("json", &serde_json::to_string(&households).unwrap()),
            write_extract("json", &serde_json::to_string(&travel).unwrap()),
        ];

        let batches = load_household_batches(&paths).unwrap();
        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].counts().total(), 4);
    }

    #[test]
    fn test_unknown_category_label_is_a_parse_error() {
        let mut json = serde_json::to_value(TestBatchBuilder::reference().build()).unwrap();
        json["trips"][0]["modes"]["slots"][0] = serde_json::Value::from("Hovercraft");
        let path = write_extract("json", &json.to_string());

        let err = load_household_batches(&[path]).unwrap_err();
        assert!(matches!(err, CliError::Parse { .. }));
    }
}

// ============================================================================
// provision
// ============================================================================

mod provisioning {
    use super::*;

    #[tokio::test]
    async fn test_strict_provision_then_if_absent() {
        let store = InMemorySurveyStore::new();

        let first = provision::run(&store, &ProvisionArgs { if_absent: false }).await.unwrap();
        assert!(first.sentinel_seeded);

        let err = provision::run(&store, &ProvisionArgs { if_absent: false }).await.unwrap_err();
        assert!(matches!(err, CliError::Store(ref e) if e.is_conflict()));

        let again = provision::run(&store, &ProvisionArgs { if_absent: true }).await.unwrap();
        assert!(again.is_unchanged());
    }
}

// ============================================================================
// ingest
// ============================================================================

mod ingesting {
    use super::*;

    fn service(store: &InMemorySurveyStore, policy: IngestPolicy) -> IngestionService {
        IngestionService::new(Arc::new(store.clone()), policy).with_concurrency(2)
    }

    #[tokio::test]
    async fn test_clean_households_commit() {
        let store = InMemorySurveyStore::provisioned();
        let batches = vec![
            TestBatchBuilder::reference().build(),
            TestBatchBuilder::for_household(600).build(),
        ];

        let run = ingest::run(&service(&store, IngestPolicy::default()), batches).await;

        assert_eq!(run.committed, 2);
        assert_eq!(run.status(), CommandStatus::Success);
        assert_eq!(store.row_counts().await.households, 2);
    }

    #[tokio::test]
    async fn test_one_rejected_household_does_not_block_others() {
        let store = InMemorySurveyStore::provisioned();
        let bad_home = TestHouseholdBuilder::new()
            .with_id(601)
            .with_home(PlaceFixtures::home())
            .with_home_shape(PlaceFixtures::divergent_home_shape())
            .build();
        let mut rejected = TestBatchBuilder::for_household(601).build();
        rejected.households = vec![bad_home];

        let run = ingest::run(
            &service(&store, IngestPolicy::default()),
            vec![TestBatchBuilder::reference().build(), rejected],
        )
        .await;

        assert_eq!(run.committed, 1);
        assert_eq!(run.rejected, 1);
        assert_eq!(run.status(), CommandStatus::Rejected);
        assert!(matches!(&run.results[1], BatchResult::Outcome(outcome) if !outcome.is_committed()));
        assert!(store.household(IdFixtures::household(), None).await.is_ok());
        assert!(store
            .household(core_kernel::HouseholdId::new(601), None)
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_advisory_geometry_lets_divergent_shape_through() {
        let store = InMemorySurveyStore::provisioned();
        let household = TestHouseholdBuilder::new()
            .with_home_shape(PlaceFixtures::divergent_home_shape())
            .build();
        let mut batch = TestBatchBuilder::reference().build();
        batch.households = vec![household];
        let policy = IngestPolicy::default().with_severity(ConsistencyCheck::Geometry, Severity::Advisory);

        let run = ingest::run(&service(&store, policy), vec![batch]).await;

        assert_eq!(run.committed, 1);
        match &run.results[0] {
            BatchResult::Outcome(domain_ingest::IngestOutcome::Committed { warnings, .. }) => {
                assert!(!warnings.is_empty());
            }
            other => panic!("Expected a committed batch, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_unprovisioned_store_fails_the_run() {
        let store = InMemorySurveyStore::new();

        let run = ingest::run(
            &service(&store, IngestPolicy::default()),
            vec![TestBatchBuilder::reference().build()],
        )
        .await;

        assert_eq!(run.failed, 1);
        assert_eq!(run.status(), CommandStatus::Failed);
        assert!(matches!(&run.results[0], BatchResult::Failed { error, .. } if error.contains("not provisioned")));
    }
}

// ============================================================================
// check
// ============================================================================

mod checking {
    use super::*;

    #[tokio::test]
    async fn test_clean_extract_passes() {
        let reports = check::run(&[TestBatchBuilder::reference().build()], IngestPolicy::default())
            .await
            .unwrap();

        assert_eq!(reports.len(), 1);
        assert_eq!(check::status(&reports), CommandStatus::Success);
    }

    #[tokio::test]
    async fn test_orphan_trip_is_reported() {
        let trip = TestTripBuilder::new()
            .for_person(IdFixtures::unknown_person(), IdFixtures::household())
            .build();
        let batch = TestBatchBuilder::new().with_trip(trip).build();

        let reports = check::run(&[batch], IngestPolicy::default()).await.unwrap();

        assert_eq!(check::status(&reports), CommandStatus::Rejected);
        assert!(reports[0].fatal().any(|v| v.message.contains("9999")));
    }

    #[tokio::test]
    async fn test_duplicate_trip_across_households_is_reported() {
        let first = TestBatchBuilder::for_household(600).build();
        let mut second = TestBatchBuilder::for_household(601).build();
        second.trips[0].trip_id = first.trips[0].trip_id;
        second.trips[0].trip_id_linked = LinkedTripId::new(6_011_000);

        let reports = check::run(&[first, second], IngestPolicy::default()).await.unwrap();

        assert_eq!(check::status(&reports), CommandStatus::Rejected);
        assert!(!reports[0].has_fatal());
        assert!(reports[1]
            .fatal()
            .any(|v| v.kind == ViolationKind::Uniqueness && v.message.contains("6001001")));
    }

    #[tokio::test]
    async fn test_linked_trip_spanning_households_is_reported() {
        let first = TestBatchBuilder::for_household(600).build();
        let mut second = TestBatchBuilder::for_household(601).build();
        second.trips[0].trip_id_linked = LinkedTripId::new(6_001_000);

        let reports = check::run(&[first, second], IngestPolicy::default()).await.unwrap();

        assert_eq!(check::status(&reports), CommandStatus::Rejected);
        assert!(reports[1]
            .fatal()
            .any(|v| v.field.as_deref() == Some("trip_id_linked")));
    }

    #[tokio::test]
    async fn test_rejected_batch_is_not_staged() {
        let mut first = TestBatchBuilder::for_household(600).build();
        first.trips[0].person_id = IdFixtures::unknown_person();
        let second = TestBatchBuilder::for_household(600).build();

        let reports = check::run(&[first, second], IngestPolicy::default()).await.unwrap();

        assert!(reports[0].has_fatal());
        assert!(!reports[1].has_fatal(), "{}", reports[1]);
    }
}

// ============================================================================
// linkage
// ============================================================================

mod linking {
    use super::*;

    async fn store_with(batch: SurveyBatch, policy: IngestPolicy) -> InMemorySurveyStore {
        let store = InMemorySurveyStore::provisioned();
        let outcome = IngestionService::new(Arc::new(store.clone()), policy)
            .ingest(batch)
            .await
            .unwrap();
        assert!(outcome.is_committed(), "{:#?}", outcome.report());
        store
    }

    #[tokio::test]
    async fn test_linked_trip_is_summarized() {
        let batch = TestBatchBuilder::reference()
            .with_trip(second_leg(9, 0).build())
            .build();
        let store = store_with(batch, IngestPolicy::default()).await;

        let resolution = linkage::run(&store, LinkageTarget::Linked(IdFixtures::linked_trip()))
            .await
            .unwrap();

        assert_eq!(linkage::status(&resolution), CommandStatus::Success);
        assert_eq!(resolution.linked_trips.len(), 1);
        assert_eq!(
            resolution.linked_trips[0].legs,
            vec![IdFixtures::trip(), core_kernel::TripId::new(IdFixtures::trip().value() + 1)]
        );
    }

    #[tokio::test]
    async fn test_overlapping_legs_are_reported() {
        let batch = TestBatchBuilder::reference()
            .with_trip(second_leg(8, 15).build())
            .build();
        let policy = IngestPolicy::default().with_severity(ConsistencyCheck::Linkage, Severity::Advisory);
        let store = store_with(batch, policy).await;

        let resolution = linkage::run(&store, LinkageTarget::Person(IdFixtures::person()))
            .await
            .unwrap();

        assert_eq!(linkage::status(&resolution), CommandStatus::Rejected);
        assert!(!resolution.linked_trips[0].consistent);
    }

    #[tokio::test]
    async fn test_unknown_linked_trip_is_not_found() {
        let store = InMemorySurveyStore::provisioned();

        let err = linkage::run(&store, LinkageTarget::Linked(LinkedTripId::new(42)))
            .await
            .unwrap_err();
        assert!(matches!(err, CliError::Store(ref e) if e.is_not_found()));
    }

    #[tokio::test]
    async fn test_person_without_trips_resolves_to_nothing() {
        let store = InMemorySurveyStore::provisioned();

        let resolution = linkage::run(&store, LinkageTarget::Person(PersonId::new(42)))
            .await
            .unwrap();
        assert!(resolution.linked_trips.is_empty());
        assert_eq!(linkage::status(&resolution), CommandStatus::Success);
    }
}
