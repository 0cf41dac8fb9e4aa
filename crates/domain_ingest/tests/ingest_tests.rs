//! Ingestion scenarios against the in-memory survey store
//!
//! Covers the end-to-end behaviour of the ingestion service: committed
//! batches are queryable, rejected batches leave nothing behind, keys stay
//! unique, provisioning is idempotent only when asked to be, and consistency
//! findings follow the policy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;

use core_kernel::{
    HealthCheckResult, HealthCheckable, DomainPort, HouseholdId, LinkedTripId, OperationMetadata,
    PersonId, PortError, Stored, TraceId, TripId, AdapterHealth,
};
use domain_household::{BorderTrip, Household, Intercept, Person, Vehicle, VehicleRef};
use domain_ingest::{
    CommitSummary, ConsistencyCheck, ExistingKeys, IngestOutcome, IngestPolicy, IngestionService,
    InMemorySurveyStore, KeyLookup, ProvisionMode, ProvisionOutcome, Severity, SurveyBatch,
    SurveyStore, ViolationKind, TABLES,
};
use domain_travel::{Day, StoredTrace, Trip};
use test_utils::{
    assert_committed, assert_has_violation, assert_rejected_with, IdFixtures, PlaceFixtures,
    RecordFixtures, TemporalFixtures, TestBatchBuilder, TestHouseholdBuilder, TestInterceptBuilder,
    TestTraceBuilder, TestTripBuilder, TestVehicleBuilder,
};

fn service_with(store: &InMemorySurveyStore) -> IngestionService {
    IngestionService::new(Arc::new(store.clone()), IngestPolicy::default())
}

/// A roster household for vehicle scenarios
fn vehicle_household() -> Household {
    TestHouseholdBuilder::new()
        .with_id(IdFixtures::vehicle_household().value())
        .build()
}

// ============================================================================
// Reference batch
// ============================================================================

mod reference_batch {
    use super::*;

    #[tokio::test]
    async fn test_reference_batch_commits() {
        let store = InMemorySurveyStore::provisioned();
        let outcome = service_with(&store)
            .ingest(TestBatchBuilder::reference().build())
            .await
            .unwrap();

        let summary = assert_committed(&outcome);
        assert_eq!(summary.rows.households, 1);
        assert_eq!(summary.rows.persons, 1);
        assert_eq!(summary.rows.days, 1);
        assert_eq!(summary.rows.trips, 1);
        assert!(summary.correlation_id.is_some());
    }

    #[tokio::test]
    async fn test_committed_records_are_queryable() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        service.ingest(TestBatchBuilder::reference().build()).await.unwrap();

        let household = store.household(IdFixtures::household(), None).await.unwrap();
        assert_eq!(household.home.address, PlaceFixtures::home().address);

        let person = store.person(IdFixtures::person(), None).await.unwrap();
        assert_eq!(person.household_id, IdFixtures::household());

        let members = store
            .persons_in_household(IdFixtures::household(), None)
            .await
            .unwrap();
        assert_eq!(members.len(), 1);

        let day = store
            .day(IdFixtures::person(), TemporalFixtures::travel_date(), None)
            .await
            .unwrap();
        assert!(day.id > 0);
        assert_eq!(day.record.number_trips, Some(1));

        let trip = store.trip(IdFixtures::trip(), None).await.unwrap();
        assert_eq!(trip.person_id, IdFixtures::person());
        assert_eq!(
            store.trips_for_person(IdFixtures::person(), None).await.unwrap().len(),
            1
        );
        assert_eq!(
            store.trips_linked(IdFixtures::linked_trip(), None).await.unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_stored_geometry_is_derived_from_coordinates() {
        let store = InMemorySurveyStore::provisioned();
        service_with(&store)
            .ingest(TestBatchBuilder::reference().build())
            .await
            .unwrap();

        let household = store.household(IdFixtures::household(), None).await.unwrap();
        let geocode = household.home.geocode.unwrap();
        assert_eq!(geocode.shape.as_deref(), Some("POINT(-117.1611 32.7157)"));
        assert_eq!(geocode.mgra_13, Some(1234));
    }

    #[tokio::test]
    async fn test_unknown_household_is_not_found() {
        let store = InMemorySurveyStore::provisioned();
        let err = store.household(HouseholdId::new(42), None).await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_sentinel_vehicle_is_readable() {
        let store = InMemorySurveyStore::provisioned();
        let sentinel = store.vehicle(None, None).await.unwrap();
        assert_eq!(sentinel.id, 0);
        assert!(sentinel.record.is_sentinel());
    }
}

// ============================================================================
// Referential integrity
// ============================================================================

mod referential {
    use super::*;

    #[tokio::test]
    async fn test_trip_for_unknown_person_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::reference()
            .with_trip(
                TestTripBuilder::new()
                    .with_id(IdFixtures::trip().value() + 50)
                    .with_linked_id(IdFixtures::linked_trip().value() + 50)
                    .for_person(IdFixtures::unknown_person(), IdFixtures::household())
                    .build(),
            )
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        let violation = assert_rejected_with(&outcome, ViolationKind::Referential, "person_id=9999");
        assert_eq!(violation.field.as_deref(), Some("person_id"));

        // The valid records of the batch were not written either
        assert_eq!(store.row_counts().await.total(), 1);
        assert!(store.household(IdFixtures::household(), None).await.is_err());
    }

    #[tokio::test]
    async fn test_person_of_unknown_household_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::new()
            .with_person(
                test_utils::TestPersonBuilder::new()
                    .with_household(IdFixtures::other_household())
                    .build(),
            )
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        assert_rejected_with(&outcome, ViolationKind::Referential, "household_id=501");
    }

    #[tokio::test]
    async fn test_trip_household_must_match_person() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        service.ingest(TestBatchBuilder::reference().build()).await.unwrap();
        service
            .ingest(TestBatchBuilder::for_household(IdFixtures::other_household().value()).build())
            .await
            .unwrap();

        let stray = TestTripBuilder::new()
            .with_id(IdFixtures::trip().value() + 1)
            .with_linked_id(IdFixtures::linked_trip().value() + 1)
            .for_person(IdFixtures::person(), IdFixtures::other_household())
            .build();
        let outcome = service
            .ingest(TestBatchBuilder::new().with_trip(stray).build())
            .await
            .unwrap();
        assert_rejected_with(&outcome, ViolationKind::Referential, "belongs to household_id=500");
    }

    #[tokio::test]
    async fn test_children_may_reference_stored_parents() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        service
            .ingest(
                TestBatchBuilder::new()
                    .with_household(TestHouseholdBuilder::new().build())
                    .with_person(test_utils::TestPersonBuilder::new().build())
                    .build(),
            )
            .await
            .unwrap();

        let outcome = service
            .ingest(
                TestBatchBuilder::new()
                    .with_day(test_utils::TestDayBuilder::new().build())
                    .with_trip(TestTripBuilder::new().build())
                    .with_border_trip(RecordFixtures::border_trip(IdFixtures::household(), 1))
                    .build(),
            )
            .await
            .unwrap();
        assert_committed(&outcome);
        assert_eq!(
            store.border_trips(IdFixtures::household(), None).await.unwrap().len(),
            1
        );
    }
}

// ============================================================================
// Uniqueness
// ============================================================================

mod uniqueness {
    use super::*;

    #[tokio::test]
    async fn test_duplicate_vehicle_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);

        let first = service
            .ingest(
                TestBatchBuilder::new()
                    .with_household(vehicle_household())
                    .with_vehicle(TestVehicleBuilder::new().build())
                    .build(),
            )
            .await
            .unwrap();
        assert_committed(&first);

        let second = service
            .ingest(
                TestBatchBuilder::new()
                    .with_vehicle(TestVehicleBuilder::new().with_make("Honda", "Fit").build())
                    .build(),
            )
            .await
            .unwrap();
        let violation = assert_rejected_with(&second, ViolationKind::Uniqueness, "already stored");
        assert!(violation.message.contains("household_id=10, vehicle_number=1"));

        let stored = store
            .vehicles_in_household(IdFixtures::vehicle_household(), None)
            .await
            .unwrap();
        assert_eq!(stored.len(), 1);
        assert_eq!(stored[0].record.make, "Toyota");
    }

    #[tokio::test]
    async fn test_duplicate_within_batch_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::new()
            .with_household(vehicle_household())
            .with_vehicle(TestVehicleBuilder::new().build())
            .with_vehicle(TestVehicleBuilder::new().build())
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        assert_rejected_with(&outcome, ViolationKind::Uniqueness, "within the batch");
    }

    #[tokio::test]
    async fn test_sentinel_key_cannot_be_ingested() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::new().with_vehicle(Vehicle::not_applicable()).build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        assert_rejected_with(&outcome, ViolationKind::Uniqueness, "reserved");
    }

    #[tokio::test]
    async fn test_reingesting_a_household_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        service.ingest(TestBatchBuilder::reference().build()).await.unwrap();

        let outcome = service.ingest(TestBatchBuilder::reference().build()).await.unwrap();
        let report = outcome.report().unwrap();
        assert_eq!(report.count(ViolationKind::Uniqueness), 4);
    }
}

// ============================================================================
// Provisioning
// ============================================================================

mod provisioning {
    use super::*;

    #[tokio::test]
    async fn test_provision_creates_every_table() {
        let store = InMemorySurveyStore::new();
        let outcome = store.provision(ProvisionMode::Strict, None).await.unwrap();
        assert_eq!(outcome.created.len(), TABLES.len());
        assert!(outcome.sentinel_seeded);
    }

    #[tokio::test]
    async fn test_strict_provisioning_twice_conflicts() {
        let store = InMemorySurveyStore::new();
        store.provision(ProvisionMode::Strict, None).await.unwrap();

        let err = store.provision(ProvisionMode::Strict, None).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("already provisioned"));
    }

    #[tokio::test]
    async fn test_if_absent_provisioning_is_idempotent() {
        let store = InMemorySurveyStore::new();
        store.provision(ProvisionMode::IfAbsent, None).await.unwrap();
        let again = store.provision(ProvisionMode::IfAbsent, None).await.unwrap();

        assert!(again.is_unchanged());
        assert_eq!(again.existing.len(), TABLES.len());
        assert_eq!(store.row_counts().await.vehicles, 1);
    }

    #[tokio::test]
    async fn test_health_reports_unprovisioned_store() {
        let store = InMemorySurveyStore::new();
        assert_eq!(store.health_check().await.status, AdapterHealth::Degraded);
        store.provision(ProvisionMode::Strict, None).await.unwrap();
        assert_eq!(store.health_check().await.status, AdapterHealth::Healthy);
    }
}

// ============================================================================
// Consistency policy
// ============================================================================

mod consistency {
    use super::*;

    fn divergent_home_batch() -> SurveyBatch {
        TestBatchBuilder::new()
            .with_household(
                TestHouseholdBuilder::new()
                    .with_home_shape(PlaceFixtures::divergent_home_shape())
                    .build(),
            )
            .build()
    }

    #[tokio::test]
    async fn test_divergent_geometry_is_fatal_by_default() {
        let store = InMemorySurveyStore::provisioned();
        let outcome = service_with(&store).ingest(divergent_home_batch()).await.unwrap();
        let report = outcome.report().unwrap();
        let violation = assert_has_violation(report, ViolationKind::Consistency, "home.geocode.shape");
        assert_eq!(violation.severity, Severity::Fatal);
    }

    #[tokio::test]
    async fn test_divergent_geometry_commits_under_advisory_policy() {
        let store = InMemorySurveyStore::provisioned();
        let policy = IngestPolicy::default().with_severity(ConsistencyCheck::Geometry, Severity::Advisory);
        let service = IngestionService::new(Arc::new(store.clone()), policy);

        let outcome = service.ingest(divergent_home_batch()).await.unwrap();
        match &outcome {
            IngestOutcome::Committed { warnings, .. } => {
                assert_eq!(warnings.len(), 1);
                assert_eq!(warnings[0].field.as_deref(), Some("home.geocode.shape"));
            }
            IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
        }

        // The supplied shape is stored as given; lat/long stay authoritative
        let household = store.household(IdFixtures::household(), None).await.unwrap();
        let geocode = household.home.geocode.unwrap();
        assert_eq!(geocode.latitude, 32.7157);
        assert_eq!(geocode.shape, Some(PlaceFixtures::divergent_home_shape()));
    }

    #[tokio::test]
    async fn test_overlapping_legs_are_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::reference()
            .with_trip(
                TestTripBuilder::new()
                    .with_id(IdFixtures::trip().value() + 1)
                    .between(TemporalFixtures::at(8, 15), TemporalFixtures::at(8, 45))
                    .build(),
            )
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        let violation = assert_rejected_with(&outcome, ViolationKind::Consistency, "departs");
        assert_eq!(violation.field.as_deref(), Some("trip_id_linked"));
    }

    #[tokio::test]
    async fn test_leg_linked_to_a_stored_trip_of_another_household_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        assert_committed(&service.ingest(TestBatchBuilder::for_household(600).build()).await.unwrap());

        let mut batch = TestBatchBuilder::for_household(601).build();
        batch.trips[0].trip_id_linked = LinkedTripId::new(6_001_000);

        let outcome = service.ingest(batch).await.unwrap();
        let violation =
            assert_rejected_with(&outcome, ViolationKind::Consistency, "expected household_id=600");
        assert_eq!(violation.field.as_deref(), Some("trip_id_linked"));
        assert!(violation.message.contains("trip_id=6011001"));
        assert_eq!(store.row_counts().await.households, 1);
    }

    #[tokio::test]
    async fn test_leg_continuing_a_stored_linked_trip_commits() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        assert_committed(&service.ingest(TestBatchBuilder::for_household(602).build()).await.unwrap());

        let batch = TestBatchBuilder::new()
            .with_trip(
                TestTripBuilder::new()
                    .with_id(6_021_002)
                    .with_linked_id(6_021_000)
                    .for_person(PersonId::new(6_021), HouseholdId::new(602))
                    .between(TemporalFixtures::at(8, 30), TemporalFixtures::at(8, 50))
                    .build(),
            )
            .build();

        assert_committed(&service.ingest(batch).await.unwrap());
        assert_eq!(store.row_counts().await.trips, 2);
    }

    #[tokio::test]
    async fn test_leg_overlapping_a_stored_leg_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        assert_committed(&service.ingest(TestBatchBuilder::for_household(603).build()).await.unwrap());

        let batch = TestBatchBuilder::new()
            .with_trip(
                TestTripBuilder::new()
                    .with_id(6_031_002)
                    .with_linked_id(6_031_000)
                    .for_person(PersonId::new(6_031), HouseholdId::new(603))
                    .between(TemporalFixtures::at(8, 15), TemporalFixtures::at(8, 50))
                    .build(),
            )
            .build();

        let outcome = service.ingest(batch).await.unwrap();
        let violation = assert_rejected_with(&outcome, ViolationKind::Consistency, "departs");
        assert!(violation.message.contains("trip_id=6031002"));
        assert_eq!(store.row_counts().await.trips, 1);
    }

    #[tokio::test]
    async fn test_inverted_trip_is_an_advisory() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::new()
            .with_household(TestHouseholdBuilder::new().build())
            .with_person(test_utils::TestPersonBuilder::new().build())
            .with_trip(
                TestTripBuilder::new()
                    .between(TemporalFixtures::at(9, 0), TemporalFixtures::at(8, 50))
                    .build(),
            )
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        match outcome {
            IngestOutcome::Committed { warnings, .. } => {
                assert!(warnings.iter().any(|w| w.field.as_deref() == Some("arrival_time")));
            }
            IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
        }
    }

    #[tokio::test]
    async fn test_vehicle_mode_without_vehicle_is_an_advisory() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::new()
            .with_household(TestHouseholdBuilder::new().build())
            .with_person(test_utils::TestPersonBuilder::new().build())
            .with_trip(TestTripBuilder::new().with_household_vehicle(2).build())
            .build();

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        match outcome {
            IngestOutcome::Committed { warnings, .. } => {
                assert!(warnings
                    .iter()
                    .any(|w| w.field.as_deref() == Some("modes.slots") && w.message.contains("vehicle_number=2")));
            }
            IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
        }
    }

    #[tokio::test]
    async fn test_vehicle_mode_with_vehicle_is_clean() {
        let store = InMemorySurveyStore::provisioned();
        let mut batch = TestBatchBuilder::reference()
            .with_vehicle(
                TestVehicleBuilder::new()
                    .for_household(IdFixtures::household())
                    .with_number(2)
                    .build(),
            )
            .build();
        batch.trips[0] = TestTripBuilder::new().with_household_vehicle(2).build();

        let report = service_with(&store).validate(&batch, None).await.unwrap();
        test_utils::assert_clean(&report);
    }
}

// ============================================================================
// Location traces
// ============================================================================

mod traces {
    use super::*;

    #[tokio::test]
    async fn test_unordered_trace_is_stored_in_time_order() {
        let store = InMemorySurveyStore::provisioned();
        let mut batch = TestBatchBuilder::reference()
            .with_trace(TestTraceBuilder::new().reversed().build())
            .build();
        batch.trips[0].trip_id_location = Some(IdFixtures::trace());

        let outcome = service_with(&store).ingest(batch).await.unwrap();
        match &outcome {
            IngestOutcome::Committed { warnings, summary, .. } => {
                assert_eq!(summary.rows.points, 3);
                assert_eq!(warnings.len(), 1);
                assert_eq!(warnings[0].field.as_deref(), Some("points"));
            }
            IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
        }

        let trace = store.trace(IdFixtures::trace(), None).await.unwrap();
        assert!(trace.shape.starts_with("LINESTRING"));
        let times: Vec<_> = trace.points.iter().map(|p| p.record.collected_at).collect();
        let mut sorted = times.clone();
        sorted.sort();
        assert_eq!(times, sorted);
        assert!(trace.length_meters().unwrap() > 0.0);
    }

    #[tokio::test]
    async fn test_trip_trace_reference_without_trace_is_an_advisory() {
        let store = InMemorySurveyStore::provisioned();
        let mut batch = TestBatchBuilder::reference().build();
        batch.trips[0].trip_id_location = Some(TraceId::new(1));

        let report = service_with(&store).validate(&batch, None).await.unwrap();
        assert!(!report.has_fatal());
        assert_has_violation(&report, ViolationKind::Consistency, "trip_id_location");
    }

    #[tokio::test]
    async fn test_empty_trace_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let empty = TestTraceBuilder::along(TraceId::new(5), TemporalFixtures::at(8, 0), &[]).build();

        let outcome = service_with(&store)
            .ingest(TestBatchBuilder::new().with_trace(empty).build())
            .await
            .unwrap();
        assert_rejected_with(&outcome, ViolationKind::Missingness, "neither a shape nor any points");
    }
}

// ============================================================================
// Intercepts
// ============================================================================

mod intercepts {
    use super::*;

    #[tokio::test]
    async fn test_intercept_commits_and_reads_back() {
        let store = InMemorySurveyStore::provisioned();
        let batch = TestBatchBuilder::reference()
            .with_intercept(TestInterceptBuilder::new().build())
            .build();

        assert_committed(&service_with(&store).ingest(batch).await.unwrap());
        let intercept = store.intercept(IdFixtures::household(), None).await.unwrap();
        assert_eq!(intercept.survey_status, "Complete");
        assert!(intercept.follow_up.is_consistent());
    }

    #[tokio::test]
    async fn test_second_intercept_for_household_is_rejected() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        service
            .ingest(TestBatchBuilder::new().with_intercept(TestInterceptBuilder::new().build()).build())
            .await
            .unwrap();

        let outcome = service
            .ingest(TestBatchBuilder::new().with_intercept(TestInterceptBuilder::new().build()).build())
            .await
            .unwrap();
        assert_rejected_with(&outcome, ViolationKind::Uniqueness, "household_id=500");
    }
}

// ============================================================================
// Batches and concurrency
// ============================================================================

mod batches {
    use super::*;

    #[test]
    fn test_extract_partitions_by_household() {
        let mut extract = TestBatchBuilder::for_household(600).build();
        extract.extend(TestBatchBuilder::for_household(601).build());
        extract
            .traces
            .push(TestTraceBuilder::new().with_id(TraceId::new(9)).build());
        extract.trips[1].trip_id_location = Some(TraceId::new(9));

        let batches = extract.partition_by_household();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].label(), "household_id=600");
        assert_eq!(batches[1].traces.len(), 1);
    }

    #[tokio::test]
    async fn test_ingest_all_commits_independent_batches() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store).with_concurrency(3);
        let batches: Vec<SurveyBatch> = (700..708)
            .map(|id| TestBatchBuilder::for_household(id).build())
            .collect();

        let results = service.ingest_all(batches).await;
        assert_eq!(results.len(), 8);
        for (index, result) in results.iter().enumerate() {
            match result.as_ref().unwrap() {
                IngestOutcome::Committed { batch, .. } => {
                    assert_eq!(batch, &format!("household_id={}", 700 + index));
                }
                IngestOutcome::Rejected { report } => panic!("unexpected rejection: {}", report),
            }
        }

        let counts = store.row_counts().await;
        assert_eq!(counts.households, 8);
        assert_eq!(counts.trips, 8);
    }

    #[test]
    fn test_households_sharing_a_linked_trip_stay_in_one_batch() {
        let mut extract = TestBatchBuilder::for_household(600).build();
        extract.extend(TestBatchBuilder::for_household(601).build());
        extract.extend(TestBatchBuilder::for_household(602).build());
        extract.trips[1].trip_id_linked = LinkedTripId::new(6_001_000);

        let batches = extract.partition_by_household();
        assert_eq!(batches.len(), 2);
        assert_eq!(batches[0].label(), "household_id in (600, 601)");
        assert_eq!(batches[0].trips.len(), 2);
        assert_eq!(batches[1].label(), "household_id=602");
    }

    #[tokio::test]
    async fn test_ingest_all_rejects_linkage_across_households() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store).with_concurrency(4);
        let mut extract = TestBatchBuilder::for_household(600).build();
        extract.extend(TestBatchBuilder::for_household(601).build());
        extract.trips[1].trip_id_linked = LinkedTripId::new(6_001_000);

        let results = service.ingest_all(extract.partition_by_household()).await;
        assert_eq!(results.len(), 1);
        let outcome = results[0].as_ref().unwrap();
        let violation =
            assert_rejected_with(outcome, ViolationKind::Consistency, "expected household_id=600");
        assert_eq!(violation.field.as_deref(), Some("trip_id_linked"));
        assert_eq!(store.row_counts().await.households, 0);
    }

    #[tokio::test]
    async fn test_one_bad_batch_does_not_block_the_others() {
        let store = InMemorySurveyStore::provisioned();
        let service = service_with(&store);
        let mut bad = TestBatchBuilder::for_household(801).build();
        bad.trips[0].person_id = IdFixtures::unknown_person();

        let results = service
            .ingest_all(vec![TestBatchBuilder::for_household(800).build(), bad])
            .await;
        assert!(results[0].as_ref().unwrap().is_committed());
        assert!(!results[1].as_ref().unwrap().is_committed());
        assert_eq!(store.row_counts().await.households, 1);
    }

    #[tokio::test]
    async fn test_validate_writes_nothing() {
        let store = InMemorySurveyStore::provisioned();
        let report = service_with(&store)
            .validate(&TestBatchBuilder::reference().build(), None)
            .await
            .unwrap();
        test_utils::assert_clean(&report);
        assert_eq!(store.row_counts().await.households, 0);
    }
}

// ============================================================================
// Storage conflicts
// ============================================================================

/// Delegates to a real store but reports no existing keys, like a reader
/// that raced another writer
#[derive(Clone)]
struct StaleKeysStore {
    inner: InMemorySurveyStore,
}

impl DomainPort for StaleKeysStore {}

#[async_trait]
impl HealthCheckable for StaleKeysStore {
    async fn health_check(&self) -> HealthCheckResult {
        self.inner.health_check().await
    }
}

#[async_trait]
impl SurveyStore for StaleKeysStore {
    async fn provision(
        &self,
        mode: ProvisionMode,
        metadata: Option<OperationMetadata>,
    ) -> Result<ProvisionOutcome, PortError> {
        self.inner.provision(mode, metadata).await
    }

    async fn lookup_keys(
        &self,
        _lookup: &KeyLookup,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExistingKeys, PortError> {
        Ok(ExistingKeys::default())
    }

    async fn commit(
        &self,
        batch: &SurveyBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<CommitSummary, PortError> {
        self.inner.commit(batch, metadata).await
    }

    async fn household(&self, id: HouseholdId, metadata: Option<OperationMetadata>) -> Result<Household, PortError> {
        self.inner.household(id, metadata).await
    }

    async fn person(&self, id: PersonId, metadata: Option<OperationMetadata>) -> Result<Person, PortError> {
        self.inner.person(id, metadata).await
    }

    async fn persons_in_household(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Person>, PortError> {
        self.inner.persons_in_household(id, metadata).await
    }

    async fn vehicle(
        &self,
        vehicle: Option<VehicleRef>,
        metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Vehicle>, PortError> {
        self.inner.vehicle(vehicle, metadata).await
    }

    async fn vehicles_in_household(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<Vehicle>>, PortError> {
        self.inner.vehicles_in_household(id, metadata).await
    }

    async fn intercept(&self, id: HouseholdId, metadata: Option<OperationMetadata>) -> Result<Intercept, PortError> {
        self.inner.intercept(id, metadata).await
    }

    async fn border_trips(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<BorderTrip>>, PortError> {
        self.inner.border_trips(id, metadata).await
    }

    async fn day(
        &self,
        person_id: PersonId,
        travel_date: NaiveDate,
        metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Day>, PortError> {
        self.inner.day(person_id, travel_date, metadata).await
    }

    async fn trip(&self, id: TripId, metadata: Option<OperationMetadata>) -> Result<Trip, PortError> {
        self.inner.trip(id, metadata).await
    }

    async fn trips_for_person(&self, id: PersonId, metadata: Option<OperationMetadata>) -> Result<Vec<Trip>, PortError> {
        self.inner.trips_for_person(id, metadata).await
    }

    async fn trips_linked(
        &self,
        id: LinkedTripId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError> {
        self.inner.trips_linked(id, metadata).await
    }

    async fn trace(&self, id: TraceId, metadata: Option<OperationMetadata>) -> Result<StoredTrace, PortError> {
        self.inner.trace(id, metadata).await
    }
}

mod storage_conflicts {
    use super::*;

    #[tokio::test]
    async fn test_write_time_conflict_rejects_whole_batch() {
        let inner = InMemorySurveyStore::provisioned();
        service_with(&inner)
            .ingest(TestBatchBuilder::reference().build())
            .await
            .unwrap();

        let stale = IngestionService::new(
            Arc::new(StaleKeysStore { inner: inner.clone() }),
            IngestPolicy::default(),
        );
        // Household 500 passes validation against the stale view but is already stored
        let mut batch = TestBatchBuilder::for_household(900).build();
        batch.households.push(TestHouseholdBuilder::new().build());

        let outcome = stale.ingest(batch).await.unwrap();
        let violation = assert_rejected_with(&outcome, ViolationKind::StorageConflict, "duplicate key");
        assert!(violation.message.contains("500"));
        assert!(inner.household(HouseholdId::new(900), None).await.unwrap_err().is_not_found());
    }

    #[tokio::test]
    async fn test_store_conflict_leaves_live_tables_untouched() {
        let store = InMemorySurveyStore::provisioned();
        store.commit(&TestBatchBuilder::reference().build(), None).await.unwrap();
        let before = store.row_counts().await;

        // Household 900 is new; its trip reuses a stored trip_id
        let mut batch = TestBatchBuilder::for_household(900).build();
        batch.trips.push(TestTripBuilder::new().build());

        let err = store.commit(&batch, None).await.unwrap_err();
        assert!(err.is_conflict());
        assert!(err.to_string().contains("trips"));
        assert_eq!(store.row_counts().await, before);
        assert!(store.household(HouseholdId::new(900), None).await.unwrap_err().is_not_found());

        store.commit(&TestBatchBuilder::for_household(900).build(), None).await.unwrap();
        assert_eq!(store.row_counts().await.households, before.households + 1);
    }

    #[tokio::test]
    async fn test_unprovisioned_store_fails_instead_of_rejecting() {
        let service = IngestionService::new(Arc::new(InMemorySurveyStore::new()), IngestPolicy::default());
        let err = service.ingest(TestBatchBuilder::reference().build()).await.unwrap_err();
        assert!(err.to_string().contains("not provisioned"));
    }
}
