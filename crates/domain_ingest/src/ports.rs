//! Survey Store Port
//!
//! The `SurveyStore` trait is everything ingestion and the analyst commands
//! need from persistent storage. Two adapters implement it:
//!
//! - **PostgreSQL/PostGIS**: `infra_db::PostgresSurveyStore`
//! - **In-memory**: [`crate::memory::InMemorySurveyStore`], for tests and
//!   dry runs
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use domain_ingest::{IngestionService, IngestPolicy, SurveyStore};
//!
//! let store: Arc<dyn SurveyStore> = Arc::new(PostgresSurveyStore::new(pool));
//! let service = IngestionService::new(store, IngestPolicy::default());
//! let outcome = service.ingest(batch).await?;
//! ```
//!
//! Both adapters give a batch the same guarantees: `commit` writes every
//! row of the batch or none, and refuses a batch that would break a key or
//! reference even if validation was skipped.

use std::collections::{BTreeMap, BTreeSet};

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use core_kernel::{
    DomainPort, HealthCheckable, HouseholdId, LinkedTripId, OperationMetadata, PersonId,
    PortError, Stored, TraceId, TripId,
};
use domain_household::{BorderTrip, Household, Intercept, Person, Vehicle, VehicleRef};
use domain_travel::{Day, LinkedLeg, StoredTrace, Trip};

use crate::batch::{RowCounts, SurveyBatch};

/// Namespace of every survey table
pub const SCHEMA: &str = "hhtbs2016";

/// Survey tables, parents first
pub const TABLES: &[&str] = &[
    "households",
    "persons",
    "day",
    "trips",
    "location_lines",
    "location_points",
    "vehicles",
    "intercept",
    "border_trips",
];

/// How provisioning treats an already provisioned store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProvisionMode {
    /// Fail with a conflict if the schema already exists
    Strict,
    /// Create whatever is missing and leave the rest untouched
    IfAbsent,
}

/// What provisioning did
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProvisionOutcome {
    /// Tables created by this run
    pub created: Vec<String>,
    /// Tables that were already present
    pub existing: Vec<String>,
    /// Whether the sentinel vehicle row was inserted by this run
    pub sentinel_seeded: bool,
}

impl ProvisionOutcome {
    /// True if the run changed nothing
    pub fn is_unchanged(&self) -> bool {
        self.created.is_empty() && !self.sentinel_seeded
    }
}

/// Keys a batch creates or references, to be looked up in the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyLookup {
    pub households: BTreeSet<HouseholdId>,
    pub persons: BTreeSet<PersonId>,
    pub days: BTreeSet<(PersonId, NaiveDate)>,
    pub trips: BTreeSet<TripId>,
    /// Linked trips the batch adds legs to
    pub linked_trips: BTreeSet<LinkedTripId>,
    pub traces: BTreeSet<TraceId>,
    pub vehicles: BTreeSet<(i32, i16)>,
    pub intercepts: BTreeSet<HouseholdId>,
    pub border_trips: BTreeSet<(i32, i16)>,
}

impl KeyLookup {
    /// Collects every key a batch creates and every parent key it references
    pub fn for_batch(batch: &SurveyBatch) -> Self {
        let mut lookup = KeyLookup::default();

        for household in &batch.households {
            lookup.households.insert(household.household_id);
        }
        for person in &batch.persons {
            lookup.persons.insert(person.person_id);
            lookup.households.insert(person.household_id);
        }
        for day in &batch.days {
            lookup.days.insert(day.key());
            lookup.persons.insert(day.person_id);
        }
        for trip in &batch.trips {
            lookup.trips.insert(trip.trip_id);
            lookup.linked_trips.insert(trip.trip_id_linked);
            lookup.persons.insert(trip.person_id);
            if let Some(trace) = trip.trip_id_location {
                lookup.traces.insert(trace);
            }
            if let Some(vehicle) = trip.household_vehicle() {
                lookup.vehicles.insert(vehicle.key());
            }
        }
        for vehicle in &batch.vehicles {
            lookup.vehicles.insert(vehicle.key());
            if !vehicle.is_sentinel() {
                lookup.households.insert(vehicle.household_id);
            }
        }
        for intercept in &batch.intercepts {
            lookup.intercepts.insert(intercept.household_id);
        }
        for border_trip in &batch.border_trips {
            lookup.border_trips.insert(border_trip.key());
            lookup.households.insert(border_trip.household_id);
        }
        for trace in &batch.traces {
            lookup.traces.insert(trace.trip_id_location);
        }

        lookup
    }

    pub fn is_empty(&self) -> bool {
        self.households.is_empty()
            && self.persons.is_empty()
            && self.days.is_empty()
            && self.trips.is_empty()
            && self.linked_trips.is_empty()
            && self.traces.is_empty()
            && self.vehicles.is_empty()
            && self.intercepts.is_empty()
            && self.border_trips.is_empty()
    }
}

/// The subset of a lookup that already exists in the store
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExistingKeys {
    pub households: BTreeSet<HouseholdId>,
    /// Stored persons with the household they belong to
    pub persons: BTreeMap<PersonId, HouseholdId>,
    pub days: BTreeSet<(PersonId, NaiveDate)>,
    pub trips: BTreeSet<TripId>,
    /// Stored legs of the requested linked trips, in departure order
    pub linked_legs: BTreeMap<LinkedTripId, Vec<LinkedLeg>>,
    pub traces: BTreeSet<TraceId>,
    pub vehicles: BTreeSet<(i32, i16)>,
    pub intercepts: BTreeSet<HouseholdId>,
    pub border_trips: BTreeSet<(i32, i16)>,
}

/// Result of a successful commit
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitSummary {
    /// Rows written, per table
    pub rows: RowCounts,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
}

/// The port between ingestion and persistent survey storage
///
/// All methods return `Result<T, PortError>`; lookups of a single record
/// return `PortError::NotFound` when the key is unknown, list lookups return
/// an empty vector.
#[async_trait]
pub trait SurveyStore: DomainPort + HealthCheckable {
    // ========================================================================
    // Schema and writes
    // ========================================================================

    /// Creates the namespace, every table and the sentinel vehicle row
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` in [`ProvisionMode::Strict`] when the schema
    /// already exists.
    async fn provision(
        &self,
        mode: ProvisionMode,
        metadata: Option<OperationMetadata>,
    ) -> Result<ProvisionOutcome, PortError>;

    /// Looks up which of the requested keys are already stored, along with
    /// the stored legs of every requested linked trip
    async fn lookup_keys(
        &self,
        lookup: &KeyLookup,
        metadata: Option<OperationMetadata>,
    ) -> Result<ExistingKeys, PortError>;

    /// Writes a batch atomically
    ///
    /// Missing geometries are derived from lat/long, surrogate ids are
    /// allocated, and every row commits or none does.
    ///
    /// # Errors
    ///
    /// `PortError::Conflict` if a key or reference is violated at write time;
    /// the store is left unchanged.
    async fn commit(
        &self,
        batch: &SurveyBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<CommitSummary, PortError>;

    // ========================================================================
    // Household-scoped reads
    // ========================================================================

    async fn household(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Household, PortError>;

    async fn person(
        &self,
        id: PersonId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Person, PortError>;

    /// Persons of a household, ordered by person number
    async fn persons_in_household(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Person>, PortError>;

    /// A vehicle by reference; `None` reads the sentinel row
    async fn vehicle(
        &self,
        vehicle: Option<VehicleRef>,
        metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Vehicle>, PortError>;

    /// Vehicles of a household, ordered by vehicle number
    async fn vehicles_in_household(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<Vehicle>>, PortError>;

    async fn intercept(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Intercept, PortError>;

    /// Border trips of a household, ordered by trip number
    async fn border_trips(
        &self,
        id: HouseholdId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<BorderTrip>>, PortError>;

    // ========================================================================
    // Travel reads
    // ========================================================================

    async fn day(
        &self,
        person_id: PersonId,
        travel_date: NaiveDate,
        metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Day>, PortError>;

    async fn trip(
        &self,
        id: TripId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Trip, PortError>;

    /// Trips of a person, ordered by departure
    async fn trips_for_person(
        &self,
        id: PersonId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError>;

    /// Legs sharing a linked trip id, ordered by departure
    async fn trips_linked(
        &self,
        id: LinkedTripId,
        metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError>;

    /// A trace with its points in collection-time order
    async fn trace(
        &self,
        id: TraceId,
        metadata: Option<OperationMetadata>,
    ) -> Result<StoredTrace, PortError>;
}
