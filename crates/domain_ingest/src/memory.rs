//! In-memory survey store
//!
//! Implements [`SurveyStore`] with the same key, reference and atomicity
//! rules as the PostgreSQL schema. Used by tests and by `hhtbs check`.
//! A commit is checked in full under the write lock before its first row
//! is inserted.

use std::collections::{BTreeMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::{debug, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, HouseholdId, LinkedTripId,
    OperationMetadata, PersonId, PortError, Stored, TraceId, TripId,
};
use domain_household::{BorderTrip, Household, Intercept, Person, Vehicle, VehicleRef};
use domain_travel::{Day, LinkedLeg, StoredTrace, Trip};

use crate::batch::{RowCounts, SurveyBatch};
use crate::ports::{
    CommitSummary, ExistingKeys, KeyLookup, ProvisionMode, ProvisionOutcome, SurveyStore, SCHEMA,
    TABLES,
};

#[derive(Debug, Default)]
struct Tables {
    provisioned: bool,
    /// Last surrogate id handed out; the sentinel vehicle holds 0
    last_id: i64,
    households: BTreeMap<HouseholdId, Household>,
    persons: BTreeMap<PersonId, Person>,
    days: BTreeMap<(PersonId, NaiveDate), Stored<Day>>,
    trips: BTreeMap<TripId, Trip>,
    vehicles: BTreeMap<(i32, i16), Stored<Vehicle>>,
    intercepts: BTreeMap<HouseholdId, Intercept>,
    border_trips: BTreeMap<(i32, i16), Stored<BorderTrip>>,
    traces: BTreeMap<TraceId, StoredTrace>,
}

impl Tables {
    fn ensure_provisioned(&self) -> Result<(), PortError> {
        if self.provisioned {
            Ok(())
        } else {
            Err(PortError::internal(format!("schema {} is not provisioned", SCHEMA)))
        }
    }

    fn next_id(&mut self) -> i64 {
        self.last_id += 1;
        self.last_id
    }

    fn seed_sentinel(&mut self) -> bool {
        let sentinel = Vehicle::not_applicable();
        if self.vehicles.contains_key(&sentinel.key()) {
            return false;
        }
        self.vehicles.insert(sentinel.key(), Stored::new(0, sentinel));
        true
    }

    /// Checks a normalized batch against the storage constraints
    ///
    /// Keys are looked up in the live tables and among the batch's own
    /// rows, so nothing has to be copied before the batch is known to fit.
    fn check(&self, batch: &SurveyBatch) -> Result<(), PortError> {
        let mut households = HashSet::new();
        for household in &batch.households {
            let id = household.household_id;
            if self.households.contains_key(&id) || !households.insert(id) {
                return Err(duplicate("households", id));
            }
        }
        let household_exists = |id: &HouseholdId| self.households.contains_key(id) || households.contains(id);

        let mut persons = HashSet::new();
        for person in &batch.persons {
            if self.persons.contains_key(&person.person_id) || !persons.insert(person.person_id) {
                return Err(duplicate("persons", person.person_id));
            }
            if !household_exists(&person.household_id) {
                return Err(dangling("persons", person.person_id, "household_id", person.household_id));
            }
        }
        let person_exists = |id: &PersonId| self.persons.contains_key(id) || persons.contains(id);

        let mut days = HashSet::new();
        for day in &batch.days {
            let key = day.key();
            if self.days.contains_key(&key) || !days.insert(key) {
                return Err(PortError::conflict(format!(
                    "day: duplicate key person_id={}, travel_date={}",
                    key.0, key.1
                )));
            }
            if !person_exists(&day.person_id) {
                return Err(dangling("day", day.travel_date, "person_id", day.person_id));
            }
        }

        let mut trips = HashSet::new();
        for trip in &batch.trips {
            if self.trips.contains_key(&trip.trip_id) || !trips.insert(trip.trip_id) {
                return Err(duplicate("trips", trip.trip_id));
            }
            if !person_exists(&trip.person_id) {
                return Err(dangling("trips", trip.trip_id, "person_id", trip.person_id));
            }
        }

        let mut traces = HashSet::new();
        for trace in &batch.traces {
            if self.traces.contains_key(&trace.trip_id_location) || !traces.insert(trace.trip_id_location) {
                return Err(duplicate("location_lines", trace.trip_id_location));
            }
            if trace.shape.is_none() {
                return Err(PortError::validation("location line has no shape"));
            }
        }

        let mut vehicles = HashSet::new();
        for vehicle in &batch.vehicles {
            let key = vehicle.key();
            if self.vehicles.contains_key(&key) || !vehicles.insert(key) {
                return Err(PortError::conflict(format!(
                    "vehicles: duplicate key household_id={}, vehicle_number={}",
                    key.0, key.1
                )));
            }
        }

        let mut intercepts = HashSet::new();
        for intercept in &batch.intercepts {
            let id = intercept.household_id;
            if self.intercepts.contains_key(&id) || !intercepts.insert(id) {
                return Err(duplicate("intercept", id));
            }
        }

        let mut border_trips = HashSet::new();
        for border_trip in &batch.border_trips {
            let key = border_trip.key();
            if self.border_trips.contains_key(&key) || !border_trips.insert(key) {
                return Err(PortError::conflict(format!(
                    "border_trips: duplicate key household_id={}, trip_id={}",
                    key.0, key.1
                )));
            }
            if !household_exists(&border_trip.household_id) {
                return Err(dangling("border_trips", key.1, "household_id", border_trip.household_id));
            }
        }

        Ok(())
    }

    /// Writes a batch that passed [`Tables::check`]
    fn insert(&mut self, batch: SurveyBatch) -> RowCounts {
        let counts = batch.counts();

        for household in batch.households {
            self.households.insert(household.household_id, household);
        }
        for person in batch.persons {
            self.persons.insert(person.person_id, person);
        }
        for day in batch.days {
            let id = self.next_id();
            self.days.insert(day.key(), Stored::new(id, day));
        }
        for trip in batch.trips {
            self.trips.insert(trip.trip_id, trip);
        }
        for trace in batch.traces {
            let points = trace
                .points
                .into_iter()
                .map(|point| Stored::new(self.next_id(), point))
                .collect();
            self.traces.insert(
                trace.trip_id_location,
                StoredTrace {
                    trip_id_location: trace.trip_id_location,
                    shape: trace.shape.unwrap_or_default(),
                    points,
                },
            );
        }
        for vehicle in batch.vehicles {
            let id = self.next_id();
            self.vehicles.insert(vehicle.key(), Stored::new(id, vehicle));
        }
        for intercept in batch.intercepts {
            self.intercepts.insert(intercept.household_id, intercept);
        }
        for border_trip in batch.border_trips {
            let id = self.next_id();
            self.border_trips.insert(border_trip.key(), Stored::new(id, border_trip));
        }

        counts
    }
}

fn duplicate(table: &str, key: impl std::fmt::Display) -> PortError {
    PortError::conflict(format!("{}: duplicate key {}", table, key))
}

fn dangling(
    table: &str,
    key: impl std::fmt::Display,
    column: &str,
    parent: impl std::fmt::Display,
) -> PortError {
    PortError::conflict(format!(
        "{} {}: {}={} does not exist",
        table, key, column, parent
    ))
}

/// Survey store kept in process memory
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStore {
    tables: Arc<RwLock<Tables>>,
}

impl InMemorySurveyStore {
    /// An unprovisioned store
    pub fn new() -> Self {
        Self::default()
    }

    /// A provisioned, empty store holding only the sentinel vehicle
    pub fn provisioned() -> Self {
        let mut tables = Tables {
            provisioned: true,
            ..Default::default()
        };
        tables.seed_sentinel();
        Self {
            tables: Arc::new(RwLock::new(tables)),
        }
    }

    /// Number of rows per table, for assertions
    pub async fn row_counts(&self) -> RowCounts {
        let tables = self.tables.read().await;
        RowCounts {
            households: tables.households.len(),
            persons: tables.persons.len(),
            days: tables.days.len(),
            trips: tables.trips.len(),
            vehicles: tables.vehicles.len(),
            intercepts: tables.intercepts.len(),
            border_trips: tables.border_trips.len(),
            traces: tables.traces.len(),
            points: tables.traces.values().map(|t| t.points.len()).sum(),
        }
    }
}

impl DomainPort for InMemorySurveyStore {}

#[async_trait]
impl HealthCheckable for InMemorySurveyStore {
    async fn health_check(&self) -> HealthCheckResult {
        let provisioned = self.tables.read().await.provisioned;
        HealthCheckResult {
            adapter_id: "in-memory-survey-store".to_string(),
            status: if provisioned {
                AdapterHealth::Healthy
            } else {
                AdapterHealth::Degraded
            },
            latency_ms: 0,
            message: (!provisioned).then(|| format!("schema {} is not provisioned", SCHEMA)),
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SurveyStore for InMemorySurveyStore {
    #[instrument(skip(self, _metadata))]
    async fn provision(
        &self,
        mode: ProvisionMode,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ProvisionOutcome, PortError> {
        let mut tables = self.tables.write().await;
        let all: Vec<String> = TABLES.iter().map(|t| t.to_string()).collect();

        if tables.provisioned {
            return match mode {
                ProvisionMode::Strict => Err(PortError::conflict(format!(
                    "schema {} is already provisioned",
                    SCHEMA
                ))),
                ProvisionMode::IfAbsent => Ok(ProvisionOutcome {
                    created: Vec::new(),
                    existing: all,
                    sentinel_seeded: tables.seed_sentinel(),
                }),
            };
        }

        tables.provisioned = true;
        let sentinel_seeded = tables.seed_sentinel();
        debug!("Provisioned in-memory schema");
        Ok(ProvisionOutcome {
            created: all,
            existing: Vec::new(),
            sentinel_seeded,
        })
    }

    async fn lookup_keys(
        &self,
        lookup: &KeyLookup,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExistingKeys, PortError> {
        let tables = self.tables.read().await;
        tables.ensure_provisioned()?;

        let mut linked_legs: BTreeMap<LinkedTripId, Vec<LinkedLeg>> = BTreeMap::new();
        if !lookup.linked_trips.is_empty() {
            for trip in tables.trips.values().filter(|t| lookup.linked_trips.contains(&t.trip_id_linked)) {
                linked_legs.entry(trip.trip_id_linked).or_default().push(LinkedLeg::from(trip));
            }
            for legs in linked_legs.values_mut() {
                legs.sort_by_key(|leg| (leg.departure_time, leg.trip_id));
            }
        }

        Ok(ExistingKeys {
            households: lookup
                .households
                .iter()
                .filter(|id| tables.households.contains_key(id))
                .copied()
                .collect(),
            persons: lookup
                .persons
                .iter()
                .filter_map(|id| tables.persons.get(id).map(|p| (*id, p.household_id)))
                .collect(),
            days: lookup
                .days
                .iter()
                .filter(|key| tables.days.contains_key(key))
                .copied()
                .collect(),
            trips: lookup
                .trips
                .iter()
                .filter(|id| tables.trips.contains_key(id))
                .copied()
                .collect(),
            linked_legs,
            traces: lookup
                .traces
                .iter()
                .filter(|id| tables.traces.contains_key(id))
                .copied()
                .collect(),
            vehicles: lookup
                .vehicles
                .iter()
                .filter(|key| tables.vehicles.contains_key(key))
                .copied()
                .collect(),
            intercepts: lookup
                .intercepts
                .iter()
                .filter(|id| tables.intercepts.contains_key(id))
                .copied()
                .collect(),
            border_trips: lookup
                .border_trips
                .iter()
                .filter(|key| tables.border_trips.contains_key(key))
                .copied()
                .collect(),
        })
    }

    #[instrument(skip(self, batch, metadata), fields(batch = %batch.label()))]
    async fn commit(
        &self,
        batch: &SurveyBatch,
        metadata: Option<OperationMetadata>,
    ) -> Result<CommitSummary, PortError> {
        let normalized = batch
            .normalized()
            .map_err(|e| PortError::validation(e.to_string()))?;

        let mut tables = self.tables.write().await;
        tables.ensure_provisioned()?;

        tables.check(&normalized)?;
        let rows = tables.insert(normalized);

        debug!(rows = rows.total(), "Committed batch");
        Ok(CommitSummary {
            rows,
            correlation_id: metadata.and_then(|m| m.correlation_id),
        })
    }

    async fn household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Household, PortError> {
        self.tables
            .read()
            .await
            .households
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Household", id))
    }

    async fn person(
        &self,
        id: PersonId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Person, PortError> {
        self.tables
            .read()
            .await
            .persons
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Person", id))
    }

    async fn persons_in_household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Person>, PortError> {
        let tables = self.tables.read().await;
        let mut persons: Vec<Person> = tables
            .persons
            .values()
            .filter(|p| p.household_id == id)
            .cloned()
            .collect();
        persons.sort_by_key(|p| p.person_number);
        Ok(persons)
    }

    async fn vehicle(
        &self,
        vehicle: Option<VehicleRef>,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Vehicle>, PortError> {
        let key = VehicleRef::to_storage_key(vehicle);
        self.tables
            .read()
            .await
            .vehicles
            .get(&key)
            .cloned()
            .ok_or_else(|| {
                PortError::not_found(
                    "Vehicle",
                    format!("household_id={}, vehicle_number={}", key.0, key.1),
                )
            })
    }

    async fn vehicles_in_household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<Vehicle>>, PortError> {
        let tables = self.tables.read().await;
        Ok(tables
            .vehicles
            .range((id.value(), i16::MIN)..=(id.value(), i16::MAX))
            .map(|(_, vehicle)| vehicle.clone())
            .collect())
    }

    async fn intercept(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Intercept, PortError> {
        self.tables
            .read()
            .await
            .intercepts
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Intercept", id))
    }

    async fn border_trips(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<BorderTrip>>, PortError> {
        let tables = self.tables.read().await;
        Ok(tables
            .border_trips
            .range((id.value(), i16::MIN)..=(id.value(), i16::MAX))
            .map(|(_, trip)| trip.clone())
            .collect())
    }

    async fn day(
        &self,
        person_id: PersonId,
        travel_date: NaiveDate,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Day>, PortError> {
        self.tables
            .read()
            .await
            .days
            .get(&(person_id, travel_date))
            .cloned()
            .ok_or_else(|| {
                PortError::not_found(
                    "Day",
                    format!("person_id={}, travel_date={}", person_id, travel_date),
                )
            })
    }

    async fn trip(
        &self,
        id: TripId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Trip, PortError> {
        self.tables
            .read()
            .await
            .trips
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("Trip", id))
    }

    async fn trips_for_person(
        &self,
        id: PersonId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError> {
        let tables = self.tables.read().await;
        let mut trips: Vec<Trip> = tables
            .trips
            .values()
            .filter(|t| t.person_id == id)
            .cloned()
            .collect();
        trips.sort_by_key(|t| (t.departure_time, t.trip_id));
        Ok(trips)
    }

    async fn trips_linked(
        &self,
        id: LinkedTripId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError> {
        let tables = self.tables.read().await;
        let mut trips: Vec<Trip> = tables
            .trips
            .values()
            .filter(|t| t.trip_id_linked == id)
            .cloned()
            .collect();
        trips.sort_by_key(|t| (t.departure_time, t.trip_id));
        Ok(trips)
    }

    async fn trace(
        &self,
        id: TraceId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<StoredTrace, PortError> {
        self.tables
            .read()
            .await
            .traces
            .get(&id)
            .cloned()
            .ok_or_else(|| PortError::not_found("LocationTrace", id))
    }
}
