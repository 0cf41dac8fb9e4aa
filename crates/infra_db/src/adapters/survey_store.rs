//! PostgreSQL Survey Store Adapter
//!
//! Implements the `SurveyStore` port over a PostGIS database using the
//! per-table repositories.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use infra_db::{create_pool, DatabaseConfig, PostgresSurveyStore};
//! use domain_ingest::{ProvisionMode, SurveyStore};
//!
//! let pool = create_pool(DatabaseConfig::new(url)).await?;
//! let store: Arc<dyn SurveyStore> = Arc::new(PostgresSurveyStore::new(pool));
//! store.provision(ProvisionMode::IfAbsent, None).await?;
//! ```
//!
//! # Transactions
//!
//! `commit` writes a batch in a single transaction, parents before
//! children. Any failure, including a key clash with a batch committed
//! concurrently, rolls the whole batch back.

use std::time::Instant;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use sqlx::PgPool;
use tracing::{debug, info, instrument};

use core_kernel::{
    AdapterHealth, DomainPort, HealthCheckResult, HealthCheckable, HouseholdId, LinkedTripId,
    OperationMetadata, PersonId, PortError, Stored, TraceId, TripId,
};
use domain_household::{BorderTrip, Household, Intercept, Person, Vehicle, VehicleRef};
use domain_ingest::{
    CommitSummary, ExistingKeys, KeyLookup, ProvisionMode, ProvisionOutcome, SurveyBatch,
    SurveyStore,
};
use domain_travel::{Day, StoredTrace, Trip};

use crate::error::DatabaseError;
use crate::provision::{self, ensure_provisioned};
use crate::repositories::{
    BorderTripRepository, DayRepository, HouseholdRepository, InterceptRepository,
    LocationRepository, PersonRepository, TripRepository, VehicleRepository,
};

const ADAPTER_ID: &str = "postgres-survey-store";

/// PostgreSQL/PostGIS implementation of the `SurveyStore` port
#[derive(Debug, Clone)]
pub struct PostgresSurveyStore {
    pool: PgPool,
    households: HouseholdRepository,
    persons: PersonRepository,
    days: DayRepository,
    trips: TripRepository,
    locations: LocationRepository,
    vehicles: VehicleRepository,
    intercepts: InterceptRepository,
    border_trips: BorderTripRepository,
}

impl PostgresSurveyStore {
    /// Creates the adapter over a connection pool
    ///
    /// # Arguments
    ///
    /// * `pool` - The PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self {
            households: HouseholdRepository::new(pool.clone()),
            persons: PersonRepository::new(pool.clone()),
            days: DayRepository::new(pool.clone()),
            trips: TripRepository::new(pool.clone()),
            locations: LocationRepository::new(pool.clone()),
            vehicles: VehicleRepository::new(pool.clone()),
            intercepts: InterceptRepository::new(pool.clone()),
            border_trips: BorderTripRepository::new(pool.clone()),
            pool,
        }
    }

    /// The underlying pool, for queries the port does not cover
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    async fn write(&self, batch: &SurveyBatch) -> Result<(), DatabaseError> {
        let mut tx = self.pool.begin().await?;

        self.households.insert_all(&mut tx, &batch.households).await?;
        self.persons.insert_all(&mut tx, &batch.persons).await?;
        self.days.insert_all(&mut tx, &batch.days).await?;
        self.trips.insert_all(&mut tx, &batch.trips).await?;
        self.locations.insert_all(&mut tx, &batch.traces).await?;
        self.vehicles.insert_all(&mut tx, &batch.vehicles).await?;
        self.intercepts.insert_all(&mut tx, &batch.intercepts).await?;
        self.border_trips.insert_all(&mut tx, &batch.border_trips).await?;

        tx.commit().await?;
        Ok(())
    }
}

impl DomainPort for PostgresSurveyStore {}

#[async_trait]
impl HealthCheckable for PostgresSurveyStore {
    /// Checks connectivity, then that the survey tables exist
    async fn health_check(&self) -> HealthCheckResult {
        let start = Instant::now();

        let result = async {
            let mut conn = self.pool.acquire().await?;
            sqlx::query_scalar::<_, i32>("SELECT 1")
                .fetch_one(&mut *conn)
                .await?;
            ensure_provisioned(&mut conn).await
        }
        .await;

        let latency_ms = start.elapsed().as_millis() as u64;

        let (status, message) = match result {
            Ok(()) => (AdapterHealth::Healthy, None),
            Err(e @ DatabaseError::NotProvisioned(_)) => (AdapterHealth::Degraded, Some(e.to_string())),
            Err(e) => (AdapterHealth::Unhealthy, Some(format!("Database error: {}", e))),
        };

        HealthCheckResult {
            adapter_id: ADAPTER_ID.to_string(),
            status,
            latency_ms,
            message,
            checked_at: Utc::now(),
        }
    }
}

#[async_trait]
impl SurveyStore for PostgresSurveyStore {
    #[instrument(skip(self, _metadata))]
    async fn provision(
        &self,
        mode: ProvisionMode,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ProvisionOutcome, PortError> {
        Ok(provision::provision(&self.pool, mode).await?)
    }

    #[instrument(skip(self, lookup, _metadata))]
    async fn lookup_keys(
        &self,
        lookup: &KeyLookup,
        _metadata: Option<OperationMetadata>,
    ) -> Result<ExistingKeys, PortError> {
        debug!("Looking up stored keys");

        Ok(ExistingKeys {
            households: self.households.existing(&lookup.households).await?,
            persons: self.persons.existing(&lookup.persons).await?,
            days: self.days.existing(&lookup.days).await?,
            trips: self.trips.existing(&lookup.trips).await?,
            traces: self.locations.existing(&lookup.traces).await?,
            vehicles: self.vehicles.existing(&lookup.vehicles).await?,
            intercepts: self.intercepts.existing(&lookup.intercepts).await?,
            border_trips: self.border_trips.existing(&lookup.border_trips).await?,
            linked_legs: self.trips.linked_legs(&lookup.linked_trips).await?,
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

        self.write(&normalized).await?;

        let rows = normalized.counts();
        info!(rows = rows.total(), "Committed batch");
        Ok(CommitSummary {
            rows,
            correlation_id: metadata.and_then(|m| m.correlation_id),
        })
    }

    #[instrument(skip(self, _metadata), fields(household_id = %id))]
    async fn household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Household, PortError> {
        Ok(self.households.get(id).await?)
    }

    #[instrument(skip(self, _metadata), fields(person_id = %id))]
    async fn person(
        &self,
        id: PersonId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Person, PortError> {
        Ok(self.persons.get(id).await?)
    }

    async fn persons_in_household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Person>, PortError> {
        Ok(self.persons.in_household(id).await?)
    }

    async fn vehicle(
        &self,
        vehicle: Option<VehicleRef>,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Vehicle>, PortError> {
        Ok(self.vehicles.get(VehicleRef::to_storage_key(vehicle)).await?)
    }

    async fn vehicles_in_household(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<Vehicle>>, PortError> {
        Ok(self.vehicles.in_household(id).await?)
    }

    async fn intercept(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Intercept, PortError> {
        Ok(self.intercepts.get(id).await?)
    }

    async fn border_trips(
        &self,
        id: HouseholdId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Stored<BorderTrip>>, PortError> {
        Ok(self.border_trips.for_household(id).await?)
    }

    #[instrument(skip(self, _metadata), fields(person_id = %person_id, travel_date = %travel_date))]
    async fn day(
        &self,
        person_id: PersonId,
        travel_date: NaiveDate,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Stored<Day>, PortError> {
        Ok(self.days.get(person_id, travel_date).await?)
    }

    #[instrument(skip(self, _metadata), fields(trip_id = %id))]
    async fn trip(
        &self,
        id: TripId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Trip, PortError> {
        Ok(self.trips.get(id).await?)
    }

    async fn trips_for_person(
        &self,
        id: PersonId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError> {
        Ok(self.trips.for_person(id).await?)
    }

    #[instrument(skip(self, _metadata), fields(trip_id_linked = %id))]
    async fn trips_linked(
        &self,
        id: LinkedTripId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<Vec<Trip>, PortError> {
        Ok(self.trips.linked(id).await?)
    }

    #[instrument(skip(self, _metadata), fields(trip_id_location = %id))]
    async fn trace(
        &self,
        id: TraceId,
        _metadata: Option<OperationMetadata>,
    ) -> Result<StoredTrace, PortError> {
        Ok(self.locations.get(id).await?)
    }
}
