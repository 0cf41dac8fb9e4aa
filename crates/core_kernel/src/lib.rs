//! Core Kernel - Foundational types for the household travel survey store
//!
//! This crate provides the building blocks shared by every survey domain:
//! - Integer identifiers for households, persons, trips and traces
//! - Closed categorical sets and the two-tier missingness model
//! - WGS84 coordinates, geocoded places and the geometry consistency gate
//! - Travel intervals, reported costs, and port error types

pub mod identifiers;
pub mod category;
pub mod spatial;
pub mod place;
pub mod temporal;
pub mod cost;
pub mod ports;
pub mod stored;

pub use identifiers::{HouseholdId, PersonId, TripId, LinkedTripId, TraceId};
pub use category::{Categorical, Response, Sentinel, UnknownCategory, SENTINEL_LABELS};
pub use spatial::{Coordinates, SpatialError, TraceShape, DEFAULT_TOLERANCE_DEGREES, SRID};
pub use place::{Geocode, Place};
pub use temporal::{TravelInterval, TemporalError};
pub use cost::{Cost, CostError};
pub use ports::{
    PortError, DomainPort, HealthCheckable, HealthCheckResult, AdapterHealth, OperationMetadata,
};
pub use stored::Stored;

#[doc(hidden)]
pub use serde as __serde;
