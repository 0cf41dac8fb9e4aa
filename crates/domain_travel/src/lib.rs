//! Travel Diary Domain
//!
//! Person-day diaries, the trip legs recorded on them, the GPS traces of
//! rMove trips, and the resolution of legs into linked trips.
//!
//! # Linked trips
//!
//! A transit journey is recorded as one leg per boarding. Legs sharing a
//! `trip_id_linked` are one traveler intention:
//!
//! ```text
//!  trip 101  walk  08:00-08:05 ┐
//!  trip 102  bus   08:07-08:30 ├─ trip_id_linked = 100
//!  trip 103  walk  08:31-08:36 ┘
//! ```
//!
//! [`LinkageResolver`] groups the legs and reports every group that mixes
//! travelers or whose legs overlap in time.

pub mod categories;
pub mod day;
pub mod trip;
pub mod location;
pub mod linkage;
pub mod error;

pub use categories::{
    AirfarePayType, DataSource, DayAnchor, DayOfWeek, DriverStatus, GoogleMode,
    NonHouseholdTravelers, NoTravelReason, ParkAndRideCity, ParkAndRideLot, ParkingLocation,
    ParkingPayType, ProxyStatus, SurveyStatus, TaxiPayType, TransitAccessMode, TransitPayType,
    TravelMode, TravelerCount, TripError, TripPurpose,
};
pub use day::{Day, DayCompletion, DayWeights};
pub use trip::{
    FareReport, ParkAndRide, Parking, Travelers, Trip, TripEdits, TripEnd, TripFares,
    TripMetrics, TripModes, TripSurvey, TripWeights, MODE_SLOTS,
};
pub use location::{LocationPoint, LocationTrace, StoredTrace};
pub use linkage::{LinkageResolution, LinkageResolver, LinkageViolation, LinkedLeg, LinkedTrip};
pub use error::TravelError;
