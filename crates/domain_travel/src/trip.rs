//! Unlinked trip legs
//!
//! A trip is one recorded leg. Legs sharing a `trip_id_linked` form a linked
//! trip (see [`crate::linkage`]); `trip_id_location` points at the GPS trace
//! for rMove trips.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{
    Categorical, Cost, HouseholdId, LinkedTripId, PersonId, Place, Response, TraceId,
    TravelInterval, TripId,
};
use domain_household::VehicleRef;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::{
    AirfarePayType, DataSource, DayOfWeek, DriverStatus, GoogleMode, NonHouseholdTravelers,
    ParkAndRideCity, ParkAndRideLot, ParkingLocation, ParkingPayType, TaxiPayType,
    TransitAccessMode, TransitPayType, TravelMode, TravelerCount, TripError, TripPurpose,
};

/// Number of mode slots recorded per trip
pub const MODE_SLOTS: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Trip {
    pub trip_id: TripId,
    pub trip_id_linked: LinkedTripId,
    pub trip_id_location: Option<TraceId>,
    pub person_id: PersonId,
    pub household_id: HouseholdId,
    pub travel_date: NaiveDate,
    #[validate(range(min = 1, max = 7))]
    pub travel_day_number: Option<i16>,
    pub travel_day_of_week: DayOfWeek,
    pub data_source: DataSource,
    #[validate(nested)]
    pub survey: TripSurvey,
    #[validate(nested)]
    pub edits: TripEdits,
    #[validate(nested)]
    pub origin: TripEnd,
    #[validate(nested)]
    pub destination: TripEnd,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    pub travelers: Travelers,
    #[validate(nested)]
    pub modes: TripModes,
    #[validate(nested)]
    pub parking: Parking,
    #[validate(nested)]
    pub fares: TripFares,
    pub park_and_ride: ParkAndRide,
    #[validate(nested)]
    pub metrics: TripMetrics,
    #[validate(nested)]
    pub weights: TripWeights,
}

impl Trip {
    pub fn id(&self) -> TripId {
        self.trip_id
    }

    pub fn interval(&self) -> TravelInterval {
        TravelInterval::new(self.departure_time, self.arrival_time)
    }

    /// The household vehicle used on this trip, if any mode names one
    pub fn household_vehicle(&self) -> Option<VehicleRef> {
        self.modes
            .slots
            .iter()
            .find_map(TravelMode::household_vehicle_number)
            .and_then(|number| VehicleRef::new(self.household_id, number).ok())
    }
}

/// rMove trip survey metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripSurvey {
    pub completed_trip_survey: Response,
    pub completed_date: Option<NaiveDateTime>,
    pub completed_household_survey: Response,
    pub completed_person_survey: Response,
    #[validate(range(min = 0.0))]
    pub number_household_survey_weekdays: Option<f64>,
    pub revised_at: Option<NaiveDateTime>,
    #[validate(length(max = 15))]
    pub revised_count: String,
    pub error: TripError,
}

/// Flags recording how the trip was edited during cleaning
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct TripEdits {
    pub flag_teleport: Response,
    pub copied_trip: Response,
    pub analyst_merged_trip: Response,
    pub analyst_split_trip: Response,
    pub user_merged_trip: Response,
    pub user_split_trip: Response,
    pub added_trip: Response,
    pub nonproxy_derived_trip: Response,
    pub proxy_added_trip: Response,
    pub unlinked_transit_trip: Response,
}

impl TripEdits {
    /// No edits at all
    pub fn none() -> Self {
        Self {
            flag_teleport: Response::No,
            copied_trip: Response::No,
            analyst_merged_trip: Response::No,
            analyst_split_trip: Response::No,
            user_merged_trip: Response::No,
            user_split_trip: Response::No,
            added_trip: Response::No,
            nonproxy_derived_trip: Response::NotApplicable,
            proxy_added_trip: Response::NotApplicable,
            unlinked_transit_trip: Response::No,
        }
    }
}

/// Origin or destination of a trip
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripEnd {
    #[validate(length(max = 150))]
    pub name: String,
    #[validate(nested)]
    pub place: Place,
    pub purpose: TripPurpose,
    #[validate(length(max = 150))]
    pub purpose_other_specify: String,
    pub purpose_inferred: TripPurpose,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Travelers {
    pub total: TravelerCount,
    pub household: TravelerCount,
    pub non_household: NonHouseholdTravelers,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripModes {
    /// `mode_1` through `mode_4`
    pub slots: [TravelMode; MODE_SLOTS],
    pub transit_access: TransitAccessMode,
    pub transit_egress: TransitAccessMode,
    pub google_mode: GoogleMode,
    pub driver: DriverStatus,
    pub toll_road: Response,
    pub toll_road_express: Response,
}

impl TripModes {
    /// Reported modes in slot order, sentinels dropped
    pub fn reported(&self) -> impl Iterator<Item = TravelMode> + '_ {
        self.slots.iter().copied().filter(|mode| !mode.is_sentinel())
    }

    pub fn uses_transit(&self) -> bool {
        self.reported().any(|mode| mode.is_transit())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Parking {
    pub location: ParkingLocation,
    pub pay_type: ParkingPayType,
    pub cost: Option<Cost>,
    pub cost_dk: Response,
    #[validate(range(min = 0.0))]
    pub egress_duration: Option<f64>,
}

/// Reported payment for one fare mode
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FareReport<P> {
    pub pay_type: P,
    pub cost: Option<Cost>,
    /// Respondent paid but did not know the amount
    pub cost_dk: Response,
}

impl<P: Categorical> FareReport<P> {
    pub fn not_reported(pay_type: P) -> Self {
        Self {
            pay_type,
            cost: None,
            cost_dk: Response::Missing,
        }
    }

    /// A cost and a don't-know flag of "Yes" cannot both be present
    pub fn is_consistent(&self) -> bool {
        !(self.cost.is_some() && self.cost_dk == Response::Yes)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct TripFares {
    pub taxi: FareReport<TaxiPayType>,
    pub airplane: FareReport<AirfarePayType>,
    pub bus: FareReport<TransitPayType>,
    pub rail: FareReport<TransitPayType>,
    pub ferry: FareReport<TransitPayType>,
}

impl TripFares {
    pub fn not_reported() -> Self {
        Self {
            taxi: FareReport::not_reported(TaxiPayType::Missing),
            airplane: FareReport::not_reported(AirfarePayType::Missing),
            bus: FareReport::not_reported(TransitPayType::Missing),
            rail: FareReport::not_reported(TransitPayType::Missing),
            ferry: FareReport::not_reported(TransitPayType::Missing),
        }
    }

    /// Fare prefixes whose cost contradicts the don't-know flag
    pub fn inconsistent(&self) -> Vec<&'static str> {
        let checks = [
            ("taxi", self.taxi.is_consistent()),
            ("airplane", self.airplane.is_consistent()),
            ("bus", self.bus.is_consistent()),
            ("rail", self.rail.is_consistent()),
            ("ferry", self.ferry.is_consistent()),
        ];
        checks
            .into_iter()
            .filter(|(_, ok)| !ok)
            .map(|(name, _)| name)
            .collect()
    }
}

/// Park & Ride lot, for trips that parked at one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParkAndRide {
    pub lot: ParkAndRideLot,
    pub city: ParkAndRideCity,
}

impl ParkAndRide {
    pub fn not_applicable() -> Self {
        Self {
            lot: ParkAndRideLot::NotApplicable,
            city: ParkAndRideCity::NotApplicable,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct TripMetrics {
    /// Miles
    #[validate(range(min = 0.0))]
    pub distance: Option<f64>,
    /// Minutes
    #[validate(range(min = 0.0))]
    pub duration: Option<f64>,
    #[validate(range(min = 0.0))]
    pub duration_reported: Option<f64>,
    /// Miles per hour
    #[validate(range(min = 0.0))]
    pub speed: Option<f64>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct TripWeights {
    #[validate(range(min = 0.0))]
    pub trip: Option<f64>,
    #[validate(range(min = 0.0))]
    pub person_trip: Option<f64>,
    #[validate(range(min = 0.0))]
    pub household_multiday_factor: Option<f64>,
    #[validate(range(min = 0.0))]
    pub person_multiday_456x: Option<f64>,
}
