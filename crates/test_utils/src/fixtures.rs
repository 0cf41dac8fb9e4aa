//! Pre-built Test Fixtures
//!
//! Reference identifiers, dates and places shared across the survey test
//! suite. The reference household is 500 with person 5001, surveyed on
//! Tuesday 4 October 2016 in San Diego.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{Cost, Geocode, HouseholdId, LinkedTripId, PersonId, Place, TraceId, TripId};
use domain_household::{
    BorderDuration, BorderMode, BorderPartySize, BorderPurpose, BorderTrip, PortOfEntry,
};
use once_cell::sync::Lazy;
use rust_decimal_macros::dec;

/// Travel date of the reference diary (a Tuesday)
pub static TRAVEL_DATE: Lazy<NaiveDate> =
    Lazy::new(|| NaiveDate::from_ymd_opt(2016, 10, 4).expect("valid travel date"));

/// Fixture for survey identifiers
pub struct IdFixtures;

impl IdFixtures {
    /// The reference household
    pub fn household() -> HouseholdId {
        HouseholdId::new(500)
    }

    /// A second household for multi-household batches
    pub fn other_household() -> HouseholdId {
        HouseholdId::new(501)
    }

    /// The vehicle roster household used by the uniqueness scenario
    pub fn vehicle_household() -> HouseholdId {
        HouseholdId::new(10)
    }

    /// The reference person, member of household 500
    pub fn person() -> PersonId {
        PersonId::new(5001)
    }

    /// Second member of household 500
    pub fn second_person() -> PersonId {
        PersonId::new(5002)
    }

    /// A person id no fixture ever creates
    pub fn unknown_person() -> PersonId {
        PersonId::new(9999)
    }

    /// The reference trip of person 5001
    pub fn trip() -> TripId {
        TripId::new(500_100_101)
    }

    pub fn linked_trip() -> LinkedTripId {
        LinkedTripId::new(500_100_100)
    }

    pub fn trace() -> TraceId {
        TraceId::new(77_001)
    }
}

/// Fixture for survey timestamps
pub struct TemporalFixtures;

impl TemporalFixtures {
    /// The reference travel date
    pub fn travel_date() -> NaiveDate {
        *TRAVEL_DATE
    }

    /// A wall-clock time on the reference travel date
    pub fn at(hour: u32, minute: u32) -> NaiveDateTime {
        Self::travel_date()
            .and_hms_opt(hour, minute, 0)
            .expect("valid time of day")
    }

    /// Start of the recruit survey, a week before travel
    pub fn recruit_start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 9, 27)
            .and_then(|d| d.and_hms_opt(18, 30, 0))
            .expect("valid timestamp")
    }

    /// End of the recruit survey
    pub fn recruit_end() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2016, 9, 27)
            .and_then(|d| d.and_hms_opt(18, 52, 0))
            .expect("valid timestamp")
    }
}

/// Fixture for geocoded San Diego places
pub struct PlaceFixtures;

impl PlaceFixtures {
    /// Home of household 500, downtown
    pub fn home() -> Place {
        Place::geocoded("401 B St, San Diego, CA 92101", 32.7157, -117.1611)
            .with_geocode(Geocode::new(32.7157, -117.1611).with_mgra(1_234))
    }

    /// Workplace in University City
    pub fn work() -> Place {
        Place::geocoded("9500 Gilman Dr, La Jolla, CA 92093", 32.8801, -117.234)
    }

    /// Grocery store in Hillcrest
    pub fn grocery() -> Place {
        Place::geocoded("3900 Vermont St, San Diego, CA 92103", 32.7488, -117.1469)
    }

    /// Transit center between home and work
    pub fn transit_center() -> Place {
        Place::geocoded("Old Town Transit Center, San Diego, CA 92110", 32.7551, -117.1997)
    }

    /// A shape that encodes a point roughly 1 km from the home coordinates
    pub fn divergent_home_shape() -> String {
        "POINT(-117.1711 32.7157)".to_string()
    }

    /// An address the geocoder could not place
    pub fn ungeocoded() -> Place {
        Place::ungeocoded("Somewhere near the beach")
    }
}

/// Fixture for reported costs
pub struct CostFixtures;

impl CostFixtures {
    pub fn parking() -> Cost {
        Cost::new(dec!(5.00)).expect("non-negative cost")
    }

    pub fn bus_fare() -> Cost {
        Cost::new(dec!(2.50)).expect("non-negative cost")
    }

    pub fn residence_parking() -> Cost {
        Cost::new(dec!(75.00)).expect("non-negative cost")
    }
}

/// Fixture for household-scoped records without a builder
pub struct RecordFixtures;

impl RecordFixtures {
    /// A border crossing in the given slot of a household
    pub fn border_trip(household_id: HouseholdId, slot: i16) -> BorderTrip {
        BorderTrip::new(
            household_id,
            slot,
            BorderMode::OwnVehicle,
            PortOfEntry::SanYsidro,
            BorderPurpose::Social,
            BorderDuration::UnderOneDay,
            BorderPartySize::Two,
        )
        .expect("valid border trip slot")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::DEFAULT_TOLERANCE_DEGREES;

    #[test]
    fn test_travel_date_is_a_tuesday() {
        use chrono::{Datelike, Weekday};
        assert_eq!(TemporalFixtures::travel_date().weekday(), Weekday::Tue);
    }

    #[test]
    fn test_places_are_consistent() {
        for place in [
            PlaceFixtures::home(),
            PlaceFixtures::work(),
            PlaceFixtures::grocery(),
            PlaceFixtures::transit_center(),
        ] {
            let geocode = place.geocode.expect("fixture places are geocoded");
            assert!(geocode.check(DEFAULT_TOLERANCE_DEGREES).is_ok());
        }
    }

    #[test]
    fn test_divergent_shape_diverges() {
        let geocode = PlaceFixtures::home()
            .geocode
            .expect("home is geocoded")
            .with_shape(PlaceFixtures::divergent_home_shape());
        assert!(geocode.check(DEFAULT_TOLERANCE_DEGREES).is_err());
    }
}
