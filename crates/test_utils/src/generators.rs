//! Property-Based Test Generators
//!
//! Provides proptest strategies for trip legs and linked-trip groups that
//! either keep or break the linkage rules on purpose.

use chrono::{Duration, NaiveDateTime};
use core_kernel::{Coordinates, HouseholdId, PersonId};
use domain_travel::{TravelMode, Trip};
use proptest::prelude::*;

use crate::builders::TestTripBuilder;
use crate::fixtures::{IdFixtures, TemporalFixtures};

/// Strategy for a departure between 05:00 and 20:59 on the travel date
pub fn departure_strategy() -> impl Strategy<Value = NaiveDateTime> {
    (5u32..21u32, 0u32..60u32).prop_map(|(hour, minute)| TemporalFixtures::at(hour, minute))
}

/// Strategy for a leg duration in minutes
pub fn leg_minutes_strategy() -> impl Strategy<Value = i64> {
    1i64..90i64
}

/// Strategy for a dwell between legs in minutes (zero means touching legs)
pub fn dwell_minutes_strategy() -> impl Strategy<Value = i64> {
    0i64..30i64
}

/// Strategy for a non-vehicle travel mode
pub fn travel_mode_strategy() -> impl Strategy<Value = TravelMode> {
    prop_oneof![
        Just(TravelMode::Walk),
        Just(TravelMode::Bus),
        Just(TravelMode::ExpressBus),
        Just(TravelMode::ShuttleBus),
    ]
}

/// Strategy for coordinates inside San Diego County
pub fn san_diego_coordinates_strategy() -> impl Strategy<Value = Coordinates> {
    (32.55f64..33.5f64, -117.6f64..-116.1f64)
        .prop_map(|(latitude, longitude)| Coordinates::new(latitude, longitude))
}

/// Strategy for legs of one linked trip that never overlap
///
/// Legs are returned shuffled so ordering is left to the resolver.
pub fn sequential_legs_strategy(max_legs: usize) -> impl Strategy<Value = Vec<Trip>> {
    (
        departure_strategy(),
        proptest::collection::vec(
            (leg_minutes_strategy(), dwell_minutes_strategy(), travel_mode_strategy()),
            1..=max_legs.max(1),
        ),
    )
        .prop_map(|(start, legs)| linked_legs(start, &legs))
        .prop_shuffle()
}

/// Strategy for linked legs where the last leg departs before its predecessor arrives
pub fn overlapping_legs_strategy(max_legs: usize) -> impl Strategy<Value = Vec<Trip>> {
    (
        departure_strategy(),
        proptest::collection::vec(
            (leg_minutes_strategy(), dwell_minutes_strategy(), travel_mode_strategy()),
            1..=max_legs.max(1),
        ),
        1i64..30i64,
    )
        .prop_map(|(start, legs, overlap)| {
            let mut trips = linked_legs(start, &legs);
            let previous_arrival = trips.last().map(|leg| leg.arrival_time).unwrap_or(start);
            let departure = previous_arrival - Duration::minutes(overlap);
            let next_id = IdFixtures::trip().value() + trips.len() as i64;
            trips.push(
                TestTripBuilder::new()
                    .with_id(next_id)
                    .between(departure, previous_arrival + Duration::minutes(15))
                    .build(),
            );
            trips
        })
}

/// Strategy for linked legs where one leg belongs to another member of the household
pub fn mixed_person_legs_strategy(max_legs: usize) -> impl Strategy<Value = (Vec<Trip>, usize)> {
    sequential_legs_strategy(max_legs.max(2))
        .prop_filter("needs at least two legs", |legs| legs.len() >= 2)
        .prop_flat_map(|legs| {
            let count = legs.len();
            (Just(legs), 1..count)
        })
        .prop_map(|(mut legs, stray)| {
            // Index 0 after ordering by departure stays the reference person
            legs.sort_by_key(|leg| leg.departure_time);
            legs[stray].person_id = IdFixtures::second_person();
            (legs, stray)
        })
}

/// Legs of the reference linked trip laid end to end from `start`
pub fn linked_legs(start: NaiveDateTime, legs: &[(i64, i64, TravelMode)]) -> Vec<Trip> {
    let first_id = IdFixtures::trip().value();
    let mut departure = start;
    legs.iter()
        .enumerate()
        .map(|(index, (minutes, dwell, mode))| {
            let arrival = departure + Duration::minutes(*minutes);
            let trip = TestTripBuilder::new()
                .with_id(first_id + index as i64)
                .for_person(IdFixtures::person(), IdFixtures::household())
                .between(departure, arrival)
                .with_modes(&[*mode])
                .with_distance(Some(*minutes as f64 / 20.0))
                .build();
            departure = arrival + Duration::minutes(*dwell);
            trip
        })
        .collect()
}

/// Strategy for a person id of the reference household
pub fn household_member_strategy() -> impl Strategy<Value = (PersonId, HouseholdId)> {
    prop_oneof![
        Just((IdFixtures::person(), IdFixtures::household())),
        Just((IdFixtures::second_person(), IdFixtures::household())),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    proptest! {
        #[test]
        fn test_sequential_legs_never_overlap(legs in sequential_legs_strategy(5)) {
            let mut ordered: Vec<&Trip> = legs.iter().collect();
            ordered.sort_by_key(|leg| leg.departure_time);
            for pair in ordered.windows(2) {
                prop_assert!(pair[1].departure_time >= pair[0].arrival_time);
            }
        }

        #[test]
        fn test_overlapping_legs_overlap(legs in overlapping_legs_strategy(4)) {
            let last = &legs[legs.len() - 1];
            let previous = &legs[legs.len() - 2];
            prop_assert!(last.departure_time < previous.arrival_time);
        }

        #[test]
        fn test_coordinates_in_county(coordinates in san_diego_coordinates_strategy()) {
            prop_assert!(coordinates.latitude > 32.0 && coordinates.latitude < 34.0);
        }
    }
}
