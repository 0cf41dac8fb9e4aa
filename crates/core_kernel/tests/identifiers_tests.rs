//! Unit tests for the Identifiers module
//!
//! Tests cover identifier creation, parsing from "column=value" strings,
//! raw conversion and display formatting.

use core_kernel::{HouseholdId, LinkedTripId, PersonId, TraceId, TripId};
use proptest::prelude::*;

mod household_id_tests {
    use super::*;

    #[test]
    fn test_new_and_value() {
        let id = HouseholdId::new(500);
        assert_eq!(id.value(), 500);
    }

    #[test]
    fn test_column_name() {
        assert_eq!(HouseholdId::column(), "household_id");
        assert_eq!(HouseholdId::COLUMN, "household_id");
    }

    #[test]
    fn test_display_is_bare_number() {
        assert_eq!(format!("{}", HouseholdId::new(10)), "10");
    }

    #[test]
    fn test_parse_bare() {
        let id: HouseholdId = "500".parse().unwrap();
        assert_eq!(id, HouseholdId::new(500));
    }

    #[test]
    fn test_parse_with_column_prefix() {
        let id: HouseholdId = "household_id=500".parse().unwrap();
        assert_eq!(id, HouseholdId::new(500));
    }

    #[test]
    fn test_parse_rejects_other_column() {
        assert!("person_id=500".parse::<HouseholdId>().is_err());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("abc".parse::<HouseholdId>().is_err());
        assert!("".parse::<HouseholdId>().is_err());
    }
}

mod person_id_tests {
    use super::*;

    #[test]
    fn test_large_person_ids() {
        let id = PersonId::new(17_100_000_101);
        let raw: i64 = id.into();
        assert_eq!(raw, 17_100_000_101);
    }

    #[test]
    fn test_ordering_follows_raw_value() {
        assert!(PersonId::new(5001) < PersonId::new(5002));
    }

    #[test]
    fn test_serde_round_trip() {
        let json = serde_json::to_string(&PersonId::new(9999)).unwrap();
        assert_eq!(json, "9999");
        let back: PersonId = serde_json::from_str(&json).unwrap();
        assert_eq!(back, PersonId::new(9999));
    }
}

mod trip_id_tests {
    use super::*;

    #[test]
    fn test_column_names_are_distinct() {
        assert_eq!(TripId::COLUMN, "trip_id");
        assert_eq!(LinkedTripId::COLUMN, "trip_id_linked");
        assert_eq!(TraceId::COLUMN, "trip_id_location");
    }

    #[test]
    fn test_linked_id_parse() {
        let id: LinkedTripId = "trip_id_linked=42".parse().unwrap();
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn test_hash_set_membership() {
        use std::collections::HashSet;
        let mut seen = HashSet::new();
        assert!(seen.insert(TripId::new(1)));
        assert!(!seen.insert(TripId::new(1)));
    }
}

proptest! {
    #[test]
    fn prop_household_display_parse_round_trip(raw in any::<i32>()) {
        let id = HouseholdId::new(raw);
        let parsed: HouseholdId = id.to_string().parse().unwrap();
        prop_assert_eq!(id, parsed);
    }

    #[test]
    fn prop_prefixed_person_parse(raw in 0i64..i64::MAX) {
        let text = format!("person_id={}", raw);
        let parsed: PersonId = text.parse().unwrap();
        prop_assert_eq!(parsed.value(), raw);
    }
}
