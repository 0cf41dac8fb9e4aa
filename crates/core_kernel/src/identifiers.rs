//! Strongly-typed identifiers for survey entities
//!
//! Survey identifiers are integers assigned by the survey vendor. Wrapping
//! them in newtypes prevents a person id from being passed where a trip id
//! is expected, while keeping the bare integer on the wire and in storage.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

macro_rules! define_id {
    ($name:ident, $inner:ty, $column:literal) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name($inner);

        impl $name {
            /// Column name used for this identifier in the persisted schema
            pub const COLUMN: &'static str = $column;

            /// Wraps a raw identifier value
            pub const fn new(value: $inner) -> Self {
                Self(value)
            }

            /// Returns the raw identifier value
            pub const fn value(&self) -> $inner {
                self.0
            }

            /// Returns the schema column name for display
            pub fn column() -> &'static str {
                $column
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl FromStr for $name {
            type Err = std::num::ParseIntError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                // Accept both "500" and "household_id=500"
                let raw = s.strip_prefix(concat!($column, "=")).unwrap_or(s);
                Ok(Self(raw.trim().parse()?))
            }
        }

        impl From<$inner> for $name {
            fn from(value: $inner) -> Self {
                Self(value)
            }
        }

        impl From<$name> for $inner {
            fn from(id: $name) -> $inner {
                id.0
            }
        }
    };
}

define_id!(HouseholdId, i32, "household_id");
define_id!(PersonId, i64, "person_id");
define_id!(TripId, i64, "trip_id");
define_id!(LinkedTripId, i64, "trip_id_linked");
define_id!(TraceId, i64, "trip_id_location");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_household_id_display() {
        let id = HouseholdId::new(500);
        assert_eq!(id.to_string(), "500");
        assert_eq!(HouseholdId::COLUMN, "household_id");
    }

    #[test]
    fn test_id_parsing_with_column_prefix() {
        let parsed: PersonId = "person_id=5001".parse().unwrap();
        assert_eq!(parsed, PersonId::new(5001));

        let bare: PersonId = "5001".parse().unwrap();
        assert_eq!(parsed, bare);
    }

    #[test]
    fn test_raw_conversion() {
        let trip = TripId::from(42_i64);
        let back: i64 = trip.into();
        assert_eq!(back, 42);
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&TraceId::new(77)).unwrap();
        assert_eq!(json, "77");
    }
}
