//! Cross-border trips reported by a household
//!
//! The recruit survey asks about up to four recent crossings, numbered 1-4
//! within the household; unanswered slots produce no record.

use core_kernel::HouseholdId;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::{BorderDuration, BorderMode, BorderPartySize, BorderPurpose, PortOfEntry};
use crate::error::HouseholdError;

/// Number of crossing slots on the recruit survey
pub const MAX_BORDER_TRIPS: i16 = 4;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct BorderTrip {
    pub household_id: HouseholdId,
    /// Slot number within the household
    #[validate(range(min = 1, max = 4))]
    pub trip_id: i16,
    pub mode: BorderMode,
    pub port_of_entry: PortOfEntry,
    pub purpose: BorderPurpose,
    pub duration: BorderDuration,
    pub party_size: BorderPartySize,
}

impl BorderTrip {
    pub fn new(
        household_id: HouseholdId,
        trip_id: i16,
        mode: BorderMode,
        port_of_entry: PortOfEntry,
        purpose: BorderPurpose,
        duration: BorderDuration,
        party_size: BorderPartySize,
    ) -> Result<Self, HouseholdError> {
        if !(1..=MAX_BORDER_TRIPS).contains(&trip_id) {
            return Err(HouseholdError::InvalidBorderTripNumber(trip_id));
        }
        Ok(Self {
            household_id,
            trip_id,
            mode,
            port_of_entry,
            purpose,
            duration,
            party_size,
        })
    }

    /// `(household_id, trip_id)` natural key
    pub fn key(&self) -> (i32, i16) {
        (self.household_id.value(), self.trip_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slot_range() {
        let make = |slot| {
            BorderTrip::new(
                HouseholdId::new(500),
                slot,
                BorderMode::OwnVehicle,
                PortOfEntry::SanYsidro,
                BorderPurpose::Social,
                BorderDuration::UnderOneDay,
                BorderPartySize::Two,
            )
        };
        assert!(make(1).is_ok());
        assert!(make(4).is_ok());
        assert!(matches!(make(5), Err(HouseholdError::InvalidBorderTripNumber(5))));
        assert!(make(0).is_err());
    }
}
