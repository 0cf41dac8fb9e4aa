//! Household vehicles and the "no vehicle" sentinel
//!
//! Storage keeps a reserved vehicle row `(household_id 0, vehicle_number 0)`
//! that stands for "not applicable". Application code never sees that row as
//! a vehicle: a reference to no vehicle is `Option::<VehicleRef>::None`, and
//! [`VehicleRef::to_storage_key`] / [`VehicleRef::from_storage_key`] convert
//! between the two representations.

use core_kernel::{Cost, HouseholdId, Response, Sentinel};
use serde::{Deserialize, Serialize};
use std::fmt;
use validator::Validate;

use crate::categories::{FuelType, HowObtained, ResidenceParkingPass};
use crate::error::HouseholdError;

/// Highest vehicle number a trip mode can point at ("Household vehicle 7")
pub const MAX_HOUSEHOLD_VEHICLE: i16 = 7;

/// Natural key of a real household vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VehicleRef {
    pub household_id: HouseholdId,
    pub vehicle_number: i16,
}

impl VehicleRef {
    /// Storage key of the sentinel row
    pub const SENTINEL_KEY: (i32, i16) = (0, 0);

    pub fn new(household_id: HouseholdId, vehicle_number: i16) -> Result<Self, HouseholdError> {
        let candidate = Self {
            household_id,
            vehicle_number,
        };
        if candidate.key() == Self::SENTINEL_KEY {
            return Err(HouseholdError::ReservedVehicleKey);
        }
        if vehicle_number < 1 {
            return Err(HouseholdError::InvalidVehicleNumber(vehicle_number));
        }
        Ok(candidate)
    }

    /// `(household_id, vehicle_number)` as stored
    pub fn key(&self) -> (i32, i16) {
        (self.household_id.value(), self.vehicle_number)
    }

    /// Storage key for an optional reference; `None` maps to the sentinel row
    pub fn to_storage_key(reference: Option<VehicleRef>) -> (i32, i16) {
        reference.map_or(Self::SENTINEL_KEY, |r| r.key())
    }

    /// Application reference for a storage key; the sentinel maps to `None`
    pub fn from_storage_key(household_id: i32, vehicle_number: i16) -> Result<Option<VehicleRef>, HouseholdError> {
        if (household_id, vehicle_number) == Self::SENTINEL_KEY {
            return Ok(None);
        }
        VehicleRef::new(HouseholdId::new(household_id), vehicle_number).map(Some)
    }
}

impl fmt::Display for VehicleRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "household_id={}, vehicle_number={}",
            self.household_id, self.vehicle_number
        )
    }
}

/// A household vehicle as reported in the vehicle roster
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Vehicle {
    pub household_id: HouseholdId,
    pub vehicle_number: i16,
    #[validate(length(max = 15))]
    pub year: String,
    #[validate(length(max = 50))]
    pub make: String,
    #[validate(length(max = 50))]
    pub model: String,
    pub fuel_type: FuelType,
    pub how_obtained: HowObtained,
    pub toll_transponder: Response,
    pub residence_parking_pass: ResidenceParkingPass,
    pub residence_parking_cost_unknown: Response,
    pub residence_parking_monthly_cost: Option<Cost>,
}

impl Vehicle {
    /// The reserved "not applicable" vehicle row
    pub fn not_applicable() -> Self {
        let (household_id, vehicle_number) = VehicleRef::SENTINEL_KEY;
        Self {
            household_id: HouseholdId::new(household_id),
            vehicle_number,
            year: Sentinel::NotApplicable.text(),
            make: Sentinel::NotApplicable.text(),
            model: Sentinel::NotApplicable.text(),
            fuel_type: FuelType::NotApplicable,
            how_obtained: HowObtained::NotApplicable,
            toll_transponder: Response::NotApplicable,
            residence_parking_pass: ResidenceParkingPass::NotApplicable,
            residence_parking_cost_unknown: Response::NotApplicable,
            residence_parking_monthly_cost: None,
        }
    }

    pub fn key(&self) -> (i32, i16) {
        (self.household_id.value(), self.vehicle_number)
    }

    pub fn is_sentinel(&self) -> bool {
        self.key() == VehicleRef::SENTINEL_KEY
    }

    /// Application reference, `None` for the sentinel row
    pub fn reference(&self) -> Result<Option<VehicleRef>, HouseholdError> {
        VehicleRef::from_storage_key(self.household_id.value(), self.vehicle_number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_none_maps_to_sentinel_key() {
        assert_eq!(VehicleRef::to_storage_key(None), (0, 0));
        let vehicle = VehicleRef::new(HouseholdId::new(10), 1).unwrap();
        assert_eq!(VehicleRef::to_storage_key(Some(vehicle)), (10, 1));
    }

    #[test]
    fn test_sentinel_key_maps_to_none() {
        assert_eq!(VehicleRef::from_storage_key(0, 0).unwrap(), None);
        let back = VehicleRef::from_storage_key(10, 1).unwrap().unwrap();
        assert_eq!(back.key(), (10, 1));
    }

    #[test]
    fn test_half_sentinel_keys_rejected() {
        assert!(VehicleRef::from_storage_key(10, 0).is_err());
        assert!(VehicleRef::new(HouseholdId::new(0), 0).is_err());
    }

    #[test]
    fn test_sentinel_row() {
        let sentinel = Vehicle::not_applicable();
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.make, "Not Applicable");
        assert!(sentinel.residence_parking_monthly_cost.is_none());
        assert_eq!(sentinel.reference().unwrap(), None);
    }
}
