//! Household domain errors

use thiserror::Error;

/// Errors that can occur in the household domain
#[derive(Debug, Error)]
pub enum HouseholdError {
    /// The (0, 0) vehicle key belongs to the sentinel row
    #[error("Vehicle key (0, 0) is reserved for the not-applicable vehicle")]
    ReservedVehicleKey,

    /// Vehicle numbers start at 1 within a household
    #[error("Invalid vehicle number: {0}")]
    InvalidVehicleNumber(i16),

    /// Border trips are numbered 1 through 4 per household
    #[error("Invalid border trip number: {0}")]
    InvalidBorderTripNumber(i16),
}
