//! Travel domain errors

use thiserror::Error;

use core_kernel::{LinkedTripId, SpatialError, TraceId};

/// Errors that can occur in the travel domain
#[derive(Debug, Error)]
pub enum TravelError {
    /// A trace has neither a shape nor any points
    #[error("Trace {0} has no shape and no points")]
    EmptyTrace(TraceId),

    /// A linked trip was requested but has no legs
    #[error("Linked trip {0} has no legs")]
    EmptyLinkedTrip(LinkedTripId),

    #[error(transparent)]
    Spatial(#[from] SpatialError),
}
