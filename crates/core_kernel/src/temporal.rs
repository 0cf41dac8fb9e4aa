//! Travel time intervals
//!
//! Survey timestamps are local wall-clock times without an offset
//! (`smalldatetime` in the original warehouse), so intervals use
//! `NaiveDateTime` throughout.

use chrono::{Duration, NaiveDateTime};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors for interval construction
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemporalError {
    #[error("Interval ends ({end}) before it starts ({start})")]
    EndBeforeStart {
        start: NaiveDateTime,
        end: NaiveDateTime,
    },
}

/// A departure/arrival pair
///
/// Construction does not reject `end < start`: reported trips may be
/// inverted and that is surfaced as a data-quality finding, not a type error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TravelInterval {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl TravelInterval {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// Builds an interval, failing if it is inverted
    pub fn checked(start: NaiveDateTime, end: NaiveDateTime) -> Result<Self, TemporalError> {
        if end < start {
            Err(TemporalError::EndBeforeStart { start, end })
        } else {
            Ok(Self { start, end })
        }
    }

    pub fn is_inverted(&self) -> bool {
        self.end < self.start
    }

    pub fn duration(&self) -> Duration {
        self.end - self.start
    }

    /// Duration in whole minutes (negative for inverted intervals)
    pub fn duration_minutes(&self) -> i64 {
        self.duration().num_minutes()
    }

    /// True if the two intervals share any instant beyond a touching endpoint
    pub fn overlaps(&self, other: &TravelInterval) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// True if `next` starts no earlier than this interval ends
    pub fn precedes(&self, next: &TravelInterval) -> bool {
        next.start >= self.end
    }
}
