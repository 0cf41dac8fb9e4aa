//! Ingestion policy
//!
//! Schema, missingness, uniqueness and referential violations always abort
//! a batch. Consistency findings are graded per check by the policy.

use core_kernel::DEFAULT_TOLERANCE_DEGREES;
use serde::{Deserialize, Serialize};

use crate::report::Severity;

/// Consistency checks whose severity is configurable
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyCheck {
    /// Supplied geometry against scalar lat/long
    Geometry,
    /// Legs of a linked trip
    Linkage,
    /// Arrival before departure
    Temporal,
    /// Trace line against its points, point ordering
    Trace,
    /// Contradicting indicators within a record
    Agreement,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct IngestPolicy {
    pub geometry: Severity,
    pub linkage: Severity,
    pub temporal: Severity,
    pub trace: Severity,
    pub agreement: Severity,
    /// Maximum geometry/coordinate divergence in degrees
    pub tolerance: f64,
}

impl Default for IngestPolicy {
    fn default() -> Self {
        Self {
            geometry: Severity::Fatal,
            linkage: Severity::Fatal,
            temporal: Severity::Advisory,
            trace: Severity::Advisory,
            agreement: Severity::Advisory,
            tolerance: DEFAULT_TOLERANCE_DEGREES,
        }
    }
}

impl IngestPolicy {
    pub fn severity(&self, check: ConsistencyCheck) -> Severity {
        match check {
            ConsistencyCheck::Geometry => self.geometry,
            ConsistencyCheck::Linkage => self.linkage,
            ConsistencyCheck::Temporal => self.temporal,
            ConsistencyCheck::Trace => self.trace,
            ConsistencyCheck::Agreement => self.agreement,
        }
    }

    pub fn with_severity(mut self, check: ConsistencyCheck, severity: Severity) -> Self {
        match check {
            ConsistencyCheck::Geometry => self.geometry = severity,
            ConsistencyCheck::Linkage => self.linkage = severity,
            ConsistencyCheck::Temporal => self.temporal = severity,
            ConsistencyCheck::Trace => self.trace = severity,
            ConsistencyCheck::Agreement => self.agreement = severity,
        }
        self
    }

    pub fn with_tolerance(mut self, tolerance: f64) -> Self {
        self.tolerance = tolerance;
        self
    }
}
