//! Violation reports
//!
//! Validation never stops at the first problem: every violation found in a
//! batch is collected into a [`ValidationReport`] so the producer can fix
//! and resubmit the whole batch at once.

use std::fmt;

use chrono::NaiveDate;
use core_kernel::{HouseholdId, PersonId, TraceId, TripId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// The invariant family a violation belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// Wrong type, width or range, caught before storage
    Schema,
    /// Empty NOT NULL text or an incomplete block where a sentinel was due
    Missingness,
    /// Duplicate natural key
    Uniqueness,
    /// Child record referencing an unknown parent
    Referential,
    /// Geometry, linkage, temporal, trace or agreement finding
    Consistency,
    /// The store refused the write
    StorageConflict,
}

impl ViolationKind {
    pub fn label(&self) -> &'static str {
        match self {
            ViolationKind::Schema => "schema",
            ViolationKind::Missingness => "missingness",
            ViolationKind::Uniqueness => "uniqueness",
            ViolationKind::Referential => "referential",
            ViolationKind::Consistency => "consistency",
            ViolationKind::StorageConflict => "storage_conflict",
        }
    }
}

impl fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Whether a violation aborts the batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Fatal,
    Advisory,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Fatal => f.write_str("fatal"),
            Severity::Advisory => f.write_str("advisory"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fatal" => Ok(Severity::Fatal),
            "advisory" => Ok(Severity::Advisory),
            other => Err(format!("unknown severity '{}', expected fatal or advisory", other)),
        }
    }
}

/// Persisted entity a record belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Batch,
    Household,
    Person,
    Day,
    Trip,
    Vehicle,
    Intercept,
    BorderTrip,
    LocationTrace,
    LocationPoint,
}

impl Entity {
    /// Table the entity is stored in
    pub fn table(&self) -> &'static str {
        match self {
            Entity::Batch => "batch",
            Entity::Household => "households",
            Entity::Person => "persons",
            Entity::Day => "day",
            Entity::Trip => "trips",
            Entity::Vehicle => "vehicles",
            Entity::Intercept => "intercept",
            Entity::BorderTrip => "border_trips",
            Entity::LocationTrace => "location_lines",
            Entity::LocationPoint => "location_points",
        }
    }
}

/// Key columns identifying one record, e.g. `household_id=10, vehicle_number=1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordKey {
    pub entity: Entity,
    pub columns: Vec<(String, String)>,
}

impl RecordKey {
    fn with(entity: Entity, columns: &[(&str, String)]) -> Self {
        Self {
            entity,
            columns: columns
                .iter()
                .map(|(name, value)| (name.to_string(), value.clone()))
                .collect(),
        }
    }

    /// The batch as a whole
    pub fn batch() -> Self {
        Self::with(Entity::Batch, &[])
    }

    pub fn household(id: HouseholdId) -> Self {
        Self::with(Entity::Household, &[(HouseholdId::COLUMN, id.to_string())])
    }

    pub fn person(id: PersonId) -> Self {
        Self::with(Entity::Person, &[(PersonId::COLUMN, id.to_string())])
    }

    pub fn day(person_id: PersonId, travel_date: NaiveDate) -> Self {
        Self::with(
            Entity::Day,
            &[
                (PersonId::COLUMN, person_id.to_string()),
                ("travel_date", travel_date.to_string()),
            ],
        )
    }

    pub fn trip(id: TripId) -> Self {
        Self::with(Entity::Trip, &[(TripId::COLUMN, id.to_string())])
    }

    pub fn vehicle(household_id: i32, vehicle_number: i16) -> Self {
        Self::with(
            Entity::Vehicle,
            &[
                (HouseholdId::COLUMN, household_id.to_string()),
                ("vehicle_number", vehicle_number.to_string()),
            ],
        )
    }

    pub fn intercept(household_id: HouseholdId) -> Self {
        Self::with(Entity::Intercept, &[(HouseholdId::COLUMN, household_id.to_string())])
    }

    pub fn border_trip(household_id: i32, trip_id: i16) -> Self {
        Self::with(
            Entity::BorderTrip,
            &[
                (HouseholdId::COLUMN, household_id.to_string()),
                ("trip_id", trip_id.to_string()),
            ],
        )
    }

    pub fn trace(id: TraceId) -> Self {
        Self::with(Entity::LocationTrace, &[(TraceId::COLUMN, id.to_string())])
    }

    /// A point of a trace, by its position in the submitted trace
    pub fn point(trace: TraceId, index: usize) -> Self {
        Self::with(
            Entity::LocationPoint,
            &[(TraceId::COLUMN, trace.to_string()), ("point", index.to_string())],
        )
    }

    /// The key columns only, without the table
    pub fn columns_text(&self) -> String {
        self.columns
            .iter()
            .map(|(name, value)| format!("{}={}", name, value))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            f.write_str(self.entity.table())
        } else {
            write!(f, "{}({})", self.entity.table(), self.columns_text())
        }
    }
}

/// One broken invariant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Violation {
    pub kind: ViolationKind,
    pub severity: Severity,
    /// The offending record
    pub record: RecordKey,
    /// Field path within the record, e.g. `origin.place.geocode`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Parent key a referential violation could not resolve
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub references: Option<RecordKey>,
    pub message: String,
}

impl Violation {
    pub fn new(kind: ViolationKind, severity: Severity, record: RecordKey, message: impl Into<String>) -> Self {
        Self {
            kind,
            severity,
            record,
            field: None,
            references: None,
            message: message.into(),
        }
    }

    pub fn schema(record: RecordKey, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Schema, Severity::Fatal, record, message).at(field)
    }

    pub fn missing(record: RecordKey, field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Missingness, Severity::Fatal, record, message).at(field)
    }

    pub fn duplicate(record: RecordKey, message: impl Into<String>) -> Self {
        Self::new(ViolationKind::Uniqueness, Severity::Fatal, record, message)
    }

    /// A child record whose parent key does not resolve
    pub fn unresolved(record: RecordKey, field: impl Into<String>, parent: RecordKey) -> Self {
        let message = format!("references {} which does not exist", parent.columns_text());
        Self {
            references: Some(parent),
            ..Self::new(ViolationKind::Referential, Severity::Fatal, record, message).at(field)
        }
    }

    pub fn consistency(
        severity: Severity,
        record: RecordKey,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self::new(ViolationKind::Consistency, severity, record, message).at(field)
    }

    pub fn storage_conflict(message: impl Into<String>) -> Self {
        Self::new(ViolationKind::StorageConflict, Severity::Fatal, RecordKey::batch(), message)
    }

    /// Sets the field path
    pub fn at(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn with_reference(mut self, parent: RecordKey) -> Self {
        self.references = Some(parent);
        self
    }

    pub fn is_fatal(&self) -> bool {
        self.severity == Severity::Fatal
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {} {}", self.severity, self.kind, self.record)?;
        if let Some(field) = &self.field {
            write!(f, " {}", field)?;
        }
        write!(f, ": {}", self.message)
    }
}

/// Every violation found in one batch
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ValidationReport {
    /// Batch label, e.g. `household_id=500`
    pub batch: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub correlation_id: Option<Uuid>,
    pub violations: Vec<Violation>,
}

impl ValidationReport {
    pub fn new(batch: impl Into<String>) -> Self {
        Self {
            batch: batch.into(),
            correlation_id: None,
            violations: Vec::new(),
        }
    }

    pub fn with_correlation(mut self, correlation_id: Option<Uuid>) -> Self {
        self.correlation_id = correlation_id;
        self
    }

    pub fn push(&mut self, violation: Violation) {
        self.violations.push(violation);
    }

    pub fn extend(&mut self, violations: impl IntoIterator<Item = Violation>) {
        self.violations.extend(violations);
    }

    /// No violations at all
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty()
    }

    pub fn has_fatal(&self) -> bool {
        self.violations.iter().any(Violation::is_fatal)
    }

    pub fn fatal(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| v.is_fatal())
    }

    pub fn advisories(&self) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(|v| !v.is_fatal())
    }

    pub fn count(&self, kind: ViolationKind) -> usize {
        self.violations.iter().filter(|v| v.kind == kind).count()
    }

    /// Violations of one kind
    pub fn of_kind(&self, kind: ViolationKind) -> impl Iterator<Item = &Violation> {
        self.violations.iter().filter(move |v| v.kind == kind)
    }

    /// Keeps only advisory findings, for a batch that was committed
    pub fn into_advisories(self) -> Vec<Violation> {
        self.violations.into_iter().filter(|v| !v.is_fatal()).collect()
    }
}

impl fmt::Display for ValidationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let fatal = self.fatal().count();
        let advisory = self.violations.len() - fatal;
        write!(f, "{}: {} fatal, {} advisory", self.batch, fatal, advisory)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_cites_parent_key() {
        let violation = Violation::unresolved(
            RecordKey::trip(TripId::new(1)),
            "person_id",
            RecordKey::person(PersonId::new(9999)),
        );
        assert_eq!(violation.kind, ViolationKind::Referential);
        assert!(violation.message.contains("person_id=9999"));
        assert_eq!(
            violation.to_string(),
            "[fatal] referential trips(trip_id=1) person_id: references person_id=9999 which does not exist"
        );
    }

    #[test]
    fn test_composite_key_display() {
        assert_eq!(
            RecordKey::vehicle(10, 1).to_string(),
            "vehicles(household_id=10, vehicle_number=1)"
        );
        assert_eq!(RecordKey::batch().to_string(), "batch");
    }

    #[test]
    fn test_report_partitions_by_severity() {
        let mut report = ValidationReport::new("household_id=500");
        report.push(Violation::duplicate(RecordKey::vehicle(10, 1), "duplicate"));
        report.push(Violation::consistency(
            Severity::Advisory,
            RecordKey::trip(TripId::new(1)),
            "arrival_time",
            "arrives before it departs",
        ));
        assert!(report.has_fatal());
        assert_eq!(report.fatal().count(), 1);
        assert_eq!(report.advisories().count(), 1);
        assert_eq!(report.count(ViolationKind::Uniqueness), 1);
        assert_eq!(report.to_string(), "household_id=500: 1 fatal, 1 advisory");
        assert_eq!(report.into_advisories().len(), 1);
    }

    #[test]
    fn test_severity_parsing() {
        assert_eq!("Fatal".parse::<Severity>().unwrap(), Severity::Fatal);
        assert_eq!("advisory".parse::<Severity>().unwrap(), Severity::Advisory);
        assert!("warn".parse::<Severity>().is_err());
    }
}
