//! Batch validation
//!
//! Runs every check against a batch and the keys already in the store, and
//! collects all findings into one [`ValidationReport`]:
//!
//! 1. schema: widths and ranges declared on the record types
//! 2. missingness: empty NOT NULL text, incomplete navigation block,
//!    ungeocoded home, traces with nothing to store
//! 3. uniqueness: within the batch and against the store
//! 4. referential: parents in the batch or the store
//! 5. consistency: geometry, linkage, temporal, trace and agreement checks,
//!    graded by the [`IngestPolicy`]

use std::collections::{BTreeMap, BTreeSet, HashSet};
use std::hash::Hash;

use core_kernel::{
    Geocode, HouseholdId, LinkedTripId, PersonId, Place, Response, SpatialError, TraceShape, TripId,
};
use domain_household::VehicleRef;
use domain_travel::{LinkageResolver, LinkedLeg};
use serde::Serialize;
use serde_json::Value;
use validator::{Validate, ValidationError, ValidationErrors, ValidationErrorsKind};

use crate::batch::SurveyBatch;
use crate::policy::{ConsistencyCheck, IngestPolicy};
use crate::ports::ExistingKeys;
use crate::report::{RecordKey, Severity, ValidationReport, Violation, ViolationKind};

/// Validates batches against one policy
#[derive(Debug, Clone)]
pub struct BatchValidator<'a> {
    policy: &'a IngestPolicy,
}

impl<'a> BatchValidator<'a> {
    pub fn new(policy: &'a IngestPolicy) -> Self {
        Self { policy }
    }

    /// Collects every violation in the batch
    pub fn validate(&self, batch: &SurveyBatch, existing: &ExistingKeys) -> ValidationReport {
        let mut report = ValidationReport::new(batch.label());

        self.check_records(batch, &mut report);
        self.check_uniqueness(batch, existing, &mut report);
        self.check_references(batch, existing, &mut report);
        self.check_geometry(batch, &mut report);
        self.check_linkage(batch, existing, &mut report);
        self.check_temporal(batch, &mut report);
        self.check_traces(batch, &mut report);
        self.check_agreement(batch, existing, &mut report);

        report
    }

    // ------------------------------------------------------------------
    // Schema and missingness
    // ------------------------------------------------------------------

    fn check_records(&self, batch: &SurveyBatch, report: &mut ValidationReport) {
        for household in &batch.households {
            let key = RecordKey::household(household.household_id);
            check_record(&key, household, report);
            for tool in household.navigation.missing_tools() {
                report.push(Violation::missing(
                    key.clone(),
                    format!("navigation.tools.{}", tool.label()),
                    "no use/frequency entry for this navigation tool",
                ));
            }
            if !household.home.is_geocoded() {
                report.push(Violation::missing(
                    key,
                    "home.geocode",
                    "household home location must be geocoded",
                ));
            }
        }
        for person in &batch.persons {
            check_record(&RecordKey::person(person.person_id), person, report);
        }
        for day in &batch.days {
            check_record(&RecordKey::day(day.person_id, day.travel_date), day, report);
        }
        for trip in &batch.trips {
            check_record(&RecordKey::trip(trip.trip_id), trip, report);
        }
        for vehicle in &batch.vehicles {
            let key = RecordKey::vehicle(vehicle.household_id.value(), vehicle.vehicle_number);
            check_record(&key, vehicle, report);
            if !vehicle.is_sentinel() {
                if let Err(e) = vehicle.reference() {
                    report.push(Violation::schema(key, "vehicle_number", e.to_string()));
                }
            }
        }
        for intercept in &batch.intercepts {
            check_record(&RecordKey::intercept(intercept.household_id), intercept, report);
        }
        for border_trip in &batch.border_trips {
            let (household_id, trip_id) = border_trip.key();
            check_record(&RecordKey::border_trip(household_id, trip_id), border_trip, report);
        }
        for trace in &batch.traces {
            let key = RecordKey::trace(trace.trip_id_location);
            check_record(&key, trace, report);
            if trace.shape.is_none() && trace.points.is_empty() {
                report.push(Violation::missing(key, "points", "trace has neither a shape nor any points"));
            }
        }
    }

    // ------------------------------------------------------------------
    // Uniqueness
    // ------------------------------------------------------------------

    fn check_uniqueness(&self, batch: &SurveyBatch, existing: &ExistingKeys, report: &mut ValidationReport) {
        unique_keys(
            batch.households.iter().map(|h| h.household_id),
            |id| existing.households.contains(id),
            RecordKey::household,
            report,
        );
        unique_keys(
            batch.persons.iter().map(|p| p.person_id),
            |id| existing.persons.contains_key(id),
            RecordKey::person,
            report,
        );
        unique_keys(
            batch.days.iter().map(|d| d.key()),
            |key| existing.days.contains(key),
            |(person_id, date)| RecordKey::day(person_id, date),
            report,
        );
        unique_keys(
            batch.trips.iter().map(|t| t.trip_id),
            |id| existing.trips.contains(id),
            RecordKey::trip,
            report,
        );
        unique_keys(
            batch.traces.iter().map(|t| t.trip_id_location),
            |id| existing.traces.contains(id),
            RecordKey::trace,
            report,
        );
        unique_keys(
            batch.intercepts.iter().map(|i| i.household_id),
            |id| existing.intercepts.contains(id),
            RecordKey::intercept,
            report,
        );
        unique_keys(
            batch.border_trips.iter().map(|b| b.key()),
            |key| existing.border_trips.contains(key),
            |(household_id, trip_id)| RecordKey::border_trip(household_id, trip_id),
            report,
        );

        for vehicle in batch.vehicles.iter().filter(|v| v.is_sentinel()) {
            let (household_id, vehicle_number) = vehicle.key();
            report.push(Violation::duplicate(
                RecordKey::vehicle(household_id, vehicle_number),
                "vehicle key (0, 0) is reserved for the not-applicable vehicle",
            ));
        }
        unique_keys(
            batch.vehicles.iter().filter(|v| !v.is_sentinel()).map(|v| v.key()),
            |key| existing.vehicles.contains(key),
            |(household_id, vehicle_number)| RecordKey::vehicle(household_id, vehicle_number),
            report,
        );
    }

    // ------------------------------------------------------------------
    // Referential
    // ------------------------------------------------------------------

    fn check_references(&self, batch: &SurveyBatch, existing: &ExistingKeys, report: &mut ValidationReport) {
        let households: BTreeSet<HouseholdId> = batch
            .households
            .iter()
            .map(|h| h.household_id)
            .chain(existing.households.iter().copied())
            .collect();

        let mut persons: BTreeMap<PersonId, HouseholdId> = existing.persons.clone();
        for person in &batch.persons {
            persons.entry(person.person_id).or_insert(person.household_id);
        }

        for person in &batch.persons {
            if !households.contains(&person.household_id) {
                report.push(Violation::unresolved(
                    RecordKey::person(person.person_id),
                    HouseholdId::COLUMN,
                    RecordKey::household(person.household_id),
                ));
            }
        }

        let owned_by_person = |record: RecordKey,
                               person_id: PersonId,
                               household_id: HouseholdId,
                               report: &mut ValidationReport| {
            match persons.get(&person_id) {
                None => report.push(Violation::unresolved(
                    record,
                    PersonId::COLUMN,
                    RecordKey::person(person_id),
                )),
                Some(owner) if *owner != household_id => report.push(
                    Violation::new(
                        ViolationKind::Referential,
                        Severity::Fatal,
                        record,
                        format!(
                            "household_id={} but person_id={} belongs to household_id={}",
                            household_id, person_id, owner
                        ),
                    )
                    .at(HouseholdId::COLUMN)
                    .with_reference(RecordKey::person(person_id)),
                ),
                Some(_) => {}
            }
        };

        for day in &batch.days {
            owned_by_person(
                RecordKey::day(day.person_id, day.travel_date),
                day.person_id,
                day.household_id,
                report,
            );
        }
        for trip in &batch.trips {
            owned_by_person(RecordKey::trip(trip.trip_id), trip.person_id, trip.household_id, report);
        }

        for vehicle in batch.vehicles.iter().filter(|v| !v.is_sentinel()) {
            if !households.contains(&vehicle.household_id) {
                let (household_id, vehicle_number) = vehicle.key();
                report.push(Violation::unresolved(
                    RecordKey::vehicle(household_id, vehicle_number),
                    HouseholdId::COLUMN,
                    RecordKey::household(vehicle.household_id),
                ));
            }
        }
        for border_trip in &batch.border_trips {
            if !households.contains(&border_trip.household_id) {
                let (household_id, trip_id) = border_trip.key();
                report.push(Violation::unresolved(
                    RecordKey::border_trip(household_id, trip_id),
                    HouseholdId::COLUMN,
                    RecordKey::household(border_trip.household_id),
                ));
            }
        }
    }

    // ------------------------------------------------------------------
    // Consistency
    // ------------------------------------------------------------------

    fn check_geometry(&self, batch: &SurveyBatch, report: &mut ValidationReport) {
        let severity = self.policy.severity(ConsistencyCheck::Geometry);
        let tolerance = self.policy.tolerance;

        let place = |record: &RecordKey, path: &str, place: &Place, report: &mut ValidationReport| {
            if let Some(message) = place.geocode.as_ref().and_then(|g| geocode_issue(g, tolerance)) {
                report.push(Violation::consistency(
                    severity,
                    record.clone(),
                    format!("{}.geocode.shape", path),
                    message,
                ));
            }
        };

        for household in &batch.households {
            place(&RecordKey::household(household.household_id), "home", &household.home, report);
        }
        for person in &batch.persons {
            let key = RecordKey::person(person.person_id);
            for (prefix, location) in person.places.named() {
                place(&key, &format!("places.{}", prefix), location, report);
            }
        }
        for trip in &batch.trips {
            let key = RecordKey::trip(trip.trip_id);
            place(&key, "origin.place", &trip.origin.place, report);
            place(&key, "destination.place", &trip.destination.place, report);
        }
        for intercept in &batch.intercepts {
            let key = RecordKey::intercept(intercept.household_id);
            place(&key, "origin.place", &intercept.origin.place, report);
            place(&key, "destination.place", &intercept.destination.place, report);
        }
        for trace in &batch.traces {
            if let Some(shape) = &trace.shape {
                if let Err(e) = TraceShape::parse(shape) {
                    report.push(Violation::consistency(
                        severity,
                        RecordKey::trace(trace.trip_id_location),
                        "shape",
                        e.to_string(),
                    ));
                }
            }
            for (index, point) in trace.points.iter().enumerate() {
                if let Err(e) = point.check(tolerance) {
                    if !matches!(e, SpatialError::OutOfRange { .. }) {
                        report.push(Violation::consistency(
                            severity,
                            RecordKey::point(trace.trip_id_location, index),
                            "shape",
                            e.to_string(),
                        ));
                    }
                }
            }
        }
    }

    /// Linkage rules over each linked trip the batch touches, including
    /// its legs already in the store
    ///
    /// Stored legs come first so they set the expected person and
    /// household. Violations among stored legs alone are not the batch's.
    fn check_linkage(&self, batch: &SurveyBatch, existing: &ExistingKeys, report: &mut ValidationReport) {
        let severity = self.policy.severity(ConsistencyCheck::Linkage);

        let mut groups: BTreeMap<LinkedTripId, Vec<LinkedLeg>> = BTreeMap::new();
        for trip in &batch.trips {
            groups.entry(trip.trip_id_linked).or_default().push(LinkedLeg::from(trip));
        }

        for (linked_id, batch_legs) in groups {
            let incoming: BTreeSet<TripId> = batch_legs.iter().map(|leg| leg.trip_id).collect();
            let mut legs: Vec<LinkedLeg> = existing
                .linked_legs
                .get(&linked_id)
                .into_iter()
                .flatten()
                .filter(|leg| !incoming.contains(&leg.trip_id))
                .copied()
                .collect();
            legs.extend(batch_legs);

            for violation in LinkageResolver::check_group(&legs) {
                let record = if incoming.contains(&violation.trip_id()) {
                    violation.trip_id()
                } else {
                    match incoming.iter().copied().find(|id| violation.involves(*id)) {
                        Some(trip_id) => trip_id,
                        None => continue,
                    }
                };
                report.push(Violation::consistency(
                    severity,
                    RecordKey::trip(record),
                    "trip_id_linked",
                    violation.to_string(),
                ));
            }
        }
    }

    fn check_temporal(&self, batch: &SurveyBatch, report: &mut ValidationReport) {
        let severity = self.policy.severity(ConsistencyCheck::Temporal);

        for trip in &batch.trips {
            if trip.interval().is_inverted() {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::trip(trip.trip_id),
                    "arrival_time",
                    format!(
                        "arrival_time {} is before departure_time {}",
                        trip.arrival_time, trip.departure_time
                    ),
                ));
            }
        }
        for household in &batch.households {
            let recruitment = &household.recruitment;
            if recruitment.survey_end < recruitment.survey_start {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::household(household.household_id),
                    "recruitment.survey_end",
                    "recruit survey ends before it starts",
                ));
            }
        }
        for day in &batch.days {
            if let (Some(start), Some(end)) = (day.completion.diary_start_time, day.completion.diary_end_time) {
                if end < start {
                    report.push(Violation::consistency(
                        severity,
                        RecordKey::day(day.person_id, day.travel_date),
                        "completion.diary_end_time",
                        "diary ends before it starts",
                    ));
                }
            }
        }
        for intercept in &batch.intercepts {
            if let (Some(start), Some(end)) = (intercept.survey_start, intercept.survey_end) {
                if end < start {
                    report.push(Violation::consistency(
                        severity,
                        RecordKey::intercept(intercept.household_id),
                        "survey_end",
                        "intercept survey ends before it starts",
                    ));
                }
            }
        }
    }

    fn check_traces(&self, batch: &SurveyBatch, report: &mut ValidationReport) {
        let severity = self.policy.severity(ConsistencyCheck::Trace);

        for trace in &batch.traces {
            let key = RecordKey::trace(trace.trip_id_location);
            if !trace.is_time_ordered() {
                report.push(Violation::consistency(
                    severity,
                    key.clone(),
                    "points",
                    "points are not in collection-time order; they are stored sorted by collected_at",
                ));
            }
            // An unparsable shape is reported by the geometry check
            if let Ok(Some(false)) = trace.shape_matches_points(self.policy.tolerance) {
                report.push(Violation::consistency(
                    severity,
                    key,
                    "shape",
                    "shape does not match the line through the trace's points",
                ));
            }
        }
    }

    fn check_agreement(&self, batch: &SurveyBatch, existing: &ExistingKeys, report: &mut ValidationReport) {
        let severity = self.policy.severity(ConsistencyCheck::Agreement);

        for household in &batch.households {
            for tool in household.navigation.inconsistent_tools() {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::household(household.household_id),
                    format!("navigation.tools.{}.freq", tool.label()),
                    "frequency contradicts the use flag",
                ));
            }
        }

        for person in &batch.persons {
            if person.work.work_parking_cost.is_some() && person.work.work_parking_cost_dk == Response::Yes {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::person(person.person_id),
                    "work.work_parking_cost",
                    "cost given although marked don't know",
                ));
            }
        }

        for day in &batch.days {
            for issue in day.agreement_issues() {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::day(day.person_id, day.travel_date),
                    "made_trips",
                    issue,
                ));
            }
        }

        let vehicles: HashSet<(i32, i16)> = batch
            .vehicles
            .iter()
            .map(|v| v.key())
            .chain(existing.vehicles.iter().copied())
            .collect();
        let traces: HashSet<_> = batch
            .traces
            .iter()
            .map(|t| t.trip_id_location)
            .chain(existing.traces.iter().copied())
            .collect();

        for trip in &batch.trips {
            let key = RecordKey::trip(trip.trip_id);
            for fare in trip.fares.inconsistent() {
                report.push(Violation::consistency(
                    severity,
                    key.clone(),
                    format!("fares.{}.cost", fare),
                    "cost given although marked don't know",
                ));
            }
            if trip.parking.cost.is_some() && trip.parking.cost_dk == Response::Yes {
                report.push(Violation::consistency(
                    severity,
                    key.clone(),
                    "parking.cost",
                    "cost given although marked don't know",
                ));
            }
            if let Some(vehicle) = trip.household_vehicle() {
                if !vehicles.contains(&VehicleRef::to_storage_key(Some(vehicle))) {
                    report.push(Violation::consistency(
                        severity,
                        key.clone(),
                        "modes.slots",
                        format!("uses household vehicle {} which has no vehicle record", vehicle),
                    ));
                }
            }
            if let Some(trace) = trip.trip_id_location {
                if !traces.contains(&trace) {
                    report.push(Violation::consistency(
                        severity,
                        key,
                        "trip_id_location",
                        format!("trip_id_location={} has no location trace", trace),
                    ));
                }
            }
        }

        for intercept in &batch.intercepts {
            if !intercept.follow_up.is_consistent() {
                report.push(Violation::consistency(
                    severity,
                    RecordKey::intercept(intercept.household_id),
                    "follow_up",
                    "rMove participation contradicts qualification or opt-out",
                ));
            }
        }
    }
}

/// Schema and empty-text checks for one record
fn check_record<T: Validate + Serialize>(key: &RecordKey, record: &T, report: &mut ValidationReport) {
    if let Err(errors) = record.validate() {
        let mut flat = Vec::new();
        flatten_errors(&errors, "", &mut flat);
        for (field, message) in flat {
            report.push(Violation::schema(key.clone(), field, message));
        }
    }

    if let Ok(value) = serde_json::to_value(record) {
        let mut paths = Vec::new();
        empty_text_paths(&value, &mut Vec::new(), &mut paths);
        for path in paths {
            report.push(Violation::missing(
                key.clone(),
                path,
                "empty text; use a sentinel such as 'Not Applicable'",
            ));
        }
    }
}

/// Flattens nested `validator` errors into `(field path, message)` pairs
fn flatten_errors(errors: &ValidationErrors, prefix: &str, out: &mut Vec<(String, String)>) {
    for (field, kind) in errors.errors() {
        let path = if prefix.is_empty() {
            field.to_string()
        } else {
            format!("{}.{}", prefix, field)
        };
        match kind {
            ValidationErrorsKind::Field(field_errors) => {
                for error in field_errors {
                    out.push((path.clone(), describe(error)));
                }
            }
            ValidationErrorsKind::Struct(inner) => flatten_errors(inner, &path, out),
            ValidationErrorsKind::List(items) => {
                for (index, inner) in items {
                    flatten_errors(inner, &format!("{}.{}", path, index), out);
                }
            }
        }
    }
}

fn describe(error: &ValidationError) -> String {
    if let Some(message) = &error.message {
        return message.to_string();
    }
    let param = |name: &str| error.params.get(name).map(|value| value.to_string());
    match error.code.as_ref() {
        "length" => match param("max") {
            Some(max) => format!("longer than {} characters", max),
            None => "invalid length".to_string(),
        },
        "range" => format!(
            "{} is outside [{}, {}]",
            param("value").unwrap_or_default(),
            param("min").unwrap_or_else(|| "-inf".to_string()),
            param("max").unwrap_or_else(|| "inf".to_string()),
        ),
        code => format!("failed {} validation", code),
    }
}

/// Paths of every blank string in a serialized record
fn empty_text_paths(value: &Value, path: &mut Vec<String>, out: &mut Vec<String>) {
    match value {
        Value::String(text) if text.trim().is_empty() => out.push(path.join(".")),
        Value::Object(map) => {
            for (name, inner) in map {
                path.push(name.clone());
                empty_text_paths(inner, path, out);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (index, inner) in items.iter().enumerate() {
                path.push(index.to_string());
                empty_text_paths(inner, path, out);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Divergence between a supplied shape and its coordinates
///
/// Out-of-range coordinates are left to the schema check.
fn geocode_issue(geocode: &Geocode, tolerance: f64) -> Option<String> {
    match geocode.check(tolerance) {
        Ok(()) | Err(SpatialError::OutOfRange { .. }) => None,
        Err(e) => Some(e.to_string()),
    }
}

/// Reports keys repeated within the batch or already stored
fn unique_keys<K, I, E, R>(keys: I, exists: E, record: R, report: &mut ValidationReport)
where
    K: Copy + Eq + Hash,
    I: IntoIterator<Item = K>,
    E: Fn(&K) -> bool,
    R: Fn(K) -> RecordKey,
{
    let mut seen = HashSet::new();
    for key in keys {
        let record_key = record(key);
        if !seen.insert(key) {
            let message = format!("duplicate key {} within the batch", record_key.columns_text());
            report.push(Violation::duplicate(record_key, message));
        } else if exists(&key) {
            let message = format!("key {} is already stored", record_key.columns_text());
            report.push(Violation::duplicate(record_key, message));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_empty_text_paths() {
        let value = json!({
            "name": "",
            "origin": { "place": { "address": " " } },
            "points": [{ "label": "ok" }, { "label": "" }],
        });
        let mut paths = Vec::new();
        empty_text_paths(&value, &mut Vec::new(), &mut paths);
        paths.sort();
        assert_eq!(paths, vec!["name", "origin.place.address", "points.1.label"]);
    }

    #[test]
    fn test_geocode_issue_ignores_range() {
        let far = Geocode::new(32.7157, -117.1611).with_shape("POINT(-117.2 32.7157)");
        assert!(geocode_issue(&far, 1e-6).is_some());

        let out_of_range = Geocode::new(95.0, -117.1611);
        assert!(geocode_issue(&out_of_range, 1e-6).is_none());
    }

    #[test]
    fn test_duplicate_within_batch_reported_once() {
        let mut report = ValidationReport::new("test");
        unique_keys(
            vec![(10, 1_i16), (10, 1), (10, 2)],
            |_| false,
            |(h, n)| RecordKey::vehicle(h, n),
            &mut report,
        );
        assert_eq!(report.violations.len(), 1);
        assert!(report.violations[0].message.contains("household_id=10, vehicle_number=1"));
    }

    #[test]
    fn test_stored_key_reported() {
        let mut report = ValidationReport::new("test");
        unique_keys(
            vec![HouseholdId::new(500)],
            |id| *id == HouseholdId::new(500),
            RecordKey::household,
            &mut report,
        );
        assert_eq!(report.count(ViolationKind::Uniqueness), 1);
        assert!(report.violations[0].message.contains("already stored"));
    }
}
