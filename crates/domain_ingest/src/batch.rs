//! Survey batches
//!
//! A batch is the unit of atomic ingestion: normally every record of one
//! household. Extracts covering many households can be split with
//! [`SurveyBatch::partition_by_household`]; households whose trips share a
//! `trip_id_linked` stay in one batch so the linkage rules see every leg.

use std::collections::{BTreeMap, BTreeSet};

use core_kernel::{HouseholdId, LinkedTripId, TraceId};
use domain_household::{BorderTrip, Household, Intercept, Person, Vehicle};
use domain_travel::{Day, LocationTrace, TravelError, Trip};
use serde::{Deserialize, Serialize};

/// Records ingested together, all or nothing
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyBatch {
    pub households: Vec<Household>,
    pub persons: Vec<Person>,
    pub days: Vec<Day>,
    pub trips: Vec<Trip>,
    pub vehicles: Vec<Vehicle>,
    pub intercepts: Vec<Intercept>,
    pub border_trips: Vec<BorderTrip>,
    pub traces: Vec<LocationTrace>,
}

/// Row counts of a batch or of a committed write
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowCounts {
    pub households: usize,
    pub persons: usize,
    pub days: usize,
    pub trips: usize,
    pub vehicles: usize,
    pub intercepts: usize,
    pub border_trips: usize,
    pub traces: usize,
    pub points: usize,
}

impl RowCounts {
    pub fn total(&self) -> usize {
        self.households
            + self.persons
            + self.days
            + self.trips
            + self.vehicles
            + self.intercepts
            + self.border_trips
            + self.traces
            + self.points
    }
}

impl SurveyBatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn counts(&self) -> RowCounts {
        RowCounts {
            households: self.households.len(),
            persons: self.persons.len(),
            days: self.days.len(),
            trips: self.trips.len(),
            vehicles: self.vehicles.len(),
            intercepts: self.intercepts.len(),
            border_trips: self.border_trips.len(),
            traces: self.traces.len(),
            points: self.traces.iter().map(|t| t.points.len()).sum(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.counts().total() == 0
    }

    /// Every household id the batch's records mention
    pub fn household_ids(&self) -> BTreeSet<HouseholdId> {
        self.households
            .iter()
            .map(|h| h.household_id)
            .chain(self.persons.iter().map(|p| p.household_id))
            .chain(self.days.iter().map(|d| d.household_id))
            .chain(self.trips.iter().map(|t| t.household_id))
            .chain(
                self.vehicles
                    .iter()
                    .filter(|v| !v.is_sentinel())
                    .map(|v| v.household_id),
            )
            .chain(self.intercepts.iter().map(|i| i.household_id))
            .chain(self.border_trips.iter().map(|b| b.household_id))
            .collect()
    }

    /// Short label for logs and reports, e.g. `household_id=500`
    pub fn label(&self) -> String {
        let ids: Vec<String> = self
            .household_ids()
            .iter()
            .map(|id| id.to_string())
            .collect();
        match ids.len() {
            0 if self.traces.is_empty() => "empty batch".to_string(),
            0 => format!("traces({})", self.traces.len()),
            1 => format!("household_id={}", ids[0]),
            _ => format!("household_id in ({})", ids.join(", ")),
        }
    }

    /// Splits an extract into one batch per household
    ///
    /// Households whose trips share a linked trip id are kept together in
    /// one batch. Traces follow the household of the trip that references
    /// them. Traces no trip references are returned together in a final
    /// batch.
    pub fn partition_by_household(self) -> Vec<SurveyBatch> {
        let mut groups = HouseholdGroups::default();
        let mut linked_owner: BTreeMap<LinkedTripId, HouseholdId> = BTreeMap::new();
        let mut trace_owner: BTreeMap<TraceId, HouseholdId> = BTreeMap::new();

        for trip in &self.trips {
            let first = *linked_owner.entry(trip.trip_id_linked).or_insert(trip.household_id);
            groups.join(first, trip.household_id);
            if let Some(trace_id) = trip.trip_id_location {
                trace_owner.entry(trace_id).or_insert(trip.household_id);
            }
        }

        let mut batches: BTreeMap<HouseholdId, SurveyBatch> = BTreeMap::new();
        for household in self.households {
            batch_for(&mut batches, &groups, household.household_id).households.push(household);
        }
        for person in self.persons {
            batch_for(&mut batches, &groups, person.household_id).persons.push(person);
        }
        for day in self.days {
            batch_for(&mut batches, &groups, day.household_id).days.push(day);
        }
        for trip in self.trips {
            batch_for(&mut batches, &groups, trip.household_id).trips.push(trip);
        }
        for vehicle in self.vehicles {
            batch_for(&mut batches, &groups, vehicle.household_id).vehicles.push(vehicle);
        }
        for intercept in self.intercepts {
            batch_for(&mut batches, &groups, intercept.household_id).intercepts.push(intercept);
        }
        for border_trip in self.border_trips {
            batch_for(&mut batches, &groups, border_trip.household_id).border_trips.push(border_trip);
        }

        let mut unowned = SurveyBatch::new();
        for trace in self.traces {
            match trace_owner.get(&trace.trip_id_location) {
                Some(household_id) => {
                    batch_for(&mut batches, &groups, *household_id).traces.push(trace)
                }
                None => unowned.traces.push(trace),
            }
        }

        let mut result: Vec<SurveyBatch> = batches.into_values().collect();
        if !unowned.is_empty() {
            result.push(unowned);
        }
        result
    }

    /// The batch as it is written to storage
    ///
    /// Missing point shapes are derived from lat/long, trace lines without a
    /// shape are derived from their points, and points are put in
    /// collection-time order.
    pub fn normalized(&self) -> Result<SurveyBatch, TravelError> {
        let mut batch = self.clone();

        for household in &mut batch.households {
            household.home.derive_shape();
        }
        for person in &mut batch.persons {
            let places = &mut person.places;
            for place in [
                &mut places.second_home,
                &mut places.school,
                &mut places.second_school,
                &mut places.work,
                &mut places.second_work,
            ] {
                place.derive_shape();
            }
        }
        for trip in &mut batch.trips {
            trip.origin.place.derive_shape();
            trip.destination.place.derive_shape();
        }
        for intercept in &mut batch.intercepts {
            intercept.origin.place.derive_shape();
            intercept.destination.place.derive_shape();
        }
        for trace in &mut batch.traces {
            trace.shape = Some(trace.storage_shape()?);
            trace.points = trace.ordered_points();
            for point in &mut trace.points {
                point.shape = Some(point.storage_shape());
            }
        }

        Ok(batch)
    }

    /// Concatenates another batch into this one
    pub fn extend(&mut self, other: SurveyBatch) {
        self.households.extend(other.households);
        self.persons.extend(other.persons);
        self.days.extend(other.days);
        self.trips.extend(other.trips);
        self.vehicles.extend(other.vehicles);
        self.intercepts.extend(other.intercepts);
        self.border_trips.extend(other.border_trips);
        self.traces.extend(other.traces);
    }
}

fn batch_for<'a>(
    batches: &'a mut BTreeMap<HouseholdId, SurveyBatch>,
    groups: &HouseholdGroups,
    household_id: HouseholdId,
) -> &'a mut SurveyBatch {
    batches.entry(groups.root(household_id)).or_default()
}

/// Disjoint sets of households, each represented by its lowest id
#[derive(Debug, Default)]
struct HouseholdGroups {
    parent: BTreeMap<HouseholdId, HouseholdId>,
}

impl HouseholdGroups {
    fn root(&self, mut id: HouseholdId) -> HouseholdId {
        while let Some(parent) = self.parent.get(&id) {
            id = *parent;
        }
        id
    }

    fn join(&mut self, a: HouseholdId, b: HouseholdId) {
        let (a, b) = (self.root(a), self.root(b));
        if a != b {
            self.parent.insert(a.max(b), a.min(b));
        }
    }
}
