//! Trip linkage resolution
//!
//! Transit legs recorded as separate trips share a `trip_id_linked`. The
//! resolver groups legs into linked trips and reports, without repairing,
//! every group whose legs:
//!
//! - belong to more than one person or household, or
//! - overlap in time once ordered by departure (each leg must depart no
//!   earlier than the previous one arrived).

use std::collections::BTreeMap;
use std::fmt;

use chrono::NaiveDateTime;
use core_kernel::{HouseholdId, LinkedTripId, PersonId, TravelInterval, TripId};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::categories::{TravelMode, TripPurpose};
use crate::error::TravelError;
use crate::trip::Trip;

/// The fields of a leg the linkage rules look at
///
/// Stores hand these out for legs already written, so a new batch can be
/// checked against the rest of its linked trip without loading whole trips.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkedLeg {
    pub trip_id: TripId,
    pub trip_id_linked: LinkedTripId,
    pub person_id: PersonId,
    pub household_id: HouseholdId,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
}

impl LinkedLeg {
    pub fn interval(&self) -> TravelInterval {
        TravelInterval::new(self.departure_time, self.arrival_time)
    }
}

impl From<&Trip> for LinkedLeg {
    fn from(trip: &Trip) -> Self {
        LinkedLeg {
            trip_id: trip.trip_id,
            trip_id_linked: trip.trip_id_linked,
            person_id: trip.person_id,
            household_id: trip.household_id,
            departure_time: trip.departure_time,
            arrival_time: trip.arrival_time,
        }
    }
}

/// A linkage rule broken by a group of legs
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum LinkageViolation {
    /// A leg belongs to a different person than the first leg
    MixedPerson {
        trip_id_linked: LinkedTripId,
        trip_id: TripId,
        expected: PersonId,
        found: PersonId,
    },
    /// A leg belongs to a different household than the first leg
    MixedHousehold {
        trip_id_linked: LinkedTripId,
        trip_id: TripId,
        expected: HouseholdId,
        found: HouseholdId,
    },
    /// A leg departs before the previous leg arrives
    Overlap {
        trip_id_linked: LinkedTripId,
        earlier: TripId,
        later: TripId,
        earlier_arrival: NaiveDateTime,
        later_departure: NaiveDateTime,
    },
}

impl LinkageViolation {
    pub fn trip_id_linked(&self) -> LinkedTripId {
        match self {
            LinkageViolation::MixedPerson { trip_id_linked, .. }
            | LinkageViolation::MixedHousehold { trip_id_linked, .. }
            | LinkageViolation::Overlap { trip_id_linked, .. } => *trip_id_linked,
        }
    }

    /// The leg the violation is attributed to
    pub fn trip_id(&self) -> TripId {
        match self {
            LinkageViolation::MixedPerson { trip_id, .. }
            | LinkageViolation::MixedHousehold { trip_id, .. } => *trip_id,
            LinkageViolation::Overlap { later, .. } => *later,
        }
    }

    /// True if the given leg takes part in the violation
    pub fn involves(&self, trip_id: TripId) -> bool {
        match self {
            LinkageViolation::Overlap { earlier, later, .. } => *earlier == trip_id || *later == trip_id,
            other => other.trip_id() == trip_id,
        }
    }
}

impl fmt::Display for LinkageViolation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LinkageViolation::MixedPerson { trip_id_linked, trip_id, expected, found } => write!(
                f,
                "trip_id_linked={}: trip_id={} belongs to person_id={}, expected person_id={}",
                trip_id_linked, trip_id, found, expected
            ),
            LinkageViolation::MixedHousehold { trip_id_linked, trip_id, expected, found } => write!(
                f,
                "trip_id_linked={}: trip_id={} belongs to household_id={}, expected household_id={}",
                trip_id_linked, trip_id, found, expected
            ),
            LinkageViolation::Overlap {
                trip_id_linked,
                earlier,
                later,
                earlier_arrival,
                later_departure,
            } => write!(
                f,
                "trip_id_linked={}: trip_id={} departs {} before trip_id={} arrives {}",
                trip_id_linked, later, later_departure, earlier, earlier_arrival
            ),
        }
    }
}

/// One traveler intention assembled from its legs
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinkedTrip {
    pub trip_id_linked: LinkedTripId,
    pub person_id: PersonId,
    pub household_id: HouseholdId,
    /// Legs ordered by departure
    pub legs: Vec<TripId>,
    pub origin_name: String,
    pub origin_purpose: TripPurpose,
    pub destination_name: String,
    pub destination_purpose: TripPurpose,
    pub departure_time: NaiveDateTime,
    pub arrival_time: NaiveDateTime,
    /// Reported modes of all legs, in leg and slot order
    pub modes: Vec<TravelMode>,
    /// Sum of the reported leg distances; None if any leg has no distance
    pub distance: Option<f64>,
    /// False if any linkage rule is broken for this group
    pub consistent: bool,
}

/// Linked trips and the rule violations found while building them
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LinkageResolution {
    pub linked_trips: Vec<LinkedTrip>,
    pub violations: Vec<LinkageViolation>,
}

impl LinkageResolution {
    pub fn is_consistent(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Groups trip legs by `trip_id_linked`
pub struct LinkageResolver;

impl LinkageResolver {
    /// Resolves every linked trip among the given legs
    pub fn resolve<'a, I>(trips: I) -> LinkageResolution
    where
        I: IntoIterator<Item = &'a Trip>,
    {
        let mut groups: BTreeMap<LinkedTripId, Vec<&'a Trip>> = BTreeMap::new();
        for trip in trips {
            groups.entry(trip.trip_id_linked).or_default().push(trip);
        }

        let mut resolution = LinkageResolution::default();
        for (linked_id, legs) in groups {
            let keys: Vec<LinkedLeg> = legs.iter().map(|leg| LinkedLeg::from(*leg)).collect();
            let violations = Self::check_group(&keys);
            if let Ok(linked) = Self::summarize(linked_id, &legs, violations.is_empty()) {
                resolution.linked_trips.push(linked);
            }
            resolution.violations.extend(violations);
        }

        debug!(
            linked_trips = resolution.linked_trips.len(),
            violations = resolution.violations.len(),
            "Resolved trip linkage"
        );
        resolution
    }

    /// Checks the linkage rules for the legs of one linked trip
    ///
    /// The first leg given sets the expected person and household.
    pub fn check_group(legs: &[LinkedLeg]) -> Vec<LinkageViolation> {
        let mut violations = Vec::new();
        let Some(first) = legs.first() else {
            return violations;
        };
        let linked_id = first.trip_id_linked;

        for leg in legs.iter().skip(1) {
            if leg.person_id != first.person_id {
                violations.push(LinkageViolation::MixedPerson {
                    trip_id_linked: linked_id,
                    trip_id: leg.trip_id,
                    expected: first.person_id,
                    found: leg.person_id,
                });
            }
            if leg.household_id != first.household_id {
                violations.push(LinkageViolation::MixedHousehold {
                    trip_id_linked: linked_id,
                    trip_id: leg.trip_id,
                    expected: first.household_id,
                    found: leg.household_id,
                });
            }
        }

        let mut ordered = legs.to_vec();
        ordered.sort_by_key(|leg| (leg.departure_time, leg.trip_id));
        for pair in ordered.windows(2) {
            let (earlier, later) = (pair[0], pair[1]);
            if !earlier.interval().precedes(&later.interval()) {
                violations.push(LinkageViolation::Overlap {
                    trip_id_linked: linked_id,
                    earlier: earlier.trip_id,
                    later: later.trip_id,
                    earlier_arrival: earlier.arrival_time,
                    later_departure: later.departure_time,
                });
            }
        }

        violations
    }

    /// Builds the summary of one linked trip
    pub fn summarize(
        linked_id: LinkedTripId,
        legs: &[&Trip],
        consistent: bool,
    ) -> Result<LinkedTrip, TravelError> {
        let ordered = Self::ordered(legs);
        let (first, last) = match (ordered.first(), ordered.last()) {
            (Some(first), Some(last)) => (*first, *last),
            _ => return Err(TravelError::EmptyLinkedTrip(linked_id)),
        };

        let distance = ordered
            .iter()
            .map(|leg| leg.metrics.distance)
            .sum::<Option<f64>>();

        Ok(LinkedTrip {
            trip_id_linked: linked_id,
            person_id: first.person_id,
            household_id: first.household_id,
            legs: ordered.iter().map(|leg| leg.trip_id).collect(),
            origin_name: first.origin.name.clone(),
            origin_purpose: first.origin.purpose,
            destination_name: last.destination.name.clone(),
            destination_purpose: last.destination.purpose,
            departure_time: first.departure_time,
            arrival_time: ordered
                .iter()
                .map(|leg| leg.arrival_time)
                .max()
                .unwrap_or(last.arrival_time),
            modes: ordered.iter().flat_map(|leg| leg.modes.reported()).collect(),
            distance,
            consistent,
        })
    }

    /// Legs ordered by departure, then trip id
    fn ordered<'a>(legs: &[&'a Trip]) -> Vec<&'a Trip> {
        let mut ordered = legs.to_vec();
        ordered.sort_by_key(|leg| (leg.departure_time, leg.trip_id));
        ordered
    }
}
