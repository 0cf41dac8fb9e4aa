//! Person-days
//!
//! One record per person per travel date. `(person_id, travel_date)` is the
//! natural key; the store allocates a `day_id` surrogate on commit.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{HouseholdId, PersonId, Response};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::{DataSource, DayAnchor, DayOfWeek, NoTravelReason, ProxyStatus, SurveyStatus};

/// A person's diary for one travel date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Day {
    pub person_id: PersonId,
    pub household_id: HouseholdId,
    pub travel_date: NaiveDate,
    #[validate(range(min = 1, max = 7))]
    pub travel_day_number: i16,
    pub travel_day_of_week: DayOfWeek,
    pub data_source: DataSource,
    #[validate(nested)]
    pub completion: DayCompletion,
    pub made_trips: Response,
    pub no_trips_reason_1: NoTravelReason,
    pub no_trips_reason_2: NoTravelReason,
    #[validate(length(max = 150))]
    pub no_trips_reason_specify_other: String,
    #[validate(range(min = 0))]
    pub number_trips: Option<i32>,
    #[validate(range(min = 0))]
    pub number_surveys: Option<i32>,
    pub start_location: DayAnchor,
    #[validate(length(max = 150))]
    pub start_location_other: String,
    pub end_location: DayAnchor,
    #[validate(length(max = 150))]
    pub end_location_other: String,
    #[validate(range(min = 0.0, max = 24.0))]
    pub time_telework: Option<f64>,
    #[validate(range(min = 0.0, max = 24.0))]
    pub time_shop: Option<f64>,
    pub toll_road: Response,
    pub toll_road_express: Response,
    pub deliver_package: Response,
    pub deliver_food: Response,
    pub deliver_work: Response,
    #[validate(nested)]
    pub weights: DayWeights,
}

/// Survey completion and diary timing metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DayCompletion {
    pub completed_household_survey: Response,
    pub completed_person_survey: Response,
    pub completed_date: Option<NaiveDateTime>,
    pub revised_at: Option<NaiveDateTime>,
    #[validate(length(max = 15))]
    pub revised_count: String,
    pub diary_start_time: Option<NaiveDateTime>,
    pub diary_end_time: Option<NaiveDateTime>,
    #[validate(range(min = 0))]
    pub diary_duration: Option<i32>,
    pub survey_status: SurveyStatus,
    pub proxy: ProxyStatus,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct DayWeights {
    #[validate(range(min = 0.0))]
    pub household_multiday_factor: Option<f64>,
    #[validate(range(min = 0.0))]
    pub person_multiday_456x: Option<f64>,
}

impl Day {
    /// `(person_id, travel_date)` natural key
    pub fn key(&self) -> (PersonId, NaiveDate) {
        (self.person_id, self.travel_date)
    }

    /// Contradictions between the trip indicators of the day
    ///
    /// The number of trips takes precedence over the made-trips flag.
    pub fn agreement_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();

        if let Some(count) = self.number_trips {
            let expected = Response::from_bool(count > 0);
            if self.made_trips != expected {
                issues.push(format!(
                    "made_trips is '{}' but number_trips is {}",
                    self.made_trips, count
                ));
            }
            if count > 0 && self.no_trips_reason_1 != NoTravelReason::NotApplicable {
                issues.push(format!(
                    "no_trips_reason_1 is '{}' on a day with {} trips",
                    self.no_trips_reason_1, count
                ));
            }
        }

        let other_reason = self.no_trips_reason_1 == NoTravelReason::Other
            || self.no_trips_reason_2 == NoTravelReason::Other;
        if !other_reason && self.no_trips_reason_specify_other != "Not Applicable" {
            issues.push("no_trips_reason_specify_other given without an 'Other reason'".to_string());
        }

        if self.travel_day_of_week != DayOfWeek::Missing
            && self.travel_day_of_week != DayOfWeek::of(self.travel_date)
        {
            issues.push(format!(
                "travel_day_of_week is {} but {} is a {}",
                self.travel_day_of_week,
                self.travel_date,
                DayOfWeek::of(self.travel_date)
            ));
        }

        issues
    }
}
