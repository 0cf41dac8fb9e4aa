//! Active-transportation intercept records
//!
//! One record per intercepted household, collected on site before the
//! optional rMove diary follow-up.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{HouseholdId, Place, Response};
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Intercept {
    pub household_id: HouseholdId,
    #[validate(length(max = 50))]
    pub survey_status: String,
    pub survey_start: Option<NaiveDateTime>,
    pub survey_end: Option<NaiveDateTime>,
    pub survey_date: Option<NaiveDate>,
    pub pilot_study: Response,
    #[validate(nested)]
    pub origin: InterceptEnd,
    #[validate(nested)]
    pub destination: InterceptEnd,
    #[validate(range(min = 0.0))]
    pub distance_beeline: Option<f64>,
    #[validate(length(max = 25))]
    pub distance_beeline_bin: String,
    #[validate(nested)]
    pub respondent: InterceptRespondent,
    #[validate(length(max = 100))]
    pub intercept_site: String,
    #[validate(length(max = 25))]
    pub intercept_direction: String,
    #[validate(length(max = 15))]
    pub language: String,
    #[validate(nested)]
    pub follow_up: DiaryFollowUp,
    pub survey_time_peak: Response,
    #[validate(length(max = 100))]
    pub expansion_site: String,
    #[validate(range(min = 0.0))]
    pub expansion_factor: Option<f64>,
}

/// Trip end reported at the intercept
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InterceptEnd {
    #[validate(length(max = 60))]
    pub purpose: String,
    #[validate(nested)]
    pub place: Place,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct InterceptRespondent {
    #[validate(length(max = 50))]
    pub employment_status: String,
    #[validate(length(max = 50))]
    pub student_status: String,
    #[validate(length(max = 25))]
    pub visit_work: String,
    #[validate(length(max = 25))]
    pub visit_school: String,
    #[validate(length(max = 10))]
    pub number_household_vehicles: String,
    #[validate(length(max = 10))]
    pub number_children_0_15: String,
    #[validate(length(max = 10))]
    pub number_children_16_17: String,
    #[validate(length(max = 10))]
    pub number_adults: String,
    #[validate(length(max = 20))]
    pub age: String,
    #[validate(length(max = 25))]
    pub smartphone: String,
    #[validate(length(max = 25))]
    pub resident: String,
    #[validate(length(max = 15))]
    pub bike_party: String,
    #[validate(length(max = 25))]
    pub bike_share: String,
    #[validate(length(max = 10))]
    pub gender: String,
}

/// Qualification for and completion of the rMove diary follow-up
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Validate)]
pub struct DiaryFollowUp {
    pub rmove_qualify: Response,
    pub opt_out: Response,
    pub rmove_participate: Response,
    pub rmove_complete: Response,
    pub recruit_complete: Response,
}

impl DiaryFollowUp {
    /// Participation requires qualifying and not opting out
    pub fn is_consistent(&self) -> bool {
        match self.rmove_participate {
            Response::Yes => self.rmove_qualify == Response::Yes && self.opt_out != Response::Yes,
            _ => self.rmove_complete != Response::Yes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_follow_up_consistency() {
        let mut follow_up = DiaryFollowUp {
            rmove_qualify: Response::Yes,
            opt_out: Response::No,
            rmove_participate: Response::Yes,
            rmove_complete: Response::Yes,
            recruit_complete: Response::Yes,
        };
        assert!(follow_up.is_consistent());

        follow_up.opt_out = Response::Yes;
        assert!(!follow_up.is_consistent());

        follow_up.rmove_participate = Response::No;
        assert!(!follow_up.is_consistent());
    }
}
