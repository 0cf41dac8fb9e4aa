//! Persons
//!
//! A person belongs to exactly one household. Five places (second home,
//! school, second school, work, second work) are each geocoded as a unit.

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{Cost, HouseholdId, PersonId, Place, Response};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::{
    AgeCategory, CommuteFrequency, CommuteMode, DaycareClose, DaycareOpen, Disability, Education,
    EmploymentStatus, Gender, HoursWorked, Industry, JobCount, MilitaryStatus, Occupation,
    OtherSchoolFrequency, PhysicalActivity, Relationship, SchoolFrequency, SchoolType,
    SmartphoneType, StudentStatus, TransitFrequency, TransitPass, WorkArrivalFlexibility,
    WorkLocationType, WorkParkingEase, WorkParkingPayment,
};

/// Number of diary days a person can be asked to complete
pub const MAX_TRAVEL_DAYS: usize = 7;

/// A household member
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Person {
    pub person_id: PersonId,
    pub household_id: HouseholdId,
    #[validate(range(min = 1))]
    pub person_number: i32,
    pub travel_date_start: NaiveDate,
    pub rmove_participant: Response,
    #[validate(nested)]
    pub demographics: Demographics,
    pub school: Schooling,
    #[validate(nested)]
    pub work: Employment,
    #[validate(nested)]
    pub commute_subsidy: CommuteSubsidy,
    pub has_second_home: Response,
    #[validate(nested)]
    pub places: PersonPlaces,
    pub smartphone: Smartphone,
    #[validate(nested)]
    pub diary: DiaryParticipation,
}

impl Person {
    pub fn id(&self) -> PersonId {
        self.person_id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Demographics {
    pub relationship: Relationship,
    pub gender: Gender,
    pub age_category: AgeCategory,
    pub employment_status: EmploymentStatus,
    pub number_of_jobs: JobCount,
    pub adult_student_status: StudentStatus,
    pub educational_attainment: Education,
    pub drivers_license: Response,
    pub military_status: MilitaryStatus,
    pub ethnicity: Ethnicity,
    pub disability: Disability,
    #[validate(range(min = 0.0))]
    pub height: Option<f64>,
    #[validate(range(min = 0.0))]
    pub weight: Option<f64>,
    pub physical_activity: PhysicalActivity,
    pub transit_frequency: TransitFrequency,
    pub transit_pass: TransitPass,
}

/// Multi-select ethnicity answers, one flag per option
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ethnicity {
    pub americanindian_alaskanative: Response,
    pub asian: Response,
    pub black: Response,
    pub hispanic: Response,
    pub hawaiian_pacific: Response,
    pub white: Response,
    pub other: Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schooling {
    pub school_type: SchoolType,
    pub school_frequency: SchoolFrequency,
    pub other_school: OtherSchoolFrequency,
    pub school_mode: CommuteMode,
    pub daycare_open: DaycareOpen,
    pub daycare_close: DaycareClose,
}

impl Schooling {
    /// A person with no schooling questions asked
    pub fn not_applicable() -> Self {
        Self {
            school_type: SchoolType::NotApplicable,
            school_frequency: SchoolFrequency::NotApplicable,
            other_school: OtherSchoolFrequency::NotApplicable,
            school_mode: CommuteMode::NotApplicable,
            daycare_open: DaycareOpen::NotApplicable,
            daycare_close: DaycareClose::NotApplicable,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Employment {
    pub work_location_type: WorkLocationType,
    pub occupation: Occupation,
    pub industry: Industry,
    pub hours_worked: HoursWorked,
    pub commute_frequency: CommuteFrequency,
    pub commute_mode: CommuteMode,
    pub work_arrival_frequency: WorkArrivalFlexibility,
    pub work_parking_payment: WorkParkingPayment,
    pub work_parking_cost: Option<Cost>,
    pub work_parking_cost_dk: Response,
    pub work_parking_ease: WorkParkingEase,
    pub telecommute_frequency: CommuteFrequency,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct CommuteSubsidy {
    pub none: Response,
    pub parking: Response,
    pub transit: Response,
    pub vanpool: Response,
    pub cash: Response,
    pub other: Response,
    #[validate(length(max = 150))]
    pub specify: String,
}

/// The five geocoded places of a person
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct PersonPlaces {
    #[validate(nested)]
    pub second_home: Place,
    #[validate(nested)]
    pub school: Place,
    #[validate(nested)]
    pub second_school: Place,
    #[validate(nested)]
    pub work: Place,
    #[validate(nested)]
    pub second_work: Place,
}

impl PersonPlaces {
    /// Every place marked not applicable
    pub fn not_applicable() -> Self {
        Self {
            second_home: Place::not_applicable(),
            school: Place::not_applicable(),
            second_school: Place::not_applicable(),
            work: Place::not_applicable(),
            second_work: Place::not_applicable(),
        }
    }

    /// Places paired with their column prefix
    pub fn named(&self) -> [(&'static str, &Place); 5] {
        [
            ("second_home", &self.second_home),
            ("school", &self.school),
            ("second_school", &self.second_school),
            ("work", &self.work),
            ("second_work", &self.second_work),
        ]
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Smartphone {
    pub smartphone_type: SmartphoneType,
    /// Asked of persons 18 and over
    pub smartphone_age: Response,
    /// Asked of persons 16 and 17
    pub smartphone_child: Response,
}

/// Diary channel and per-day completion
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct DiaryParticipation {
    pub diary_callcenter: Response,
    pub diary_mobile: Response,
    pub rmove_activated: Option<NaiveDateTime>,
    #[validate(range(min = 0.0, max = 7.0))]
    pub completed_days: Option<f64>,
    /// Completion flag for travel days 1 through 7
    pub completed_day: [Response; MAX_TRAVEL_DAYS],
}

impl DiaryParticipation {
    /// Completion flag for a 1-based travel day number
    pub fn completed(&self, day_number: usize) -> Option<Response> {
        day_number
            .checked_sub(1)
            .and_then(|index| self.completed_day.get(index))
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_kernel::Categorical;

    fn diary() -> DiaryParticipation {
        DiaryParticipation {
            diary_callcenter: Response::No,
            diary_mobile: Response::Yes,
            rmove_activated: None,
            completed_days: Some(1.0),
            completed_day: [
                Response::Yes,
                Response::No,
                Response::NotApplicable,
                Response::NotApplicable,
                Response::NotApplicable,
                Response::NotApplicable,
                Response::NotApplicable,
            ],
        }
    }

    #[test]
    fn test_completed_day_is_one_based() {
        let diary = diary();
        assert_eq!(diary.completed(1), Some(Response::Yes));
        assert_eq!(diary.completed(2), Some(Response::No));
        assert_eq!(diary.completed(0), None);
        assert_eq!(diary.completed(8), None);
    }

    #[test]
    fn test_completed_days_range() {
        let mut diary = diary();
        diary.completed_days = Some(9.0);
        assert!(diary.validate().is_err());
    }

    #[test]
    fn test_misspelled_category_is_rejected() {
        assert!(serde_json::from_str::<Gender>("\"Femael\"").is_err());
        assert!(serde_json::from_str::<Response>("\"Yess\"").is_err());
        assert_eq!(serde_json::from_str::<Gender>("\"Female\"").unwrap(), Gender::Female);
    }

    #[test]
    fn test_unschooled_person_has_only_sentinels() {
        let school = Schooling::not_applicable();
        assert!(school.school_type.is_sentinel());
        assert!(school.school_mode.is_sentinel());
        assert!(school.daycare_close.is_sentinel());
    }

    #[test]
    fn test_named_places_follow_column_prefixes() {
        let places = PersonPlaces::not_applicable();
        let prefixes: Vec<_> = places.named().iter().map(|(name, _)| *name).collect();
        assert_eq!(prefixes, vec!["second_home", "school", "second_school", "work", "second_work"]);
    }
}
