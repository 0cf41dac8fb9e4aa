//! Comprehensive tests for domain_household

use core_kernel::{HouseholdId, Response};
use validator::Validate;

use domain_household::{
    BorderDuration, BorderMode, BorderPartySize, BorderPurpose, BorderTrip, DiaryFollowUp, Gender,
    Household, HouseholdError, Language, NavigationTool, NavigationUsage, Person, PortOfEntry,
    ToolFrequency, ToolUsage, Vehicle, VehicleCount, VehicleRef, MAX_BORDER_TRIPS,
};
use test_utils::{
    IdFixtures, PlaceFixtures, RecordFixtures, TestHouseholdBuilder, TestInterceptBuilder,
    TestPersonBuilder, TestVehicleBuilder,
};

// ============================================================================
// Household Tests
// ============================================================================

mod household_tests {
    use super::*;

    #[test]
    fn test_reference_household_validates() {
        let household = TestHouseholdBuilder::new().build();
        assert!(household.validate().is_ok());
        assert_eq!(household.id(), HouseholdId::new(500));
    }

    #[test]
    fn test_overlong_language_other_fails_width() {
        let household = TestHouseholdBuilder::new()
            .with_language_other("Vietnamese at home, English and Tagalog with family elsewhere")
            .build();
        assert_eq!(household.recruitment.language, Language::Other);
        let errors = household.validate().unwrap_err();
        assert!(errors.to_string().contains("language_other"));
    }

    #[test]
    fn test_vehicle_count_parses_plain_counts() {
        let household = TestHouseholdBuilder::new().with_vehicle_count(VehicleCount::Three).build();
        assert_eq!(household.composition.vehicle_count(), Some(3));
    }

    #[test]
    fn test_vehicle_count_ignores_open_ended_bucket() {
        let household = TestHouseholdBuilder::new()
            .with_vehicle_count(VehicleCount::SevenOrMore)
            .build();
        assert_eq!(household.composition.vehicle_count(), None);
    }

    #[test]
    fn test_unknown_recruit_channel_is_rejected() {
        let mut json = serde_json::to_value(TestHouseholdBuilder::new().build()).unwrap();
        json["recruitment"]["survey_where"] = "Home".into();
        let error = serde_json::from_value::<Household>(json).unwrap_err();
        assert!(error.to_string().contains("Home"));
    }

    #[test]
    fn test_home_serializes_with_geocode() {
        let household = TestHouseholdBuilder::new().build();
        let json = serde_json::to_value(&household).unwrap();
        assert_eq!(json["home"]["geocode"]["mgra_13"], 1234);
        assert_eq!(json["sample_group"], "Group 1: rMove only");
    }

    #[test]
    fn test_household_json_round_trip() {
        let household = TestHouseholdBuilder::new()
            .with_home(PlaceFixtures::grocery())
            .build();
        let json = serde_json::to_string(&household).unwrap();
        let back: domain_household::Household = serde_json::from_str(&json).unwrap();
        assert_eq!(back, household);
    }

    #[test]
    fn test_unknown_category_label_is_rejected() {
        let household = TestHouseholdBuilder::new().build();
        let mut json = serde_json::to_value(&household).unwrap();
        json["residence"]["tenure_status"] = "Squatting".into();
        let result: Result<domain_household::Household, _> = serde_json::from_value(json);
        let message = result.unwrap_err().to_string();
        assert!(message.contains("Squatting"));
    }
}

// ============================================================================
// Navigation Tool Tests
// ============================================================================

mod navigation_tests {
    use super::*;

    #[test]
    fn test_uniform_usage_covers_every_tool() {
        let navigation = NavigationUsage::uniform(ToolUsage::unused());
        assert!(navigation.missing_tools().is_empty());
        assert_eq!(navigation.tools.len(), NavigationTool::ALL.len());
    }

    #[test]
    fn test_missing_tool_is_reported() {
        let mut navigation = NavigationUsage::uniform(ToolUsage::unused());
        navigation.tools.remove(&NavigationTool::ALL[0]);
        assert_eq!(navigation.missing_tools(), vec![NavigationTool::ALL[0]]);
    }

    #[test]
    fn test_frequency_without_use_is_inconsistent() {
        let mut navigation = NavigationUsage::uniform(ToolUsage::unused());
        let tool = NavigationTool::ALL[1];
        navigation.tools.insert(
            tool,
            ToolUsage {
                used: Response::No,
                frequency: ToolFrequency::ALL[0],
            },
        );
        assert_eq!(navigation.inconsistent_tools(), vec![tool]);
    }

    #[test]
    fn test_used_tool_with_frequency_is_consistent() {
        assert!(ToolUsage::used(ToolFrequency::ALL[0]).is_consistent());
        assert!(ToolUsage::unused().is_consistent());
    }
}

// ============================================================================
// Person Tests
// ============================================================================

mod person_tests {
    use super::*;

    #[test]
    fn test_reference_person_validates() {
        let person = TestPersonBuilder::new().build();
        assert!(person.validate().is_ok());
        assert_eq!(person.household_id, IdFixtures::household());
    }

    #[test]
    fn test_person_number_starts_at_one() {
        let person = TestPersonBuilder::new().with_person_number(0).build();
        assert!(person.validate().is_err());
    }

    #[test]
    fn test_named_places_follow_column_prefixes() {
        let person = TestPersonBuilder::new().build();
        let names: Vec<&str> = person.places.named().iter().map(|(name, _)| *name).collect();
        assert_eq!(
            names,
            vec!["second_home", "school", "second_school", "work", "second_work"]
        );
        let (_, work) = person.places.named()[3];
        assert!(work.is_geocoded());
    }

    #[test]
    fn test_gender_outside_code_book_is_rejected() {
        let person = TestPersonBuilder::new().with_gender(Gender::Male).build();
        let mut json = serde_json::to_value(&person).unwrap();
        assert_eq!(json["demographics"]["gender"], "Male");

        json["demographics"]["gender"] = "Prefer to self-describe".into();
        assert!(serde_json::from_value::<Person>(json.clone()).is_err());

        json["demographics"]["gender"] = "Male".into();
        json["demographics"]["drivers_license"] = "Yess".into();
        assert!(serde_json::from_value::<Person>(json).is_err());
    }
}

// ============================================================================
// Vehicle Tests
// ============================================================================

mod vehicle_tests {
    use super::*;

    #[test]
    fn test_sentinel_vehicle_is_not_a_reference() {
        let sentinel = Vehicle::not_applicable();
        assert!(sentinel.is_sentinel());
        assert_eq!(sentinel.reference().unwrap(), None);
        assert_eq!(sentinel.make, "Not Applicable");
    }

    #[test]
    fn test_roster_vehicle_has_reference() {
        let vehicle = TestVehicleBuilder::new().build();
        let reference = vehicle.reference().unwrap().unwrap();
        assert_eq!(reference.key(), (10, 1));
        assert_eq!(reference.to_string(), "household_id=10, vehicle_number=1");
    }

    #[test]
    fn test_reserved_key_is_refused() {
        assert!(matches!(
            VehicleRef::new(HouseholdId::new(0), 0),
            Err(HouseholdError::ReservedVehicleKey)
        ));
    }

    #[test]
    fn test_vehicle_number_must_be_positive() {
        assert!(matches!(
            VehicleRef::new(HouseholdId::new(10), -1),
            Err(HouseholdError::InvalidVehicleNumber(-1))
        ));
    }

    #[test]
    fn test_residence_parking_cost_flags_unknown() {
        let vehicle = TestVehicleBuilder::new().with_residence_parking(None).build();
        assert_eq!(vehicle.residence_parking_cost_unknown, Response::Yes);
    }
}

// ============================================================================
// Intercept and Border Trip Tests
// ============================================================================

mod intercept_tests {
    use super::*;

    #[test]
    fn test_reference_intercept_is_consistent() {
        let intercept = TestInterceptBuilder::new().build();
        assert!(intercept.validate().is_ok());
        assert!(intercept.follow_up.is_consistent());
    }

    #[test]
    fn test_completion_without_participation_is_inconsistent() {
        let follow_up = DiaryFollowUp {
            rmove_qualify: Response::Yes,
            opt_out: Response::No,
            rmove_participate: Response::No,
            rmove_complete: Response::Yes,
            recruit_complete: Response::No,
        };
        assert!(!follow_up.is_consistent());
    }

    #[test]
    fn test_border_trip_slots() {
        for slot in 1..=MAX_BORDER_TRIPS {
            let trip = RecordFixtures::border_trip(IdFixtures::household(), slot);
            assert_eq!(trip.key(), (500, slot));
        }
    }

    #[test]
    fn test_border_trip_slot_out_of_range() {
        let result = BorderTrip::new(
            IdFixtures::household(),
            MAX_BORDER_TRIPS + 1,
            BorderMode::OwnVehicle,
            PortOfEntry::SanYsidro,
            BorderPurpose::Social,
            BorderDuration::UnderOneDay,
            BorderPartySize::Two,
        );
        assert!(matches!(result, Err(HouseholdError::InvalidBorderTripNumber(5))));
    }
}
