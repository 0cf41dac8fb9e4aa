//! The `hhtbs2016` tables
//!
//! Column names and widths follow the 2016 survey deliverable. Tables are
//! listed in dependency order: a table only references tables before it.

use core_kernel::{Categorical, Response};
use domain_household::{
    AgeCategory, BicycleCount, BorderDuration, BorderMode, BorderPartySize, BorderPurpose,
    CommuteFrequency, CommuteMode, CrossBorderFrequency, DaycareClose, DaycareOpen, Disability,
    Education, EmploymentStatus, FuelType, Gender, HouseholdSize, HoursWorked, HowObtained,
    IncomeBroad, IncomeDetailed, Industry, JobCount, Language, MemberCount, MilitaryStatus,
    NavigationTool, Occupation, OtherSchoolFrequency, PhysicalActivity, PortOfEntry,
    RecruitChannel, RecruitDevice, Relationship, ResidenceDuration, ResidenceParkingPass,
    ResidenceType, SampleGroup, SampleSegment, SchoolFrequency, SchoolType, SmartphoneType,
    StudentStatus, TenureStatus, ToolFrequency, TransitFrequency, TransitPass, VehicleCount,
    WorkArrivalFlexibility, WorkLocationType, WorkParkingEase, WorkParkingPayment,
};
use domain_travel::{
    AirfarePayType, DataSource, DayAnchor, DayOfWeek, DriverStatus, GoogleMode,
    NonHouseholdTravelers, NoTravelReason, ParkAndRideCity, ParkAndRideLot, ParkingLocation,
    ParkingPayType, ProxyStatus, SurveyStatus, TaxiPayType, TransitAccessMode, TransitPayType,
    TravelMode, TravelerCount, TripError, TripPurpose, MODE_SLOTS,
};
use domain_household::MAX_TRAVEL_DAYS;
use once_cell::sync::Lazy;

use super::{SqlType, TableBuilder, TableDef};

fn response() -> SqlType {
    SqlType::category::<Response>()
}

pub static HOUSEHOLDS: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("households")
        .col("household_id", SqlType::Int)
        .col("sample_segment", SqlType::category::<SampleSegment>())
        .col("sample_group", SqlType::category::<SampleGroup>())
        .opt("travel_date_start", SqlType::Date)
        .nested("recruitment", "", |t| {
            t.col("survey_where", SqlType::category::<RecruitChannel>())
                .col("survey_mobile", SqlType::category::<RecruitDevice>())
                .col("survey_start", SqlType::Timestamp)
                .col("survey_end", SqlType::Timestamp)
                .col("number_rmove_participants", SqlType::text(25))
                .col("participate_future_studies", response())
                .col("household_completed", response())
                .col("completed_days", SqlType::Int)
                .col("language", SqlType::category::<Language>())
                .col("language_other", SqlType::text(50))
        })
        .nested("composition", "", |t| {
            t.col("persons", SqlType::category::<HouseholdSize>())
                .col("adults", SqlType::category::<HouseholdSize>())
                .col("children", SqlType::category::<MemberCount>())
                .col("workers", SqlType::category::<MemberCount>())
                .col("vehicles", SqlType::category::<VehicleCount>())
                .col("bicycles", SqlType::category::<BicycleCount>())
                .col("has_share_car", response())
                .col("has_share_bicycle", response())
                .col("has_share_vanpool", response())
        })
        .place("home", "home_")
        .nested("residence", "", |t| {
            t.col_as("residence_duration", "duration", SqlType::category::<ResidenceDuration>())
                .col("tenure_status", SqlType::category::<TenureStatus>())
                .col("residence_type", SqlType::category::<ResidenceType>())
                .col("income_category_detailed", SqlType::category::<IncomeDetailed>())
                .col("income_category_broad", SqlType::category::<IncomeBroad>())
        })
        .nested("navigation", "", |t| {
            t.nested("tools", "", |t| {
                NavigationTool::ALL.iter().fold(t, |t, tool| {
                    let stem = tool.label();
                    t.nested(stem, "", |t| {
                        t.col_as(&format!("use_{}", stem), "use", response()).col_as(
                            &format!("freq_{}", stem),
                            "freq",
                            SqlType::category::<ToolFrequency>(),
                        )
                    })
                })
            })
            .col("specify_other_tool", SqlType::text(150))
            .col("use_no_navigation_tools", response())
        })
        .col("freq_cross_border", SqlType::category::<CrossBorderFrequency>())
        .nested("weights", "weight_", |t| {
            t.opt("initial", SqlType::Float)
                .opt("four_x", SqlType::Float)
                .opt("four_five_six_x", SqlType::Float)
        })
        .primary_key(&["household_id"])
        .build()
});

pub static PERSONS: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("persons")
        .col("person_id", SqlType::BigInt)
        .col("household_id", SqlType::Int)
        .col("person_number", SqlType::Int)
        .col("travel_date_start", SqlType::Date)
        .col("rmove_participant", response())
        .nested("demographics", "", |t| {
            t.col("relationship", SqlType::category::<Relationship>())
                .col("gender", SqlType::category::<Gender>())
                .col("age_category", SqlType::category::<AgeCategory>())
                .col("employment_status", SqlType::category::<EmploymentStatus>())
                .col("number_of_jobs", SqlType::category::<JobCount>())
                .col("adult_student_status", SqlType::category::<StudentStatus>())
                .col("educational_attainment", SqlType::category::<Education>())
                .col("drivers_license", response())
                .col("military_status", SqlType::category::<MilitaryStatus>())
                .nested("ethnicity", "ethnicity_", |t| {
                    [
                        "americanindian_alaskanative",
                        "asian",
                        "black",
                        "hispanic",
                        "hawaiian_pacific",
                        "white",
                        "other",
                    ]
                    .into_iter()
                    .fold(t, |t, group| t.col(group, response()))
                })
                .col("disability", SqlType::category::<Disability>())
                .opt("height", SqlType::Float)
                .opt("weight", SqlType::Float)
                .col("physical_activity", SqlType::category::<PhysicalActivity>())
                .col("transit_frequency", SqlType::category::<TransitFrequency>())
                .col("transit_pass", SqlType::category::<TransitPass>())
        })
        .nested("school", "", |t| {
            t.col("school_type", SqlType::category::<SchoolType>())
                .col("school_frequency", SqlType::category::<SchoolFrequency>())
                .col("other_school", SqlType::category::<OtherSchoolFrequency>())
                .col("school_mode", SqlType::category::<CommuteMode>())
                .col("daycare_open", SqlType::category::<DaycareOpen>())
                .col("daycare_close", SqlType::category::<DaycareClose>())
        })
        .nested("work", "", |t| {
            t.col("work_location_type", SqlType::category::<WorkLocationType>())
                .col("occupation", SqlType::category::<Occupation>())
                .col("industry", SqlType::category::<Industry>())
                .col("hours_worked", SqlType::category::<HoursWorked>())
                .col("commute_frequency", SqlType::category::<CommuteFrequency>())
                .col("commute_mode", SqlType::category::<CommuteMode>())
                .col("work_arrival_frequency", SqlType::category::<WorkArrivalFlexibility>())
                .col("work_parking_payment", SqlType::category::<WorkParkingPayment>())
                .opt("work_parking_cost", SqlType::Money)
                .col("work_parking_cost_dk", response())
                .col("work_parking_ease", SqlType::category::<WorkParkingEase>())
                .col("telecommute_frequency", SqlType::category::<CommuteFrequency>())
        })
        .nested("commute_subsidy", "commute_subsidy_", |t| {
            ["none", "parking", "transit", "vanpool", "cash", "other"]
                .into_iter()
                .fold(t, |t, subsidy| t.col(subsidy, response()))
                .col("specify", SqlType::text(150))
        })
        .col("has_second_home", response())
        .nested("places", "", |t| {
            ["second_home", "school", "second_school", "work", "second_work"]
                .into_iter()
                .fold(t, |t, place| t.place(place, &format!("{}_", place)))
        })
        .nested("smartphone", "", |t| {
            t.col("smartphone_type", SqlType::category::<SmartphoneType>())
                .col("smartphone_age", response())
                .col("smartphone_child", response())
        })
        .nested("diary", "", |t| {
            t.col("diary_callcenter", response())
                .col("diary_mobile", response())
                .opt("rmove_activated", SqlType::Timestamp)
                .opt("completed_days", SqlType::Float)
                .array("completed_day", "completed_day", MAX_TRAVEL_DAYS, response())
        })
        .primary_key(&["person_id"])
        .foreign_key(&["household_id"], "households", &["household_id"])
        .check("\"person_number\" >= 1")
        .index(&["household_id"])
        .build()
});

pub static DAY: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("day")
        .identity("day_id")
        .col("person_id", SqlType::BigInt)
        .col("household_id", SqlType::Int)
        .col("travel_date", SqlType::Date)
        .col("travel_day_number", SqlType::SmallInt)
        .col("travel_day_of_week", SqlType::category::<DayOfWeek>())
        .col("data_source", SqlType::category::<DataSource>())
        .nested("completion", "", |t| {
            t.col("completed_household_survey", response())
                .col("completed_person_survey", response())
                .opt("completed_date", SqlType::Timestamp)
                .opt("revised_at", SqlType::Timestamp)
                .col("revised_count", SqlType::text(15))
                .opt("diary_start_time", SqlType::Timestamp)
                .opt("diary_end_time", SqlType::Timestamp)
                .opt("diary_duration", SqlType::Int)
                .col("survey_status", SqlType::category::<SurveyStatus>())
                .col("proxy", SqlType::category::<ProxyStatus>())
        })
        .col("made_trips", response())
        .col("no_trips_reason_1", SqlType::category::<NoTravelReason>())
        .col("no_trips_reason_2", SqlType::category::<NoTravelReason>())
        .col("no_trips_reason_specify_other", SqlType::text(150))
        .opt("number_trips", SqlType::Int)
        .opt("number_surveys", SqlType::Int)
        .col("start_location", SqlType::category::<DayAnchor>())
        .col("start_location_other", SqlType::text(150))
        .col("end_location", SqlType::category::<DayAnchor>())
        .col("end_location_other", SqlType::text(150))
        .opt("time_telework", SqlType::Float)
        .opt("time_shop", SqlType::Float)
        .col("toll_road", response())
        .col("toll_road_express", response())
        .col("deliver_package", response())
        .col("deliver_food", response())
        .col("deliver_work", response())
        .nested("weights", "weight_", |t| {
            t.opt("household_multiday_factor", SqlType::Float)
                .opt("person_multiday_456x", SqlType::Float)
        })
        .primary_key(&["day_id"])
        .unique(&["person_id", "travel_date"])
        .foreign_key(&["person_id"], "persons", &["person_id"])
        .check("\"travel_day_number\" BETWEEN 1 AND 7")
        .build()
});

fn trip_end(t: TableBuilder) -> TableBuilder {
    t.col("name", SqlType::text(150))
        .place("place", "")
        .col("purpose", SqlType::category::<TripPurpose>())
        .col("purpose_other_specify", SqlType::text(150))
        .col("purpose_inferred", SqlType::category::<TripPurpose>())
}

fn fare<P: Categorical>(t: TableBuilder) -> TableBuilder {
    t.col("pay_type", SqlType::category::<P>())
        .opt("cost", SqlType::Money)
        .col("cost_dk", response())
}

pub static TRIPS: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("trips")
        .col("trip_id", SqlType::BigInt)
        .col("trip_id_linked", SqlType::BigInt)
        .opt("trip_id_location", SqlType::BigInt)
        .col("person_id", SqlType::BigInt)
        .col("household_id", SqlType::Int)
        .col("travel_date", SqlType::Date)
        .opt("travel_day_number", SqlType::SmallInt)
        .col("travel_day_of_week", SqlType::category::<DayOfWeek>())
        .col("data_source", SqlType::category::<DataSource>())
        .nested("survey", "", |t| {
            t.col("completed_trip_survey", response())
                .opt("completed_date", SqlType::Timestamp)
                .col("completed_household_survey", response())
                .col("completed_person_survey", response())
                .opt("number_household_survey_weekdays", SqlType::Float)
                .opt("revised_at", SqlType::Timestamp)
                .col("revised_count", SqlType::text(15))
                .col_as("trip_error", "error", SqlType::category::<TripError>())
        })
        .nested("edits", "", |t| {
            [
                "flag_teleport",
                "copied_trip",
                "analyst_merged_trip",
                "analyst_split_trip",
                "user_merged_trip",
                "user_split_trip",
                "added_trip",
                "nonproxy_derived_trip",
                "proxy_added_trip",
                "unlinked_transit_trip",
            ]
            .into_iter()
            .fold(t, |t, flag| t.col(flag, response()))
        })
        .nested("origin", "origin_", trip_end)
        .nested("destination", "destination_", trip_end)
        .col("departure_time", SqlType::Timestamp)
        .col("arrival_time", SqlType::Timestamp)
        .nested("travelers", "travelers_", |t| {
            t.col("total", SqlType::category::<TravelerCount>())
                .col("household", SqlType::category::<TravelerCount>())
                .col("non_household", SqlType::category::<NonHouseholdTravelers>())
        })
        .nested("modes", "", |t| {
            t.array("slots", "mode", MODE_SLOTS, SqlType::category::<TravelMode>())
                .col("transit_access", SqlType::category::<TransitAccessMode>())
                .col("transit_egress", SqlType::category::<TransitAccessMode>())
                .col("google_mode", SqlType::category::<GoogleMode>())
                .col("driver", SqlType::category::<DriverStatus>())
                .col("toll_road", response())
                .col("toll_road_express", response())
        })
        .nested("parking", "parking_", |t| {
            t.col("location", SqlType::category::<ParkingLocation>())
                .col("pay_type", SqlType::category::<ParkingPayType>())
                .opt("cost", SqlType::Money)
                .col("cost_dk", response())
                .opt("egress_duration", SqlType::Float)
        })
        .nested("fares", "", |t| {
            t.nested("taxi", "taxi_", fare::<TaxiPayType>)
                .nested("airplane", "airplane_", fare::<AirfarePayType>)
                .nested("bus", "bus_", fare::<TransitPayType>)
                .nested("rail", "rail_", fare::<TransitPayType>)
                .nested("ferry", "ferry_", fare::<TransitPayType>)
        })
        .nested("park_and_ride", "park_and_ride_", |t| {
            t.col("lot", SqlType::category::<ParkAndRideLot>())
                .col("city", SqlType::category::<ParkAndRideCity>())
        })
        .nested("metrics", "", |t| {
            ["distance", "duration", "duration_reported", "speed"]
                .into_iter()
                .fold(t, |t, metric| t.opt(metric, SqlType::Float))
        })
        .nested("weights", "weight_", |t| {
            ["trip", "person_trip", "household_multiday_factor", "person_multiday_456x"]
                .into_iter()
                .fold(t, |t, weight| t.opt(weight, SqlType::Float))
        })
        .primary_key(&["trip_id"])
        .foreign_key(&["person_id"], "persons", &["person_id"])
        .check("\"travel_day_number\" BETWEEN 1 AND 7")
        .index(&["trip_id_linked"])
        .index(&["person_id"])
        .build()
});

pub static LOCATION_LINES: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("location_lines")
        .col("trip_id_location", SqlType::BigInt)
        .col("shape", SqlType::Geometry)
        .primary_key(&["trip_id_location"])
        .build()
});

pub static LOCATION_POINTS: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("location_points")
        .identity("point_id")
        .key("trip_id_location", SqlType::BigInt)
        .col("collected_at", SqlType::Timestamp)
        .opt("accuracy", SqlType::Float)
        .opt("heading", SqlType::Float)
        .opt("speed", SqlType::Float)
        .col("latitude", SqlType::Float)
        .col("longitude", SqlType::Float)
        .col("shape", SqlType::Point)
        .primary_key(&["point_id"])
        .foreign_key(&["trip_id_location"], "location_lines", &["trip_id_location"])
        .index(&["trip_id_location", "collected_at"])
        .build()
});

/// No foreign key to households: the sentinel row belongs to household 0
pub static VEHICLES: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("vehicles")
        .identity("vehicle_id")
        .col("household_id", SqlType::Int)
        .col("vehicle_number", SqlType::SmallInt)
        .col("year", SqlType::text(15))
        .col("make", SqlType::text(50))
        .col("model", SqlType::text(50))
        .col("fuel_type", SqlType::category::<FuelType>())
        .col("how_obtained", SqlType::category::<HowObtained>())
        .col("toll_transponder", response())
        .col("residence_parking_pass", SqlType::category::<ResidenceParkingPass>())
        .col("residence_parking_cost_unknown", response())
        .opt("residence_parking_monthly_cost", SqlType::Money)
        .primary_key(&["vehicle_id"])
        .unique(&["household_id", "vehicle_number"])
        .check("\"vehicle_number\" >= 0")
        .build()
});

fn intercept_end(t: TableBuilder) -> TableBuilder {
    t.col("purpose", SqlType::text(60)).place("place", "")
}

pub static INTERCEPT: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("intercept")
        .col("household_id", SqlType::Int)
        .col("survey_status", SqlType::text(50))
        .opt("survey_start", SqlType::Timestamp)
        .opt("survey_end", SqlType::Timestamp)
        .opt("survey_date", SqlType::Date)
        .col("pilot_study", response())
        .nested("origin", "origin_", intercept_end)
        .nested("destination", "destination_", intercept_end)
        .opt("distance_beeline", SqlType::Float)
        .col("distance_beeline_bin", SqlType::text(25))
        .nested("respondent", "", |t| {
            t.col("employment_status", SqlType::text(50))
                .col("student_status", SqlType::text(50))
                .col("visit_work", SqlType::text(25))
                .col("visit_school", SqlType::text(25))
                .col("number_household_vehicles", SqlType::text(10))
                .col("number_children_0_15", SqlType::text(10))
                .col("number_children_16_17", SqlType::text(10))
                .col("number_adults", SqlType::text(10))
                .col("age", SqlType::text(20))
                .col("smartphone", SqlType::text(25))
                .col("resident", SqlType::text(25))
                .col("bike_party", SqlType::text(15))
                .col("bike_share", SqlType::text(25))
                .col("gender", SqlType::text(10))
        })
        .col("intercept_site", SqlType::text(100))
        .col("intercept_direction", SqlType::text(25))
        .col("language", SqlType::text(15))
        .nested("follow_up", "", |t| {
            [
                "rmove_qualify",
                "opt_out",
                "rmove_participate",
                "rmove_complete",
                "recruit_complete",
            ]
            .into_iter()
            .fold(t, |t, flag| t.col(flag, response()))
        })
        .col("survey_time_peak", response())
        .col("expansion_site", SqlType::text(100))
        .opt("expansion_factor", SqlType::Float)
        .primary_key(&["household_id"])
        .build()
});

pub static BORDER_TRIPS: Lazy<TableDef> = Lazy::new(|| {
    TableDef::builder("border_trips")
        .identity("border_trip_id")
        .col("household_id", SqlType::Int)
        .col("trip_id", SqlType::SmallInt)
        .col("mode", SqlType::category::<BorderMode>())
        .col("port_of_entry", SqlType::category::<PortOfEntry>())
        .col("purpose", SqlType::category::<BorderPurpose>())
        .col("duration", SqlType::category::<BorderDuration>())
        .col("party_size", SqlType::category::<BorderPartySize>())
        .primary_key(&["border_trip_id"])
        .unique(&["household_id", "trip_id"])
        .foreign_key(&["household_id"], "households", &["household_id"])
        .check("\"trip_id\" BETWEEN 1 AND 4")
        .build()
});

/// Every table, parents before children
pub fn all_tables() -> [&'static TableDef; 9] {
    [
        &*HOUSEHOLDS,
        &*PERSONS,
        &*DAY,
        &*TRIPS,
        &*LOCATION_LINES,
        &*LOCATION_POINTS,
        &*VEHICLES,
        &*INTERCEPT,
        &*BORDER_TRIPS,
    ]
}

/// Looks a table up by name
pub fn table(name: &str) -> Option<&'static TableDef> {
    all_tables().into_iter().find(|t| t.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ingest::TABLES;
    use std::collections::HashSet;

    #[test]
    fn test_tables_follow_dependency_order() {
        let names: Vec<_> = all_tables().iter().map(|t| t.name).collect();
        assert_eq!(names, TABLES);

        for (position, table) in all_tables().iter().enumerate() {
            for fk in &table.foreign_keys {
                let parent = names.iter().position(|n| *n == fk.parent).unwrap();
                assert!(parent < position, "{} references later table {}", table.name, fk.parent);
            }
        }
    }

    #[test]
    fn test_column_names_are_unique_and_short() {
        for table in all_tables() {
            let mut seen = HashSet::new();
            for column in &table.columns {
                assert!(seen.insert(column.name.as_str()), "{}.{} repeated", table.name, column.name);
                assert!(column.name.len() <= 63, "{}.{} too long", table.name, column.name);
            }
            for key in &table.primary_key {
                assert!(table.column(key).is_some(), "{} key {} missing", table.name, key);
            }
        }
    }

    #[test]
    fn test_navigation_pairs() {
        let uses = HOUSEHOLDS.columns.iter().filter(|c| c.name.starts_with("use_")).count();
        let freqs = HOUSEHOLDS.columns.iter().filter(|c| c.name.starts_with("freq_")).count();
        // use_no_navigation_tools and freq_cross_border are not tool columns
        assert_eq!(uses, NavigationTool::ALL.len() + 1);
        assert_eq!(freqs, NavigationTool::ALL.len() + 1);
        assert_eq!(
            HOUSEHOLDS.column("use_511sd").and_then(|c| c.path_text()).as_deref(),
            Some("navigation.tools.511sd.use")
        );
    }

    #[test]
    fn test_person_places_are_geocoded_units() {
        assert_eq!(PERSONS.optional_groups.len(), 5);
        let work_lat = PERSONS.column("work_lat").unwrap();
        assert_eq!(work_lat.path_text().as_deref(), Some("places.work.geocode.latitude"));
        assert!(work_lat.nullable);
        assert!(!PERSONS.column("work_address").unwrap().nullable);
    }

    #[test]
    fn test_trip_columns() {
        assert_eq!(
            TRIPS.column("mode_4").and_then(|c| c.path_text()).as_deref(),
            Some("modes.slots.3")
        );
        assert_eq!(
            TRIPS.column("ferry_cost").and_then(|c| c.path_text()).as_deref(),
            Some("fares.ferry.cost")
        );
        assert_eq!(
            TRIPS.column("destination_mgra_13").and_then(|c| c.path_text()).as_deref(),
            Some("destination.place.geocode.mgra_13")
        );
    }

    #[test]
    fn test_closed_code_books_are_checked() {
        let persons = PERSONS.create_sql();
        assert!(persons.contains("CHECK (\"gender\" IN ('Male', 'Female', 'Missing', 'Not Applicable'))"));
        assert!(persons.contains("CHECK (\"drivers_license\" IN ('Yes', 'No'"));
        assert!(HOUSEHOLDS.create_sql().contains("CHECK (\"vehicles\" IN ('0', '1'"));
        assert!(TRIPS.create_sql().contains("CHECK (\"park_and_ride_city\" IN ('Bonsall'"));

        let free_text = PERSONS.column("commute_subsidy_specify").unwrap();
        assert!(matches!(free_text.sql_type, SqlType::Text(150)));
    }

    #[test]
    fn test_surrogate_keys_have_no_path() {
        for (table, key) in [(&*DAY, "day_id"), (&*VEHICLES, "vehicle_id"), (&*BORDER_TRIPS, "border_trip_id")] {
            let column = table.column(key).unwrap();
            assert!(column.identity);
            assert!(column.path.is_none());
        }
        assert!(LOCATION_POINTS.column("trip_id_location").unwrap().path.is_none());
    }

    #[test]
    fn test_vehicles_have_no_household_fk() {
        assert!(VEHICLES.foreign_keys.is_empty());
        assert!(VEHICLES.create_sql().contains("UNIQUE (\"household_id\", \"vehicle_number\")"));
    }

    #[test]
    fn test_lookup_by_name() {
        assert_eq!(table("day").map(|t| t.name), Some("day"));
        assert!(table("policies").is_none());
    }
}
