//! Row mapping tests
//!
//! Every survey record is encoded into its table's columns and assembled
//! back without a database, so the column paths of each table are checked
//! against the real record shapes.

use core_kernel::{Categorical, HouseholdId, Response};
use domain_household::{Household, Intercept, NavigationTool, Person, Vehicle, VehicleRef};
use domain_ingest::{SurveyBatch, TABLES};
use domain_travel::{Day, LocationPoint, LocationTrace, Trip, TravelMode, TripFares, TripPurpose};
use infra_db::schema::{
    BORDER_TRIPS, DAY, HOUSEHOLDS, INTERCEPT, LOCATION_LINES, LOCATION_POINTS, PERSONS, TRIPS,
    VEHICLES,
};
use infra_db::{all_tables, assemble, encode, SqlValue, TableDef};
use serde::de::DeserializeOwned;
use serde::Serialize;
use test_utils::{
    CostFixtures, IdFixtures, PlaceFixtures, RecordFixtures, TestBatchBuilder,
    TestHouseholdBuilder, TestInterceptBuilder, TestPersonBuilder, TestTraceBuilder,
    TestTripBuilder, TestVehicleBuilder, TemporalFixtures,
};

fn round_trip<T>(table: &TableDef, record: &T) -> T
where
    T: Serialize + DeserializeOwned,
{
    let row = encode(table, record).unwrap();
    assemble(table, &row).unwrap()
}

fn normalized(batch: SurveyBatch) -> SurveyBatch {
    batch.normalized().unwrap()
}

// ============================================================================
// Household records
// ============================================================================

mod household_records {
    use super::*;

    #[test]
    fn test_normalized_household_round_trip() {
        let batch = normalized(TestBatchBuilder::reference().build());
        let household = &batch.households[0];

        let back: Household = round_trip(&HOUSEHOLDS, household);
        assert_eq!(&back, household);
    }

    #[test]
    fn test_home_geocode_lands_in_home_columns() {
        let batch = normalized(TestBatchBuilder::reference().build());
        let row = encode(&*HOUSEHOLDS, &batch.households[0]).unwrap();

        assert_eq!(row.get("home_lat"), Some(&SqlValue::Float(Some(32.7157))));
        assert_eq!(row.get("home_mgra_13"), Some(&SqlValue::Int(Some(1_234))));
        assert!(matches!(row.get("home_shape"), Some(SqlValue::Geometry(Some(wkt))) if wkt.starts_with("POINT")));
    }

    #[test]
    fn test_ungeocoded_home_round_trip() {
        let household = TestHouseholdBuilder::new()
            .with_home(PlaceFixtures::ungeocoded())
            .build();
        let row = encode(&*HOUSEHOLDS, &household).unwrap();
        assert!(row.get("home_lat").unwrap().is_null());
        assert!(row.get("home_shape").unwrap().is_null());

        let back: Household = assemble(&HOUSEHOLDS, &row).unwrap();
        assert!(back.home.geocode.is_none());
        assert_eq!(back, household);
    }

    #[test]
    fn test_navigation_answers_fill_use_and_freq_pairs() {
        let household = TestHouseholdBuilder::new().build();
        let row = encode(&*HOUSEHOLDS, &household).unwrap();

        for stem in NavigationTool::LABELS {
            assert!(row.get(&format!("use_{}", stem)).is_some(), "missing use_{}", stem);
            assert!(row.get(&format!("freq_{}", stem)).is_some(), "missing freq_{}", stem);
        }
    }

    #[test]
    fn test_person_with_places_round_trip() {
        let person = TestPersonBuilder::new()
            .with_work_place(PlaceFixtures::work())
            .with_school_place(PlaceFixtures::ungeocoded())
            .with_work_parking(Some(CostFixtures::parking()), Response::No)
            .build();

        let back: Person = round_trip(&PERSONS, &person);
        assert_eq!(back, person);
        assert!(back.places.school.geocode.is_none());
    }

    #[test]
    fn test_vehicle_round_trip() {
        let vehicle = TestVehicleBuilder::new()
            .for_household(IdFixtures::vehicle_household())
            .with_number(2)
            .with_make("Honda", "Fit")
            .with_residence_parking(Some(CostFixtures::residence_parking()))
            .build();

        let back: Vehicle = round_trip(&VEHICLES, &vehicle);
        assert_eq!(back, vehicle);
    }

    #[test]
    fn test_sentinel_vehicle_maps_to_zero_key() {
        let row = encode(&*VEHICLES, &Vehicle::not_applicable()).unwrap();
        let (household, number) = VehicleRef::to_storage_key(None);

        assert_eq!(row.get("household_id"), Some(&SqlValue::Int(Some(household))));
        assert_eq!(row.get("vehicle_number"), Some(&SqlValue::SmallInt(Some(number))));
    }

    #[test]
    fn test_intercept_round_trip() {
        let intercept = TestInterceptBuilder::new()
            .for_household(IdFixtures::household())
            .build();

        let back: Intercept = round_trip(&INTERCEPT, &intercept);
        assert_eq!(back, intercept);
    }

    #[test]
    fn test_border_trip_round_trip() {
        let trip = RecordFixtures::border_trip(HouseholdId::new(42), 3);
        assert_eq!(round_trip(&BORDER_TRIPS, &trip), trip);
    }
}

// ============================================================================
// Travel records
// ============================================================================

mod travel_records {
    use super::*;

    #[test]
    fn test_day_round_trip() {
        let batch = TestBatchBuilder::reference().build();
        let day = &batch.days[0];

        let back: Day = round_trip(&DAY, day);
        assert_eq!(&back, day);
    }

    #[test]
    fn test_normalized_trip_round_trip() {
        let mut fares = TripFares::not_reported();
        fares.bus.cost = Some(CostFixtures::bus_fare());
        fares.bus.cost_dk = Response::No;

        let trip = TestTripBuilder::new()
            .with_id(IdFixtures::trip().value() + 1)
            .with_modes(&[TravelMode::Walk, TravelMode::Bus, TravelMode::Walk])
            .with_origin("Home", PlaceFixtures::home(), TripPurpose::Home)
            .with_destination("Transit", PlaceFixtures::transit_center(), TripPurpose::ChangeMode)
            .with_fares(fares)
            .build();
        let batch = normalized(TestBatchBuilder::reference().with_trip(trip).build());
        let trip = &batch.trips[1];

        let back: Trip = round_trip(&TRIPS, trip);
        assert_eq!(&back, trip);
    }

    #[test]
    fn test_trip_modes_fill_slot_columns() {
        let trip = TestTripBuilder::new()
            .with_modes(&[TravelMode::Walk, TravelMode::Bus])
            .build();
        let row = encode(&*TRIPS, &trip).unwrap();

        assert_eq!(
            row.get("mode_1"),
            Some(&SqlValue::Text(Some(TravelMode::Walk.label().to_string())))
        );
        assert_eq!(
            row.get("mode_2"),
            Some(&SqlValue::Text(Some(TravelMode::Bus.label().to_string())))
        );
        assert!(row.get("mode_4").is_some());
    }

    #[test]
    fn test_trace_line_and_points_round_trip() {
        let trace = TestTraceBuilder::new().reversed().build();
        let batch = normalized(TestBatchBuilder::new().with_trace(trace).build());
        let trace = &batch.traces[0];

        let line = encode(&*LOCATION_LINES, trace).unwrap();
        assert!(matches!(line.get("shape"), Some(SqlValue::Geometry(Some(wkt))) if wkt.starts_with("LINESTRING")));

        let times: Vec<_> = trace.points.iter().map(|p| p.collected_at).collect();
        assert_eq!(times[0], TemporalFixtures::at(8, 0));

        for point in &trace.points {
            let back: LocationPoint = round_trip(&LOCATION_POINTS, point);
            assert_eq!(&back, point);
        }
    }

    #[test]
    fn test_trace_without_points_cannot_be_normalized() {
        let batch = TestBatchBuilder::new()
            .with_trace(LocationTrace::new(IdFixtures::trace(), Vec::new()))
            .build();
        assert!(batch.normalized().is_err());
    }
}

// ============================================================================
// Table definitions
// ============================================================================

mod table_definitions {
    use super::*;

    #[test]
    fn test_every_stored_table_is_defined_in_order() {
        let names: Vec<_> = all_tables().iter().map(|t| t.name).collect();
        assert_eq!(names, TABLES.to_vec());
    }

    #[test]
    fn test_create_sql_is_idempotent_and_qualified() {
        for table in all_tables() {
            let sql = table.create_sql();
            assert!(sql.starts_with("CREATE TABLE IF NOT EXISTS"), "{}", table.name);
            assert!(sql.contains(&table.qualified()), "{}", table.name);
            assert!(sql.contains("PRIMARY KEY"), "{}", table.name);
        }
    }

    #[test]
    fn test_children_reference_parents() {
        assert!(PERSONS.create_sql().contains("REFERENCES"));
        assert!(TRIPS.create_sql().contains("REFERENCES"));
        assert!(LOCATION_POINTS.create_sql().contains("REFERENCES"));
        assert!(!VEHICLES.create_sql().contains("REFERENCES"));
    }

    #[test]
    fn test_geometry_columns_use_wgs84() {
        let sql = HOUSEHOLDS.create_sql();
        assert!(sql.contains("geometry(Point, 4326)"));
        assert!(LOCATION_LINES.create_sql().contains("geometry(Geometry, 4326)"));
    }

    #[test]
    fn test_money_columns_are_non_negative() {
        let sql = VEHICLES.create_sql();
        assert!(sql.contains("NUMERIC(10, 2)"));
        assert!(sql.contains(">= 0"));
    }
}
