//! Test Data Builders
//!
//! Provides builder patterns for constructing survey records with sensible
//! defaults. Every builder starts from a record that passes batch validation
//! with no findings, so a test only sets the fields it is about.

use chrono::{Duration, NaiveDate, NaiveDateTime};
use core_kernel::{
    Cost, Geocode, HouseholdId, LinkedTripId, PersonId, Place, Response, Sentinel, TraceId,
    TripId,
};
use domain_household::{
    AgeCategory, BicycleCount, BorderTrip, CommuteFrequency, CommuteMode, CommuteSubsidy,
    Composition, CrossBorderFrequency, Demographics, DiaryFollowUp, DiaryParticipation,
    Disability, Education, Employment, EmploymentStatus, Ethnicity, FuelType, Gender, Household,
    HouseholdSize, HouseholdWeights, HowObtained, HoursWorked, IncomeBroad, IncomeDetailed,
    Industry, Intercept, InterceptEnd, InterceptRespondent, JobCount, Language, MemberCount,
    MilitaryStatus, NavigationUsage, Occupation, Person, PersonPlaces, PhysicalActivity,
    RecruitChannel, RecruitDevice, Recruitment, Relationship, Residence, ResidenceDuration,
    ResidenceParkingPass, ResidenceType, SampleGroup, SampleSegment, Schooling, Smartphone,
    SmartphoneType, StudentStatus, TenureStatus, ToolUsage, TransitFrequency, TransitPass,
    Vehicle, VehicleCount, WorkArrivalFlexibility, WorkLocationType, WorkParkingEase,
    WorkParkingPayment,
};
use domain_ingest::SurveyBatch;
use domain_travel::{
    DataSource, Day, DayAnchor, DayCompletion, DayOfWeek, DayWeights, DriverStatus, GoogleMode,
    LocationPoint, LocationTrace, NoTravelReason, NonHouseholdTravelers, ParkAndRide, Parking,
    ParkingLocation, ParkingPayType, ProxyStatus, SurveyStatus, TransitAccessMode, TravelMode,
    TravelerCount, Travelers, Trip,
    TripEdits, TripEnd, TripError, TripFares, TripMetrics, TripModes, TripPurpose, TripSurvey,
    TripWeights,
};

use crate::fixtures::{IdFixtures, PlaceFixtures, TemporalFixtures};

fn not_applicable() -> String {
    Sentinel::NotApplicable.text()
}

// ============================================================================
// Households
// ============================================================================

/// Builder for households
pub struct TestHouseholdBuilder {
    household: Household,
}

impl Default for TestHouseholdBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestHouseholdBuilder {
    /// Creates household 500 with a geocoded downtown home
    pub fn new() -> Self {
        Self {
            household: Household {
                household_id: IdFixtures::household(),
                sample_segment: SampleSegment::Regular,
                sample_group: SampleGroup::RmoveOnly,
                travel_date_start: Some(TemporalFixtures::travel_date()),
                recruitment: Recruitment {
                    survey_where: RecruitChannel::Online,
                    survey_mobile: RecruitDevice::NotMobile,
                    survey_start: TemporalFixtures::recruit_start(),
                    survey_end: TemporalFixtures::recruit_end(),
                    number_rmove_participants: "1".to_string(),
                    participate_future_studies: Response::Yes,
                    household_completed: Response::Yes,
                    completed_days: 1,
                    language: Language::English,
                    language_other: not_applicable(),
                },
                composition: Composition {
                    persons: HouseholdSize::One,
                    adults: HouseholdSize::One,
                    children: MemberCount::Zero,
                    workers: MemberCount::One,
                    vehicles: VehicleCount::One,
                    bicycles: BicycleCount::Zero,
                    has_share_car: Response::No,
                    has_share_bicycle: Response::No,
                    has_share_vanpool: Response::No,
                },
                home: PlaceFixtures::home(),
                residence: Residence {
                    duration: ResidenceDuration::FiveToTen,
                    tenure_status: TenureStatus::Rent,
                    residence_type: ResidenceType::LargeBuilding,
                    income_category_detailed: IncomeDetailed::From75kTo100k,
                    income_category_broad: IncomeBroad::From60kTo100k,
                },
                navigation: NavigationUsage::uniform(ToolUsage::unused()),
                freq_cross_border: CrossBorderFrequency::Zero,
                weights: HouseholdWeights {
                    initial: Some(1.0),
                    four_x: Some(1.0),
                    four_five_six_x: Some(1.0),
                },
            },
        }
    }

    pub fn with_id(mut self, id: i32) -> Self {
        self.household.household_id = HouseholdId::new(id);
        self
    }

    /// Sets the home place
    pub fn with_home(mut self, home: Place) -> Self {
        self.household.home = home;
        self
    }

    /// Supplies a home shape alongside the home coordinates
    pub fn with_home_shape(mut self, shape: impl Into<String>) -> Self {
        if let Some(geocode) = self.household.home.geocode.as_mut() {
            geocode.shape = Some(shape.into());
        }
        self
    }

    pub fn with_navigation(mut self, navigation: NavigationUsage) -> Self {
        self.household.navigation = navigation;
        self
    }

    /// Sets the recruit survey window
    pub fn with_recruit_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.household.recruitment.survey_start = start;
        self.household.recruitment.survey_end = end;
        self
    }

    pub fn with_vehicle_count(mut self, vehicles: VehicleCount) -> Self {
        self.household.composition.vehicles = vehicles;
        self
    }

    pub fn with_language(mut self, language: Language) -> Self {
        self.household.recruitment.language = language;
        self
    }

    /// Sets a free-text language and marks the language as `Other`
    pub fn with_language_other(mut self, language: impl Into<String>) -> Self {
        self.household.recruitment.language = Language::Other;
        self.household.recruitment.language_other = language.into();
        self
    }

    pub fn build(self) -> Household {
        self.household
    }
}

// ============================================================================
// Persons
// ============================================================================

/// Builder for persons
pub struct TestPersonBuilder {
    person: Person,
}

impl Default for TestPersonBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestPersonBuilder {
    /// Creates person 5001 of household 500, a full-time worker
    pub fn new() -> Self {
        Self {
            person: Person {
                person_id: IdFixtures::person(),
                household_id: IdFixtures::household(),
                person_number: 1,
                travel_date_start: TemporalFixtures::travel_date(),
                rmove_participant: Response::Yes,
                demographics: Demographics {
                    relationship: Relationship::SelfRespondent,
                    gender: Gender::Female,
                    age_category: AgeCategory::From35To44,
                    employment_status: EmploymentStatus::FullTime,
                    number_of_jobs: JobCount::One,
                    adult_student_status: StudentStatus::NotAStudent,
                    educational_attainment: Education::Bachelor,
                    drivers_license: Response::Yes,
                    military_status: MilitaryStatus::NoAffiliation,
                    ethnicity: Ethnicity {
                        americanindian_alaskanative: Response::No,
                        asian: Response::No,
                        black: Response::No,
                        hispanic: Response::Yes,
                        hawaiian_pacific: Response::No,
                        white: Response::No,
                        other: Response::No,
                    },
                    disability: Disability::No,
                    height: Some(65.0),
                    weight: Some(150.0),
                    physical_activity: PhysicalActivity::LightOrModerate,
                    transit_frequency: TransitFrequency::Never,
                    transit_pass: TransitPass::NoPass,
                },
                school: Schooling::not_applicable(),
                work: Employment {
                    work_location_type: WorkLocationType::OneLocation,
                    occupation: Occupation::Education,
                    industry: Industry::Education,
                    hours_worked: HoursWorked::From40To49,
                    commute_frequency: CommuteFrequency::FiveDays,
                    commute_mode: CommuteMode::Walk,
                    work_arrival_frequency: WorkArrivalFlexibility::UpTo15Minutes,
                    work_parking_payment: WorkParkingPayment::NotApplicable,
                    work_parking_cost: None,
                    work_parking_cost_dk: Response::NotApplicable,
                    work_parking_ease: WorkParkingEase::NotApplicable,
                    telecommute_frequency: CommuteFrequency::Never,
                },
                commute_subsidy: CommuteSubsidy {
                    none: Response::Yes,
                    parking: Response::No,
                    transit: Response::No,
                    vanpool: Response::No,
                    cash: Response::No,
                    other: Response::No,
                    specify: not_applicable(),
                },
                has_second_home: Response::No,
                places: PersonPlaces {
                    work: PlaceFixtures::work(),
                    ..PersonPlaces::not_applicable()
                },
                smartphone: Smartphone {
                    smartphone_type: SmartphoneType::IPhone,
                    smartphone_age: Response::Yes,
                    smartphone_child: Response::NotApplicable,
                },
                diary: DiaryParticipation {
                    diary_callcenter: Response::No,
                    diary_mobile: Response::Yes,
                    rmove_activated: Some(TemporalFixtures::recruit_end()),
                    completed_days: Some(1.0),
                    completed_day: [
                        Response::Yes,
                        Response::NotApplicable,
                        Response::NotApplicable,
                        Response::NotApplicable,
                        Response::NotApplicable,
                        Response::NotApplicable,
                        Response::NotApplicable,
                    ],
                },
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.person.person_id = PersonId::new(id);
        self
    }

    pub fn with_household(mut self, id: HouseholdId) -> Self {
        self.person.household_id = id;
        self
    }

    pub fn with_person_number(mut self, number: i32) -> Self {
        self.person.person_number = number;
        self
    }

    pub fn with_work_place(mut self, place: Place) -> Self {
        self.person.places.work = place;
        self
    }

    pub fn with_school_place(mut self, place: Place) -> Self {
        self.person.places.school = place;
        self
    }

    /// Sets the work parking cost and its don't-know flag
    pub fn with_work_parking(mut self, cost: Option<Cost>, dont_know: Response) -> Self {
        self.person.work.work_parking_cost = cost;
        self.person.work.work_parking_cost_dk = dont_know;
        self
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.person.demographics.gender = gender;
        self
    }

    pub fn build(self) -> Person {
        self.person
    }
}

// ============================================================================
// Days
// ============================================================================

/// Builder for person-days
pub struct TestDayBuilder {
    day: Day,
}

impl Default for TestDayBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestDayBuilder {
    /// Creates the reference diary day of person 5001 with one trip
    pub fn new() -> Self {
        let travel_date = TemporalFixtures::travel_date();
        Self {
            day: Day {
                person_id: IdFixtures::person(),
                household_id: IdFixtures::household(),
                travel_date,
                travel_day_number: 1,
                travel_day_of_week: DayOfWeek::of(travel_date),
                data_source: DataSource::Rmove,
                completion: DayCompletion {
                    completed_household_survey: Response::Yes,
                    completed_person_survey: Response::Yes,
                    completed_date: Some(TemporalFixtures::at(21, 15)),
                    revised_at: None,
                    revised_count: "0".to_string(),
                    diary_start_time: Some(TemporalFixtures::at(3, 0)),
                    diary_end_time: Some(TemporalFixtures::at(23, 59)),
                    diary_duration: Some(1_259),
                    survey_status: SurveyStatus::Complete,
                    proxy: ProxyStatus::No,
                },
                made_trips: Response::Yes,
                no_trips_reason_1: NoTravelReason::NotApplicable,
                no_trips_reason_2: NoTravelReason::NotApplicable,
                no_trips_reason_specify_other: not_applicable(),
                number_trips: Some(1),
                number_surveys: Some(1),
                start_location: DayAnchor::Home,
                start_location_other: not_applicable(),
                end_location: DayAnchor::Home,
                end_location_other: not_applicable(),
                time_telework: Some(0.0),
                time_shop: Some(0.0),
                toll_road: Response::No,
                toll_road_express: Response::No,
                deliver_package: Response::No,
                deliver_food: Response::No,
                deliver_work: Response::No,
                weights: DayWeights {
                    household_multiday_factor: Some(1.0),
                    person_multiday_456x: Some(1.0),
                },
            },
        }
    }

    /// Assigns the day to a person of a household
    pub fn for_person(mut self, person_id: PersonId, household_id: HouseholdId) -> Self {
        self.day.person_id = person_id;
        self.day.household_id = household_id;
        self
    }

    /// Sets the travel date and the matching day of week
    pub fn on(mut self, date: NaiveDate) -> Self {
        self.day.travel_date = date;
        self.day.travel_day_of_week = DayOfWeek::of(date);
        self
    }

    pub fn with_day_number(mut self, number: i16) -> Self {
        self.day.travel_day_number = number;
        self
    }

    /// Sets the trip count and a made-trips flag that agrees with it
    pub fn with_trips(mut self, count: i32) -> Self {
        self.day.number_trips = Some(count);
        self.day.made_trips = Response::from_bool(count > 0);
        self
    }

    /// Sets the made-trips flag alone
    pub fn with_made_trips(mut self, made_trips: Response) -> Self {
        self.day.made_trips = made_trips;
        self
    }

    pub fn with_diary_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.day.completion.diary_start_time = Some(start);
        self.day.completion.diary_end_time = Some(end);
        self
    }

    pub fn build(self) -> Day {
        self.day
    }
}

// ============================================================================
// Trips
// ============================================================================

/// Builder for trip legs
pub struct TestTripBuilder {
    trip: Trip,
}

impl Default for TestTripBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTripBuilder {
    /// Creates a 30 minute walk from home to work by person 5001
    pub fn new() -> Self {
        let travel_date = TemporalFixtures::travel_date();
        Self {
            trip: Trip {
                trip_id: IdFixtures::trip(),
                trip_id_linked: IdFixtures::linked_trip(),
                trip_id_location: None,
                person_id: IdFixtures::person(),
                household_id: IdFixtures::household(),
                travel_date,
                travel_day_number: Some(1),
                travel_day_of_week: DayOfWeek::of(travel_date),
                data_source: DataSource::Rmove,
                survey: TripSurvey {
                    completed_trip_survey: Response::Yes,
                    completed_date: None,
                    completed_household_survey: Response::Yes,
                    completed_person_survey: Response::Yes,
                    number_household_survey_weekdays: Some(1.0),
                    revised_at: None,
                    revised_count: "0".to_string(),
                    error: TripError::NoError,
                },
                edits: TripEdits::none(),
                origin: TripEnd {
                    name: "Home".to_string(),
                    place: PlaceFixtures::home(),
                    purpose: TripPurpose::Home,
                    purpose_other_specify: not_applicable(),
                    purpose_inferred: TripPurpose::Home,
                },
                destination: TripEnd {
                    name: "Work".to_string(),
                    place: PlaceFixtures::work(),
                    purpose: TripPurpose::PrimaryWorkplace,
                    purpose_other_specify: not_applicable(),
                    purpose_inferred: TripPurpose::PrimaryWorkplace,
                },
                departure_time: TemporalFixtures::at(8, 0),
                arrival_time: TemporalFixtures::at(8, 30),
                travelers: Travelers {
                    total: TravelerCount::One,
                    household: TravelerCount::One,
                    non_household: NonHouseholdTravelers::Zero,
                },
                modes: TripModes {
                    slots: [
                        TravelMode::Walk,
                        TravelMode::NotApplicable,
                        TravelMode::NotApplicable,
                        TravelMode::NotApplicable,
                    ],
                    transit_access: TransitAccessMode::NotApplicable,
                    transit_egress: TransitAccessMode::NotApplicable,
                    google_mode: GoogleMode::WalkBike,
                    driver: DriverStatus::Missing,
                    toll_road: Response::NotApplicable,
                    toll_road_express: Response::NotApplicable,
                },
                parking: Parking {
                    location: ParkingLocation::DidNotPark,
                    pay_type: ParkingPayType::Missing,
                    cost: None,
                    cost_dk: Response::NotApplicable,
                    egress_duration: None,
                },
                fares: TripFares::not_reported(),
                park_and_ride: ParkAndRide::not_applicable(),
                metrics: TripMetrics {
                    distance: Some(1.5),
                    duration: Some(30.0),
                    duration_reported: Some(30.0),
                    speed: Some(3.0),
                },
                weights: TripWeights {
                    trip: Some(1.0),
                    person_trip: Some(1.0),
                    household_multiday_factor: Some(1.0),
                    person_multiday_456x: Some(1.0),
                },
            },
        }
    }

    pub fn with_id(mut self, id: i64) -> Self {
        self.trip.trip_id = TripId::new(id);
        self
    }

    pub fn with_linked_id(mut self, id: i64) -> Self {
        self.trip.trip_id_linked = LinkedTripId::new(id);
        self
    }

    /// Assigns the trip to a person of a household
    pub fn for_person(mut self, person_id: PersonId, household_id: HouseholdId) -> Self {
        self.trip.person_id = person_id;
        self.trip.household_id = household_id;
        self
    }

    /// Sets departure and arrival times
    pub fn between(mut self, departure: NaiveDateTime, arrival: NaiveDateTime) -> Self {
        self.trip.departure_time = departure;
        self.trip.arrival_time = arrival;
        self
    }

    /// Sets the reported modes; unused slots are not applicable
    pub fn with_modes(mut self, modes: &[TravelMode]) -> Self {
        let mut slots = [TravelMode::NotApplicable; domain_travel::MODE_SLOTS];
        for (slot, mode) in slots.iter_mut().zip(modes) {
            *slot = *mode;
        }
        self.trip.modes.slots = slots;
        self
    }

    /// Drives household vehicle `number` (1-7)
    ///
    /// # Panics
    ///
    /// Panics if `number` is not a household vehicle slot.
    pub fn with_household_vehicle(self, number: i16) -> Self {
        let mode = match number {
            1 => TravelMode::HouseholdVehicle1,
            2 => TravelMode::HouseholdVehicle2,
            3 => TravelMode::HouseholdVehicle3,
            4 => TravelMode::HouseholdVehicle4,
            5 => TravelMode::HouseholdVehicle5,
            6 => TravelMode::HouseholdVehicle6,
            7 => TravelMode::HouseholdVehicle7,
            other => panic!("no household vehicle mode for vehicle {}", other),
        };
        let mut builder = self.with_modes(&[mode]);
        builder.trip.modes.google_mode = GoogleMode::Drive;
        builder.trip.modes.driver = DriverStatus::Driver;
        builder
    }

    pub fn with_trace(mut self, trace: TraceId) -> Self {
        self.trip.trip_id_location = Some(trace);
        self
    }

    pub fn with_origin(mut self, name: impl Into<String>, place: Place, purpose: TripPurpose) -> Self {
        self.trip.origin.name = name.into();
        self.trip.origin.place = place;
        self.trip.origin.purpose = purpose;
        self.trip.origin.purpose_inferred = purpose;
        self
    }

    pub fn with_destination(mut self, name: impl Into<String>, place: Place, purpose: TripPurpose) -> Self {
        self.trip.destination.name = name.into();
        self.trip.destination.place = place;
        self.trip.destination.purpose = purpose;
        self.trip.destination.purpose_inferred = purpose;
        self
    }

    /// Supplies an origin shape alongside the origin coordinates
    pub fn with_origin_shape(mut self, shape: impl Into<String>) -> Self {
        let shape = shape.into();
        match self.trip.origin.place.geocode.as_mut() {
            Some(geocode) => geocode.shape = Some(shape),
            None => {
                self.trip.origin.place.geocode = Some(Geocode::new(0.0, 0.0).with_shape(shape));
            }
        }
        self
    }

    pub fn with_distance(mut self, miles: Option<f64>) -> Self {
        self.trip.metrics.distance = miles;
        self
    }

    /// Sets the parking cost and its don't-know flag
    pub fn with_parking(mut self, cost: Option<Cost>, dont_know: Response) -> Self {
        self.trip.parking.cost = cost;
        self.trip.parking.cost_dk = dont_know;
        self
    }

    pub fn with_fares(mut self, fares: TripFares) -> Self {
        self.trip.fares = fares;
        self
    }

    pub fn build(self) -> Trip {
        self.trip
    }
}

// ============================================================================
// Vehicles
// ============================================================================

/// Builder for household vehicles
pub struct TestVehicleBuilder {
    vehicle: Vehicle,
}

impl Default for TestVehicleBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestVehicleBuilder {
    /// Creates vehicle 1 of household 10
    pub fn new() -> Self {
        Self {
            vehicle: Vehicle {
                household_id: IdFixtures::vehicle_household(),
                vehicle_number: 1,
                year: "2012".to_string(),
                make: "Toyota".to_string(),
                model: "Prius".to_string(),
                fuel_type: FuelType::Hybrid,
                how_obtained: HowObtained::Own,
                toll_transponder: Response::No,
                residence_parking_pass: ResidenceParkingPass::AtResidence,
                residence_parking_cost_unknown: Response::NotApplicable,
                residence_parking_monthly_cost: None,
            },
        }
    }

    pub fn for_household(mut self, id: HouseholdId) -> Self {
        self.vehicle.household_id = id;
        self
    }

    pub fn with_number(mut self, number: i16) -> Self {
        self.vehicle.vehicle_number = number;
        self
    }

    pub fn with_make(mut self, make: impl Into<String>, model: impl Into<String>) -> Self {
        self.vehicle.make = make.into();
        self.vehicle.model = model.into();
        self
    }

    pub fn with_residence_parking(mut self, cost: Option<Cost>) -> Self {
        self.vehicle.residence_parking_pass = ResidenceParkingPass::Permit;
        self.vehicle.residence_parking_cost_unknown = Response::from_bool(cost.is_none());
        self.vehicle.residence_parking_monthly_cost = cost;
        self
    }

    pub fn build(self) -> Vehicle {
        self.vehicle
    }
}

// ============================================================================
// Intercepts
// ============================================================================

/// Builder for intercept records
pub struct TestInterceptBuilder {
    intercept: Intercept,
}

impl Default for TestInterceptBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestInterceptBuilder {
    /// Creates the intercept of household 500, who went on to complete rMove
    pub fn new() -> Self {
        Self {
            intercept: Intercept {
                household_id: IdFixtures::household(),
                survey_status: "Complete".to_string(),
                survey_start: Some(TemporalFixtures::at(7, 40)),
                survey_end: Some(TemporalFixtures::at(7, 46)),
                survey_date: Some(TemporalFixtures::travel_date()),
                pilot_study: Response::No,
                origin: InterceptEnd {
                    purpose: "Home".to_string(),
                    place: PlaceFixtures::home(),
                },
                destination: InterceptEnd {
                    purpose: "Work".to_string(),
                    place: PlaceFixtures::work(),
                },
                distance_beeline: Some(11.8),
                distance_beeline_bin: "10-15 miles".to_string(),
                respondent: InterceptRespondent {
                    employment_status: "Employed full-time".to_string(),
                    student_status: "Not a student".to_string(),
                    visit_work: "Yes".to_string(),
                    visit_school: "No".to_string(),
                    number_household_vehicles: "1".to_string(),
                    number_children_0_15: "0".to_string(),
                    number_children_16_17: "0".to_string(),
                    number_adults: "1".to_string(),
                    age: "35-44".to_string(),
                    smartphone: "Yes".to_string(),
                    resident: "Yes".to_string(),
                    bike_party: "Alone".to_string(),
                    bike_share: "No".to_string(),
                    gender: "Female".to_string(),
                },
                intercept_site: "Old Town Transit Center".to_string(),
                intercept_direction: "Northbound".to_string(),
                language: Language::English.to_string(),
                follow_up: DiaryFollowUp {
                    rmove_qualify: Response::Yes,
                    opt_out: Response::No,
                    rmove_participate: Response::Yes,
                    rmove_complete: Response::Yes,
                    recruit_complete: Response::Yes,
                },
                survey_time_peak: Response::Yes,
                expansion_site: "Old Town".to_string(),
                expansion_factor: Some(12.4),
            },
        }
    }

    pub fn for_household(mut self, id: HouseholdId) -> Self {
        self.intercept.household_id = id;
        self
    }

    pub fn with_follow_up(mut self, follow_up: DiaryFollowUp) -> Self {
        self.intercept.follow_up = follow_up;
        self
    }

    pub fn with_survey_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.intercept.survey_start = Some(start);
        self.intercept.survey_end = Some(end);
        self
    }

    pub fn build(self) -> Intercept {
        self.intercept
    }
}

// ============================================================================
// Location traces
// ============================================================================

/// Builder for GPS traces
pub struct TestTraceBuilder {
    trace: LocationTrace,
}

impl Default for TestTraceBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestTraceBuilder {
    /// Creates trace 77001: three fixes a minute apart from 08:00
    pub fn new() -> Self {
        Self::along(
            IdFixtures::trace(),
            TemporalFixtures::at(8, 0),
            &[(32.7157, -117.1611), (32.7300, -117.1700), (32.7551, -117.1997)],
        )
    }

    /// One fix per vertex, a minute apart, starting at `start`
    pub fn along(id: TraceId, start: NaiveDateTime, vertices: &[(f64, f64)]) -> Self {
        let points = vertices
            .iter()
            .enumerate()
            .map(|(index, (latitude, longitude))| {
                let mut point = LocationPoint::new(
                    start + Duration::minutes(index as i64),
                    *latitude,
                    *longitude,
                );
                point.accuracy = Some(10.0);
                point
            })
            .collect();
        Self {
            trace: LocationTrace::new(id, points),
        }
    }

    pub fn with_id(mut self, id: TraceId) -> Self {
        self.trace.trip_id_location = id;
        self
    }

    /// Supplies a line shape alongside the points
    pub fn with_shape(mut self, shape: impl Into<String>) -> Self {
        self.trace.shape = Some(shape.into());
        self
    }

    /// Delivers the points newest first
    pub fn reversed(mut self) -> Self {
        self.trace.points.reverse();
        self
    }

    /// Supplies a point shape for the point at `index`
    pub fn with_point_shape(mut self, index: usize, shape: impl Into<String>) -> Self {
        if let Some(point) = self.trace.points.get_mut(index) {
            point.shape = Some(shape.into());
        }
        self
    }

    pub fn build(self) -> LocationTrace {
        self.trace
    }
}

// ============================================================================
// Batches
// ============================================================================

/// Builder for survey batches
#[derive(Default)]
pub struct TestBatchBuilder {
    batch: SurveyBatch,
}

impl TestBatchBuilder {
    /// Creates an empty batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Household 500, person 5001, one day and one trip
    pub fn reference() -> Self {
        Self::new()
            .with_household(TestHouseholdBuilder::new().build())
            .with_person(TestPersonBuilder::new().build())
            .with_day(TestDayBuilder::new().build())
            .with_trip(TestTripBuilder::new().build())
    }

    /// A household with one person, one day and one trip, all keyed off `household_id`
    ///
    /// Person id is `household_id * 10 + 1`; trip ids derive from the person id.
    pub fn for_household(household_id: i32) -> Self {
        let household = HouseholdId::new(household_id);
        let person = PersonId::new(i64::from(household_id) * 10 + 1);
        Self::new()
            .with_household(TestHouseholdBuilder::new().with_id(household_id).build())
            .with_person(
                TestPersonBuilder::new()
                    .with_id(person.value())
                    .with_household(household)
                    .build(),
            )
            .with_day(TestDayBuilder::new().for_person(person, household).build())
            .with_trip(
                TestTripBuilder::new()
                    .with_id(person.value() * 1_000 + 1)
                    .with_linked_id(person.value() * 1_000)
                    .for_person(person, household)
                    .build(),
            )
    }

    pub fn with_household(mut self, household: Household) -> Self {
        self.batch.households.push(household);
        self
    }

    pub fn with_person(mut self, person: Person) -> Self {
        self.batch.persons.push(person);
        self
    }

    pub fn with_day(mut self, day: Day) -> Self {
        self.batch.days.push(day);
        self
    }

    pub fn with_trip(mut self, trip: Trip) -> Self {
        self.batch.trips.push(trip);
        self
    }

    pub fn with_trips(mut self, trips: impl IntoIterator<Item = Trip>) -> Self {
        self.batch.trips.extend(trips);
        self
    }

    pub fn with_vehicle(mut self, vehicle: Vehicle) -> Self {
        self.batch.vehicles.push(vehicle);
        self
    }

    pub fn with_intercept(mut self, intercept: Intercept) -> Self {
        self.batch.intercepts.push(intercept);
        self
    }

    pub fn with_border_trip(mut self, border_trip: BorderTrip) -> Self {
        self.batch.border_trips.push(border_trip);
        self
    }

    pub fn with_trace(mut self, trace: LocationTrace) -> Self {
        self.batch.traces.push(trace);
        self
    }

    pub fn build(self) -> SurveyBatch {
        self.batch
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use domain_ingest::{BatchValidator, ExistingKeys, IngestPolicy};

    #[test]
    fn test_reference_batch_is_clean() {
        let batch = TestBatchBuilder::reference().build();
        let policy = IngestPolicy::default();
        let report = BatchValidator::new(&policy).validate(&batch, &ExistingKeys::default());
        assert!(report.is_clean(), "unexpected findings: {:#?}", report.violations);
    }

    #[test]
    fn test_per_household_batches_are_clean() {
        let policy = IngestPolicy::default();
        for household in [600, 601] {
            let batch = TestBatchBuilder::for_household(household).build();
            let report = BatchValidator::new(&policy).validate(&batch, &ExistingKeys::default());
            assert!(report.is_clean(), "unexpected findings: {:#?}", report.violations);
        }
    }

    #[test]
    fn test_household_vehicle_mode() {
        let trip = TestTripBuilder::new().with_household_vehicle(2).build();
        let vehicle = trip.household_vehicle().expect("vehicle mode");
        assert_eq!(vehicle.key(), (500, 2));
    }

    #[test]
    fn test_default_trace_is_ordered() {
        let trace = TestTraceBuilder::new().build();
        assert!(trace.is_time_ordered());
        assert!(!TestTraceBuilder::new().reversed().build().is_time_ordered());
    }
}
