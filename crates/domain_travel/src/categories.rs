//! Code books for day- and trip-level categorical columns

use core_kernel::define_category;

define_category! {
    DayOfWeek {
        Monday => "Monday",
        Tuesday => "Tuesday",
        Wednesday => "Wednesday",
        Thursday => "Thursday",
        Friday => "Friday",
        Saturday => "Saturday",
        Sunday => "Sunday",
        Missing => "Missing",
    }
}

impl DayOfWeek {
    /// Day of week of a calendar date
    pub fn of(date: chrono::NaiveDate) -> Self {
        use chrono::{Datelike, Weekday};
        match date.weekday() {
            Weekday::Mon => DayOfWeek::Monday,
            Weekday::Tue => DayOfWeek::Tuesday,
            Weekday::Wed => DayOfWeek::Wednesday,
            Weekday::Thu => DayOfWeek::Thursday,
            Weekday::Fri => DayOfWeek::Friday,
            Weekday::Sat => DayOfWeek::Saturday,
            Weekday::Sun => DayOfWeek::Sunday,
        }
    }
}

define_category! {
    /// Instrument the diary was recorded with
    DataSource {
        Rmove => "rMove",
        Online => "Online",
        Missing => "Missing",
    }
}

define_category! {
    SurveyStatus {
        NotComplete => "Diary/daily summary survey not complete",
        Complete => "Diary/daily summary survey complete",
        NotAsked => "Diary/daily summary survey not asked",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    ProxyStatus {
        No => "No",
        Present => "Present while other member filled out survey",
        NotPresent => "Not present while other member filled out survey",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Reason given for making no trips on a travel day
    NoTravelReason {
        RmoveMissed => "Did travel, but rMove did not collect any trips",
        DayOff => "Not scheduled to work/took day off",
        WorkedAtHome => "Worked at home (for pay)",
        WorkedAroundHome => "Worked around home (not for pay)",
        SchoolBreak => "Kids were on school vacation/break",
        NoTransportation => "No available transportation",
        Sick => "Was sick or caring for another person",
        WaitingForDelivery => "Was waiting for visitor/delivery",
        NoReasonGiven => "Other reason (no reason given)",
        StayedOnBase => "Stayed on base all day",
        Other => "Other reason",
        ParticipantNonResponse => "Participant non-response",
        TechnicalError => "Technical error",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Where the respondent was at 3am at the start or end of a travel day
    DayAnchor {
        Home => "Home",
        PrimaryWork => "Work (Primary)",
        SecondWork => "Work (Second Jobs)",
        Other => "Other",
        NotApplicable => "Not Applicable",
        Missing => "Missing",
    }
}

define_category! {
    TripPurpose {
        Home => "Home",
        SchoolClass => "School/Class",
        DropOffPickUpAccompany => "Drop off, pick up, accompany person (Online diary only)",
        SocialLeisureVacation => "Social/leisure/vacation activity (Online diary only)",
        PrimaryWorkplace => "Primary workplace",
        WorkRelated => "Work-related",
        TravelingForWork => "Traveling for work (e.g., going to airport)",
        VolunteerWork => "Volunteer work",
        OtherWork => "Other work",
        K12School => "K-12 School",
        College => "College/University",
        OtherEducation => "Other education-related (e.g., field trip)",
        VocationalEducation => "Vocational education",
        Grocery => "Grocery",
        Gas => "Gas",
        RoutineShopping => "Routine shopping",
        ErrandsWithoutAppointment => "Errands without appointment",
        Medical => "Medical",
        MajorPurchase => "Shopping for a major item",
        ErrandsWithAppointment => "Errands with appointment",
        PickUp => "Pick someone up (rMove only)",
        DropOff => "Drop someone off (rMove only)",
        Accompany => "Accompany someone (rMove only)",
        MultipleEscort => "Multiple: pickup, dropoff, accompany (rMove only)",
        Restaurant => "Restaurant",
        Exercise => "Exercise",
        Social => "Social (rMove only)",
        Leisure => "Leisure/entertainment (rMove only)",
        ReligiousCivic => "Religious/civic (rMove only)",
        Vacation => "Vacation/travel (rMove only)",
        FamilyActivity => "Family activity (rMove only)",
        ChangeMode => "Change travel mode",
        OtherErrand => "Other errand",
        OtherLeisure => "Other leisure (rMove only)",
        OtherPurpose => "Other purpose",
        Other => "Other",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    TravelMode {
        Walk => "Walk/jog/wheelchair",
        PersonalBicycle => "Personal bicycle",
        BorrowedBicycle => "Borrowed bicycle",
        RentalBicycle => "Rental bicycle",
        HouseholdVehicle1 => "Household vehicle 1",
        HouseholdVehicle2 => "Household vehicle 2",
        HouseholdVehicle3 => "Household vehicle 3",
        HouseholdVehicle4 => "Household vehicle 4",
        HouseholdVehicle5 => "Household vehicle 5",
        HouseholdVehicle6 => "Household vehicle 6",
        HouseholdVehicle7 => "Household vehicle 7",
        OtherHouseholdVehicle => "Other household vehicle",
        RentalCar => "Rental car",
        Carshare => "Carshare",
        Vanpool => "Vanpool",
        OtherAuto => "Other auto",
        Bus => "Bus",
        SchoolBus => "School bus",
        IntercityBus => "Intercity bus",
        ShuttleBus => "Shuttle bus",
        Paratransit => "Paratransit",
        OtherBus => "Other bus",
        Subway => "Subway",
        Airplane => "Airplane",
        Ferry => "Ferry or water taxi",
        WorkCar => "Work car",
        FriendsCar => "Friends car",
        TaxiRegular => "Taxi - Regular",
        TaxiRideshare => "Taxi - Rideshare",
        UniversityShuttle => "University bus or shuttle",
        LightRail => "Rail - Light",
        IntercityRail => "Rail - Intercity",
        OtherRail => "Rail - Other",
        Skateboard => "Skateboard",
        GolfCart => "Golf cart",
        Atv => "ATV",
        OtherHouseholdMotorcycle => "Other household motorcycle",
        ExpressBus => "Express bus/Rapid",
        OtherMode => "Other mode",
        Coaster => "San Diego Coaster Line",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        NotApplicable => "Not Applicable",
    }
}

impl TravelMode {
    /// Vehicle number for the "Household vehicle N" modes
    pub fn household_vehicle_number(&self) -> Option<i16> {
        match self {
            TravelMode::HouseholdVehicle1 => Some(1),
            TravelMode::HouseholdVehicle2 => Some(2),
            TravelMode::HouseholdVehicle3 => Some(3),
            TravelMode::HouseholdVehicle4 => Some(4),
            TravelMode::HouseholdVehicle5 => Some(5),
            TravelMode::HouseholdVehicle6 => Some(6),
            TravelMode::HouseholdVehicle7 => Some(7),
            _ => None,
        }
    }

    pub fn is_transit(&self) -> bool {
        matches!(
            self,
            TravelMode::Bus
                | TravelMode::IntercityBus
                | TravelMode::ShuttleBus
                | TravelMode::OtherBus
                | TravelMode::Subway
                | TravelMode::Ferry
                | TravelMode::LightRail
                | TravelMode::IntercityRail
                | TravelMode::OtherRail
                | TravelMode::ExpressBus
                | TravelMode::Coaster
        )
    }
}

define_category! {
    /// How a transit leg was reached or left
    TransitAccessMode {
        Walked => "Walked or jogged",
        Biked => "Rode a bike",
        DroveAndParked => "Drove and parked a car",
        DroppedOff => "Got dropped off",
        Taxi => "Took a taxi",
        Transferred => "Transferred from other transit",
        AlreadyAtStop => "Was already at the stop",
        Other => "Other",
        NotApplicable => "Not Applicable",
        Missing => "Missing",
    }
}

define_category! {
    /// Mode class returned by the routing service
    GoogleMode {
        Drive => "DRIVE",
        Transit => "TRANSIT",
        WalkBike => "WALK/BIKE",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    DriverStatus {
        Driver => "Driver",
        Passenger => "Passenger",
        Both => "Both (switched drivers during trip)",
        Missing => "Missing",
    }
}

define_category! {
    /// Respondent-flagged problem with a recorded trip
    TripError {
        NoError => "No error",
        NotMoving => "Not moving",
        StillTraveling => "Still traveling",
        OtherStops => "Made other stops",
        OtherError => "Other error",
        Missing => "Missing",
    }
}

define_category! {
    ParkingLocation {
        OwnDriveway => "My own driveway/garage",
        SomeoneElsesDriveway => "Someone elses driveway",
        LotOrGarage => "Parking lot/garage",
        OnStreet => "On street parking",
        ParkAndRide => "Park & Ride lot",
        DidNotPark => "Did not park (e.g., waited, drop-off, drive-thru)",
        Other => "Other",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    ParkingPayType {
        Free => "Free parking (no cost)",
        Pass => "Used a parking pass (any type)",
        Paid => "Paid via cash, credit card, or ticket(s)",
        Reserved => "Reserved parking service (e.g., ParkingPanda)",
        AnotherPersonPaid => "Another person paid",
        Other => "Other",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    TaxiPayType {
        PaidMyself => "I paid the fare myself (no reimbursement)",
        EmployerPaid => "Employer paid (I am reimbursed)",
        Split => "Split/shared fare with other(s)",
        SomeoneElsePaid => "Someone else paid 100% (all of taxi fare)",
        Other => "Other",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    AirfarePayType {
        PaidMyself => "Personally paid the airfare cost",
        EmployerPaid => "Employer paid 100%",
        Points => "Used miles/points to purchase flight",
        SomeoneElsePaid => "Someone else paid 100% (all of airfare cost)",
        Other => "Other",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    /// Fare payment for bus, rail and ferry legs
    TransitPayType {
        Free => "Free (no cost)",
        Pass => "Used pass (any type)",
        Paid => "Cash, credit card, or ticket(s)",
        Other => "Other",
        DoNotKnow => "Do not know",
        TechnicalError => "Technical error",
        ParticipantNonResponse => "Participant non-response",
        Missing => "Missing",
    }
}

define_category! {
    /// Persons on the trip, the respondent included
    TravelerCount {
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Five => "5",
        Six => "6",
        Seven => "7",
        Eight => "8",
        Nine => "9",
        Ten => "10",
        ParticipantNonResponse => "Participant Non-response",
        TechnicalError => "Technical error",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Non-household persons on the trip, top-coded at 5
    NonHouseholdTravelers {
        Zero => "0",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        FiveOrMore => "5+",
        ParticipantNonResponse => "Participant Non-response",
        TechnicalError => "Technical error",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// San Diego County Park & Ride lots, by lot number
    ParkAndRideLot {
        Lot16 => "Lot #16 Poway Rd at Sabre Springs Pkwy",
        Lot17 => "Lot #17 I-8 at Taylor St",
        Lot20 => "Lot #20 I-805 at Governor Dr",
        Lot24 => "Lot #24 I-805 at Mira Mesa Blvd & Vista Sorrento Pkwy",
        Lot26 => "Lot #26 Carmel Mountain Rd at Rancho Carmel Dr",
        Lot31 => "Lot #31 SR 56 at Rancho Carmel Dr",
        Lot4 => "Lot #4 Carmel Mountain Rd at Freeport Rd",
        Lot43 => "Lot #43 I-5 at Gilman Dr",
        Lot51 => "Lot #51 I-15 at Rancho Penasquitos Blvd",
        Lot53 => "Lot #53 Carmel Mountain Rd at Paseo Cardiel",
        Lot57 => "Lot #57 Carmel Mountain Rd at Stoney Creek Rd",
        Lot6 => "Lot #6 I-15 at Mira Mesa Blvd",
        Lot65 => "Lot #65 I-15 at Rancho Bernardo Rd",
        Lot7 => "Lot #7 I-5 at Carmel Valley Rd & Sorrento Valley Rd",
        Lot76 => "Lot #76 I-15 at Scripps Poway Pkwy",
        Lot78 => "Lot #78 I-805 at Childrens Way",
        Lot80 => "Lot #80 Caliente Ave",
        Lot1 => "Lot #1 SR 94 at Sweetwater Springs Blvd",
        Lot28 => "Lot #28 SR 94 at Potrero Post Office",
        Lot33 => "Lot #33 I-15 at Deer Springs Rd",
        Lot34 => "Lot #34 I-15 at Mountain Meadow Rd",
        Lot35 => "Lot #35 I-15 at Gopher Canyon Rd",
        Lot37 => "Lot #37 SR 94 at Avocado Blvd",
        Lot40 => "Lot #40 SR 54 at Jamacha Blvd",
        Lot71 => "Lot #71 Sweetwater Springs Blvd at Austin Dr",
        Lot11 => "Lot #11 SR 78 at Broadway",
        Lot3 => "Lot #3 Felicita Ave at Escondido Blvd",
        Lot30 => "Lot #30 I-15 at El Norte Pkwy",
        Lot38 => "Lot #38 7 Oakes Rd at El Norte Pkwy",
        Lot81 => "Lot #81 Westfield North County",
        Lot22 => "Lot #22 I-8 at Murray Dr",
        Lot59 => "Lot #59 Bancroft Dr at Grossmont Blvd",
        Lot60 => "Lot #60 Severin Dr at Bancroft Dr",
        Lot61 => "Lot #61 Severin Dr at Murray Dr",
        Lot8 => "Lot #8 Lemon Grove Ave at High St",
        Lot39 => "Lot #39 SR 78 at College Blvd (South)",
        Lot44 => "Lot #44 I-5 at SR 78 & Moreno St",
        Lot45 => "Lot #45 SR 78 at College Blvd (North)",
        Lot5 => "Lot #5 Maxson St at Barnes St",
        Lot73 => "Lot #73 Mission Ave at Frontier Dr",
        Lot32 => "Lot #32 I-5 at La Costa Ave",
        Lot47 => "Lot #47 I-5 at Birmingham Dr",
        Lot62 => "Lot #62 Encinitas Blvd at Calle Magdelena",
        Lot10 => "Lot #10 SR 67 at Mapleview St",
        Lot2 => "Lot #2 SR 67 at Riverford Rd & Woodside Ave",
        Lot42 => "Lot #42 I-8 at Lake Jennings Park Rd",
        Lot48 => "Lot #48 Twin Peaks Rd at Budwin Ln",
        Lot77 => "Lot #77 SR 67 at Poway Rd",
        Lot25 => "Lot #25 SR 54 at Washington Ave",
        Lot41 => "Lot #41 I-8 at Los Coches Rd",
        Lot63 => "Lot #63 SR 67 at Day St",
        Lot75 => "Lot #75 SR 67 at Dye Rd",
        Lot70 => "Lot #70 Mission Gorge Rd at Big Rock Dr",
        Lot72 => "Lot #72 North Magnolia Ave at Alexander Way",
        Lot50 => "Lot #50 Telegraph Canyon Rd at Paseo Del Ray",
        Lot56 => "Lot #56 East H St at Buena Vista Way",
        Lot46 => "Lot #46 SR 76 at Sweetgrass Ln",
        Lot29 => "Lot #29 I-8 at Japatul Valley Rd",
        Lot69 => "Lot #69 SR 78 at Barham Dr",
        Lot19 => "Lot #19 I-15 at SR 76",
        Lot21 => "Lot #21 SR 78 at Sunset Dr & Seaview Pl",
        Lot12 => "Lot #12 Lemon Grove Ave at Lincoln St",
        Lot9 => "Lot #9 I-805 at Sweetwater Rd",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    ParkAndRideCity {
        Bonsall => "Bonsall",
        ChulaVista => "Chula Vista",
        Descanso => "Descanso",
        ElCajon => "El Cajon",
        Encinitas => "Encinitas",
        Escondido => "Escondido",
        LaMesa => "La Mesa",
        Lakeside => "Lakeside",
        LemonGrove => "Lemon Grove",
        NationalCity => "National City",
        Oceanside => "Oceanside",
        Pala => "Pala",
        Poway => "Poway",
        Ramona => "Ramona",
        SanDiego => "San Diego",
        SanDiegoCounty => "San Diego County",
        SanMarcos => "San Marcos",
        Santee => "Santee",
        Vista => "Vista",
        NotApplicable => "Not Applicable",
    }
}
