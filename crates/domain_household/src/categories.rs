//! Code books for household, person, vehicle and border-crossing columns
//!
//! Labels follow the published survey code books. Every person and household
//! set carries "Missing" for an unanswered question and "Not Applicable" for
//! a question skipped by the survey logic.

use core_kernel::define_category;

define_category! {
    /// Sampling stratum the household was recruited from
    SampleSegment {
        Regular => "Regular",
        HispanicOversample => "Hispanic oversample",
        TransportationOversample => "Transportation oversample",
        OtherOversample => "Other oversample",
        ActiveTransportation => "AT segment",
    }
}

define_category! {
    /// Diary instrument group of the household
    SampleGroup {
        RmoveOnly => "Group 1: rMove only",
        OnlineOnly => "Group 3: Online diary only",
        Split => "Group 4: Split HH: some rMove, some online diary",
        Intercept => "Group 5: AT/Intercept (rMove only)",
        Missing => "Missing",
    }
}

define_category! {
    ResidenceDuration {
        UnderOneYear => "Less than a year",
        OneToTwo => "Between 1 and 2 years",
        TwoToThree => "Between 2 and 3 years",
        ThreeToFive => "Between 3 and 5 years",
        FiveToTen => "Between 5 and 10 years",
        TenToTwenty => "Between 10 and 20 years",
        OverTwenty => "More than 20 years",
        Missing => "Missing",
    }
}

define_category! {
    TenureStatus {
        Own => "Own/Buying (paying mortgage)",
        Rent => "Rent",
        Provided => "Provided by job or military",
        Other => "Other",
        PreferNotToAnswer => "Prefer not to answer",
        Missing => "Missing",
    }
}

define_category! {
    ResidenceType {
        SingleFamily => "Single-family house (detached house)",
        Townhouse => "Townhouse (attached house)",
        SmallBuilding => "Building with 3 or fewer apartments/condos",
        LargeBuilding => "Building with 4 or more apartments/condos",
        MobileHome => "Mobile home/trailer",
        Institutional => "Dorm, barracks, or institutional housing",
        Other => "Other (including boat, RV, van, etc.)",
        Missing => "Missing",
    }
}

define_category! {
    /// Broad household income band
    IncomeBroad {
        Under30k => "Under $30,000",
        From30kTo60k => "$30,000-$59,999",
        From60kTo100k => "$60,000-$99,999",
        From100kTo150k => "$100,000-$149,999",
        Over150k => "$150,000 or more",
        PreferNotToAnswer => "Prefer not to answer",
        Missing => "Missing",
    }
}

define_category! {
    /// Channel the recruit survey was completed through
    RecruitChannel {
        Online => "Recruit survey completed online",
        CallCenter => "Recruit survey completed via call center",
        NotApplicable => "Not Applicable",
        Missing => "Missing",
    }
}

define_category! {
    RecruitDevice {
        NotMobile => "Recruit survey was not completed on mobile device",
        Mobile => "Recruit survey was completed on mobile device",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Preferred survey language
    Language {
        English => "English",
        Spanish => "Spanish",
        Other => "Other",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Persons or adults in the household, top-coded at 12
    HouseholdSize {
        Zero => "0",
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
        Eleven => "11",
        TwelveOrMore => "12+",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Children or workers in the household, top-coded at 11
    MemberCount {
        Zero => "0",
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
        ElevenOrMore => "11+",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    VehicleCount {
        Zero => "0",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Five => "5",
        Six => "6",
        SevenOrMore => "7+",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    BicycleCount {
        Zero => "0",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Five => "5",
        Six => "6",
        Seven => "7",
        Eight => "8",
        Nine => "9",
        TenOrMore => "10+",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Mexico border crossings in the past 30 days
    CrossBorderFrequency {
        Zero => "0",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        Five => "5",
        Six => "6",
        Seven => "7",
        Eight => "8",
        Nine => "9",
        TenOrMore => "10+",
        DontKnow => "Do not know",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

impl VehicleCount {
    /// The count as a number; None for the top-coded bucket and sentinels
    pub fn count(&self) -> Option<u32> {
        self.label().parse().ok()
    }
}

define_category! {
    IncomeDetailed {
        Under15k => "Under $15,000",
        From15kTo30k => "$15,000-$29,999",
        From30kTo45k => "$30,000-$44,999",
        From45kTo60k => "$45,000-$59,999",
        From60kTo75k => "$60,000-$74,999",
        From75kTo100k => "$75,000-$99,999",
        From100kTo125k => "$100,000-$124,999",
        From125kTo150k => "$125,000-$149,999",
        From150kTo200k => "$150,000-$199,999",
        From200kTo250k => "$200,000-$249,999",
        Over250k => "$250,000 or more",
        PreferNotToAnswer => "Prefer not to answer",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// How often a navigation tool is used
    ToolFrequency {
        LessThanWeekly => "Less than once a week",
        FewTimesAWeek => "A few times a week",
        Daily => "Daily or more",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Navigation tools asked about in the recruit survey
    ///
    /// Labels are the column stems (`use_<tool>`, `freq_<tool>`).
    NavigationTool {
        PaperMaps => "paper_maps",
        CarNavigation => "car_navigation",
        Sd511 => "511sd",
        AppleMaps => "apple_maps",
        Car2go => "car2go",
        GoogleMaps => "google_maps",
        IcommuteSd => "icommutesd",
        Lyft => "lyft",
        MapMyRide => "mapmyride",
        MapQuest => "mapquest",
        Sdmts => "sdmts",
        Nctd => "nctd",
        Waze => "waze",
        Uber => "uber",
        OtherTool => "other_tool",
    }
}

// ----------------------------------------------------------------------------
// Persons
// ----------------------------------------------------------------------------

define_category! {
    /// Relationship to the household's primary respondent
    Relationship {
        SelfRespondent => "Self",
        Partner => "Husband/Wife/Partner",
        Child => "Son/Daughter/In-law",
        Parent => "Mother/Father/In-law",
        Sibling => "Brother/Sister/In-law",
        OtherRelative => "Other relative",
        Roommate => "Roommate/Friend",
        HouseholdHelp => "Household help",
        Other => "Other",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    Gender {
        Male => "Male",
        Female => "Female",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    AgeCategory {
        Under5 => "Under 5 years old",
        From5To15 => "5-15 years",
        From16To17 => "16-17 years",
        From18To24 => "18-24 years",
        From25To34 => "25-34 years",
        From35To44 => "35-44 years",
        From45To49 => "45-49 years",
        From50To54 => "50-54 years",
        From55To59 => "55-59 years",
        From60To64 => "60-64 years",
        From65To74 => "65-74 years",
        From75To79 => "75-79 years",
        From80To84 => "80-84 years",
        Over85 => "85 years or older",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    EmploymentStatus {
        FullTime => "Employed full-time (paid) 35+ hours/week",
        PartTime => "Employed part-time (paid) up to 35 hours/week",
        Volunteer => "Unpaid volunteer or intern",
        NotEmployed => "Not currently employed",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Number of jobs held; zero is only asked of persons 16 and over
    JobCount {
        Zero => "0 (age 16+)",
        One => "1",
        Two => "2",
        Three => "3",
        Four => "4",
        FiveOrMore => "5+",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    StudentStatus {
        NotAStudent => "Not a student",
        PartTime => "Part-time student",
        FullTime => "Full-time student",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Highest educational attainment
    Education {
        LessThanHighSchool => "Less than high school",
        HighSchool => "High school graduate/GED",
        SomeCollege => "Some college",
        Vocational => "Vocational/technical training",
        Associates => "Associates degree",
        Bachelor => "Bachelor degree",
        Graduate => "Graduate/post-graduate degree",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    MilitaryStatus {
        NoAffiliation => "No current affiliation with the military",
        ActiveDutyInRegion => "Active duty within the San Diego region",
        ActiveDutyOutsideRegion => "Active duty outside of the San Diego region",
        Reserve => "Reserve or National Guard",
        DefenseCivilian => "Department of Defense civilian workforce and/or contractor",
        Veteran => "Veteran",
        OtherAffiliation => "Other affiliation (e.g., spouse or parent of active military)",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    Disability {
        No => "No",
        Yes => "Yes",
        PreferNotToAnswer => "Prefer not to answer",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    PhysicalActivity {
        Rarely => "I rarely or never do any physical activity",
        LightOrModerate => "I do some light or moderate physical activities",
        Vigorous => "I do some vigorous physical activities",
        PreferNotToAnswer => "Prefer not to answer",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    TransitFrequency {
        SixToSevenDays => "6-7 days a week",
        FourToFiveDays => "4-5 days a week",
        TwoToThreeDays => "2-3 days a week",
        OneDay => "1 day a week",
        OneToThreeDaysAMonth => "1-3 days per month",
        LessThanMonthly => "Less than monthly",
        Never => "Never",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Transit pass held, with its monthly price where one applies
    TransitPass {
        AdultRegional => "Monthly Adult Regional Compass Card: $72",
        AdultPremium => "Monthly Adult Premium Compass Card: $100",
        AdultCoaster => "Monthly Adult COASTER Compass Card: by zone",
        CollegeSemester => "MTS College Semester Pass",
        CollegeMonthly => "MTS College Monthly Pass",
        UcsdUPass => "UC San Diego Annual U-Pass",
        YouthRegional => "Monthly Youth Regional Compass Card: $36",
        YouthPremium => "Monthly Youth Premium Compass Card: $50",
        YouthCoaster => "Monthly Youth COASTER Compass Card: $82.50",
        SeniorRegional => "Monthly Senior/Disabled/Medicare Regional Compass Card: $18",
        SeniorPremium => "Monthly Senior/Disabled/Medicare Premium Compass Card: $25",
        SeniorCoaster => "Monthly Senior/Disabled/Medicare COASTER Compass Card: $41.25",
        OtherPass => "Other transit pass (e.g., free, employee, etc.)",
        NoPass => "Do not have a transit pass",
        DoNotKnow => "Do not know",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    SchoolType {
        Home => "Cared for at home",
        Daycare => "Daycare outside home",
        Preschool => "Preschool",
        Elementary => "Kindergarten-Grade 5 (public or private)",
        ElementaryHomeSchool => "Kindergarten-Grade 5 (home school)",
        Middle => "Grade 6-Grade 8 (public or private)",
        MiddleHomeSchool => "Grade 6-Grade 8 (home school)",
        High => "Grade 9-Grade 12 (public or private)",
        HighHomeSchool => "Grade 9-Grade 12 (home school)",
        Vocational => "Vocational/technical school",
        TwoYearCollege => "2-year college",
        FourYearCollege => "4-year college",
        Graduate => "Graduate or professional school",
        Other => "Other",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    SchoolFrequency {
        SixToSevenDays => "6-7 days a week",
        FiveDays => "5 days a week",
        ThreeToFourDays => "3-4 days a week",
        OneToTwoDays => "1-2 days a week",
        OneToThreeDaysAMonth => "1-3 days per month",
        LessThanMonthly => "Less than monthly",
        OnlineOnly => "Never, only takes online classes",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// How often a second school location is attended
    OtherSchoolFrequency {
        Never => "Never, only 1 school location",
        Weekly => "1 or more days a week",
        FewTimesAMonth => "A few times per month",
        LessThanMonthly => "Less than monthly",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Usual mode to school or work
    CommuteMode {
        DriveAlone => "Drive alone",
        CarpoolHousehold => "Carpool with only family/household member(s)",
        CarpoolOther => "Carpool with at least one person not in household",
        Motorcycle => "Motorcycle/moped/scooter",
        Walk => "Walk/jog/wheelchair",
        Bicycle => "Bicycle",
        SchoolBus => "School bus",
        Bus => "Bus (public transit)",
        PrivateShuttle => "Private shuttle bus",
        Vanpool => "Vanpool",
        LightRail => "Light Rail (e.g., Trolley, SPRINTER)",
        IntercityRail => "Intercity Rail (e.g., COASTER, Amtrak)",
        Paratransit => "Paratransit",
        Taxi => "Taxi or other hired car service (e.g., Lyft, Uber)",
        Other => "Other",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Drop-off time at daycare
    DaycareOpen {
        Before => "Before 6 AM",
        At600 => "6:00 AM",
        At615 => "6:15 AM",
        At630 => "6:30 AM",
        At645 => "6:45 AM",
        At700 => "7:00 AM",
        At715 => "7:15 AM",
        At730 => "7:30 AM",
        At745 => "7:45 AM",
        At800 => "8:00 AM",
        At815 => "8:15 AM",
        At830 => "8:30 AM",
        After => "After 8:30 AM",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Pick-up time at daycare
    DaycareClose {
        Before => "Before 5 PM",
        At500 => "5:00 PM",
        At515 => "5:15 PM",
        At530 => "5:30 PM",
        At545 => "5:45 PM",
        At600 => "6:00 PM",
        At615 => "6:15 PM",
        At630 => "6:30 PM",
        At645 => "6:45 PM",
        At700 => "7:00 PM",
        At715 => "7:15 PM",
        At730 => "7:30 PM",
        After => "After 7:30 PM",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    WorkLocationType {
        OneLocation => "Has one work location (outside of home, may also telework)",
        Varies => "Work location regularly varies (work in different offices or jobsites)",
        HomeOnly => "Work at home only (only telework or self-employed)",
        DriveForALiving => "Drive/Travel for a living (e.g., bus/truck driver, salesman)",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Standard occupational classification major group
    Occupation {
        Management => "Management Occupations",
        Business => "Business & Financial Operations",
        Computer => "Computer & Mathematical",
        Engineering => "Architecture & Engineering",
        Science => "Life, Physical, & Social Science",
        SocialServices => "Community & Social Services",
        Legal => "Legal",
        Education => "Education, Training, & Library",
        Arts => "Arts, Design, Entertainment, Sports, & Media",
        HealthcarePractitioners => "Healthcare Practitioners & Technical",
        HealthcareSupport => "Healthcare Support",
        ProtectiveService => "Protective Service",
        FoodService => "Food Preparation & Serving Related",
        Cleaning => "Building & Grounds Cleaning/Maintenance",
        PersonalCare => "Personal Care & Service",
        Sales => "Sales & Related",
        Office => "Office & Administrative Support",
        Farming => "Farming, Fishing, & Forestry",
        Construction => "Construction & Extraction",
        Repair => "Installation, Maintenance, & Repair",
        Production => "Production",
        Transportation => "Transportation & Material Moving",
        Military => "Military",
        Other => "Other",
        DoNotKnow => "Do not know",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    Industry {
        Accommodation => "Accommodation (e.g., hotels/motels)",
        Administrative => "Administrative, Support, & Waste Management Services",
        Agriculture => "Agriculture, Forestry, Fishing, & Hunting",
        Arts => "Arts, Entertainment, & Recreation",
        Construction => "Construction",
        Education => "Education Services",
        FoodServices => "Food Services & Drinking Places",
        Finance => "Finance & Insurance",
        HealthCare => "Health Care & Social Assistance",
        Information => "Information",
        Management => "Management of Companies & Enterprises",
        Manufacturing => "Manufacturing",
        Military => "Military",
        Mining => "Mining, Quarrying, & Oil/Gas Extraction",
        OtherServices => "Other Services",
        Professional => "Professional, Scientific, & Technical Services",
        PublicAdministration => "Public Administration",
        RealEstate => "Real Estate, Rental, & Leasing",
        Retail => "Retail Trade",
        Transportation => "Transportation & Warehousing",
        Utilities => "Utilities",
        Wholesale => "Wholesale Trade",
        Other => "Other",
        DoNotKnow => "Do not know",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// Hours worked per week
    HoursWorked {
        Over50 => "50 or more hours",
        From40To49 => "40-49 hours",
        From35To39 => "35-39 hours",
        From30To34 => "30-34 hours",
        From20To29 => "20-29 hours",
        From10To19 => "10-19 hours",
        Under10 => "Fewer than 10 hours",
        Varies => "Hours vary greatly from week to week",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    /// How often a person commutes or telecommutes
    CommuteFrequency {
        SixToSevenDays => "6-7 days a week",
        FiveDays => "5 days a week",
        FourDays => "4 days a week",
        TwoToThreeDays => "2-3 days a week",
        OneDay => "1 day a week",
        NineDaysInTwoWeeks => "9 days every 2 weeks",
        OneToThreeDaysAMonth => "1-3 days per month",
        LessThanMonthly => "Less than monthly",
        Never => "Never",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    WorkArrivalFlexibility {
        Fixed => "No flexibility (must always arrive on time)",
        UpTo15Minutes => "Can arrive up to 15 minutes earlier/later",
        UpTo30Minutes => "Can arrive up to 30 minutes earlier/later",
        UpTo45Minutes => "Can arrive up to 45 minutes earlier/later",
        OverAnHour => "Can arrive more than an hour earlier/later",
        OwnSchedule => "Sets own schedule (start time can vary greatly)",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    WorkParkingPayment {
        NoCost => "No cost to anyone to park at/near work",
        EmployerPays => "Employer pays all parking costs",
        DiscountedMonthly => "Employer offers discounted monthly parking pass",
        DiscountedOther => "Employer offers discounted other (e.g., daily, weekly) parking pass",
        PersonalMonthly => "Personally pay all cost for monthly parking pass",
        PersonalDaily => "Personally pay all cost for daily parking",
        PersonalOther => "Personally pay for parking on other (daily, biweekly, annual) schedule",
        DoNotKnow => "Do not know",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    WorkParkingEase {
        Easy => "Easy to find a parking spot",
        Difficult => "Difficult to find a parking spot (usually takes a few minutes)",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    SmartphoneType {
        Android => "Yes, has an Android phone",
        IPhone => "Yes, has an iPhone",
        Windows => "Yes, has a Windows Phone",
        Blackberry => "Yes, has a Blackberry",
        Other => "Yes, has other type of smartphone",
        NoSmartphone => "No, does not have a smartphone",
        Missing => "Missing",
        NotApplicable => "Not Applicable",
    }
}

// ----------------------------------------------------------------------------
// Vehicles and border crossings
// ----------------------------------------------------------------------------

define_category! {
    FuelType {
        Gas => "Gas",
        Diesel => "Diesel",
        Hybrid => "Hybrid",
        Electric => "Electric",
        FlexFuel => "Flex Fuel",
        Other => "Other",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    HowObtained {
        Own => "Own",
        Lease => "Lease",
        Employer => "Employer/Institutional Car",
        Other => "Other",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    ResidenceParkingPass {
        Permit => "Yes, vehicle has permit for parking at/near residence",
        AtResidence => "No pass needed - typically park at residence",
        OnStreet => "No pass needed - typically park on street",
        Elsewhere => "No pass needed - typically park elsewhere",
        NotApplicable => "Not Applicable",
    }
}

define_category! {
    BorderMode {
        OwnVehicle => "My own vehicle (or motorcycle)",
        OtherVehicle => "Other vehicle (e.g., rental, carshare, taxi, work car, friends)",
        Bus => "Bus/shuttle",
        Walk => "Walking (or biking)",
        Airplane => "Airplane (or helicopter)",
        Other => "Other way of traveling",
    }
}

define_category! {
    PortOfEntry {
        OtayMesa => "Otay Mesa (SR-905) Port of Entry",
        SanYsidro => "San Ysidro (I-5/I-805) Port of Entry",
        Tecate => "Tecate (SR 188) Port of Entry",
        CrossBorderTerminal => "Cross-border Terminal, Tijuana Intl Airport (pedestrian only)",
        Other => "Other",
    }
}

define_category! {
    BorderPurpose {
        DropOffPickUp => "Drop-off/pick-up someone (e.g., at Tijuana Intl Airport)",
        Social => "Social (visit friends/family)",
        Leisure => "Leisure/recreation/vacation",
        Work => "Work/business-related",
        PersonalBusiness => "Personal business (e.g., medical appointment)",
        Other => "Other",
    }
}

define_category! {
    BorderDuration {
        UnderOneDay => "Less than 1 day",
        OneToTwoDays => "1-2 days",
        ThreeToFiveDays => "3-5 days",
        SixToTenDays => "6-10 days",
        OverTenDays => "More than 10 days",
    }
}

define_category! {
    BorderPartySize {
        Alone => "1 (I traveled alone)",
        Two => "2 persons total",
        Three => "3 persons total",
        Four => "4 persons total",
        FiveOrMore => "5 or more persons total (including me)",
    }
}
