//! Household Survey Domain
//!
//! Household-scoped records of the travel behavior survey:
//!
//! - **Household**: recruitment, composition, geocoded home, navigation tool
//!   use and expansion weights
//! - **Person**: demographics, school/work and their geocoded places, diary
//!   completion for up to seven travel days
//! - **Vehicle**: the household vehicle roster, with the reserved
//!   `(0, 0)` row standing for "no vehicle"
//! - **Intercept**: the active-transportation intercept record, one per household
//! - **BorderTrip**: up to four cross-border trips per household
//!
//! # Examples
//!
//! ```rust
//! use core_kernel::HouseholdId;
//! use domain_household::vehicle::{Vehicle, VehicleRef};
//!
//! let sentinel = Vehicle::not_applicable();
//! assert!(sentinel.is_sentinel());
//!
//! let car = VehicleRef::new(HouseholdId::new(10), 1).unwrap();
//! assert_eq!(VehicleRef::to_storage_key(Some(car)), (10, 1));
//! assert_eq!(VehicleRef::to_storage_key(None), VehicleRef::SENTINEL_KEY);
//! ```

pub mod categories;
pub mod household;
pub mod person;
pub mod vehicle;
pub mod intercept;
pub mod border_trip;
pub mod error;

pub use categories::{
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
pub use household::{
    Composition, Household, HouseholdWeights, NavigationUsage, Recruitment, Residence, ToolUsage,
};
pub use person::{
    CommuteSubsidy, Demographics, DiaryParticipation, Employment, Ethnicity, Person,
    PersonPlaces, Schooling, Smartphone, MAX_TRAVEL_DAYS,
};
pub use vehicle::{Vehicle, VehicleRef, MAX_HOUSEHOLD_VEHICLE};
pub use intercept::{DiaryFollowUp, Intercept, InterceptEnd, InterceptRespondent};
pub use border_trip::{BorderTrip, MAX_BORDER_TRIPS};
pub use error::HouseholdError;
