//! Households
//!
//! One record per recruited household. Composition counts are kept as the
//! survey's top-coded categories ("12+", "Missing") rather than integers.

use std::collections::BTreeMap;

use chrono::{NaiveDate, NaiveDateTime};
use core_kernel::{HouseholdId, Place, Response, Sentinel};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::categories::{
    BicycleCount, CrossBorderFrequency, HouseholdSize, IncomeBroad, IncomeDetailed, Language,
    MemberCount, NavigationTool, RecruitChannel, RecruitDevice, ResidenceDuration, ResidenceType,
    SampleGroup, SampleSegment, TenureStatus, ToolFrequency, VehicleCount,
};

/// A recruited household
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Household {
    pub household_id: HouseholdId,
    pub sample_segment: SampleSegment,
    pub sample_group: SampleGroup,
    pub travel_date_start: Option<NaiveDate>,
    #[validate(nested)]
    pub recruitment: Recruitment,
    pub composition: Composition,
    /// Home location; a household must be geocoded
    #[validate(nested)]
    pub home: Place,
    #[validate(nested)]
    pub residence: Residence,
    #[validate(nested)]
    pub navigation: NavigationUsage,
    pub freq_cross_border: CrossBorderFrequency,
    #[validate(nested)]
    pub weights: HouseholdWeights,
}

impl Household {
    pub fn id(&self) -> HouseholdId {
        self.household_id
    }
}

/// Recruit survey metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Recruitment {
    pub survey_where: RecruitChannel,
    pub survey_mobile: RecruitDevice,
    pub survey_start: NaiveDateTime,
    pub survey_end: NaiveDateTime,
    #[validate(length(max = 25))]
    pub number_rmove_participants: String,
    pub participate_future_studies: Response,
    pub household_completed: Response,
    #[validate(range(min = 0, max = 7))]
    pub completed_days: i32,
    pub language: Language,
    #[validate(length(max = 50))]
    pub language_other: String,
}

/// Household composition as reported
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub persons: HouseholdSize,
    pub adults: HouseholdSize,
    pub children: MemberCount,
    pub workers: MemberCount,
    pub vehicles: VehicleCount,
    pub bicycles: BicycleCount,
    pub has_share_car: Response,
    pub has_share_bicycle: Response,
    pub has_share_vanpool: Response,
}

impl Composition {
    /// Number of vehicles when reported as a plain count ("3"); None for "7+" or sentinels
    pub fn vehicle_count(&self) -> Option<u32> {
        self.vehicles.count()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct Residence {
    pub duration: ResidenceDuration,
    pub tenure_status: TenureStatus,
    pub residence_type: ResidenceType,
    pub income_category_detailed: IncomeDetailed,
    pub income_category_broad: IncomeBroad,
}

/// Use and frequency of one navigation tool
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ToolUsage {
    #[serde(rename = "use")]
    pub used: Response,
    #[serde(rename = "freq")]
    pub frequency: ToolFrequency,
}

impl ToolUsage {
    pub fn unused() -> Self {
        Self {
            used: Response::No,
            frequency: ToolFrequency::NotApplicable,
        }
    }

    pub fn used(frequency: ToolFrequency) -> Self {
        Self {
            used: Response::Yes,
            frequency,
        }
    }

    /// A frequency is only meaningful for a tool that is used
    pub fn is_consistent(&self) -> bool {
        match self.used {
            Response::Yes => self.frequency != ToolFrequency::NotApplicable,
            Response::No => self.frequency == ToolFrequency::NotApplicable,
            _ => true,
        }
    }
}

/// Navigation-tool block of the recruit survey
///
/// Every tool in [`NavigationTool::ALL`] must have an entry; a missing entry
/// is reported at ingestion rather than silently defaulted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Validate)]
pub struct NavigationUsage {
    pub tools: BTreeMap<NavigationTool, ToolUsage>,
    #[validate(length(max = 150))]
    pub specify_other_tool: String,
    pub use_no_navigation_tools: Response,
}

impl NavigationUsage {
    /// The same usage for every tool
    pub fn uniform(usage: ToolUsage) -> Self {
        Self {
            tools: NavigationTool::ALL.iter().map(|tool| (*tool, usage)).collect(),
            specify_other_tool: Sentinel::NotApplicable.text(),
            use_no_navigation_tools: Response::No,
        }
    }

    pub fn usage(&self, tool: NavigationTool) -> Option<&ToolUsage> {
        self.tools.get(&tool)
    }

    /// Tools the record has no entry for
    pub fn missing_tools(&self) -> Vec<NavigationTool> {
        NavigationTool::ALL
            .iter()
            .copied()
            .filter(|tool| !self.tools.contains_key(tool))
            .collect()
    }

    /// Tools whose frequency contradicts their use flag
    pub fn inconsistent_tools(&self) -> Vec<NavigationTool> {
        self.tools
            .iter()
            .filter(|(_, usage)| !usage.is_consistent())
            .map(|(tool, _)| *tool)
            .collect()
    }
}

/// Household expansion weights
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize, Validate)]
pub struct HouseholdWeights {
    #[validate(range(min = 0.0))]
    pub initial: Option<f64>,
    #[validate(range(min = 0.0))]
    pub four_x: Option<f64>,
    #[validate(range(min = 0.0))]
    pub four_five_six_x: Option<f64>,
}
