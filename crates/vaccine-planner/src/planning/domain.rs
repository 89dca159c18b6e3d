use serde::{Deserialize, Serialize, Serializer};
use std::fmt;

/// District identifier as it appears in the source extracts.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DistrictId(pub String);

impl DistrictId {
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DistrictId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Joined demographic and epidemiological facts for one district.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DistrictRecord {
    pub id: DistrictId,
    pub population_under15: u64,
    pub estimated_total_population: f64,
    pub vaccinated_count: u64,
    pub case_count: u64,
    pub minutes_to_administer_one_dose: f64,
    pub staff_count: u64,
    pub vaccine_site_count: u64,
    pub percent_population_60_plus: f64,
    pub campaign_already_completed: bool,
}

/// Vaccination priority class, `Protected` (1) through `Critical` (5).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Priority {
    Protected = 1,
    Low = 2,
    Elevated = 3,
    High = 4,
    Critical = 5,
}

impl Priority {
    /// Allocation order: highest need first.
    pub const fn descending() -> [Self; 5] {
        [
            Self::Critical,
            Self::High,
            Self::Elevated,
            Self::Low,
            Self::Protected,
        ]
    }

    pub const fn value(self) -> u8 {
        self as u8
    }

    /// Zero-based position into per-priority tables.
    pub const fn index(self) -> usize {
        self as usize - 1
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Protected => "Protected",
            Self::Low => "Low",
            Self::Elevated => "Elevated",
            Self::High => "High",
            Self::Critical => "Critical",
        }
    }
}

impl TryFrom<u8> for Priority {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Self::Protected),
            2 => Ok(Self::Low),
            3 => Ok(Self::Elevated),
            4 => Ok(Self::High),
            5 => Ok(Self::Critical),
            other => Err(format!("priority must be between 1 and 5, got {other}")),
        }
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.value())
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.value())
    }
}

/// Intermediate classification of the summed risk score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskTier {
    Low,
    Moderate,
    High,
}

impl RiskTier {
    pub const fn from_score(score: u8) -> Self {
        if score <= 12 {
            Self::Low
        } else if score <= 15 {
            Self::Moderate
        } else {
            Self::High
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Low => "Low",
            Self::Moderate => "Moderate",
            Self::High => "High",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RiskFactor {
    YouthSusceptibility,
    CoverageGap,
    ElderlyShare,
}

/// One weighted term of the risk score, kept for audits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskComponent {
    pub factor: RiskFactor,
    pub points: u8,
    pub notes: String,
}

/// Scoring output for a single district.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PriorityAssessment {
    pub priority: Priority,
    pub true_population: f64,
    pub percent_vaccinated: f64,
    pub percent_cases: f64,
    /// `None` when the district took the protected fast path.
    pub risk_tier: Option<RiskTier>,
    pub risk_score: u8,
    pub components: Vec<RiskComponent>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CampaignEstimate {
    pub campaign_length_days: u64,
    pub additional_staff_needed: u64,
    pub doses_per_day: f64,
}

/// One row of the allocation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationRecord {
    pub district_id: DistrictId,
    pub priority: Priority,
    pub campaign_length_days: u64,
    pub doses_allocated: u64,
    pub population_to_vaccinate: i64,
    pub additional_staff_needed: u64,
}

/// District paired with everything derived from it before allocation.
#[derive(Debug, Clone)]
pub struct AssessedDistrict<'a> {
    pub district: &'a DistrictRecord,
    pub assessment: PriorityAssessment,
    pub estimate: CampaignEstimate,
}

/// Ordered allocation table plus the budget it was drawn from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AllocationPlan {
    pub total_doses: u64,
    pub remaining_doses: u64,
    pub records: Vec<AllocationRecord>,
}

impl AllocationPlan {
    pub fn allocated_doses(&self) -> u64 {
        self.records.iter().map(|record| record.doses_allocated).sum()
    }

    pub fn record(&self, district: &str) -> Option<&AllocationRecord> {
        self.records
            .iter()
            .find(|record| record.district_id.as_str() == district)
    }
}
