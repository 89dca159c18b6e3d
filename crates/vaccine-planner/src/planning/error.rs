use std::fmt;

use super::domain::DistrictId;

/// Denominators that can legitimately be zero in the source data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardQuantity {
    TruePopulation,
    MinutesPerDose,
    DosesPerDay,
}

impl HazardQuantity {
    pub const fn label(self) -> &'static str {
        match self {
            Self::TruePopulation => "true_population",
            Self::MinutesPerDose => "minutes_to_administer_one_dose",
            Self::DosesPerDay => "doses_administered_per_day",
        }
    }
}

impl fmt::Display for HazardQuantity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Failures that abort a planning run.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlanningError {
    #[error("no districts supplied for planning")]
    NoDistricts,
    #[error("district {0} appears more than once")]
    DuplicateDistrict(DistrictId),
    #[error("district {district}: {quantity} is {value}, cannot divide by it")]
    Computation {
        district: DistrictId,
        quantity: HazardQuantity,
        value: f64,
    },
}

impl PlanningError {
    pub(crate) fn hazard(district: &DistrictId, quantity: HazardQuantity, value: f64) -> Self {
        Self::Computation {
            district: district.clone(),
            quantity,
            value,
        }
    }
}
