use serde::{Deserialize, Serialize};

use super::domain::Priority;

/// How the youth-susceptibility term reads the under-15 population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum YouthTermPolicy {
    /// Matches the deployed scorer: a non-zero under-15 count is read as zero, so the
    /// term always contributes its maximum.
    #[default]
    AsObserved,
    /// Uses the actual under-15 share of the true population.
    UnderFifteenShare,
}

impl YouthTermPolicy {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "as_observed" | "observed" => Some(Self::AsObserved),
            "under_fifteen_share" | "share" => Some(Self::UnderFifteenShare),
            _ => None,
        }
    }

    pub(crate) fn effective_under15(self, population_under15: u64) -> u64 {
        match self {
            Self::AsObserved if population_under15 != 0 => 0,
            _ => population_under15,
        }
    }
}

/// Model constants shared by the scorer, the estimator, and the allocator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanningConfig {
    pub herd_immunity_threshold: f64,
    /// Fraction added to facility population estimates to cover undercounting.
    pub population_margin: f64,
    pub site_hours_open: f64,
    pub staff_per_site: u64,
    pub stations_per_site: f64,
    pub doses_per_person: f64,
    /// Coverage goal per priority class, indexed by `priority - 1`.
    pub target_coverage: [f64; 5],
    pub youth_term: YouthTermPolicy,
}

impl Default for PlanningConfig {
    fn default() -> Self {
        Self {
            herd_immunity_threshold: 0.8,
            population_margin: 0.15,
            site_hours_open: 10.0,
            staff_per_site: 4,
            stations_per_site: 2.0,
            doses_per_person: 2.0,
            target_coverage: [0.10, 0.20, 0.40, 0.60, 0.80],
            youth_term: YouthTermPolicy::AsObserved,
        }
    }
}

impl PlanningConfig {
    pub fn with_youth_term(mut self, policy: YouthTermPolicy) -> Self {
        self.youth_term = policy;
        self
    }

    pub fn target_for(&self, priority: Priority) -> f64 {
        self.target_coverage[priority.index()]
    }

    pub fn true_population(&self, estimated: f64) -> f64 {
        estimated + estimated * self.population_margin
    }
}
