//! Risk scoring, campaign sizing, and priority-ordered dose allocation.
//!
//! A run is strictly sequential: every district is scored and sized first, then the
//! allocator walks the complete list once against a dose budget owned by that run.

mod allocation;
mod campaign;
mod config;
pub mod domain;
mod error;
mod scoring;

#[cfg(test)]
mod tests;

pub use allocation::{DoseBudget, PriorityAllocator};
pub use campaign::CampaignEstimator;
pub use config::{PlanningConfig, YouthTermPolicy};
pub use domain::{
    AllocationPlan, AllocationRecord, AssessedDistrict, CampaignEstimate, DistrictId,
    DistrictRecord, Priority, PriorityAssessment, RiskComponent, RiskFactor, RiskTier,
};
pub use error::{HazardQuantity, PlanningError};
pub use scoring::RiskScorer;

use std::collections::HashSet;
use tracing::{debug, info};

/// Entry point for callers that only need the allocation table, using the default
/// model constants.
pub fn compute_allocation(
    districts: &[DistrictRecord],
    total_dose_budget: u64,
) -> Result<Vec<AllocationRecord>, PlanningError> {
    let planner = CampaignPlanner::new(PlanningConfig::default());
    planner
        .plan(districts, total_dose_budget)
        .map(|plan| plan.records)
}

/// Holds the model constants; every call to [`CampaignPlanner::plan`] starts a fresh run.
#[derive(Debug, Clone, Default)]
pub struct CampaignPlanner {
    config: PlanningConfig,
}

impl CampaignPlanner {
    pub fn new(config: PlanningConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PlanningConfig {
        &self.config
    }

    pub fn plan(
        &self,
        districts: &[DistrictRecord],
        total_doses: u64,
    ) -> Result<AllocationPlan, PlanningError> {
        PlanningRun::new(&self.config, total_doses).execute(districts)
    }

    /// Scores and sizes every district without touching a dose budget.
    pub fn assess<'d>(
        &self,
        districts: &'d [DistrictRecord],
    ) -> Result<Vec<AssessedDistrict<'d>>, PlanningError> {
        PlanningRun::new(&self.config, 0).assess(districts)
    }
}

/// Per-invocation context; owns the dose budget for exactly one allocation pass.
struct PlanningRun<'a> {
    config: &'a PlanningConfig,
    total_doses: u64,
}

impl<'a> PlanningRun<'a> {
    fn new(config: &'a PlanningConfig, total_doses: u64) -> Self {
        Self {
            config,
            total_doses,
        }
    }

    fn execute(self, districts: &[DistrictRecord]) -> Result<AllocationPlan, PlanningError> {
        let assessed = self.assess(districts)?;
        let plan = PriorityAllocator::new(self.config, self.total_doses).allocate(&assessed);

        info!(
            districts = plan.records.len(),
            total_doses = plan.total_doses,
            allocated = plan.allocated_doses(),
            remaining = plan.remaining_doses,
            "allocation run complete"
        );

        Ok(plan)
    }

    fn assess<'d>(
        &self,
        districts: &'d [DistrictRecord],
    ) -> Result<Vec<AssessedDistrict<'d>>, PlanningError> {
        if districts.is_empty() {
            return Err(PlanningError::NoDistricts);
        }

        let mut seen = HashSet::with_capacity(districts.len());
        if let Some(duplicate) = districts.iter().find(|district| !seen.insert(&district.id)) {
            return Err(PlanningError::DuplicateDistrict(duplicate.id.clone()));
        }

        let scorer = RiskScorer::new(self.config);
        let estimator = CampaignEstimator::new(self.config);

        districts
            .iter()
            .map(|district| {
                let assessment = scorer.score(district)?;
                let estimate = estimator.estimate(district, &assessment)?;

                debug!(
                    district = %district.id,
                    priority = assessment.priority.value(),
                    risk_score = assessment.risk_score,
                    campaign_days = estimate.campaign_length_days,
                    "district assessed"
                );

                Ok(AssessedDistrict {
                    district,
                    assessment,
                    estimate,
                })
            })
            .collect()
    }
}
