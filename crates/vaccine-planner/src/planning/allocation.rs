use tracing::{debug, info};

use super::config::PlanningConfig;
use super::domain::{AllocationPlan, AllocationRecord, AssessedDistrict, Priority};

/// Dose pool drawn down during one allocation pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DoseBudget {
    total: u64,
    remaining: u64,
}

impl DoseBudget {
    pub fn new(total: u64) -> Self {
        Self {
            total,
            remaining: total,
        }
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    pub fn is_exhausted(&self) -> bool {
        self.remaining == 0
    }

    /// Grants the full need when the pool covers it, otherwise whatever is left.
    /// Non-positive needs are granted nothing.
    pub fn draw(&mut self, needed: i64) -> u64 {
        if self.remaining == 0 || needed <= 0 {
            return 0;
        }

        let needed = needed as u64;
        let granted = needed.min(self.remaining);
        self.remaining -= granted;
        granted
    }
}

/// Greedy single-pass distributor, highest priority class first.
pub struct PriorityAllocator<'a> {
    config: &'a PlanningConfig,
    budget: DoseBudget,
}

impl<'a> PriorityAllocator<'a> {
    pub fn new(config: &'a PlanningConfig, total_doses: u64) -> Self {
        Self {
            config,
            budget: DoseBudget::new(total_doses),
        }
    }

    /// Doses needed to lift a district to its priority's coverage goal; may be negative.
    pub fn doses_needed(&self, district: &AssessedDistrict<'_>) -> i64 {
        let target = self.config.target_for(district.assessment.priority);
        let people = district.assessment.true_population * target
            - district.district.vaccinated_count as f64;
        (people * self.config.doses_per_person).round() as i64
    }

    /// People still to vaccinate for herd immunity, independent of the priority target.
    pub fn population_to_vaccinate(&self, district: &AssessedDistrict<'_>) -> i64 {
        (district.assessment.true_population * self.config.herd_immunity_threshold
            - district.district.vaccinated_count as f64)
            .floor() as i64
    }

    pub fn allocate(mut self, districts: &[AssessedDistrict<'_>]) -> AllocationPlan {
        let mut records = Vec::with_capacity(districts.len());

        for priority in Priority::descending() {
            for district in districts
                .iter()
                .filter(|district| district.assessment.priority == priority)
            {
                let needed = self.doses_needed(district);
                let was_exhausted = self.budget.is_exhausted();
                let granted = self.budget.draw(needed);

                debug!(
                    district = %district.district.id,
                    priority = priority.value(),
                    needed,
                    granted,
                    remaining = self.budget.remaining(),
                    "allocated doses"
                );
                if !was_exhausted && self.budget.is_exhausted() {
                    info!(
                        district = %district.district.id,
                        priority = priority.value(),
                        "dose budget exhausted"
                    );
                }

                records.push(AllocationRecord {
                    district_id: district.district.id.clone(),
                    priority,
                    campaign_length_days: district.estimate.campaign_length_days,
                    doses_allocated: granted,
                    population_to_vaccinate: self.population_to_vaccinate(district),
                    additional_staff_needed: district.estimate.additional_staff_needed,
                });
            }
        }

        AllocationPlan {
            total_doses: self.budget.total(),
            remaining_doses: self.budget.remaining(),
            records,
        }
    }
}
