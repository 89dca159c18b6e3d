use crate::planning::domain::{DistrictId, DistrictRecord};
use crate::planning::PlanningConfig;

/// Baseline district: 20,000 estimated residents (23,000 after the margin), 10%
/// vaccinated, 2% cases, two sites fully staffed. Scores moderate risk, priority 4.
pub(super) fn district(id: &str) -> DistrictRecord {
    DistrictRecord {
        id: DistrictId::new(id),
        population_under15: 5_000,
        estimated_total_population: 20_000.0,
        vaccinated_count: 2_300,
        case_count: 460,
        minutes_to_administer_one_dose: 5.0,
        staff_count: 8,
        vaccine_site_count: 2,
        percent_population_60_plus: 0.10,
        campaign_already_completed: false,
    }
}

/// Unvaccinated district with cases near 45% of the estimate and an old population,
/// which always scores priority 5.
pub(super) fn outbreak_district(id: &str, estimated_total_population: f64) -> DistrictRecord {
    DistrictRecord {
        vaccinated_count: 0,
        case_count: (estimated_total_population * 0.45) as u64,
        percent_population_60_plus: 0.35,
        estimated_total_population,
        ..district(id)
    }
}

pub(super) fn completed_district(id: &str) -> DistrictRecord {
    DistrictRecord {
        campaign_already_completed: true,
        ..district(id)
    }
}

pub(super) fn config() -> PlanningConfig {
    PlanningConfig::default()
}
