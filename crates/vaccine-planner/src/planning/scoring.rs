use super::config::PlanningConfig;
use super::domain::{
    DistrictRecord, Priority, PriorityAssessment, RiskComponent, RiskFactor, RiskTier,
};
use super::error::{HazardQuantity, PlanningError};

/// Stateless scorer that turns a district's indicators into a priority class.
pub struct RiskScorer<'a> {
    config: &'a PlanningConfig,
}

impl<'a> RiskScorer<'a> {
    pub fn new(config: &'a PlanningConfig) -> Self {
        Self { config }
    }

    pub fn score(&self, district: &DistrictRecord) -> Result<PriorityAssessment, PlanningError> {
        let true_population = self
            .config
            .true_population(district.estimated_total_population);
        if !true_population.is_finite() || true_population <= 0.0 {
            return Err(PlanningError::hazard(
                &district.id,
                HazardQuantity::TruePopulation,
                true_population,
            ));
        }

        let percent_vaccinated = district.vaccinated_count as f64 / true_population;
        let percent_cases = district.case_count as f64 / true_population;

        if district.campaign_already_completed
            || percent_vaccinated >= self.config.herd_immunity_threshold
        {
            return Ok(PriorityAssessment {
                priority: Priority::Protected,
                true_population,
                percent_vaccinated,
                percent_cases,
                risk_tier: None,
                risk_score: 0,
                components: Vec::new(),
            });
        }

        let youth_share = self
            .config
            .youth_term
            .effective_under15(district.population_under15) as f64
            / true_population;

        let components = vec![
            youth_component(youth_share),
            coverage_component(percent_vaccinated),
            elderly_component(district.percent_population_60_plus),
        ];
        let risk_score: u8 = components.iter().map(|component| component.points).sum();
        let tier = RiskTier::from_score(risk_score);

        Ok(PriorityAssessment {
            priority: priority_for(tier, percent_cases),
            true_population,
            percent_vaccinated,
            percent_cases,
            risk_tier: Some(tier),
            risk_score,
            components,
        })
    }
}

// Younger populations face lower severe-outcome risk, so a larger share scores lower.
fn youth_component(share: f64) -> RiskComponent {
    let points = if share > 0.30 {
        1
    } else if share > 0.10 {
        2
    } else {
        3
    };

    RiskComponent {
        factor: RiskFactor::YouthSusceptibility,
        points,
        notes: format!("{:.1}% of population under 15", share * 100.0),
    }
}

// Exact band edges (0.2, 0.4, 0.6) fall through to the highest-risk bucket.
fn coverage_component(percent_vaccinated: f64) -> RiskComponent {
    let v = percent_vaccinated;
    let points = if v < 0.8 && v > 0.6 {
        2
    } else if v < 0.6 && v > 0.4 {
        4
    } else if v < 0.4 && v > 0.2 {
        6
    } else {
        8
    };

    RiskComponent {
        factor: RiskFactor::CoverageGap,
        points,
        notes: format!("{:.1}% of population vaccinated", v * 100.0),
    }
}

fn elderly_component(percent_60_plus: f64) -> RiskComponent {
    let points = if percent_60_plus > 0.30 {
        9
    } else if percent_60_plus > 0.20 {
        6
    } else {
        3
    };

    RiskComponent {
        factor: RiskFactor::ElderlyShare,
        points,
        notes: format!("{:.1}% of population aged 60+", percent_60_plus * 100.0),
    }
}

/// Transmission scenarios: community (>= 30% cases), clusters (>= 20%), sporadic (> 5%).
pub(crate) fn priority_for(tier: RiskTier, percent_cases: f64) -> Priority {
    use RiskTier::{High, Low, Moderate};

    if percent_cases >= 0.30 && matches!(tier, Moderate | High) {
        Priority::Critical
    } else if (tier == Low && percent_cases > 0.05) || (tier == Moderate && percent_cases >= 0.20)
    {
        Priority::Elevated
    } else if (tier == Moderate && percent_cases < 0.20) || (tier == High && percent_cases < 0.30) {
        Priority::High
    } else {
        Priority::Low
    }
}
