use super::common::*;
use crate::planning::domain::{DistrictRecord, Priority, RiskFactor, RiskTier};
use crate::planning::scoring::priority_for;
use crate::planning::{HazardQuantity, PlanningError, RiskScorer, YouthTermPolicy};

#[test]
fn completed_campaign_is_always_protected() {
    let config = config();
    let scorer = RiskScorer::new(&config);
    let district = DistrictRecord {
        vaccinated_count: 0,
        case_count: 15_000,
        percent_population_60_plus: 0.45,
        ..completed_district("Gulu")
    };

    let assessment = scorer.score(&district).expect("scores");

    assert_eq!(assessment.priority, Priority::Protected);
    assert!(assessment.risk_tier.is_none());
    assert!(assessment.components.is_empty());
}

#[test]
fn herd_immunity_coverage_is_protected() {
    let config = config();
    let scorer = RiskScorer::new(&config);
    // 18,400 of 23,000 is exactly the 80% threshold.
    let district = DistrictRecord {
        vaccinated_count: 18_400,
        case_count: 10_000,
        percent_population_60_plus: 0.40,
        ..district("Lira")
    };

    let assessment = scorer.score(&district).expect("scores");

    assert_eq!(assessment.priority, Priority::Protected);
    assert!((assessment.true_population - 23_000.0).abs() < 1e-9);
}

fn coverage_points(vaccinated_count: u64) -> u8 {
    let config = config();
    let district = DistrictRecord {
        vaccinated_count,
        ..district("Mbale")
    };

    RiskScorer::new(&config)
        .score(&district)
        .expect("scores")
        .components
        .iter()
        .find(|component| component.factor == RiskFactor::CoverageGap)
        .map(|component| component.points)
        .expect("coverage component")
}

#[test]
fn coverage_gap_boundaries_fall_to_highest_bucket() {
    // Against 23,000 people: 4,600 is 20%, 9,200 is 40%, 13,800 is 60%.
    for vaccinated in [4_600, 9_200, 13_800] {
        assert_eq!(
            coverage_points(vaccinated),
            8,
            "{vaccinated} vaccinated should score +8"
        );
    }

    assert_eq!(coverage_points(16_100), 2);
    assert_eq!(coverage_points(11_500), 4);
    assert_eq!(coverage_points(6_900), 6);
    assert_eq!(coverage_points(1_150), 8);
}

#[test]
fn tiers_split_on_twelve_and_fifteen() {
    assert_eq!(RiskTier::from_score(7), RiskTier::Low);
    assert_eq!(RiskTier::from_score(12), RiskTier::Low);
    assert_eq!(RiskTier::from_score(13), RiskTier::Moderate);
    assert_eq!(RiskTier::from_score(15), RiskTier::Moderate);
    assert_eq!(RiskTier::from_score(16), RiskTier::High);
}

#[test]
fn priority_rules_apply_in_order() {
    assert_eq!(priority_for(RiskTier::High, 0.30), Priority::Critical);
    assert_eq!(priority_for(RiskTier::Moderate, 0.45), Priority::Critical);
    assert_eq!(priority_for(RiskTier::Low, 0.45), Priority::Elevated);
    assert_eq!(priority_for(RiskTier::Low, 0.06), Priority::Elevated);
    assert_eq!(priority_for(RiskTier::Moderate, 0.20), Priority::Elevated);
    assert_eq!(priority_for(RiskTier::Moderate, 0.19), Priority::High);
    assert_eq!(priority_for(RiskTier::High, 0.29), Priority::High);
    assert_eq!(priority_for(RiskTier::Low, 0.05), Priority::Low);
    assert_eq!(priority_for(RiskTier::Low, 0.0), Priority::Low);
}

#[test]
fn baseline_district_scores_moderate_risk() {
    let config = config();
    let scorer = RiskScorer::new(&config);

    let assessment = scorer.score(&district("Mbale")).expect("scores");

    // youth +3, coverage (10%) +8, elderly (10%) +3
    assert_eq!(assessment.risk_score, 14);
    assert_eq!(assessment.risk_tier, Some(RiskTier::Moderate));
    assert_eq!(assessment.priority, Priority::High);
    assert_eq!(assessment.components.len(), 3);
    assert!((assessment.percent_vaccinated - 0.1).abs() < 1e-12);
}

#[test]
fn outbreak_district_is_critical() {
    let config = config();
    let scorer = RiskScorer::new(&config);

    let assessment = scorer
        .score(&outbreak_district("Arua", 869.57))
        .expect("scores");

    assert_eq!(assessment.risk_score, 20);
    assert_eq!(assessment.risk_tier, Some(RiskTier::High));
    assert_eq!(assessment.priority, Priority::Critical);
}

#[test]
fn observed_youth_term_ignores_nonzero_counts() {
    let config = config();
    let scorer = RiskScorer::new(&config);
    let district = DistrictRecord {
        population_under15: 9_000,
        ..district("Soroti")
    };

    let assessment = scorer.score(&district).expect("scores");
    let youth = assessment
        .components
        .iter()
        .find(|component| component.factor == RiskFactor::YouthSusceptibility)
        .expect("youth component");

    assert_eq!(youth.points, 3);
}

#[test]
fn share_youth_term_uses_under_fifteen_ratio() {
    let config = config().with_youth_term(YouthTermPolicy::UnderFifteenShare);
    let scorer = RiskScorer::new(&config);

    let young = DistrictRecord {
        population_under15: 8_000,
        ..district("Soroti")
    };
    let mixed = DistrictRecord {
        population_under15: 3_000,
        ..district("Tororo")
    };

    let youth_points = |record: &DistrictRecord| {
        scorer
            .score(record)
            .expect("scores")
            .components
            .iter()
            .find(|component| component.factor == RiskFactor::YouthSusceptibility)
            .map(|component| component.points)
            .expect("youth component")
    };

    assert_eq!(youth_points(&young), 1);
    assert_eq!(youth_points(&mixed), 2);

    // 12 points drops the district to low risk; 2% cases is below the sporadic threshold.
    let assessment = scorer.score(&young).expect("scores");
    assert_eq!(assessment.risk_tier, Some(RiskTier::Low));
    assert_eq!(assessment.priority, Priority::Low);
}

#[test]
fn youth_policy_parses_config_values() {
    assert_eq!(
        YouthTermPolicy::parse("as_observed"),
        Some(YouthTermPolicy::AsObserved)
    );
    assert_eq!(
        YouthTermPolicy::parse(" Under_Fifteen_Share "),
        Some(YouthTermPolicy::UnderFifteenShare)
    );
    assert_eq!(YouthTermPolicy::parse("inverted"), None);
}

#[test]
fn zero_population_is_reported() {
    let config = config();
    let scorer = RiskScorer::new(&config);
    let district = DistrictRecord {
        estimated_total_population: 0.0,
        ..district("Kotido")
    };

    let error = scorer.score(&district).expect_err("zero population fails");

    match error {
        PlanningError::Computation {
            district, quantity, ..
        } => {
            assert_eq!(district.as_str(), "Kotido");
            assert_eq!(quantity, HazardQuantity::TruePopulation);
        }
        other => panic!("expected computation error, got {other:?}"),
    }
}
