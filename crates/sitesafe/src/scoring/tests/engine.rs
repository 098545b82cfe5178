use super::common::{mixed_parameters, perfect_parameters};
use crate::scoring::catalog::{ParameterCatalog, ParameterKey, ScoringPolicy};
use crate::scoring::engine::{score_parameter, Rating, ScoringEngine};

#[test]
fn met_target_earns_full_weight_under_every_policy() {
    for policy in [
        ScoringPolicy::Ratio,
        ScoringPolicy::InvertedRatio,
        ScoringPolicy::Binary,
    ] {
        assert_eq!(score_parameter(0.0, 0.0, 8.0, policy), 8.0);
        assert_eq!(score_parameter(50.0, 50.0, 5.0, policy), 5.0);
        assert_eq!(score_parameter(0.25, 0.25, 2.5, policy), 2.5);
    }
}

#[test]
fn binary_policy_is_all_or_nothing() {
    // Incident parameter: weight 8, target conventionally 0.
    assert_eq!(
        score_parameter(0.0, 0.0, 8.0, ScoringPolicy::Binary),
        8.0
    );
    assert_eq!(
        score_parameter(0.0, 3.0, 8.0, ScoringPolicy::Binary),
        0.0
    );
    assert_eq!(
        score_parameter(0.0, 0.5, 8.0, ScoringPolicy::Binary),
        0.0
    );
}

#[test]
fn ratio_policy_gives_proportional_credit_capped_at_weight() {
    // manDays: 950 of 1000 against weight 2 earns 1.9 points.
    let points = score_parameter(1000.0, 950.0, 2.0, ScoringPolicy::Ratio);
    assert!((points - 1.9).abs() < 1e-12);

    // Exceeding target earns no bonus beyond the cap.
    assert_eq!(
        score_parameter(20.0, 22.0, 5.0, ScoringPolicy::Ratio),
        5.0
    );

    // Undefined target scores nothing.
    assert_eq!(score_parameter(0.0, 7.0, 5.0, ScoringPolicy::Ratio), 0.0);
}

#[test]
fn ratio_policy_is_monotonic_in_actual() {
    let mut previous = -1.0;
    for actual in 0..=20 {
        let points = score_parameter(10.0, actual as f64, 5.0, ScoringPolicy::Ratio);
        assert!(points >= previous);
        assert!((0.0..=5.0).contains(&points));
        previous = points;
    }
}

#[test]
fn inverted_ratio_rewards_staying_at_or_below_target() {
    // wasteGenerated: 600 against a target of 500 with weight 2.
    let points = score_parameter(500.0, 600.0, 2.0, ScoringPolicy::InvertedRatio);
    assert!((points - 500.0 / 600.0 * 2.0).abs() < 1e-12);

    assert_eq!(
        score_parameter(500.0, 400.0, 2.0, ScoringPolicy::InvertedRatio),
        2.0
    );
    assert_eq!(
        score_parameter(500.0, 0.0, 2.0, ScoringPolicy::InvertedRatio),
        2.0
    );
    assert_eq!(
        score_parameter(0.0, 5.0, 2.0, ScoringPolicy::InvertedRatio),
        0.0
    );
}

#[test]
fn inverted_ratio_decays_toward_but_never_reaches_zero() {
    let mut previous = f64::INFINITY;
    for actual in [600.0, 1_000.0, 10_000.0, 1_000_000.0] {
        let points = score_parameter(500.0, actual, 2.0, ScoringPolicy::InvertedRatio);
        assert!(points > 0.0);
        assert!(points < previous);
        previous = points;
    }
}

#[test]
fn scorer_is_total_and_does_not_validate_inputs() {
    // Negative and oversized values are rejected by the boundary guard, not
    // here; the scorer still returns a number for them.
    let points = score_parameter(10.0, -5.0, 5.0, ScoringPolicy::Ratio);
    assert!(points.is_finite());
    let points = score_parameter(-10.0, 5.0, 5.0, ScoringPolicy::InvertedRatio);
    assert!(points.is_finite());
}

#[test]
fn rating_boundaries_are_inclusive_lower_bounds() {
    assert_eq!(Rating::from_percentage(71.0), Rating::High);
    assert_eq!(Rating::from_percentage(70.999), Rating::Medium);
    assert_eq!(Rating::from_percentage(31.0), Rating::Medium);
    assert_eq!(Rating::from_percentage(30.999), Rating::Low);
    assert_eq!(Rating::from_percentage(100.0), Rating::High);
    assert_eq!(Rating::from_percentage(0.0), Rating::Low);
}

#[test]
fn perfect_month_scores_one_hundred_and_rates_high() {
    let catalog = ParameterCatalog::standard();
    let engine = ScoringEngine::new(catalog.clone());

    let scored = engine.score(&perfect_parameters(&catalog));
    assert_eq!(scored.parameters.len(), catalog.len());
    assert!((scored.summary.total_score - 100.0).abs() < 1e-9);
    assert_eq!(scored.summary.total_score, scored.summary.percentage);
    assert_eq!(scored.summary.rating, Rating::High);
}

#[test]
fn aggregate_equals_sum_of_parameter_points() {
    let engine = ScoringEngine::new(ParameterCatalog::standard());
    let scored = engine.score(&mixed_parameters());

    let sum: f64 = scored.parameters.iter().map(|p| p.points).sum();
    assert_eq!(scored.summary.total_score, sum);
    assert_eq!(scored.summary.total_score, scored.summary.percentage);
    assert!((0.0..=100.0).contains(&scored.summary.total_score));
}

#[test]
fn omitted_parameters_earn_no_points_and_no_breakdown_entry() {
    let engine = ScoringEngine::new(ParameterCatalog::standard());
    let scored = engine.score(&mixed_parameters());

    assert_eq!(scored.parameters.len(), mixed_parameters().len());
    assert!(scored
        .parameters
        .iter()
        .all(|p| p.key != ParameterKey::InternalAudit));
}

#[test]
fn stored_scores_stay_on_the_ten_point_scale() {
    let engine = ScoringEngine::new(ParameterCatalog::standard());
    let scored = engine.score(&mixed_parameters());

    for parameter in &scored.parameters {
        assert!(
            (0.0..=10.0).contains(&parameter.stored_score),
            "{:?} stored {}",
            parameter.key,
            parameter.stored_score
        );
    }
}
