use super::common::{price_quality_catalog, vendor};
use crate::workflows::sourcing::scoring::recommendation::{
    RecommendationEngine, FALLBACK_CONFIDENCE, FALLBACK_SCORE,
};

#[test]
fn scores_stay_inside_the_criterion_band() {
    let engine = RecommendationEngine::new(price_quality_catalog());
    for round in 0..50 {
        let recommendation = engine.recommend(&vendor(&format!("vendor-{round}")), "Price");
        assert!(
            (70.0..=95.0).contains(&recommendation.score),
            "score {} escaped the Price band",
            recommendation.score
        );
        assert!((70.0..95.0).contains(&recommendation.confidence));
    }
}

#[test]
fn repeat_calls_share_a_baseline_for_the_same_vendor() {
    let engine = RecommendationEngine::new(price_quality_catalog());
    let first = engine.recommend(&vendor("vendor-a"), "Quality");
    let second = engine.recommend(&vendor("vendor-a"), "Quality");

    // Jitter is bounded to +/-2.5 around a stable base, so two draws can
    // differ by at most the jitter window plus one rounding step.
    assert!((first.score - second.score).abs() <= 5.1);
    assert_eq!(first.justification, second.justification);
}

#[test]
fn unknown_criterion_degrades_to_the_neutral_fallback() {
    let engine = RecommendationEngine::new(price_quality_catalog());
    let recommendation = engine.recommend(&vendor("vendor-a"), "Charisma");
    assert_eq!(recommendation.score, FALLBACK_SCORE);
    assert_eq!(recommendation.confidence, FALLBACK_CONFIDENCE);
    assert!(!recommendation.justification.is_empty());
}

#[test]
fn justification_comes_from_the_criterion_pool() {
    let catalog = price_quality_catalog();
    let engine = RecommendationEngine::new(catalog.clone());
    let recommendation = engine.recommend(&vendor("vendor-a"), "Price");
    let pool = &catalog.get("Price").expect("criterion present").rationales;
    assert!(pool.contains(&recommendation.justification));
}
