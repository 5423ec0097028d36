use std::collections::hash_map::DefaultHasher;
use std::hash::{Hash, Hasher};

use rand::Rng;
use serde::Serialize;

use super::super::catalog::CriteriaCatalog;
use super::super::domain::VendorId;

/// Neutral score returned when the criterion is not in the catalog.
pub const FALLBACK_SCORE: f64 = 75.0;
/// Confidence attached to the neutral fallback.
pub const FALLBACK_CONFIDENCE: f64 = 50.0;

const JITTER: f64 = 2.5;
const CONFIDENCE_LOW: f64 = 70.0;
const CONFIDENCE_HIGH: f64 = 95.0;

/// A non-binding score suggestion. Accepting one is a distinct user action
/// that writes `manual_score`; the generator itself never does.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AiRecommendation {
    pub score: f64,
    pub confidence: f64,
    pub justification: String,
}

/// Draws per-vendor score suggestions from each criterion's band.
///
/// The base position within the band comes from a stable hash of the vendor
/// id, so repeat calls for the same vendor/criterion pair share a baseline and
/// a justification; only the bounded jitter and the confidence draw vary.
#[derive(Debug, Clone)]
pub struct RecommendationEngine {
    catalog: CriteriaCatalog,
}

impl RecommendationEngine {
    pub fn new(catalog: CriteriaCatalog) -> Self {
        Self { catalog }
    }

    pub fn recommend(&self, vendor_id: &VendorId, criterion_name: &str) -> AiRecommendation {
        let Some(criterion) = self.catalog.get(criterion_name) else {
            // Unknown criterion feeds a non-binding hint only: degrade, don't fail.
            return AiRecommendation {
                score: FALLBACK_SCORE,
                confidence: FALLBACK_CONFIDENCE,
                justification: "No rubric guidance available for this criterion.".to_string(),
            };
        };

        let seed = vendor_baseline(vendor_id);
        let band = criterion.ai_band;
        let base = band.low + seed_fraction(seed) * band.span();

        let mut rng = rand::thread_rng();
        let jitter = rng.gen_range(-JITTER..=JITTER);
        let score = round1(band.clamp(base + jitter));
        let confidence = rng.gen_range(CONFIDENCE_LOW..CONFIDENCE_HIGH);

        let justification = if criterion.rationales.is_empty() {
            format!("Scored within the expected range for {}.", criterion.name)
        } else {
            criterion.rationales[seed as usize % criterion.rationales.len()].clone()
        };

        AiRecommendation {
            score,
            confidence,
            justification,
        }
    }
}

// DefaultHasher::new() uses fixed SipHash keys, so the baseline is stable
// across calls and across runs.
fn vendor_baseline(vendor_id: &VendorId) -> u64 {
    let mut hasher = DefaultHasher::new();
    vendor_id.0.hash(&mut hasher);
    hasher.finish()
}

fn seed_fraction(seed: u64) -> f64 {
    (seed % 1_000) as f64 / 1_000.0
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
