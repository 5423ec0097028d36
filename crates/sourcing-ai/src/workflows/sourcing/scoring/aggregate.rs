use std::collections::BTreeMap;

use serde::Serialize;

use super::super::domain::{Evaluation, VendorId};

/// Per-vendor rollup of the scoring matrix. Recomputed on every read, never
/// persisted.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct VendorSummary {
    pub vendor_id: VendorId,
    /// Sum of effective scores across the vendor's rows, rounded to 2 dp.
    pub total_score: f64,
    /// Ranking key: sum of effective score x criterion weight, rounded to 2 dp.
    pub weighted_score: f64,
    pub evaluations: Vec<Evaluation>,
}

/// Flat view of a summary with its 1-based rank, for API payloads and demos.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedVendorView {
    pub rank: usize,
    pub vendor_id: VendorId,
    pub total_score: f64,
    pub weighted_score: f64,
    pub ai_sourced_cells: usize,
}

/// Group evaluations by vendor and rank descending by weighted score.
///
/// Ties break by vendor id, lexical ascending, so the order is total and
/// reproducible. Internal sums run at full precision; rounding happens once at
/// the end.
pub fn aggregate(evaluations: &[Evaluation]) -> Vec<VendorSummary> {
    let mut grouped: BTreeMap<VendorId, Vec<Evaluation>> = BTreeMap::new();
    for evaluation in evaluations {
        grouped
            .entry(evaluation.vendor_id.clone())
            .or_default()
            .push(evaluation.clone());
    }

    let mut summaries: Vec<VendorSummary> = grouped
        .into_iter()
        .map(|(vendor_id, rows)| {
            let mut total = 0.0_f64;
            let mut weighted = 0.0_f64;
            for row in &rows {
                let effective = row.effective_score();
                total += effective.value;
                weighted += effective.value * row.weight;
            }
            VendorSummary {
                vendor_id,
                total_score: round2(total),
                weighted_score: round2(weighted),
                evaluations: rows,
            }
        })
        .collect();

    summaries.sort_by(|a, b| {
        b.weighted_score
            .total_cmp(&a.weighted_score)
            .then_with(|| a.vendor_id.cmp(&b.vendor_id))
    });

    summaries
}

/// 1-based rank of a vendor within an already-aggregated summary list.
pub fn rank_of(summaries: &[VendorSummary], vendor_id: &VendorId) -> Option<usize> {
    summaries
        .iter()
        .position(|summary| &summary.vendor_id == vendor_id)
        .map(|index| index + 1)
}

/// Project summaries into flat ranked rows.
pub fn ranked_views(summaries: &[VendorSummary]) -> Vec<RankedVendorView> {
    summaries
        .iter()
        .enumerate()
        .map(|(index, summary)| RankedVendorView {
            rank: index + 1,
            vendor_id: summary.vendor_id.clone(),
            total_score: summary.total_score,
            weighted_score: summary.weighted_score,
            ai_sourced_cells: summary
                .evaluations
                .iter()
                .filter(|row| row.effective_score().ai_sourced)
                .count(),
        })
        .collect()
}

/// Half-up rounding to 2 decimal places; scores are non-negative so
/// `f64::round` (half away from zero) is exactly half-up here.
pub(crate) fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
