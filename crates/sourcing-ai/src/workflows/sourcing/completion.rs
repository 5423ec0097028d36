use std::collections::BTreeMap;

use serde::Serialize;

use super::domain::{Evaluation, VendorId};

/// Human sign-off coverage for one vendor's column of the matrix.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CellProgress {
    /// Cells carrying a manual score. An AI-only score does not count.
    pub filled: usize,
    /// Criteria in the active catalog.
    pub total: usize,
}

/// Completion measures human sign-off coverage, not mere data presence; it is
/// the precondition for exposing winner-selection actions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CompletionReport {
    pub per_vendor: BTreeMap<VendorId, CellProgress>,
    pub overall_percent: f64,
}

impl CompletionReport {
    pub fn is_complete(&self) -> bool {
        self.overall_percent >= 100.0
    }

    pub fn filled_cells(&self) -> usize {
        self.per_vendor.values().map(|progress| progress.filled).sum()
    }
}

/// Compute per-vendor and overall completion for a set of evaluation rows.
/// A zero denominator (no vendors or an empty catalog) reports 0, not NaN.
pub fn completion(evaluations: &[Evaluation], criteria_count: usize) -> CompletionReport {
    let mut per_vendor: BTreeMap<VendorId, CellProgress> = BTreeMap::new();

    for evaluation in evaluations {
        let entry = per_vendor
            .entry(evaluation.vendor_id.clone())
            .or_default();
        entry.total = criteria_count;
        if evaluation.has_manual_score() {
            entry.filled += 1;
        }
    }

    let denominator = per_vendor.len() * criteria_count;
    let filled: usize = per_vendor.values().map(|progress| progress.filled).sum();
    let overall_percent = if denominator == 0 {
        0.0
    } else {
        100.0 * filled as f64 / denominator as f64
    };

    CompletionReport {
        per_vendor,
        overall_percent,
    }
}
