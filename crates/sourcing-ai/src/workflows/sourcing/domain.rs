use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier wrapper for sourcing events.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SourcingEventId(pub String);

/// Identifier wrapper for competing vendors.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct VendorId(pub String);

/// Identifier wrapper for a single (vendor, criterion) evaluation row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EvaluationId(pub String);

/// Identifier wrapper for winner-selection records.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SelectionId(pub String);

impl fmt::Display for SourcingEventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for VendorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for EvaluationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl fmt::Display for SelectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A vendor participating in a sourcing event, with the display name used in
/// reports and exports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vendor {
    pub id: VendorId,
    pub name: String,
}

/// One cell of the scoring matrix: a single vendor scored against a single
/// criterion of the active catalog.
///
/// `ai_score` is write-once at seed time; human overrides only ever touch
/// `manual_score` and `scored_by`. Rows are never deleted, only superseded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Evaluation {
    pub id: EvaluationId,
    pub sourcing_event_id: SourcingEventId,
    pub vendor_id: VendorId,
    pub criteria_name: String,
    pub ai_score: Option<f64>,
    pub manual_score: Option<f64>,
    /// Denormalized copy of the criterion weight, kept in sync with the
    /// catalog at seed time.
    pub weight: f64,
    pub justification: Option<String>,
    pub scored_by: Option<String>,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The score actually used in aggregation, plus its provenance.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EffectiveScore {
    pub value: f64,
    pub ai_sourced: bool,
}

impl Evaluation {
    /// Resolve the effective score: manual override if present, else the AI
    /// suggestion, else zero so an incomplete matrix can still be ranked.
    pub fn effective_score(&self) -> EffectiveScore {
        match (self.manual_score, self.ai_score) {
            (Some(manual), _) => EffectiveScore {
                value: manual,
                ai_sourced: false,
            },
            (None, Some(ai)) => EffectiveScore {
                value: ai,
                ai_sourced: true,
            },
            (None, None) => EffectiveScore {
                value: 0.0,
                ai_sourced: true,
            },
        }
    }

    /// True when a human has signed off on this cell.
    pub fn has_manual_score(&self) -> bool {
        self.manual_score.is_some()
    }

    /// True when either score is present; drives the `-` placeholder in
    /// exports.
    pub fn has_any_score(&self) -> bool {
        self.manual_score.is_some() || self.ai_score.is_some()
    }
}
