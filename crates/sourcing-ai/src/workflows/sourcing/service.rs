use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use chrono::Utc;

use super::catalog::CriteriaCatalog;
use super::completion::{completion, CompletionReport};
use super::domain::{
    Evaluation, EvaluationId, SelectionId, SourcingEventId, Vendor, VendorId,
};
use super::export::{export_matrix, ExportError};
use super::repository::{EvaluationRepository, RepositoryError, SelectionRepository};
use super::scoring::{aggregate, RecommendationEngine, VendorSummary};
use super::selection::{ApprovalStatus, SelectionError, WinnerSelection};

/// Service composing the criteria catalog, recommendation engine, and the two
/// repositories into the evaluation workflow: seed the matrix, capture human
/// scores, rank vendors, and walk the winner-selection approval states.
pub struct EvaluationService<E, S> {
    catalog: CriteriaCatalog,
    recommendations: RecommendationEngine,
    evaluations: Arc<E>,
    selections: Arc<S>,
}

static EVALUATION_SEQUENCE: AtomicU64 = AtomicU64::new(1);
static SELECTION_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_evaluation_id() -> EvaluationId {
    let id = EVALUATION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    EvaluationId(format!("eval-{id:06}"))
}

fn next_selection_id() -> SelectionId {
    let id = SELECTION_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    SelectionId(format!("sel-{id:06}"))
}

impl<E, S> EvaluationService<E, S>
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    pub fn new(catalog: CriteriaCatalog, evaluations: Arc<E>, selections: Arc<S>) -> Self {
        let recommendations = RecommendationEngine::new(catalog.clone());
        Self {
            catalog,
            recommendations,
            evaluations,
            selections,
        }
    }

    pub fn catalog(&self) -> &CriteriaCatalog {
        &self.catalog
    }

    /// Seed the scoring matrix for a newly opened sourcing event: one row per
    /// vendor x criterion, pre-filled with a write-once AI score.
    pub fn open_event(
        &self,
        event: &SourcingEventId,
        vendors: &[Vendor],
        organization_id: &str,
    ) -> Result<Vec<Evaluation>, EvaluationServiceError> {
        if !self.evaluations.by_event(event)?.is_empty() {
            return Err(EvaluationServiceError::EventAlreadyOpen(event.clone()));
        }

        let now = Utc::now();
        let mut seeded = Vec::with_capacity(vendors.len() * self.catalog.len());
        for vendor in vendors {
            for criterion in self.catalog.criteria() {
                let recommendation = self.recommendations.recommend(&vendor.id, &criterion.name);
                let evaluation = Evaluation {
                    id: next_evaluation_id(),
                    sourcing_event_id: event.clone(),
                    vendor_id: vendor.id.clone(),
                    criteria_name: criterion.name.clone(),
                    ai_score: Some(recommendation.score),
                    manual_score: None,
                    weight: criterion.weight,
                    justification: Some(recommendation.justification),
                    scored_by: None,
                    organization_id: organization_id.to_string(),
                    created_at: now,
                    updated_at: now,
                };
                seeded.push(self.evaluations.insert(evaluation)?);
            }
        }
        Ok(seeded)
    }

    /// Record a human score for one cell. The AI score is untouched; manual
    /// overrides it at read time.
    pub fn record_manual_score(
        &self,
        id: &EvaluationId,
        score: f64,
        scored_by: &str,
    ) -> Result<Evaluation, EvaluationServiceError> {
        validate_score(score)?;
        let mut evaluation = self.fetch_evaluation(id)?;
        evaluation.manual_score = Some(score);
        evaluation.scored_by = Some(scored_by.to_string());
        evaluation.updated_at = Utc::now();
        self.evaluations.update(evaluation.clone())?;
        Ok(evaluation)
    }

    /// Revert a cell to its AI suggestion by clearing the human score.
    pub fn clear_manual_score(
        &self,
        id: &EvaluationId,
    ) -> Result<Evaluation, EvaluationServiceError> {
        let mut evaluation = self.fetch_evaluation(id)?;
        evaluation.manual_score = None;
        evaluation.scored_by = None;
        evaluation.updated_at = Utc::now();
        self.evaluations.update(evaluation.clone())?;
        Ok(evaluation)
    }

    /// Adopt the stored AI suggestion as the human score. This is the only
    /// path by which an AI value reaches `manual_score`, and it is attributed
    /// to the accepting identity.
    pub fn accept_recommendation(
        &self,
        id: &EvaluationId,
        accepted_by: &str,
    ) -> Result<Evaluation, EvaluationServiceError> {
        let mut evaluation = self.fetch_evaluation(id)?;
        let ai_score = evaluation
            .ai_score
            .ok_or_else(|| EvaluationServiceError::NoRecommendation(id.clone()))?;
        evaluation.manual_score = Some(ai_score);
        evaluation.scored_by = Some(accepted_by.to_string());
        evaluation.updated_at = Utc::now();
        self.evaluations.update(evaluation.clone())?;
        Ok(evaluation)
    }

    /// Ranked per-vendor rollups. Computed regardless of completion so partial
    /// progress can still be displayed.
    pub fn summaries(
        &self,
        event: &SourcingEventId,
    ) -> Result<Vec<VendorSummary>, EvaluationServiceError> {
        let rows = self.evaluations.by_event(event)?;
        Ok(aggregate(&rows))
    }

    pub fn completion(
        &self,
        event: &SourcingEventId,
    ) -> Result<CompletionReport, EvaluationServiceError> {
        let rows = self.evaluations.by_event(event)?;
        Ok(completion(&rows, self.catalog.len()))
    }

    /// The top-ranked vendor once every cell carries a human score. A
    /// read-time derivation, not a persisted transition.
    pub fn candidate_winner(
        &self,
        event: &SourcingEventId,
    ) -> Result<Option<VendorSummary>, EvaluationServiceError> {
        let rows = self.evaluations.by_event(event)?;
        let report = completion(&rows, self.catalog.len());
        if !report.is_complete() {
            return Ok(None);
        }
        Ok(aggregate(&rows).into_iter().next())
    }

    /// Submit the completed evaluation for approval. Captures the winner and
    /// both scores as an immutable snapshot; enforces the one-active-record
    /// constraint per event.
    pub fn submit_for_approval(
        &self,
        event: &SourcingEventId,
        submitted_by: &str,
        justification: Option<String>,
    ) -> Result<WinnerSelection, EvaluationServiceError> {
        let rows = self.evaluations.by_event(event)?;
        if rows.is_empty() {
            return Err(EvaluationServiceError::EventNotFound(event.clone()));
        }

        let report = completion(&rows, self.catalog.len());
        if !report.is_complete() {
            return Err(EvaluationServiceError::IncompleteEvaluation {
                percent: report.overall_percent,
            });
        }

        let has_active = self
            .selections
            .by_event(event)?
            .iter()
            .any(|selection| selection.approval_status.is_active());
        if has_active {
            return Err(SelectionError::AlreadyPending(event.clone()).into());
        }

        let summaries = aggregate(&rows);
        let top = summaries
            .into_iter()
            .next()
            .ok_or_else(|| EvaluationServiceError::EventNotFound(event.clone()))?;

        let now = Utc::now();
        let selection = WinnerSelection {
            id: next_selection_id(),
            sourcing_event_id: event.clone(),
            winner_vendor_id: top.vendor_id.clone(),
            total_score: top.total_score,
            weighted_score: top.weighted_score,
            selection_date: now,
            selected_by: submitted_by.to_string(),
            justification,
            approval_status: ApprovalStatus::PendingApproval,
            submitted_by: submitted_by.to_string(),
            submission_date: now,
            approved_by: None,
            approval_date: None,
            rejected_by: None,
            rejection_reason: None,
            organization_id: rows[0].organization_id.clone(),
            created_at: now,
            updated_at: now,
        };

        Ok(self.selections.insert(selection)?)
    }

    pub fn approve_winner(
        &self,
        id: &SelectionId,
        approved_by: &str,
    ) -> Result<WinnerSelection, EvaluationServiceError> {
        let mut selection = self.fetch_selection(id)?;
        selection.approve(approved_by, Utc::now())?;
        self.selections.update(selection.clone())?;
        Ok(selection)
    }

    pub fn reject_winner(
        &self,
        id: &SelectionId,
        rejected_by: &str,
        reason: &str,
    ) -> Result<WinnerSelection, EvaluationServiceError> {
        let mut selection = self.fetch_selection(id)?;
        selection.reject(rejected_by, reason, Utc::now())?;
        self.selections.update(selection.clone())?;
        Ok(selection)
    }

    /// Most recent selection record for an event, rejected ones included.
    pub fn latest_selection(
        &self,
        event: &SourcingEventId,
    ) -> Result<Option<WinnerSelection>, EvaluationServiceError> {
        let mut records = self.selections.by_event(event)?;
        records.sort_by(|a, b| {
            a.submission_date
                .cmp(&b.submission_date)
                .then_with(|| a.id.cmp(&b.id))
        });
        Ok(records.pop())
    }

    pub fn pending_approvals(
        &self,
        organization_id: &str,
    ) -> Result<Vec<WinnerSelection>, EvaluationServiceError> {
        Ok(self.selections.pending_for_organization(organization_id)?)
    }

    /// CSV rendition of the event's matrix. Vendor display names are not part
    /// of the evaluation rows, so this uses the vendor id as the column label;
    /// callers holding a vendor roster can invoke `export_matrix` directly.
    pub fn export_csv(&self, event: &SourcingEventId) -> Result<String, EvaluationServiceError> {
        let rows = self.evaluations.by_event(event)?;
        if rows.is_empty() {
            return Err(EvaluationServiceError::EventNotFound(event.clone()));
        }

        let mut vendor_ids: Vec<VendorId> = Vec::new();
        for row in &rows {
            if !vendor_ids.contains(&row.vendor_id) {
                vendor_ids.push(row.vendor_id.clone());
            }
        }
        vendor_ids.sort();
        let vendors: Vec<Vendor> = vendor_ids
            .into_iter()
            .map(|id| Vendor {
                name: id.0.clone(),
                id,
            })
            .collect();

        let summaries = aggregate(&rows);
        Ok(export_matrix(&self.catalog, &vendors, &rows, &summaries)?)
    }

    fn fetch_evaluation(&self, id: &EvaluationId) -> Result<Evaluation, EvaluationServiceError> {
        self.evaluations
            .fetch(id)?
            .ok_or_else(|| EvaluationServiceError::EvaluationNotFound(id.clone()))
    }

    fn fetch_selection(&self, id: &SelectionId) -> Result<WinnerSelection, EvaluationServiceError> {
        self.selections
            .fetch(id)?
            .ok_or_else(|| SelectionError::NotFound(id.clone()).into())
    }
}

fn validate_score(score: f64) -> Result<(), EvaluationServiceError> {
    if !(0.0..=100.0).contains(&score) || score.is_nan() {
        return Err(EvaluationServiceError::ScoreOutOfRange { value: score });
    }
    Ok(())
}

/// Error raised by the evaluation service. Validation and conflict variants
/// are caller-correctable; repository failures propagate untouched.
#[derive(Debug, thiserror::Error)]
pub enum EvaluationServiceError {
    #[error("score {value} is outside the allowed range 0-100")]
    ScoreOutOfRange { value: f64 },
    #[error("cannot submit incomplete evaluation ({percent:.1}% scored)")]
    IncompleteEvaluation { percent: f64 },
    #[error("no evaluations recorded for sourcing event {0}")]
    EventNotFound(SourcingEventId),
    #[error("sourcing event {0} already has a seeded scoring matrix")]
    EventAlreadyOpen(SourcingEventId),
    #[error("evaluation not found: {0}")]
    EvaluationNotFound(EvaluationId),
    #[error("evaluation {0} has no stored recommendation to accept")]
    NoRecommendation(EvaluationId),
    #[error(transparent)]
    Selection(#[from] SelectionError),
    #[error(transparent)]
    Repository(#[from] RepositoryError),
    #[error(transparent)]
    Export(#[from] ExportError),
}
