use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::domain::{SelectionId, SourcingEventId, VendorId};

/// Approval state of a winner-selection record. `Approved` and `Rejected` are
/// terminal for the record; a rejected event can be resubmitted as a new
/// record after re-scoring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApprovalStatus {
    PendingApproval,
    Approved,
    Rejected,
}

impl ApprovalStatus {
    pub const fn label(self) -> &'static str {
        match self {
            Self::PendingApproval => "Pending Approval",
            Self::Approved => "Approved",
            Self::Rejected => "Rejected",
        }
    }

    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Approved | Self::Rejected)
    }

    /// States that count against the one-active-record-per-event constraint.
    pub const fn is_active(self) -> bool {
        matches!(self, Self::PendingApproval | Self::Approved)
    }
}

impl fmt::Display for ApprovalStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Transition failures raised by the approval state machine.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("winner selection not found: {0}")]
    NotFound(SelectionId),
    #[error("winner selection {id} is {status}, expected pending approval")]
    InvalidTransition { id: SelectionId, status: ApprovalStatus },
    #[error("approval already pending for sourcing event {0}")]
    AlreadyPending(SourcingEventId),
}

/// The record representing "vendor X is proposed as winner", subject to
/// approval. Scores are an immutable snapshot taken at submission time; later
/// re-scoring must not alter a submitted record. Records are retained after
/// rejection for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WinnerSelection {
    pub id: SelectionId,
    /// At most one record per event may be pending or approved at a time.
    pub sourcing_event_id: SourcingEventId,
    pub winner_vendor_id: VendorId,
    pub total_score: f64,
    pub weighted_score: f64,
    pub selection_date: DateTime<Utc>,
    pub selected_by: String,
    pub justification: Option<String>,
    pub approval_status: ApprovalStatus,
    pub submitted_by: String,
    pub submission_date: DateTime<Utc>,
    pub approved_by: Option<String>,
    pub approval_date: Option<DateTime<Utc>>,
    pub rejected_by: Option<String>,
    pub rejection_reason: Option<String>,
    pub organization_id: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl WinnerSelection {
    /// Lifecycle status of the selection itself; the approval workflow state
    /// lives in `approval_status`.
    pub const fn status(&self) -> &'static str {
        "Selected"
    }

    pub fn approve(&mut self, approved_by: &str, at: DateTime<Utc>) -> Result<(), SelectionError> {
        self.ensure_pending()?;
        self.approval_status = ApprovalStatus::Approved;
        self.approved_by = Some(approved_by.to_string());
        self.approval_date = Some(at);
        self.updated_at = at;
        Ok(())
    }

    pub fn reject(
        &mut self,
        rejected_by: &str,
        reason: &str,
        at: DateTime<Utc>,
    ) -> Result<(), SelectionError> {
        self.ensure_pending()?;
        self.approval_status = ApprovalStatus::Rejected;
        self.rejected_by = Some(rejected_by.to_string());
        self.rejection_reason = Some(reason.to_string());
        self.updated_at = at;
        Ok(())
    }

    fn ensure_pending(&self) -> Result<(), SelectionError> {
        if self.approval_status != ApprovalStatus::PendingApproval {
            return Err(SelectionError::InvalidTransition {
                id: self.id.clone(),
                status: self.approval_status,
            });
        }
        Ok(())
    }

    pub fn view(&self) -> SelectionView {
        SelectionView {
            id: self.id.clone(),
            sourcing_event_id: self.sourcing_event_id.clone(),
            winner_vendor_id: self.winner_vendor_id.clone(),
            status: self.status(),
            approval_status: self.approval_status,
            approval_status_label: self.approval_status.label(),
            total_score: self.total_score,
            weighted_score: self.weighted_score,
            submitted_by: self.submitted_by.clone(),
            submission_date: self.submission_date,
            approved_by: self.approved_by.clone(),
            approval_date: self.approval_date,
            rejection_reason: self.rejection_reason.clone(),
        }
    }
}

/// Sanitized representation of a selection for API responses.
#[derive(Debug, Clone, Serialize)]
pub struct SelectionView {
    pub id: SelectionId,
    pub sourcing_event_id: SourcingEventId,
    pub winner_vendor_id: VendorId,
    pub status: &'static str,
    pub approval_status: ApprovalStatus,
    pub approval_status_label: &'static str,
    pub total_score: f64,
    pub weighted_score: f64,
    pub submitted_by: String,
    pub submission_date: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approved_by: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub approval_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rejection_reason: Option<String>,
}
