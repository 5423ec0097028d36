use super::domain::{Evaluation, EvaluationId, SelectionId, SourcingEventId};
use super::selection::WinnerSelection;

/// Storage abstraction over evaluation rows so the service can be exercised in
/// isolation. Implementations must return rows for an event in a stable order
/// (by evaluation id) so downstream aggregation stays deterministic.
pub trait EvaluationRepository: Send + Sync {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError>;
    fn update(&self, evaluation: Evaluation) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError>;
    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<Evaluation>, RepositoryError>;
}

/// Storage abstraction over winner-selection records.
pub trait SelectionRepository: Send + Sync {
    fn insert(&self, selection: WinnerSelection) -> Result<WinnerSelection, RepositoryError>;
    fn update(&self, selection: WinnerSelection) -> Result<(), RepositoryError>;
    fn fetch(&self, id: &SelectionId) -> Result<Option<WinnerSelection>, RepositoryError>;
    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<WinnerSelection>, RepositoryError>;
    fn pending_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<WinnerSelection>, RepositoryError>;
}

/// Error enumeration for repository failures. The core never retries; retry
/// policy belongs to the store or transport layer.
#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("record already exists")]
    Conflict,
    #[error("record not found")]
    NotFound,
    #[error("repository unavailable: {0}")]
    Unavailable(String),
}
