use metrics_exporter_prometheus::PrometheusHandle;
use std::collections::HashMap;
use std::sync::atomic::AtomicBool;
use std::sync::{Arc, Mutex};

use sourcing_ai::workflows::sourcing::{
    ApprovalStatus, Evaluation, EvaluationId, EvaluationRepository, RepositoryError, SelectionId,
    SelectionRepository, SourcingEventId, WinnerSelection,
};

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

#[derive(Default, Clone)]
pub(crate) struct InMemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, Evaluation>>>,
}

impl EvaluationRepository for InMemoryEvaluationRepository {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.id.clone(), evaluation.clone());
        Ok(evaluation)
    }

    fn update(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&evaluation.id) {
            guard.insert(evaluation.id.clone(), evaluation);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut rows: Vec<Evaluation> = guard
            .values()
            .filter(|row| &row.sourcing_event_id == event)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}

#[derive(Default, Clone)]
pub(crate) struct InMemorySelectionRepository {
    records: Arc<Mutex<HashMap<SelectionId, WinnerSelection>>>,
}

impl SelectionRepository for InMemorySelectionRepository {
    fn insert(&self, selection: WinnerSelection) -> Result<WinnerSelection, RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&selection.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(selection.id.clone(), selection.clone());
        Ok(selection)
    }

    fn update(&self, selection: WinnerSelection) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("repository mutex poisoned");
        if guard.contains_key(&selection.id) {
            guard.insert(selection.id.clone(), selection);
            Ok(())
        } else {
            Err(RepositoryError::NotFound)
        }
    }

    fn fetch(&self, id: &SelectionId) -> Result<Option<WinnerSelection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        Ok(guard.get(id).cloned())
    }

    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<WinnerSelection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut rows: Vec<WinnerSelection> = guard
            .values()
            .filter(|row| &row.sourcing_event_id == event)
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }

    fn pending_for_organization(
        &self,
        organization_id: &str,
    ) -> Result<Vec<WinnerSelection>, RepositoryError> {
        let guard = self.records.lock().expect("repository mutex poisoned");
        let mut rows: Vec<WinnerSelection> = guard
            .values()
            .filter(|row| {
                row.organization_id == organization_id
                    && row.approval_status == ApprovalStatus::PendingApproval
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}
