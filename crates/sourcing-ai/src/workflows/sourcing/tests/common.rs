use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use chrono::{TimeZone, Utc};

use crate::workflows::sourcing::catalog::{CriteriaCatalog, Criterion, ScoreBand};
use crate::workflows::sourcing::domain::{
    Evaluation, EvaluationId, SelectionId, SourcingEventId, Vendor, VendorId,
};
use crate::workflows::sourcing::repository::{
    EvaluationRepository, RepositoryError, SelectionRepository,
};
use crate::workflows::sourcing::selection::WinnerSelection;
use crate::workflows::sourcing::service::EvaluationService;

pub(super) fn event() -> SourcingEventId {
    SourcingEventId("SRC-1001".to_string())
}

pub(super) fn vendor(id: &str) -> VendorId {
    VendorId(id.to_string())
}

pub(super) fn vendors_ab() -> Vec<Vendor> {
    vec![
        Vendor {
            id: vendor("vendor-a"),
            name: "Vendor A".to_string(),
        },
        Vendor {
            id: vendor("vendor-b"),
            name: "Vendor B".to_string(),
        },
    ]
}

/// The two-criterion rubric from the worked scoring example: Price 0.6,
/// Quality 0.4.
pub(super) fn price_quality_catalog() -> CriteriaCatalog {
    CriteriaCatalog::new(vec![
        Criterion {
            name: "Price".to_string(),
            weight: 0.6,
            description: "Quoted price against budget".to_string(),
            ai_band: ScoreBand::new(70.0, 95.0),
            rationales: vec!["Pricing sits below the category median.".to_string()],
        },
        Criterion {
            name: "Quality".to_string(),
            weight: 0.4,
            description: "Quality program maturity".to_string(),
            ai_band: ScoreBand::new(60.0, 90.0),
            rationales: vec!["Quality records were complete and consistent.".to_string()],
        },
    ])
    .expect("normalized test catalog")
}

pub(super) fn evaluation(
    id: &str,
    vendor_id: &str,
    criterion: &str,
    weight: f64,
    ai_score: Option<f64>,
    manual_score: Option<f64>,
) -> Evaluation {
    let seeded_at = Utc.with_ymd_and_hms(2025, 11, 3, 9, 0, 0).single().expect("valid timestamp");
    Evaluation {
        id: EvaluationId(id.to_string()),
        sourcing_event_id: event(),
        vendor_id: vendor(vendor_id),
        criteria_name: criterion.to_string(),
        ai_score,
        manual_score,
        weight,
        justification: None,
        scored_by: manual_score.map(|_| "buyer@example.test".to_string()),
        organization_id: "org-77".to_string(),
        created_at: seeded_at,
        updated_at: seeded_at,
    }
}

/// The worked example matrix: Vendor A Price manual 80 / Quality ai 70,
/// Vendor B Price manual 90 / Quality manual 60.
pub(super) fn example_matrix() -> Vec<Evaluation> {
    vec![
        evaluation("eval-a-price", "vendor-a", "Price", 0.6, Some(72.0), Some(80.0)),
        evaluation("eval-a-quality", "vendor-a", "Quality", 0.4, Some(70.0), None),
        evaluation("eval-b-price", "vendor-b", "Price", 0.6, Some(68.0), Some(90.0)),
        evaluation("eval-b-quality", "vendor-b", "Quality", 0.4, Some(75.0), Some(60.0)),
    ]
}

#[derive(Default, Clone)]
pub(super) struct MemoryEvaluationRepository {
    records: Arc<Mutex<HashMap<EvaluationId, Evaluation>>>,
}

impl EvaluationRepository for MemoryEvaluationRepository {
    fn insert(&self, evaluation: Evaluation) -> Result<Evaluation, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(evaluation.id.clone(), evaluation.clone());
        Ok(evaluation)
    }

    fn update(&self, evaluation: Evaluation) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if !guard.contains_key(&evaluation.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(evaluation.id.clone(), evaluation);
        Ok(())
    }

    fn fetch(&self, id: &EvaluationId) -> Result<Option<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<Evaluation>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
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
pub(super) struct MemorySelectionRepository {
    records: Arc<Mutex<HashMap<SelectionId, WinnerSelection>>>,
}

impl SelectionRepository for MemorySelectionRepository {
    fn insert(&self, selection: WinnerSelection) -> Result<WinnerSelection, RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if guard.contains_key(&selection.id) {
            return Err(RepositoryError::Conflict);
        }
        guard.insert(selection.id.clone(), selection.clone());
        Ok(selection)
    }

    fn update(&self, selection: WinnerSelection) -> Result<(), RepositoryError> {
        let mut guard = self.records.lock().expect("lock");
        if !guard.contains_key(&selection.id) {
            return Err(RepositoryError::NotFound);
        }
        guard.insert(selection.id.clone(), selection);
        Ok(())
    }

    fn fetch(&self, id: &SelectionId) -> Result<Option<WinnerSelection>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
        Ok(guard.get(id).cloned())
    }

    fn by_event(&self, event: &SourcingEventId) -> Result<Vec<WinnerSelection>, RepositoryError> {
        let guard = self.records.lock().expect("lock");
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
        let guard = self.records.lock().expect("lock");
        let mut rows: Vec<WinnerSelection> = guard
            .values()
            .filter(|row| {
                row.organization_id == organization_id
                    && row.approval_status
                        == crate::workflows::sourcing::selection::ApprovalStatus::PendingApproval
            })
            .cloned()
            .collect();
        rows.sort_by(|a, b| a.id.cmp(&b.id));
        Ok(rows)
    }
}

pub(super) type TestService = EvaluationService<MemoryEvaluationRepository, MemorySelectionRepository>;

pub(super) fn service_with_catalog(
    catalog: CriteriaCatalog,
) -> (Arc<TestService>, Arc<MemoryEvaluationRepository>, Arc<MemorySelectionRepository>) {
    let evaluations = Arc::new(MemoryEvaluationRepository::default());
    let selections = Arc::new(MemorySelectionRepository::default());
    let service = Arc::new(EvaluationService::new(
        catalog,
        evaluations.clone(),
        selections.clone(),
    ));
    (service, evaluations, selections)
}

pub(super) fn price_quality_service(
) -> (Arc<TestService>, Arc<MemoryEvaluationRepository>, Arc<MemorySelectionRepository>) {
    service_with_catalog(price_quality_catalog())
}
