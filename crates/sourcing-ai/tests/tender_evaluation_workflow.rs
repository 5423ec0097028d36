//! Integration specifications for the tender evaluation and winner-selection
//! workflow.
//!
//! Scenarios drive the public service facade end-to-end: seeding a scoring
//! matrix, layering human overrides on AI suggestions, gating submission on
//! completion, and walking the approval state machine, without reaching into
//! private modules.

mod common {
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    use sourcing_ai::workflows::sourcing::{
        ApprovalStatus, CriteriaCatalog, Criterion, Evaluation, EvaluationId, EvaluationRepository,
        RepositoryError, ScoreBand, SelectionId, SelectionRepository, SourcingEventId, Vendor,
        VendorId, WinnerSelection,
    };
    use sourcing_ai::workflows::sourcing::service::EvaluationService;

    pub(super) fn event() -> SourcingEventId {
        SourcingEventId("SRC-9000".to_string())
    }

    pub(super) fn vendors() -> Vec<Vendor> {
        vec![
            Vendor {
                id: VendorId("northwind".to_string()),
                name: "Northwind Industrial".to_string(),
            },
            Vendor {
                id: VendorId("cascade".to_string()),
                name: "Cascade Supply".to_string(),
            },
        ]
    }

    pub(super) fn catalog() -> CriteriaCatalog {
        CriteriaCatalog::new(vec![
            Criterion {
                name: "Price".to_string(),
                weight: 0.6,
                description: "Quoted price against budget".to_string(),
                ai_band: ScoreBand::new(70.0, 95.0),
                rationales: vec!["Pricing below category median.".to_string()],
            },
            Criterion {
                name: "Quality".to_string(),
                weight: 0.4,
                description: "Quality program maturity".to_string(),
                ai_band: ScoreBand::new(60.0, 90.0),
                rationales: vec!["Quality records consistent.".to_string()],
            },
        ])
        .expect("normalized catalog")
    }

    #[derive(Default, Clone)]
    pub(super) struct MemoryEvaluations {
        records: Arc<Mutex<HashMap<EvaluationId, Evaluation>>>,
    }

    impl EvaluationRepository for MemoryEvaluations {
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
            Ok(self.records.lock().expect("lock").get(id).cloned())
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
    pub(super) struct MemorySelections {
        records: Arc<Mutex<HashMap<SelectionId, WinnerSelection>>>,
    }

    impl SelectionRepository for MemorySelections {
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
            Ok(self.records.lock().expect("lock").get(id).cloned())
        }

        fn by_event(
            &self,
            event: &SourcingEventId,
        ) -> Result<Vec<WinnerSelection>, RepositoryError> {
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
                        && row.approval_status == ApprovalStatus::PendingApproval
                })
                .cloned()
                .collect();
            rows.sort_by(|a, b| a.id.cmp(&b.id));
            Ok(rows)
        }
    }

    pub(super) fn service() -> Arc<EvaluationService<MemoryEvaluations, MemorySelections>> {
        Arc::new(EvaluationService::new(
            catalog(),
            Arc::new(MemoryEvaluations::default()),
            Arc::new(MemorySelections::default()),
        ))
    }
}

use common::{event, service, vendors};
use sourcing_ai::workflows::sourcing::service::EvaluationServiceError;
use sourcing_ai::workflows::sourcing::{ApprovalStatus, SelectionError, VendorId};

#[test]
fn evaluation_runs_from_seeding_to_approval() {
    let service = service();

    let seeded = service
        .open_event(&event(), &vendors(), "org-acme")
        .expect("event opens");
    assert_eq!(seeded.len(), 4, "one cell per vendor x criterion");
    assert!(seeded.iter().all(|row| row.ai_score.is_some()));
    assert!(seeded.iter().all(|row| row.manual_score.is_none()));

    // Partial progress is visible but not submittable.
    let report = service.completion(&event()).expect("completion computes");
    assert_eq!(report.overall_percent, 0.0);
    match service.submit_for_approval(&event(), "buyer@acme.test", None) {
        Err(EvaluationServiceError::IncompleteEvaluation { .. }) => {}
        other => panic!("expected completion gate, got {other:?}"),
    }

    // Northwind outscores Cascade once humans sign off.
    for row in &seeded {
        let score = if row.vendor_id == VendorId("northwind".to_string()) {
            88.0
        } else {
            71.0
        };
        service
            .record_manual_score(&row.id, score, "buyer@acme.test")
            .expect("manual score accepted");
    }

    let summaries = service.summaries(&event()).expect("summaries compute");
    assert_eq!(summaries[0].vendor_id, VendorId("northwind".to_string()));
    assert_eq!(summaries[0].weighted_score, 88.0);

    let selection = service
        .submit_for_approval(&event(), "buyer@acme.test", Some("Ranked first".to_string()))
        .expect("submission accepted");
    assert_eq!(selection.approval_status, ApprovalStatus::PendingApproval);
    assert_eq!(selection.winner_vendor_id, VendorId("northwind".to_string()));

    let pending = service
        .pending_approvals("org-acme")
        .expect("pending lookup succeeds");
    assert_eq!(pending.len(), 1);

    let approved = service
        .approve_winner(&selection.id, "cpo@acme.test")
        .expect("approval accepted");
    assert_eq!(approved.approval_status, ApprovalStatus::Approved);

    // Terminal records refuse further transitions, and the approved event
    // blocks a new submission.
    match service.reject_winner(&selection.id, "cpo@acme.test", "late objection") {
        Err(EvaluationServiceError::Selection(SelectionError::InvalidTransition { .. })) => {}
        other => panic!("expected invalid transition, got {other:?}"),
    }
    match service.submit_for_approval(&event(), "buyer@acme.test", None) {
        Err(EvaluationServiceError::Selection(SelectionError::AlreadyPending(_))) => {}
        other => panic!("expected active-record conflict, got {other:?}"),
    }
}

#[test]
fn rejection_keeps_the_audit_trail_and_reopens_submission() {
    let service = service();
    let seeded = service
        .open_event(&event(), &vendors(), "org-acme")
        .expect("event opens");
    for row in &seeded {
        service
            .record_manual_score(&row.id, 80.0, "buyer@acme.test")
            .expect("manual score accepted");
    }

    let first = service
        .submit_for_approval(&event(), "buyer@acme.test", None)
        .expect("submission accepted");
    service
        .reject_winner(&first.id, "cpo@acme.test", "pricing out of band")
        .expect("rejection accepted");

    let second = service
        .submit_for_approval(&event(), "buyer@acme.test", None)
        .expect("resubmission accepted");
    assert_ne!(first.id, second.id);

    let latest = service
        .latest_selection(&event())
        .expect("lookup succeeds")
        .expect("record present");
    assert_eq!(latest.id, second.id);
    assert_eq!(latest.approval_status, ApprovalStatus::PendingApproval);
}

#[test]
fn export_reflects_manual_overrides() {
    let service = service();
    let seeded = service
        .open_event(&event(), &vendors(), "org-acme")
        .expect("event opens");
    for row in &seeded {
        service
            .record_manual_score(&row.id, 90.0, "buyer@acme.test")
            .expect("manual score accepted");
    }

    let csv = service.export_csv(&event()).expect("export succeeds");
    let mut lines = csv.lines();
    assert_eq!(lines.next(), Some("Criteria,Weight,cascade,northwind"));
    assert_eq!(lines.next(), Some("Price,60%,90.0,90.0"));
    assert_eq!(lines.next(), Some("Quality,40%,90.0,90.0"));
    assert_eq!(lines.next(), Some("Weighted Score,,90.00,90.00"));
    // Equal weighted scores: rank ties break by vendor id, lexical ascending.
    assert_eq!(lines.next(), Some("Rank,,1,2"));
}
