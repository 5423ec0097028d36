use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{EvaluationId, SelectionId, SourcingEventId, Vendor};
use super::export::export_filename;
use super::repository::{EvaluationRepository, RepositoryError, SelectionRepository};
use super::scoring::ranked_views;
use super::selection::SelectionError;
use super::service::{EvaluationService, EvaluationServiceError};

/// Router builder exposing HTTP endpoints for the evaluation workflow.
pub fn evaluation_router<E, S>(service: Arc<EvaluationService<E, S>>) -> Router
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    Router::new()
        .route("/api/v1/sourcing/events", post(open_event_handler::<E, S>))
        .route(
            "/api/v1/sourcing/events/:event_id",
            get(event_summary_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/events/:event_id/scores",
            post(record_score_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/events/:event_id/scores/accept",
            post(accept_recommendation_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/events/:event_id/submit",
            post(submit_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/events/:event_id/export",
            get(export_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/selections/:selection_id/approve",
            post(approve_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/selections/:selection_id/reject",
            post(reject_handler::<E, S>),
        )
        .route(
            "/api/v1/sourcing/approvals/:organization_id",
            get(approvals_handler::<E, S>),
        )
        .with_state(service)
}

#[derive(Debug, Deserialize)]
pub(crate) struct OpenEventRequest {
    pub(crate) sourcing_event_id: String,
    pub(crate) organization_id: String,
    pub(crate) vendors: Vec<Vendor>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RecordScoreRequest {
    pub(crate) evaluation_id: String,
    pub(crate) score: f64,
    pub(crate) scored_by: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct AcceptRecommendationRequest {
    pub(crate) evaluation_id: String,
    pub(crate) accepted_by: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubmitRequest {
    pub(crate) submitted_by: String,
    #[serde(default)]
    pub(crate) justification: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApproveRequest {
    pub(crate) approved_by: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct RejectRequest {
    pub(crate) rejected_by: String,
    pub(crate) reason: String,
}

pub(crate) async fn open_event_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    axum::Json(request): axum::Json<OpenEventRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let event = SourcingEventId(request.sourcing_event_id);
    match service.open_event(&event, &request.vendors, &request.organization_id) {
        Ok(seeded) => {
            let payload = json!({
                "sourcing_event_id": event,
                "seeded_cells": seeded.len(),
                "evaluations": seeded,
            });
            (StatusCode::CREATED, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn event_summary_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(event_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let event = SourcingEventId(event_id);
    let summaries = match service.summaries(&event) {
        Ok(summaries) => summaries,
        Err(error) => return error_response(error),
    };
    let completion = match service.completion(&event) {
        Ok(report) => report,
        Err(error) => return error_response(error),
    };
    let candidate = match service.candidate_winner(&event) {
        Ok(candidate) => candidate,
        Err(error) => return error_response(error),
    };
    let selection = match service.latest_selection(&event) {
        Ok(selection) => selection.map(|record| record.view()),
        Err(error) => return error_response(error),
    };

    let payload = json!({
        "sourcing_event_id": event,
        "rankings": ranked_views(&summaries),
        "completion": completion,
        "candidate_winner": candidate.map(|summary| summary.vendor_id),
        "selection": selection,
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

pub(crate) async fn record_score_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(_event_id): Path<String>,
    axum::Json(request): axum::Json<RecordScoreRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let id = EvaluationId(request.evaluation_id);
    match service.record_manual_score(&id, request.score, &request.scored_by) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn accept_recommendation_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(_event_id): Path<String>,
    axum::Json(request): axum::Json<AcceptRecommendationRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let id = EvaluationId(request.evaluation_id);
    match service.accept_recommendation(&id, &request.accepted_by) {
        Ok(evaluation) => (StatusCode::OK, axum::Json(evaluation)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn submit_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(event_id): Path<String>,
    axum::Json(request): axum::Json<SubmitRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let event = SourcingEventId(event_id);
    match service.submit_for_approval(&event, &request.submitted_by, request.justification) {
        Ok(selection) => (StatusCode::ACCEPTED, axum::Json(selection.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approve_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(selection_id): Path<String>,
    axum::Json(request): axum::Json<ApproveRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let id = SelectionId(selection_id);
    match service.approve_winner(&id, &request.approved_by) {
        Ok(selection) => (StatusCode::OK, axum::Json(selection.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn reject_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(selection_id): Path<String>,
    axum::Json(request): axum::Json<RejectRequest>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let id = SelectionId(selection_id);
    match service.reject_winner(&id, &request.rejected_by, &request.reason) {
        Ok(selection) => (StatusCode::OK, axum::Json(selection.view())).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(event_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    let event = SourcingEventId(event_id);
    match service.export_csv(&event) {
        Ok(csv) => {
            let filename = export_filename(&event, Utc::now().timestamp_millis());
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (
                        header::CONTENT_DISPOSITION,
                        format!("attachment; filename=\"{filename}\""),
                    ),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn approvals_handler<E, S>(
    State(service): State<Arc<EvaluationService<E, S>>>,
    Path(organization_id): Path<String>,
) -> Response
where
    E: EvaluationRepository + 'static,
    S: SelectionRepository + 'static,
{
    match service.pending_approvals(&organization_id) {
        Ok(selections) => {
            let views: Vec<_> = selections.iter().map(|record| record.view()).collect();
            (StatusCode::OK, axum::Json(views)).into_response()
        }
        Err(error) => error_response(error),
    }
}

fn error_response(error: EvaluationServiceError) -> Response {
    let status = match &error {
        EvaluationServiceError::ScoreOutOfRange { .. }
        | EvaluationServiceError::IncompleteEvaluation { .. }
        | EvaluationServiceError::NoRecommendation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        EvaluationServiceError::EventAlreadyOpen(_) => StatusCode::CONFLICT,
        EvaluationServiceError::EventNotFound(_)
        | EvaluationServiceError::EvaluationNotFound(_) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Selection(SelectionError::NotFound(_)) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Selection(
            SelectionError::AlreadyPending(_) | SelectionError::InvalidTransition { .. },
        ) => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        EvaluationServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        EvaluationServiceError::Repository(RepositoryError::Unavailable(_))
        | EvaluationServiceError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
    };

    let payload = json!({ "error": error.to_string() });
    (status, axum::Json(payload)).into_response()
}
