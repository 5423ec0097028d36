//! Sourcing-event bid evaluation: the weighted scoring matrix, completion
//! gating, and the winner-selection approval workflow.
//!
//! The pipeline reads as the data flows: evaluation rows enter through the
//! repositories, the scoring module resolves effective scores and ranks
//! vendors, the completion tracker measures human sign-off coverage, and the
//! selection module carries the approval state machine. Export renders the
//! same aggregated data as a flat CSV matrix.

pub mod catalog;
pub mod completion;
pub mod domain;
pub mod export;
pub mod repository;
pub mod router;
pub mod scoring;
pub mod selection;
pub mod service;

#[cfg(test)]
mod tests;

pub use catalog::{CatalogError, CriteriaCatalog, Criterion, ScoreBand};
pub use completion::{completion, CellProgress, CompletionReport};
pub use domain::{
    EffectiveScore, Evaluation, EvaluationId, SelectionId, SourcingEventId, Vendor, VendorId,
};
pub use export::{export_filename, export_matrix, ExportError};
pub use repository::{EvaluationRepository, RepositoryError, SelectionRepository};
pub use router::evaluation_router;
pub use scoring::{
    aggregate, rank_of, ranked_views, AiRecommendation, RankedVendorView, RecommendationEngine,
    VendorSummary,
};
pub use selection::{ApprovalStatus, SelectionError, SelectionView, WinnerSelection};
pub use service::{EvaluationService, EvaluationServiceError};
