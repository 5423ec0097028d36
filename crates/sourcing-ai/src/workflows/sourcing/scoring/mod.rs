//! Score resolution and vendor ranking.
//!
//! Aggregation is deterministic: same evaluation rows in, same summaries and
//! order out. Randomness lives only in the recommendation generator, which is
//! a separate, explicitly invoked operation.

mod aggregate;
pub mod recommendation;

pub use aggregate::{aggregate, rank_of, ranked_views, RankedVendorView, VendorSummary};
pub use recommendation::{AiRecommendation, RecommendationEngine};
