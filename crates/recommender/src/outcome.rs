//! Typed result of one recommendation call.

use crate::assembler::Recommendation;
use crate::error::RecommendError;

/// What a strategy evaluation produced.
///
/// `Empty` and `Failed` both end up as an empty list for callers of the
/// `recommend_by_*` functions; keeping them apart here lets tests and
/// diagnostics tell "no matches" from "query error".
#[derive(Debug, Clone, PartialEq)]
pub enum RecommendationOutcome {
    Success(Vec<Recommendation>),
    Empty,
    Failed(RecommendError),
}

impl RecommendationOutcome {
    pub fn from_recommendations(recommendations: Vec<Recommendation>) -> Self {
        if recommendations.is_empty() {
            RecommendationOutcome::Empty
        } else {
            RecommendationOutcome::Success(recommendations)
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, RecommendationOutcome::Empty)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, RecommendationOutcome::Failed(_))
    }

    pub fn recommendations(&self) -> &[Recommendation] {
        match self {
            RecommendationOutcome::Success(recs) => recs,
            _ => &[],
        }
    }

    pub fn error(&self) -> Option<&RecommendError> {
        match self {
            RecommendationOutcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    /// Collapse to a plain list; failures become empty
    pub fn into_recommendations(self) -> Vec<Recommendation> {
        match self {
            RecommendationOutcome::Success(recs) => recs,
            RecommendationOutcome::Empty | RecommendationOutcome::Failed(_) => Vec::new(),
        }
    }
}
