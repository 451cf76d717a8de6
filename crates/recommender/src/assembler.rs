//! Recommendation Assembler: one record per ranked candidate.

use crate::aggregate::{Aggregates, Candidate};
use crate::explain::{self, Explanations};
use crate::strategy::Strategy;
use data_loader::MovieId;
use serde::Serialize;

/// A ranked recommendation with its justification
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub movie_id: MovieId,
    pub title: String,
    pub score: f64,
    pub aggregates: Aggregates,
    pub explanations: Explanations,
}

/// Attach explanations to ranked candidates, keeping their order
pub fn assemble(
    strategy: &Strategy,
    ranked: Vec<Candidate>,
    per_category: usize,
) -> Vec<Recommendation> {
    let categories = strategy.categories();
    ranked
        .into_iter()
        .map(|candidate| Recommendation {
            explanations: explain::extract(&candidate.row, categories, per_category),
            movie_id: candidate.movie_id,
            title: candidate.title,
            score: candidate.score,
            aggregates: candidate.aggregates,
        })
        .collect()
}
