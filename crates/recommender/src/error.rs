//! Error types for the recommendation engine.
//!
//! Three kinds of failure are kept apart:
//! - [`InputError`]: the caller asked for something invalid; raised before any query
//! - [`RecommendError`]: the query failed or broke its row contract; fails the call
//! - [`WitnessError`]: one path witness could not be decoded; only that line is lost

use data_loader::MovieId;
use graph::{GraphError, Role};
use thiserror::Error;

/// Rejected caller input
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("limit must be at least 1, got {0}")]
    InvalidLimit(usize),

    #[error("at least one seed movie id is required")]
    EmptySeedMovies,
}

/// Failure of a whole recommendation call
#[derive(Error, Debug, Clone, PartialEq)]
pub enum RecommendError {
    /// The graph store could not run the query
    #[error("graph query failed: {0}")]
    Query(#[from] GraphError),

    /// A row is missing an aggregate column or holds the wrong type
    #[error("malformed result row (movie {movie_id:?}): {source}")]
    MalformedRow {
        movie_id: Option<MovieId>,
        source: GraphError,
    },
}

/// Why a single path witness produced no sentence
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WitnessError {
    #[error("witness is not an alternating node/relationship path")]
    Shape,

    #[error("witness has no {kind} playing `{role}`")]
    MissingElement { role: Role, kind: &'static str },

    #[error("`{role}` has no usable `{property}` property")]
    MissingProperty { role: Role, property: &'static str },
}

/// Convenience type alias for Results in this crate
pub type Result<T> = std::result::Result<T, RecommendError>;
