//! Per-candidate aggregates decoded from query rows.

use crate::scorer;
use data_loader::MovieId;
use graph::{GraphError, Row, columns};
use serde::Serialize;

/// Aggregates of the two collaborative strategies
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CollaborativeStats {
    /// Mean over the contributing candidate ratings
    pub mean_rating: f64,
    /// Distinct peer users that rated the candidate
    pub distinct_contributors: u32,
}

impl CollaborativeStats {
    pub fn from_row(row: &Row) -> graph::Result<Self> {
        Ok(Self {
            mean_rating: row.float(columns::AVG_RATING)?,
            distinct_contributors: count(row, columns::CONTRIBUTORS)?,
        })
    }

    pub fn score(&self) -> f64 {
        scorer::collaborative_score(self.mean_rating, self.distinct_contributors)
    }
}

/// Aggregates of the genre/tag hybrid strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HybridStats {
    /// Mean over all ratings of the candidate, 0.0 when unrated
    pub mean_rating: f64,
    pub rating_count: u32,
    pub recency_boost: f64,
    pub overlapping_genres: Vec<String>,
    pub overlapping_tags: Vec<String>,
}

impl HybridStats {
    pub fn from_row(row: &Row) -> graph::Result<Self> {
        Ok(Self {
            mean_rating: row.float(columns::AVG_RATING)?,
            rating_count: count(row, columns::RATING_COUNT)?,
            recency_boost: row.float(columns::RECENCY_BOOST)?,
            overlapping_genres: row.str_list(columns::OVERLAPPING_GENRES)?.to_vec(),
            overlapping_tags: row.str_list(columns::OVERLAPPING_TAGS)?.to_vec(),
        })
    }

    pub fn base_score(&self) -> f64 {
        scorer::hybrid_base_score(self.mean_rating, self.rating_count)
    }

    pub fn score(&self) -> f64 {
        scorer::hybrid_score(self)
    }
}

/// The aggregate shape of a strategy
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Aggregates {
    Collaborative(CollaborativeStats),
    Hybrid(HybridStats),
}

impl Aggregates {
    pub fn mean_rating(&self) -> f64 {
        match self {
            Aggregates::Collaborative(stats) => stats.mean_rating,
            Aggregates::Hybrid(stats) => stats.mean_rating,
        }
    }

    /// Ranking score, recomputable from the aggregates alone
    pub fn score(&self) -> f64 {
        match self {
            Aggregates::Collaborative(stats) => stats.score(),
            Aggregates::Hybrid(stats) => stats.score(),
        }
    }
}

/// A decoded row waiting to be ranked.
///
/// The row is kept so that explanations can be extracted after ranking, and
/// only for candidates that survive the limit.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub movie_id: MovieId,
    pub title: String,
    pub aggregates: Aggregates,
    pub score: f64,
    pub(crate) row: Row,
}

/// Read the candidate id of a row
pub fn movie_id(row: &Row) -> graph::Result<MovieId> {
    let id = row.int(columns::MOVIE_ID)?;
    MovieId::try_from(id).map_err(|_| out_of_range(columns::MOVIE_ID))
}

fn count(row: &Row, column: &str) -> graph::Result<u32> {
    let value = row.int(column)?;
    u32::try_from(value).map_err(|_| out_of_range(column))
}

fn out_of_range(column: &str) -> GraphError {
    GraphError::TypeMismatch {
        column: column.to_string(),
        expected: "non-negative 32-bit integer",
        found: "out-of-range integer",
    }
}
