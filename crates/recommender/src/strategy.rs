//! The three recommendation strategies.
//!
//! Each variant bundles everything that differs between strategies: the read
//! pattern and its parameters, the aggregate shape, and which explanation
//! categories its rows carry. The rest of the flow is shared.

use crate::aggregate::{Aggregates, CollaborativeStats, HybridStats};
use crate::error::InputError;
use crate::explain::ExplanationCategory;
use data_loader::{MovieId, UserId};
use graph::{Pattern, QueryParams, Row};
use serde::Serialize;
use std::fmt;

const COLLABORATIVE_CATEGORIES: &[ExplanationCategory] = &[ExplanationCategory::Paths];

const HYBRID_CATEGORIES: &[ExplanationCategory] = &[
    ExplanationCategory::GenreMatch,
    ExplanationCategory::TagMatch,
    ExplanationCategory::CandidateGenre,
    ExplanationCategory::CandidateTag,
    ExplanationCategory::CandidateRating,
];

/// A recommendation strategy together with its seed
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum Strategy {
    /// Movies rated by users who share a rated movie with the seed user
    PeerCollaborative { user_id: UserId },
    /// Movies rated by users who rated any of the seed movies
    SeedMovie { movie_ids: Vec<MovieId> },
    /// Unrated movies overlapping the seed user's genres or tags
    GenreTagHybrid { user_id: UserId },
}

impl Strategy {
    pub fn pattern(&self) -> Pattern {
        match self {
            Strategy::PeerCollaborative { .. } => Pattern::PeerCollaborative,
            Strategy::SeedMovie { .. } => Pattern::SeedMovie,
            Strategy::GenreTagHybrid { .. } => Pattern::GenreTagHybrid,
        }
    }

    pub fn params(&self, now: i64) -> QueryParams {
        match self {
            Strategy::PeerCollaborative { user_id } | Strategy::GenreTagHybrid { user_id } => {
                QueryParams::for_user(*user_id, now)
            }
            Strategy::SeedMovie { movie_ids } => QueryParams::for_movies(movie_ids.clone(), now),
        }
    }

    /// Check the seed before any query is issued
    pub fn validate(&self) -> Result<(), InputError> {
        match self {
            Strategy::SeedMovie { movie_ids } if movie_ids.is_empty() => {
                Err(InputError::EmptySeedMovies)
            }
            _ => Ok(()),
        }
    }

    pub fn decode_aggregates(&self, row: &Row) -> graph::Result<Aggregates> {
        match self {
            Strategy::PeerCollaborative { .. } | Strategy::SeedMovie { .. } => {
                CollaborativeStats::from_row(row).map(Aggregates::Collaborative)
            }
            Strategy::GenreTagHybrid { .. } => HybridStats::from_row(row).map(Aggregates::Hybrid),
        }
    }

    /// Explanation categories carried by this strategy's rows
    pub fn categories(&self) -> &'static [ExplanationCategory] {
        match self {
            Strategy::PeerCollaborative { .. } | Strategy::SeedMovie { .. } => {
                COLLABORATIVE_CATEGORIES
            }
            Strategy::GenreTagHybrid { .. } => HYBRID_CATEGORIES,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Strategy::PeerCollaborative { .. } => "peer-collaborative",
            Strategy::SeedMovie { .. } => "seed-movie",
            Strategy::GenreTagHybrid { .. } => "genre/tag hybrid",
        }
    }

    /// Human description of the seed, used in log lines
    pub fn seed(&self) -> String {
        match self {
            Strategy::PeerCollaborative { user_id } | Strategy::GenreTagHybrid { user_id } => {
                format!("user {}", user_id)
            }
            Strategy::SeedMovie { movie_ids } => format!("movies {:?}", movie_ids),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} for {}", self.label(), self.seed())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_patterns_and_params() {
        let strategy = Strategy::PeerCollaborative { user_id: 2 };
        assert_eq!(strategy.pattern(), Pattern::PeerCollaborative);
        assert_eq!(strategy.params(50), QueryParams::for_user(2, 50));

        let strategy = Strategy::SeedMovie {
            movie_ids: vec![82, 74],
        };
        assert_eq!(strategy.pattern(), Pattern::SeedMovie);
        assert_eq!(strategy.params(0).movie_ids, vec![82, 74]);
        assert_eq!(strategy.params(0).user_id, None);
    }

    #[test]
    fn test_validate() {
        assert_eq!(
            Strategy::SeedMovie { movie_ids: vec![] }.validate(),
            Err(InputError::EmptySeedMovies)
        );
        assert!(Strategy::GenreTagHybrid { user_id: 312 }.validate().is_ok());
    }

    #[test]
    fn test_categories() {
        assert_eq!(
            Strategy::SeedMovie { movie_ids: vec![1] }.categories(),
            &[ExplanationCategory::Paths]
        );
        assert_eq!(Strategy::GenreTagHybrid { user_id: 1 }.categories().len(), 5);
    }

    #[test]
    fn test_display() {
        let strategy = Strategy::SeedMovie {
            movie_ids: vec![82, 74],
        };
        assert_eq!(strategy.to_string(), "seed-movie for movies [82, 74]");
    }
}
