//! The recommendation engine.
//!
//! Every call runs the same flow regardless of strategy:
//! 1. Validate the input (no query is issued for bad input)
//! 2. Run exactly one read query through the caller's session
//! 3. Decode the aggregates of every row and score it
//! 4. Rank and truncate to the limit
//! 5. Extract explanations for the survivors and assemble the records

use crate::aggregate::{self, Candidate};
use crate::assembler::{self, Recommendation};
use crate::config::RecommenderConfig;
use crate::error::{InputError, RecommendError, Result};
use crate::outcome::RecommendationOutcome;
use crate::scorer;
use crate::strategy::Strategy;
use data_loader::{MovieId, UserId};
use graph::{GraphSession, Row, columns};
use std::time::Instant;
use tracing::{debug, error, info, instrument};

#[derive(Debug, Clone, Default)]
pub struct Recommender {
    config: RecommenderConfig,
}

impl Recommender {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: RecommenderConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RecommenderConfig {
        &self.config
    }

    /// Resolve an optional limit against the configured default
    pub fn resolve_limit(&self, limit: Option<usize>) -> std::result::Result<usize, InputError> {
        match limit.unwrap_or(self.config.default_limit) {
            0 => Err(InputError::InvalidLimit(0)),
            n => Ok(n),
        }
    }

    /// Evaluate a strategy and report the typed outcome.
    ///
    /// Input errors are returned as `Err`; everything after validation
    /// (query failures, malformed rows, no matches) is reported through the
    /// outcome.
    #[instrument(skip(self, session, strategy), fields(strategy = strategy.label(), seed = %strategy.seed()))]
    pub fn evaluate(
        &self,
        session: &mut dyn GraphSession,
        strategy: &Strategy,
        limit: usize,
    ) -> std::result::Result<RecommendationOutcome, InputError> {
        if limit == 0 {
            return Err(InputError::InvalidLimit(limit));
        }
        strategy.validate()?;

        let start = Instant::now();
        let outcome = match self.run(session, strategy, limit) {
            Ok(recommendations) => RecommendationOutcome::from_recommendations(recommendations),
            Err(e) => RecommendationOutcome::Failed(e),
        };
        match &outcome {
            RecommendationOutcome::Success(recommendations) => debug!(
                "Produced {} recommendations in {:.2?}",
                recommendations.len(),
                start.elapsed()
            ),
            RecommendationOutcome::Empty => info!("No recommendations found for {}", strategy.seed()),
            RecommendationOutcome::Failed(e) => {
                error!("Recommendation failed for {}: {}", strategy.seed(), e)
            }
        }
        Ok(outcome)
    }

    fn run(
        &self,
        session: &mut dyn GraphSession,
        strategy: &Strategy,
        limit: usize,
    ) -> Result<Vec<Recommendation>> {
        let params = strategy.params(self.config.now());
        let rows = session.run_read_query(strategy.pattern(), &params)?;
        debug!("Query returned {} candidate rows", rows.len());

        let candidates = rows
            .into_iter()
            .map(|row| decode_candidate(strategy, row))
            .collect::<Result<Vec<_>>>()?;

        let ranked = scorer::rank(candidates, limit);
        Ok(assembler::assemble(
            strategy,
            ranked,
            self.config.witnesses_per_category,
        ))
    }

    /// Evaluate and collapse failures to an empty list
    pub fn recommend(
        &self,
        session: &mut dyn GraphSession,
        strategy: &Strategy,
        limit: Option<usize>,
    ) -> std::result::Result<Vec<Recommendation>, InputError> {
        let limit = self.resolve_limit(limit)?;
        Ok(self.evaluate(session, strategy, limit)?.into_recommendations())
    }

    pub fn recommend_by_peer_collaboration(
        &self,
        session: &mut dyn GraphSession,
        user_id: UserId,
        limit: Option<usize>,
    ) -> std::result::Result<Vec<Recommendation>, InputError> {
        self.recommend(session, &Strategy::PeerCollaborative { user_id }, limit)
    }

    pub fn recommend_by_seed_movies(
        &self,
        session: &mut dyn GraphSession,
        movie_ids: &[MovieId],
        limit: Option<usize>,
    ) -> std::result::Result<Vec<Recommendation>, InputError> {
        let strategy = Strategy::SeedMovie {
            movie_ids: movie_ids.to_vec(),
        };
        self.recommend(session, &strategy, limit)
    }

    pub fn recommend_by_genre_tag_hybrid(
        &self,
        session: &mut dyn GraphSession,
        user_id: UserId,
        limit: Option<usize>,
    ) -> std::result::Result<Vec<Recommendation>, InputError> {
        self.recommend(session, &Strategy::GenreTagHybrid { user_id }, limit)
    }
}

/// Decode identity and aggregates; any failure here breaks the row contract
fn decode_candidate(strategy: &Strategy, row: Row) -> Result<Candidate> {
    let movie_id = aggregate::movie_id(&row).map_err(|source| RecommendError::MalformedRow {
        movie_id: None,
        source,
    })?;
    let malformed = |source| RecommendError::MalformedRow {
        movie_id: Some(movie_id),
        source,
    };

    let title = row.str(columns::TITLE).map_err(malformed)?.to_string();
    let aggregates = strategy.decode_aggregates(&row).map_err(malformed)?;
    let score = aggregates.score();
    Ok(Candidate {
        movie_id,
        title,
        aggregates,
        score,
        row,
    })
}
