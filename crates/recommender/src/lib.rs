//! # Recommender Crate
//!
//! Scores and explains movie recommendations over the movie graph.
//!
//! ## Strategies
//!
//! - **Peer-collaborative**: "users who rated what you rated also rated..."
//! - **Seed-movie**: "people who rated these movies also rated..."
//! - **Genre/tag hybrid**: unrated movies sharing your genres or tags, boosted
//!   by rating volume and recency
//!
//! ## Flow
//!
//! ```text
//! Strategy ──> one read query ──> aggregates ──> score ──> rank/limit ──> explanations ──> Recommendation
//! ```
//!
//! ## Example Usage
//!
//! ```ignore
//! use graph::{GraphStore, InMemoryGraph};
//! use recommender::Recommender;
//!
//! let store = InMemoryGraph::new(index);
//! let mut session = store.open_session()?;
//! let recommender = Recommender::new();
//!
//! for rec in recommender.recommend_by_peer_collaboration(session.as_mut(), 2, Some(5))? {
//!     println!("{} ({:.3})", rec.title, rec.score);
//! }
//! ```

pub mod aggregate;
pub mod assembler;
pub mod config;
pub mod engine;
pub mod error;
pub mod explain;
pub mod outcome;
pub mod scorer;
pub mod strategy;

pub use aggregate::{Aggregates, Candidate, CollaborativeStats, HybridStats};
pub use assembler::Recommendation;
pub use config::{Clock, DEFAULT_LIMIT, FixedClock, RecommenderConfig, SystemClock};
pub use engine::Recommender;
pub use error::{InputError, RecommendError, Result, WitnessError};
pub use explain::{ExplanationCategory, Explanations};
pub use outcome::RecommendationOutcome;
pub use strategy::Strategy;
