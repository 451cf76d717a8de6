//! Scoring formulas and ranking.
//!
//! - collaborative: `mean_rating * log10(distinct_contributors + 1)`
//! - hybrid base: `mean_rating * log10(rating_count + 1)`
//! - hybrid final: `0.6 * base + 0.6 * recency + 0.4 * |genres| + 0.2 * |tags|`

use crate::aggregate::{Candidate, HybridStats};

pub const BASE_WEIGHT: f64 = 0.6;
pub const RECENCY_WEIGHT: f64 = 0.6;
pub const GENRE_WEIGHT: f64 = 0.4;
pub const TAG_WEIGHT: f64 = 0.2;

/// Score shared by the peer-collaborative and seed-movie strategies
pub fn collaborative_score(mean_rating: f64, distinct_contributors: u32) -> f64 {
    mean_rating * (f64::from(distinct_contributors) + 1.0).log10()
}

pub fn hybrid_base_score(mean_rating: f64, rating_count: u32) -> f64 {
    mean_rating * (f64::from(rating_count) + 1.0).log10()
}

pub fn hybrid_score(stats: &HybridStats) -> f64 {
    BASE_WEIGHT * hybrid_base_score(stats.mean_rating, stats.rating_count)
        + RECENCY_WEIGHT * stats.recency_boost
        + GENRE_WEIGHT * stats.overlapping_genres.len() as f64
        + TAG_WEIGHT * stats.overlapping_tags.len() as f64
}

/// Sort by score descending and keep the first `limit`.
///
/// The sort is stable: equal scores keep the order the store returned them in.
pub fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(limit);
    candidates
}
