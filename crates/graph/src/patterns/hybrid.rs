//! Genre/tag hybrid pattern.
//!
//! The seed user's profile is the set of genres of every movie they rated
//! plus every tag they applied to one of those movies. Each unrated movie with at least one genre is
//! matched against that profile; movies overlapping on neither side are
//! dropped. Surviving candidates carry their global rating aggregates and a
//! recency boost, plus five independent witness columns.

use super::{genre_node, has_genre_rel, mean, movie_node, rated_rel, sorted_ratings, tagged_rel, user_node};
use crate::error::Result;
use crate::query::{MAX_WITNESSES, Pattern, QueryParams, columns};
use crate::value::{Row, Value, widen_rating};
use crate::witness::{PathWitness, Role};
use data_loader::{DataIndex, Movie, MovieId, Rating, Tag, UserId};
use std::collections::{BTreeSet, HashSet};

/// Numerator of the per-rating recency term `1000 / (elapsed + 1)`
pub(crate) const RECENCY_SCALE: f64 = 1000.0;

/// Recency contribution of one rating; future timestamps count as elapsed 0
pub(crate) fn recency_term(now: i64, timestamp: i64) -> f64 {
    let elapsed = now.saturating_sub(timestamp).max(0);
    RECENCY_SCALE / (elapsed as f64 + 1.0)
}

struct Profile<'a> {
    user_id: UserId,
    rated: HashSet<MovieId>,
    genres: BTreeSet<&'a str>,
    tags: BTreeSet<&'a str>,
    /// (rating, genre) pairs in movie-id then genre order
    genre_edges: Vec<(&'a Rating, &'a str)>,
    /// tags in (movie, tag) order
    tag_edges: Vec<&'a Tag>,
}

impl<'a> Profile<'a> {
    fn build(index: &'a DataIndex, user_id: UserId) -> Self {
        let ratings = sorted_ratings(index.get_user_ratings(user_id), |r| r.movie_id);

        let mut genre_edges = Vec::new();
        for rating in &ratings {
            if let Some(movie) = index.get_movie(rating.movie_id) {
                for genre in &movie.genres {
                    genre_edges.push((*rating, genre.as_str()));
                }
            }
        }

        let rated: HashSet<MovieId> = ratings.iter().map(|r| r.movie_id).collect();

        // Only tags on movies the user rated belong to the profile
        let mut tag_edges: Vec<&Tag> = index
            .get_user_tags(user_id)
            .iter()
            .filter(|t| rated.contains(&t.movie_id))
            .collect();
        tag_edges.sort_by(|a, b| (a.movie_id, &a.tag).cmp(&(b.movie_id, &b.tag)));

        Self {
            user_id,
            rated,
            genres: genre_edges.iter().map(|(_, g)| *g).collect(),
            tags: tag_edges.iter().map(|t| t.tag.as_str()).collect(),
            genre_edges,
            tag_edges,
        }
    }
}

pub(crate) fn run(index: &DataIndex, params: &QueryParams) -> Result<Vec<Row>> {
    let user_id = params.require_user(Pattern::GenreTagHybrid)?;
    let profile = Profile::build(index, user_id);

    let mut rows = Vec::new();
    for movie_id in index.movie_ids() {
        if profile.rated.contains(&movie_id) {
            continue;
        }
        let Some(movie) = index.get_movie(movie_id) else {
            continue;
        };
        if movie.genres.is_empty() {
            continue;
        }
        if let Some(row) = candidate_row(index, &profile, movie, params.now) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn candidate_row(index: &DataIndex, profile: &Profile<'_>, movie: &Movie, now: i64) -> Option<Row> {
    let candidate_genres: BTreeSet<&str> = movie.genres.iter().map(String::as_str).collect();
    let movie_tags = index.get_movie_tags(movie.id);
    let candidate_tags: BTreeSet<&str> = movie_tags.iter().map(|t| t.tag.as_str()).collect();

    let overlapping_genres: Vec<&str> = profile
        .genres
        .intersection(&candidate_genres)
        .copied()
        .collect();
    let overlapping_tags: Vec<&str> = profile.tags.intersection(&candidate_tags).copied().collect();
    if overlapping_genres.is_empty() && overlapping_tags.is_empty() {
        return None;
    }

    let ratings = sorted_ratings(index.get_movie_ratings(movie.id), |r| r.user_id);
    let values: Vec<f64> = ratings.iter().map(|r| widen_rating(r.rating)).collect();
    let recency: Vec<f64> = ratings.iter().map(|r| recency_term(now, r.timestamp)).collect();

    let genre_paths: Vec<PathWitness> = profile
        .genre_edges
        .iter()
        .filter(|(_, genre)| overlapping_genres.contains(genre))
        .take(MAX_WITNESSES)
        .map(|(rating, genre)| {
            PathWitness::start(Role::SeedUser, user_node(profile.user_id))
                .then(
                    Role::SeedRating,
                    rated_rel(rating),
                    Role::ProfileMovie,
                    movie_node(index, rating.movie_id),
                )
                .then(Role::HasGenre, has_genre_rel(), Role::Genre, genre_node(genre))
        })
        .collect();

    let tag_paths: Vec<PathWitness> = profile
        .tag_edges
        .iter()
        .filter(|t| overlapping_tags.contains(&t.tag.as_str()))
        .take(MAX_WITNESSES)
        .map(|t| {
            PathWitness::start(Role::SeedUser, user_node(profile.user_id)).then(
                Role::Tag,
                tagged_rel(t),
                Role::ProfileMovie,
                movie_node(index, t.movie_id),
            )
        })
        .collect();

    let candidate_genre_paths: Vec<PathWitness> = movie
        .genres
        .iter()
        .take(MAX_WITNESSES)
        .map(|genre| {
            PathWitness::start(Role::CandidateMovie, movie_node(index, movie.id)).then(
                Role::HasGenre,
                has_genre_rel(),
                Role::Genre,
                genre_node(genre),
            )
        })
        .collect();

    let mut other_tags: Vec<&Tag> = movie_tags.iter().collect();
    other_tags.sort_by(|a, b| (a.user_id, &a.tag).cmp(&(b.user_id, &b.tag)));
    let candidate_tag_paths: Vec<PathWitness> = other_tags
        .into_iter()
        .take(MAX_WITNESSES)
        .map(|t| {
            PathWitness::start(Role::OtherUser, user_node(t.user_id)).then(
                Role::Tag,
                tagged_rel(t),
                Role::CandidateMovie,
                movie_node(index, movie.id),
            )
        })
        .collect();

    let rating_paths: Vec<PathWitness> = ratings
        .iter()
        .take(MAX_WITNESSES)
        .map(|r| {
            PathWitness::start(Role::OtherUser, user_node(r.user_id)).then(
                Role::CandidateRating,
                rated_rel(r),
                Role::CandidateMovie,
                movie_node(index, movie.id),
            )
        })
        .collect();

    Some(
        Row::new()
            .with(columns::MOVIE_ID, Value::Int(i64::from(movie.id)))
            .with(columns::TITLE, Value::Str(movie.title.clone()))
            .with(columns::OVERLAPPING_GENRES, Value::StrList(to_owned(&overlapping_genres)))
            .with(columns::OVERLAPPING_TAGS, Value::StrList(to_owned(&overlapping_tags)))
            .with(columns::AVG_RATING, Value::Float(mean(&values)))
            .with(columns::RATING_COUNT, Value::Int(ratings.len() as i64))
            .with(columns::RECENCY_BOOST, Value::Float(mean(&recency)))
            .with(columns::GENRE_PATHS, Value::Paths(genre_paths))
            .with(columns::TAG_PATHS, Value::Paths(tag_paths))
            .with(columns::CANDIDATE_GENRE_PATHS, Value::Paths(candidate_genre_paths))
            .with(columns::CANDIDATE_TAG_PATHS, Value::Paths(candidate_tag_paths))
            .with(columns::RATING_PATHS, Value::Paths(rating_paths)),
    )
}

fn to_owned(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recency_term() {
        assert_eq!(recency_term(100, 100), 1000.0);
        assert_eq!(recency_term(100, 99), 500.0);
        // future timestamp is clamped
        assert_eq!(recency_term(100, 250), 1000.0);
    }
}
