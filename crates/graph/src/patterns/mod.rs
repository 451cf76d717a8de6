//! Native evaluation of the read patterns over a [`DataIndex`].
//!
//! Every pattern walks the index in ascending id order, so rows and
//! witnesses come out the same on every run.

pub(crate) mod hybrid;
pub(crate) mod peer;
pub(crate) mod seed_movie;

use crate::witness::Snapshot;
use data_loader::{DataIndex, MovieId, Rating, Tag, UserId};

pub(crate) fn user_node(user_id: UserId) -> Snapshot {
    Snapshot::new("User").with("userId", user_id)
}

/// Movie node; a movie missing from the catalogue gets no title property
pub(crate) fn movie_node(index: &DataIndex, movie_id: MovieId) -> Snapshot {
    let node = Snapshot::new("Movie").with("movieId", movie_id);
    match index.get_movie(movie_id) {
        Some(movie) => node.with("title", movie.title.as_str()),
        None => node,
    }
}

pub(crate) fn genre_node(name: &str) -> Snapshot {
    Snapshot::new("Genre").with("name", name)
}

pub(crate) fn rated_rel(rating: &Rating) -> Snapshot {
    Snapshot::new("RATED")
        .with("rating", rating.rating)
        .with("timestamp", rating.timestamp)
}

pub(crate) fn tagged_rel(tag: &Tag) -> Snapshot {
    Snapshot::new("TAGGED")
        .with("tag", tag.tag.as_str())
        .with("timestamp", tag.timestamp)
}

pub(crate) fn has_genre_rel() -> Snapshot {
    Snapshot::new("HAS_GENRE")
}

/// Ratings sorted by the given key, borrowed from the index
pub(crate) fn sorted_ratings<K: Ord>(ratings: &[Rating], key: impl Fn(&Rating) -> K) -> Vec<&Rating> {
    let mut sorted: Vec<&Rating> = ratings.iter().collect();
    sorted.sort_by_key(|r| key(*r));
    sorted
}

/// Arithmetic mean, 0.0 for no values
pub(crate) fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}
