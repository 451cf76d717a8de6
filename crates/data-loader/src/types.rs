//! Core domain types for the movie graph.
//!
//! The loaded dataset is a property graph held in memory:
//! - `User` nodes are identified by an integer id and carry no attributes
//! - `Movie` nodes carry a title and link to `Genre` nodes (HAS_GENRE)
//! - `Rating` and `Tag` are the RATED / TAGGED relationships (User -> Movie)
//! - likes are the LIKES relationship created by user management

use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

// =============================================================================
// Type Aliases
// =============================================================================

/// Unique identifier for a user
pub type UserId = u32;

/// Unique identifier for a movie
pub type MovieId = u32;

// =============================================================================
// Nodes and relationships
// =============================================================================

/// A movie node with its HAS_GENRE edges folded in
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    /// Genre names, in the order they appear in `movies.csv`
    pub genres: Vec<String>,
}

/// A RATED relationship
///
/// Ratings live in [0, 5]; the loader drops anything outside that range.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rating {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub rating: f32,
    /// Unix timestamp (seconds) when the rating was made
    pub timestamp: i64,
}

/// A TAGGED relationship. Tags are free text, not nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Tag {
    pub user_id: UserId,
    pub movie_id: MovieId,
    pub tag: String,
    pub timestamp: i64,
}

// =============================================================================
// Statistics Types
// =============================================================================

/// Precomputed rating statistics for a movie
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MovieStats {
    pub avg_rating: f32,
    pub rating_count: u32,
}

/// Node and relationship totals, mostly for logging
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct IndexCounts {
    pub users: usize,
    pub movies: usize,
    pub ratings: usize,
    pub tags: usize,
    pub likes: usize,
}

// =============================================================================
// DataIndex - the in-memory graph
// =============================================================================

/// Holds every node and relationship plus adjacency indices.
///
/// Reads return borrowed slices so that traversals never copy edges.
/// Users are kept in a `BTreeSet` so iteration order is stable between runs.
#[derive(Debug, Default)]
pub struct DataIndex {
    pub(crate) users: BTreeSet<UserId>,
    pub(crate) movies: HashMap<MovieId, Movie>,

    /// All ratings made by each user
    pub(crate) user_ratings: HashMap<UserId, Vec<Rating>>,
    /// All ratings received by each movie
    pub(crate) movie_ratings: HashMap<MovieId, Vec<Rating>>,

    /// All tags applied by each user
    pub(crate) user_tags: HashMap<UserId, Vec<Tag>>,
    /// All tags applied to each movie
    pub(crate) movie_tags: HashMap<MovieId, Vec<Tag>>,

    /// LIKES edges
    pub(crate) likes: HashMap<UserId, BTreeSet<MovieId>>,

    pub(crate) movie_stats: HashMap<MovieId, MovieStats>,
}

impl DataIndex {
    /// Creates a new, empty DataIndex
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_movie(&self, id: MovieId) -> Option<&Movie> {
        self.movies.get(&id)
    }

    pub fn has_user(&self, id: UserId) -> bool {
        self.users.contains(&id)
    }

    /// All user ids in ascending order
    pub fn user_ids(&self) -> impl Iterator<Item = UserId> + '_ {
        self.users.iter().copied()
    }

    /// All movie ids in ascending order
    pub fn movie_ids(&self) -> Vec<MovieId> {
        let mut ids: Vec<MovieId> = self.movies.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// Get all ratings made by a user
    ///
    /// Returns an empty slice if user has no ratings
    pub fn get_user_ratings(&self, user_id: UserId) -> &[Rating] {
        self.user_ratings
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get all ratings for a movie
    pub fn get_movie_ratings(&self, movie_id: MovieId) -> &[Rating] {
        self.movie_ratings
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_user_tags(&self, user_id: UserId) -> &[Tag] {
        self.user_tags
            .get(&user_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    pub fn get_movie_tags(&self, movie_id: MovieId) -> &[Tag] {
        self.movie_tags
            .get(&movie_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Get precomputed statistics for a movie
    pub fn get_movie_stats(&self, movie_id: MovieId) -> Option<&MovieStats> {
        self.movie_stats.get(&movie_id)
    }

    /// True if a RATED edge exists from `user_id` to `movie_id`
    pub fn has_rated(&self, user_id: UserId, movie_id: MovieId) -> bool {
        self.get_user_ratings(user_id)
            .iter()
            .any(|r| r.movie_id == movie_id)
    }

    // Mutators used while loading and by the tests

    /// Insert a bare user node
    pub fn insert_user(&mut self, user_id: UserId) {
        self.users.insert(user_id);
    }

    pub fn insert_movie(&mut self, movie: Movie) {
        self.movies.insert(movie.id, movie);
    }

    /// Insert a rating and update indices. The rating's user node is created
    /// if it does not exist yet.
    pub fn insert_rating(&mut self, rating: Rating) {
        self.users.insert(rating.user_id);
        self.user_ratings
            .entry(rating.user_id)
            .or_default()
            .push(rating);
        self.movie_ratings
            .entry(rating.movie_id)
            .or_default()
            .push(rating);
    }

    /// Insert a tag and update indices
    pub fn insert_tag(&mut self, tag: Tag) {
        self.users.insert(tag.user_id);
        self.movie_tags
            .entry(tag.movie_id)
            .or_default()
            .push(tag.clone());
        self.user_tags.entry(tag.user_id).or_default().push(tag);
    }

    pub fn counts(&self) -> IndexCounts {
        IndexCounts {
            users: self.users.len(),
            movies: self.movies.len(),
            ratings: self.user_ratings.values().map(|v| v.len()).sum(),
            tags: self.user_tags.values().map(|v| v.len()).sum(),
            likes: self.likes.values().map(|v| v.len()).sum(),
        }
    }
}
