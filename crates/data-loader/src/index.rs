//! DataIndex building and indexing logic.
//!
//! Builds the in-memory graph from parsed files:
//! - insert movies (HAS_GENRE folded into each movie)
//! - deduplicate and insert RATED / TAGGED / LIKES edges
//! - compute per-movie rating statistics
//! - validate the result

use crate::error::{DataLoadError, Result};
use crate::parser;
use crate::types::*;
use rayon::prelude::*;
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::{debug, info, warn};

pub const MOVIES_FILE: &str = "movies.csv";
pub const RATINGS_FILE: &str = "ratings.csv";
pub const TAGS_FILE: &str = "tags.csv";
pub const USERS_FILE: &str = "users.csv";
pub const LIKES_FILE: &str = "likes.csv";

impl DataIndex {
    /// Load a MovieLens dataset directory.
    ///
    /// `movies.csv`, `ratings.csv` and `tags.csv` are required. `users.csv`
    /// and `likes.csv` are optional and only exist once user management has
    /// saved something.
    pub fn load_from_dir(data_dir: &Path) -> Result<Self> {
        info!("Loading MovieLens dataset from {:?}", data_dir);

        let movies_path = data_dir.join(MOVIES_FILE);
        let ratings_path = data_dir.join(RATINGS_FILE);
        let tags_path = data_dir.join(TAGS_FILE);

        // Ratings is by far the largest file, so it gets its own thread
        let ((movies, tags), ratings) = rayon::join(
            || {
                rayon::join(
                    || parser::parse_movies(&movies_path),
                    || parser::parse_tags(&tags_path),
                )
            },
            || parser::parse_ratings(&ratings_path),
        );
        let movies = movies?;
        let tags = tags?;
        let ratings = ratings?;

        let users_path = data_dir.join(USERS_FILE);
        let users = if users_path.exists() {
            parser::parse_users(&users_path)?
        } else {
            Vec::new()
        };
        let likes_path = data_dir.join(LIKES_FILE);
        let likes = if likes_path.exists() {
            parser::parse_likes(&likes_path)?
        } else {
            Vec::new()
        };

        info!(
            "Parsed {} movies, {} ratings, {} tags, {} likes",
            movies.len(),
            ratings.len(),
            tags.len(),
            likes.len()
        );

        let index = Self::from_parts(movies, ratings, tags, users, likes)?;
        let counts = index.counts();
        info!(
            users = counts.users,
            movies = counts.movies,
            ratings = counts.ratings,
            tags = counts.tags,
            "DataIndex built and validated"
        );
        Ok(index)
    }

    /// Build an index from already parsed records, applying the cross-row
    /// cleaning rules.
    pub fn from_parts(
        movies: Vec<Movie>,
        ratings: Vec<Rating>,
        tags: Vec<Tag>,
        users: Vec<UserId>,
        likes: Vec<(UserId, MovieId)>,
    ) -> Result<Self> {
        let mut index = DataIndex::new();

        // Duplicate movie ids: first one wins
        for movie in movies {
            if index.movies.contains_key(&movie.id) {
                debug!("Skipping duplicate movie {}", movie.id);
                continue;
            }
            index.insert_movie(movie);
        }

        for user_id in users {
            index.insert_user(user_id);
        }

        let ratings = latest_ratings(ratings);
        let mut dangling = 0usize;
        for rating in ratings {
            if index.movies.contains_key(&rating.movie_id) {
                index.insert_rating(rating);
            } else {
                dangling += 1;
            }
        }
        if dangling > 0 {
            warn!("Dropped {} ratings referencing unknown movies", dangling);
        }

        let mut seen: HashSet<(UserId, MovieId, String)> = HashSet::new();
        let mut dangling = 0usize;
        for tag in tags {
            if !index.movies.contains_key(&tag.movie_id) {
                dangling += 1;
                continue;
            }
            if seen.insert((tag.user_id, tag.movie_id, tag.tag.clone())) {
                index.insert_tag(tag);
            }
        }
        if dangling > 0 {
            warn!("Dropped {} tags referencing unknown movies", dangling);
        }

        for (user_id, movie_id) in likes {
            if index.movies.contains_key(&movie_id) {
                index.users.insert(user_id);
                index.likes.entry(user_id).or_default().insert(movie_id);
            } else {
                warn!("Dropped like of unknown movie {} by user {}", movie_id, user_id);
            }
        }

        index.compute_movie_stats();
        index.validate()?;
        Ok(index)
    }

    /// Compute average rating and rating count for every rated movie
    pub fn compute_movie_stats(&mut self) {
        self.movie_stats = self
            .movie_ratings
            .par_iter()
            .map(|(&movie_id, ratings)| {
                let rating_count = ratings.len() as u32;
                let avg_rating = if rating_count > 0 {
                    let total: f32 = ratings.iter().map(|r| r.rating).sum();
                    total / rating_count as f32
                } else {
                    0.0
                };
                (
                    movie_id,
                    MovieStats {
                        avg_rating,
                        rating_count,
                    },
                )
            })
            .collect();
    }

    /// Validate data integrity
    ///
    /// Every RATED, TAGGED and LIKES edge must point at a known movie and
    /// every rating must lie in [0, 5].
    pub fn validate(&self) -> Result<()> {
        for ratings in self.user_ratings.values() {
            for rating in ratings {
                if !self.movies.contains_key(&rating.movie_id) {
                    return Err(DataLoadError::MissingReference {
                        entity: "Movie".to_string(),
                        id: rating.movie_id,
                    });
                }
                if !parser::is_valid_rating(rating.rating) {
                    return Err(DataLoadError::InvalidValue {
                        field: "rating".to_string(),
                        value: rating.rating.to_string(),
                    });
                }
            }
        }
        for tags in self.user_tags.values() {
            if let Some(tag) = tags.iter().find(|t| !self.movies.contains_key(&t.movie_id)) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: tag.movie_id,
                });
            }
        }
        for liked in self.likes.values() {
            if let Some(&movie_id) = liked.iter().find(|id| !self.movies.contains_key(id)) {
                return Err(DataLoadError::MissingReference {
                    entity: "Movie".to_string(),
                    id: movie_id,
                });
            }
        }
        Ok(())
    }
}

/// Keep only the latest rating per (user, movie); ties keep the later row.
fn latest_ratings(ratings: Vec<Rating>) -> Vec<Rating> {
    let mut latest: HashMap<(UserId, MovieId), Rating> = HashMap::with_capacity(ratings.len());
    for rating in ratings {
        latest
            .entry((rating.user_id, rating.movie_id))
            .and_modify(|existing| {
                if rating.timestamp >= existing.timestamp {
                    *existing = rating;
                }
            })
            .or_insert(rating);
    }
    let mut deduped: Vec<Rating> = latest.into_values().collect();
    deduped.sort_unstable_by_key(|r| (r.user_id, r.movie_id));
    deduped
}
