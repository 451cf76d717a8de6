//! User management: the only write path into the graph.
//!
//! Creating users and toggling LIKES edges happens outside the
//! recommendation core. Changes are kept in memory until
//! [`DataIndex::save_user_data`] writes them next to the dataset.

use crate::error::{DataLoadError, Result};
use crate::index::{LIKES_FILE, USERS_FILE};
use crate::parser;
use crate::types::*;
use rand::Rng;
use std::ops::RangeInclusive;
use std::path::Path;
use tracing::{debug, info};

/// Range new user ids are drawn from
pub const NEW_USER_IDS: RangeInclusive<UserId> = 1000..=9999;

/// Random draws before giving up on finding a free id
const MAX_ID_ATTEMPTS: usize = 10_000;

impl DataIndex {
    /// Create a user node with a random unused id.
    ///
    /// This is a check-then-create sequence. It is only race free because
    /// it needs `&mut self`; a shared store would have to enforce
    /// uniqueness itself.
    pub fn create_user<R: Rng>(&mut self, rng: &mut R) -> Result<UserId> {
        for _ in 0..MAX_ID_ATTEMPTS {
            let candidate = rng.random_range(NEW_USER_IDS);
            if !self.users.contains(&candidate) {
                self.users.insert(candidate);
                info!("Created user {}", candidate);
                return Ok(candidate);
            }
        }
        Err(DataLoadError::ValidationError(format!(
            "no free user id in {}..={} after {} attempts",
            NEW_USER_IDS.start(),
            NEW_USER_IDS.end(),
            MAX_ID_ATTEMPTS
        )))
    }

    /// Add a LIKES edge. Returns `false` if the edge already existed.
    pub fn add_like(&mut self, user_id: UserId, movie_id: MovieId) -> Result<bool> {
        self.check_user_and_movie(user_id, movie_id)?;
        let added = self.likes.entry(user_id).or_default().insert(movie_id);
        debug!(user_id, movie_id, added, "add like");
        Ok(added)
    }

    /// Remove a LIKES edge. Returns `false` if there was nothing to remove.
    pub fn remove_like(&mut self, user_id: UserId, movie_id: MovieId) -> bool {
        let removed = self
            .likes
            .get_mut(&user_id)
            .map(|liked| liked.remove(&movie_id))
            .unwrap_or(false);
        debug!(user_id, movie_id, removed, "remove like");
        removed
    }

    /// Movies liked by a user, ordered by movie id
    pub fn liked_movies(&self, user_id: UserId) -> Vec<&Movie> {
        self.likes
            .get(&user_id)
            .map(|liked| liked.iter().filter_map(|id| self.movies.get(id)).collect())
            .unwrap_or_default()
    }

    /// Persist users and likes so the next `load_from_dir` sees them.
    ///
    /// Every known user id is written to `users.csv`, which keeps users
    /// without ratings or likes alive across runs.
    pub fn save_user_data(&self, data_dir: &Path) -> Result<()> {
        let users: Vec<UserId> = self.users.iter().copied().collect();
        let mut likes: Vec<(UserId, MovieId)> = self
            .likes
            .iter()
            .flat_map(|(&user_id, liked)| liked.iter().map(move |&movie_id| (user_id, movie_id)))
            .collect();
        likes.sort_unstable();

        parser::write_users(&data_dir.join(USERS_FILE), &users)?;
        parser::write_likes(&data_dir.join(LIKES_FILE), &likes)?;
        info!(
            "Saved {} users and {} likes to {:?}",
            users.len(),
            likes.len(),
            data_dir
        );
        Ok(())
    }

    fn check_user_and_movie(&self, user_id: UserId, movie_id: MovieId) -> Result<()> {
        if !self.users.contains(&user_id) {
            return Err(DataLoadError::MissingReference {
                entity: "User".to_string(),
                id: user_id,
            });
        }
        if !self.movies.contains_key(&movie_id) {
            return Err(DataLoadError::MissingReference {
                entity: "Movie".to_string(),
                id: movie_id,
            });
        }
        Ok(())
    }
}
