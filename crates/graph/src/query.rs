//! Read patterns and their parameters.
//!
//! Each [`Pattern`] carries a declarative template in Cypher. Values are
//! always bound through `$parameters`, never spliced into the text. Stores
//! that speak Cypher can run the template as-is; [`crate::InMemoryGraph`]
//! evaluates the same pattern natively.
//!
//! Templates return per-candidate aggregates and witnesses only. Scoring,
//! ordering and the result limit belong to the caller.

use crate::error::{GraphError, Result};
use data_loader::{MovieId, UserId};
use std::fmt;

/// Distinct witnesses kept per witness column
pub const MAX_WITNESSES: usize = 3;

/// Output column names shared by stores and consumers
pub mod columns {
    pub const MOVIE_ID: &str = "movieId";
    pub const TITLE: &str = "title";
    pub const AVG_RATING: &str = "avgRating";
    pub const CONTRIBUTORS: &str = "contributors";
    pub const PATHS: &str = "paths";

    pub const OVERLAPPING_GENRES: &str = "overlappingGenres";
    pub const OVERLAPPING_TAGS: &str = "overlappingTags";
    pub const RATING_COUNT: &str = "ratingCount";
    pub const RECENCY_BOOST: &str = "recencyBoost";
    pub const GENRE_PATHS: &str = "genrePaths";
    pub const TAG_PATHS: &str = "tagPaths";
    pub const CANDIDATE_GENRE_PATHS: &str = "candidateGenrePaths";
    pub const CANDIDATE_TAG_PATHS: &str = "candidateTagPaths";
    pub const RATING_PATHS: &str = "ratingPaths";
}

const PEER_COLLABORATIVE: &str = "
MATCH path = (seedUser:User {userId: $userId})-[seedRating:RATED]->(sharedMovie:Movie)
             <-[sharedRating:RATED]-(peerUser:User)-[candidateRating:RATED]->(candidateMovie:Movie)
WHERE NOT (seedUser)-[:RATED]->(candidateMovie)
WITH candidateMovie, peerUser, candidateRating, COLLECT(path)[0] AS path
RETURN candidateMovie.movieId AS movieId,
       candidateMovie.title AS title,
       AVG(toFloat(candidateRating.rating)) AS avgRating,
       COUNT(DISTINCT peerUser) AS contributors,
       COLLECT(path)[0..3] AS paths
ORDER BY movieId
";

const SEED_MOVIE: &str = "
MATCH path = (sharedMovie:Movie)<-[sharedRating:RATED]-(peerUser:User)
             -[candidateRating:RATED]->(candidateMovie:Movie)
WHERE sharedMovie.movieId IN $movieIds AND NOT candidateMovie.movieId IN $movieIds
WITH candidateMovie, peerUser, candidateRating, COLLECT(path)[0] AS path
RETURN candidateMovie.movieId AS movieId,
       candidateMovie.title AS title,
       AVG(toFloat(candidateRating.rating)) AS avgRating,
       COUNT(DISTINCT peerUser) AS contributors,
       COLLECT(path)[0..3] AS paths
ORDER BY movieId
";

const GENRE_TAG_HYBRID: &str = "
MATCH (seedUser:User {userId: $userId})
OPTIONAL MATCH (seedUser)-[:RATED]->(:Movie)-[:HAS_GENRE]->(g:Genre)
OPTIONAL MATCH (seedUser)-[t:TAGGED]->(:Movie)
WITH seedUser, COLLECT(DISTINCT g.name) AS userGenres, COLLECT(DISTINCT t.tag) AS userTags
MATCH (candidateMovie:Movie)-[:HAS_GENRE]->(cg:Genre)
WHERE NOT (seedUser)-[:RATED]->(candidateMovie)
OPTIONAL MATCH (:User)-[ct:TAGGED]->(candidateMovie)
WITH seedUser, candidateMovie, userGenres, userTags,
     COLLECT(DISTINCT cg.name) AS candidateGenres, COLLECT(DISTINCT ct.tag) AS candidateTags
WITH seedUser, candidateMovie,
     [x IN userGenres WHERE x IN candidateGenres] AS overlappingGenres,
     [x IN userTags WHERE x IN candidateTags] AS overlappingTags
WHERE size(overlappingGenres) > 0 OR size(overlappingTags) > 0
OPTIONAL MATCH genrePath = (seedUser)-[:RATED]->(profileMovie:Movie)-[hasGenre:HAS_GENRE]->(genre:Genre)
WHERE genre.name IN overlappingGenres
OPTIONAL MATCH tagPath = (seedUser)-[tag:TAGGED]->(profileMovie:Movie)
WHERE tag.tag IN overlappingTags
OPTIONAL MATCH candidateGenrePath = (candidateMovie)-[:HAS_GENRE]->(:Genre)
OPTIONAL MATCH candidateTagPath = (otherUser:User)-[:TAGGED]->(candidateMovie)
OPTIONAL MATCH ratingPath = (:User)-[candidateRating:RATED]->(candidateMovie)
RETURN candidateMovie.movieId AS movieId,
       candidateMovie.title AS title,
       overlappingGenres,
       overlappingTags,
       COALESCE(AVG(toFloat(candidateRating.rating)), 0.0) AS avgRating,
       COUNT(DISTINCT candidateRating) AS ratingCount,
       COALESCE(AVG(1000.0 / (CASE WHEN $now > candidateRating.timestamp
                                   THEN $now - candidateRating.timestamp ELSE 0 END + 1)), 0.0) AS recencyBoost,
       COLLECT(DISTINCT genrePath)[0..3] AS genrePaths,
       COLLECT(DISTINCT tagPath)[0..3] AS tagPaths,
       COLLECT(DISTINCT candidateGenrePath)[0..3] AS candidateGenrePaths,
       COLLECT(DISTINCT candidateTagPath)[0..3] AS candidateTagPaths,
       COLLECT(DISTINCT ratingPath)[0..3] AS ratingPaths
ORDER BY movieId
";

/// The read patterns the recommendation strategies are built on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Pattern {
    /// seed user -> shared movie <- peer user -> candidate
    PeerCollaborative,
    /// seed movie <- peer user -> candidate
    SeedMovie,
    /// genre and tag overlap between a user profile and every unrated movie
    GenreTagHybrid,
}

impl Pattern {
    pub fn name(self) -> &'static str {
        match self {
            Pattern::PeerCollaborative => "peer_collaborative",
            Pattern::SeedMovie => "seed_movie",
            Pattern::GenreTagHybrid => "genre_tag_hybrid",
        }
    }

    pub fn template(self) -> &'static str {
        match self {
            Pattern::PeerCollaborative => PEER_COLLABORATIVE,
            Pattern::SeedMovie => SEED_MOVIE,
            Pattern::GenreTagHybrid => GENRE_TAG_HYBRID,
        }
    }
}

impl fmt::Display for Pattern {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Parameters bound to a pattern's `$placeholders`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryParams {
    pub user_id: Option<UserId>,
    pub movie_ids: Vec<MovieId>,
    /// Query time in epoch seconds, used by the recency boost
    pub now: i64,
}

impl QueryParams {
    pub fn for_user(user_id: UserId, now: i64) -> Self {
        Self {
            user_id: Some(user_id),
            movie_ids: Vec::new(),
            now,
        }
    }

    pub fn for_movies(movie_ids: Vec<MovieId>, now: i64) -> Self {
        Self {
            user_id: None,
            movie_ids,
            now,
        }
    }

    pub fn require_user(&self, pattern: Pattern) -> Result<UserId> {
        self.user_id.ok_or(GraphError::MissingParameter {
            pattern: pattern.name(),
            name: "userId",
        })
    }

    pub fn require_movies(&self, pattern: Pattern) -> Result<&[MovieId]> {
        if self.movie_ids.is_empty() {
            return Err(GraphError::MissingParameter {
                pattern: pattern.name(),
                name: "movieIds",
            });
        }
        Ok(&self.movie_ids)
    }
}
