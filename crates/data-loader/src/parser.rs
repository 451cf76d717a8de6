//! Parser for MovieLens CSV files.
//!
//! Handles the "latest" MovieLens layout:
//! - movies.csv: movieId,title,genres (genres pipe-separated)
//! - ratings.csv: userId,movieId,rating,timestamp
//! - tags.csv: userId,movieId,tag,timestamp
//!
//! plus the two files written back by user management:
//! - users.csv: userId
//! - likes.csv: userId,movieId
//!
//! Row-level cleaning happens here (missing genres, out of range ratings,
//! blank tags). Cross-row cleaning (duplicates, dangling references) is done
//! while building the index.

use crate::error::{DataLoadError, Result};
use crate::types::*;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Genre marker MovieLens uses for movies without genres
pub const NO_GENRES: &str = "(no genres listed)";

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct MovieRecord {
    movie_id: MovieId,
    title: String,
    genres: String,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RatingRecord {
    user_id: UserId,
    movie_id: MovieId,
    rating: f32,
    timestamp: i64,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TagRecord {
    user_id: UserId,
    movie_id: MovieId,
    tag: String,
    timestamp: i64,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct UserRecord {
    user_id: UserId,
}

#[derive(Debug, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
struct LikeRecord {
    user_id: UserId,
    movie_id: MovieId,
}

/// Deserialize every row of a headered CSV file.
///
/// Errors carry the file name and the 1-based line number of the bad row.
fn read_records<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>> {
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    if !path.exists() {
        return Err(DataLoadError::FileNotFound {
            path: path.display().to_string(),
        });
    }

    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::Headers)
        .from_path(path)
        .map_err(|e| DataLoadError::ParseError {
            file: file_name.clone(),
            line: 0,
            reason: e.to_string(),
        })?;

    let mut records = Vec::new();
    for result in reader.deserialize::<T>() {
        let record = result.map_err(|e| DataLoadError::ParseError {
            file: file_name.clone(),
            line: e.position().map(|p| p.line()).unwrap_or(0),
            reason: e.to_string(),
        })?;
        records.push(record);
    }
    Ok(records)
}

/// Parse movies.csv
///
/// Movies without genres are dropped: a movie must have at least one HAS_GENRE
/// edge to be part of the graph.
pub fn parse_movies(path: &Path) -> Result<Vec<Movie>> {
    let records: Vec<MovieRecord> = read_records(path)?;
    let movies = records
        .into_iter()
        .filter_map(|record| {
            let genres = parse_genres(&record.genres);
            if genres.is_empty() {
                return None;
            }
            Some(Movie {
                id: record.movie_id,
                title: record.title.trim().to_string(),
                genres,
            })
        })
        .collect();
    Ok(movies)
}

/// Parse ratings.csv, dropping values outside [0, 5]
pub fn parse_ratings(path: &Path) -> Result<Vec<Rating>> {
    let records: Vec<RatingRecord> = read_records(path)?;
    let ratings = records
        .into_iter()
        .filter(|r| is_valid_rating(r.rating))
        .map(|r| Rating {
            user_id: r.user_id,
            movie_id: r.movie_id,
            rating: r.rating,
            timestamp: r.timestamp,
        })
        .collect();
    Ok(ratings)
}

/// Parse tags.csv, trimming tags and dropping blank ones
pub fn parse_tags(path: &Path) -> Result<Vec<Tag>> {
    let records: Vec<TagRecord> = read_records(path)?;
    let tags = records
        .into_iter()
        .filter_map(|r| {
            let tag = r.tag.trim();
            if tag.is_empty() {
                return None;
            }
            Some(Tag {
                user_id: r.user_id,
                movie_id: r.movie_id,
                tag: tag.to_string(),
                timestamp: r.timestamp,
            })
        })
        .collect();
    Ok(tags)
}

/// Parse users.csv (users created through user management)
pub fn parse_users(path: &Path) -> Result<Vec<UserId>> {
    let records: Vec<UserRecord> = read_records(path)?;
    Ok(records.into_iter().map(|r| r.user_id).collect())
}

/// Parse likes.csv into (user, movie) pairs
pub fn parse_likes(path: &Path) -> Result<Vec<(UserId, MovieId)>> {
    let records: Vec<LikeRecord> = read_records(path)?;
    Ok(records.into_iter().map(|r| (r.user_id, r.movie_id)).collect())
}

pub fn write_users(path: &Path, users: &[UserId]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for &user_id in users {
        writer.serialize(UserRecord { user_id })?;
    }
    writer.flush()?;
    Ok(())
}

pub fn write_likes(path: &Path, likes: &[(UserId, MovieId)]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for &(user_id, movie_id) in likes {
        writer.serialize(LikeRecord { user_id, movie_id })?;
    }
    writer.flush()?;
    Ok(())
}

pub(crate) fn is_valid_rating(rating: f32) -> bool {
    (0.0..=5.0).contains(&rating)
}

/// Parse pipe-separated genres
///
/// Example: "Action|Adventure|Sci-Fi" -> ["Action", "Adventure", "Sci-Fi"]
fn parse_genres(s: &str) -> Vec<String> {
    s.split('|')
        .map(str::trim)
        .filter(|g| !g.is_empty() && *g != NO_GENRES)
        .map(str::to_string)
        .collect()
}
