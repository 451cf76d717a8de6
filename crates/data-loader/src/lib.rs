//! # Data Loader Crate
//!
//! Loads a MovieLens "latest" CSV dataset into an in-memory movie graph.
//!
//! ## Main Components
//!
//! - **types**: Graph nodes and relationships (Movie, Rating, Tag, DataIndex)
//! - **parser**: Parse and clean the CSV files
//! - **index**: Deduplicate, index and validate
//! - **users**: User creation and LIKES edges (the write side)
//! - **error**: Error types for data loading
//!
//! ## Example Usage
//!
//! ```ignore
//! use data_loader::DataIndex;
//! use std::path::Path;
//!
//! let index = DataIndex::load_from_dir(Path::new("data/ml-latest-small"))?;
//! let movie = index.get_movie(1).unwrap();
//! let ratings = index.get_user_ratings(2);
//!
//! println!("{} has {} ratings from user 2", movie.title, ratings.len());
//! ```

pub mod error;
pub mod types;
pub mod parser;
pub mod index;
pub mod users;

// Re-export commonly used types for convenience
pub use error::{DataLoadError, Result};
pub use types::{DataIndex, IndexCounts, Movie, MovieId, MovieStats, Rating, Tag, UserId};
