//! # Graph Crate
//!
//! Read access to the movie graph: Users, Movies and Genres connected by
//! RATED, TAGGED and HAS_GENRE relationships.
//!
//! ## Components
//!
//! - **store**: The [`GraphStore`] / [`GraphSession`] seam the recommender talks to
//! - **query**: The three read [`Pattern`]s, their templates and [`QueryParams`]
//! - **value**: Result [`Row`]s and their typed accessors
//! - **witness**: Role-tagged [`PathWitness`] traversals returned with each row
//! - **memory**: [`InMemoryGraph`], a store evaluating the patterns over a `DataIndex`
//!
//! ## Example Usage
//!
//! ```ignore
//! use graph::{GraphStore, InMemoryGraph, Pattern, QueryParams};
//! use std::sync::Arc;
//!
//! let store = InMemoryGraph::new(Arc::new(index));
//! let mut session = store.open_session()?;
//! let rows = session.run_read_query(Pattern::PeerCollaborative, &QueryParams::for_user(2, now))?;
//!
//! for row in &rows {
//!     println!("{} ({} peers)", row.str("title")?, row.int("contributors")?);
//! }
//! ```

pub mod error;
pub mod memory;
mod patterns;
pub mod query;
pub mod store;
pub mod value;
pub mod witness;

pub use error::{GraphError, Result};
pub use memory::{InMemoryGraph, MemorySession};
pub use query::{MAX_WITNESSES, Pattern, QueryParams, columns};
pub use store::{GraphSession, GraphStore};
pub use value::{Property, Row, Value, widen_rating};
pub use witness::{PathElement, PathWitness, Role, Snapshot};
