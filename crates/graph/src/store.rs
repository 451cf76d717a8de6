//! The graph access seam.
//!
//! Recommendation code only ever talks to a [`GraphSession`]. A session is
//! acquired from a [`GraphStore`], used for one or more read queries and
//! released when it is dropped.

use crate::error::Result;
use crate::query::{Pattern, QueryParams};
use crate::value::Row;

/// Something that hands out read sessions
pub trait GraphStore: Send + Sync {
    /// Open a session. Dropping the returned box releases it.
    fn open_session(&self) -> Result<Box<dyn GraphSession + '_>>;
}

/// A scoped, read-only connection to the graph
pub trait GraphSession {
    /// Run one read query and return all of its rows.
    ///
    /// Rows come back complete (aggregates plus embedded witnesses); there
    /// is no streaming.
    fn run_read_query(&mut self, pattern: Pattern, params: &QueryParams) -> Result<Vec<Row>>;
}
