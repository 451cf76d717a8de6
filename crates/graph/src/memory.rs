//! In-memory graph store backed by a loaded [`DataIndex`].

use crate::error::Result;
use crate::patterns;
use crate::query::{Pattern, QueryParams};
use crate::store::{GraphSession, GraphStore};
use crate::value::Row;
use data_loader::DataIndex;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, trace};

/// Read-only graph store over a shared [`DataIndex`].
///
/// The index is never mutated through the store, so any number of sessions
/// can read it concurrently.
#[derive(Debug, Clone)]
pub struct InMemoryGraph {
    index: Arc<DataIndex>,
}

impl InMemoryGraph {
    pub fn new(index: Arc<DataIndex>) -> Self {
        Self { index }
    }

    pub fn index(&self) -> &DataIndex {
        &self.index
    }
}

impl GraphStore for InMemoryGraph {
    fn open_session(&self) -> Result<Box<dyn GraphSession + '_>> {
        debug!("Opening in-memory graph session");
        Ok(Box::new(MemorySession {
            index: &self.index,
            queries_run: 0,
        }))
    }
}

/// Session handed out by [`InMemoryGraph`]
pub struct MemorySession<'a> {
    index: &'a DataIndex,
    queries_run: usize,
}

impl GraphSession for MemorySession<'_> {
    fn run_read_query(&mut self, pattern: Pattern, params: &QueryParams) -> Result<Vec<Row>> {
        self.queries_run += 1;
        trace!(pattern = %pattern, template = pattern.template(), "running read query");

        let start = Instant::now();
        let rows = match pattern {
            Pattern::PeerCollaborative => patterns::peer::run(self.index, params)?,
            Pattern::SeedMovie => patterns::seed_movie::run(self.index, params)?,
            Pattern::GenreTagHybrid => patterns::hybrid::run(self.index, params)?,
        };
        debug!(
            pattern = %pattern,
            rows = rows.len(),
            "Query finished in {:.2?}",
            start.elapsed()
        );
        Ok(rows)
    }
}

impl Drop for MemorySession<'_> {
    fn drop(&mut self) {
        debug!("Closing in-memory graph session after {} queries", self.queries_run);
    }
}
