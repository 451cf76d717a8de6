//! Recommender configuration.

use graph::MAX_WITNESSES;
use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

/// Number of recommendations returned when the caller gives no limit
pub const DEFAULT_LIMIT: usize = 10;

/// Source of the query time used by the recency boost
pub trait Clock: Send + Sync + fmt::Debug {
    /// Current time in epoch seconds
    fn now(&self) -> i64;
}

/// Wall clock
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> i64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs() as i64)
            .unwrap_or(0)
    }
}

/// A clock stuck at one instant, for reproducible runs
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now(&self) -> i64 {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct RecommenderConfig {
    /// Limit used when the caller passes `None`
    pub default_limit: usize,
    /// Explanation lines kept per category
    pub witnesses_per_category: usize,
    clock: Arc<dyn Clock>,
}

impl Default for RecommenderConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            witnesses_per_category: MAX_WITNESSES,
            clock: Arc::new(SystemClock),
        }
    }
}

impl RecommenderConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the default limit (default: 10)
    pub fn with_default_limit(mut self, limit: usize) -> Self {
        self.default_limit = limit;
        self
    }

    /// Configure explanation lines per category (default: 3, never more than the store returns)
    pub fn with_witnesses_per_category(mut self, count: usize) -> Self {
        self.witnesses_per_category = count.min(MAX_WITNESSES);
        self
    }

    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    /// Pin the query time to `now` epoch seconds
    pub fn with_fixed_time(self, now: i64) -> Self {
        self.with_clock(FixedClock(now))
    }

    pub fn now(&self) -> i64 {
        self.clock.now()
    }
}
