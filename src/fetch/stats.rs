//! Fetch Statistics Module
//!
//! Process-local hit and miss tallies for the fetch cache. The per-resource
//! access counters live in the store; these only describe this process.

use serde::Serialize;

// == Fetch Stats ==
/// Tracks fetch cache effectiveness.
#[derive(Debug, Clone, Default, Serialize)]
pub struct FetchStats {
    /// Fetches answered from the store
    pub hits: u64,
    /// Fetches that went to the remote resource
    pub misses: u64,
}

impl FetchStats {
    // == Constructor ==
    /// Creates a new FetchStats with all counters at zero.
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Calculates the cache hit rate.
    ///
    /// Returns hits / (hits + misses), or 0.0 if nothing has been fetched.
    pub fn hit_rate(&self) -> f64 {
        let total = self.total();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Total fetches seen.
    pub fn total(&self) -> u64 {
        self.hits + self.misses
    }

    // == Record Hit ==
    /// Increments the hit counter.
    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    // == Record Miss ==
    /// Increments the miss counter.
    pub fn record_miss(&mut self) {
        self.misses += 1;
    }
}
