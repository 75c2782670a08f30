//! Cache Statistics Module
//!
//! Hit/miss counters recorded by callers and the point-in-time cache report.

use serde::Serialize;

// == Cache Stats ==
/// Running counters for the cache.
///
/// Hits and misses are recorded explicitly by callers after they decide
/// whether a lookup was satisfied; `get` does not touch them.
#[derive(Debug, Clone, Default, Serialize)]
pub struct CacheStats {
    /// Lookups the caller served from cache
    pub hits: u64,
    /// Lookups the caller had to recompute
    pub misses: u64,
    /// Entries removed to make room for new keys
    pub evictions: u64,
}

impl CacheStats {
    pub fn new() -> Self {
        Self::default()
    }

    // == Hit Rate ==
    /// Hit rate as a percentage in `0.0..=100.0`.
    ///
    /// Returns 0.0 if nothing has been recorded yet.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64 * 100.0
        }
    }

    pub fn record_hit(&mut self) {
        self.hits += 1;
    }

    pub fn record_miss(&mut self) {
        self.misses += 1;
    }

    pub fn record_eviction(&mut self) {
        self.evictions += 1;
    }
}

// == Cache Report ==
/// Snapshot returned by `TtlCache::stats`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CacheReport {
    /// Entries currently held, live or not
    pub size: usize,
    /// Configured capacity
    pub max_size: usize,
    /// Entries already stale but not yet purged
    pub expired_entries: usize,
    /// Sum of the JSON-encoded lengths of all stored values
    pub total_data_size: usize,
    /// Hit rate as a percentage
    pub hit_rate: f64,
}
