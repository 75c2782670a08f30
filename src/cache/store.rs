//! Cache Store Module
//!
//! Bounded TTL cache combining HashMap storage with oldest-first eviction
//! and lazy plus swept expiry.

use std::collections::HashMap;

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use crate::cache::{AgeIndex, CacheEntry, CacheReport, CacheStats};
use crate::clock::current_timestamp_ms;
use crate::config::Config;
use crate::error::Result;

// == TTL Cache ==
/// Bounded key/value store where every entry carries its own TTL.
///
/// All operations are total. Callers sharing one instance across tasks wrap
/// it in a lock so that capacity check, eviction and insert run as one
/// critical section.
#[derive(Debug)]
pub struct TtlCache {
    /// Key-value storage
    entries: HashMap<String, CacheEntry>,
    /// Creation-time order for eviction
    ages: AgeIndex,
    /// Caller-recorded counters
    stats: CacheStats,
    /// Maximum number of entries allowed
    max_size: usize,
    /// TTL in milliseconds for entries stored without one
    default_ttl_ms: u64,
}

impl TtlCache {
    // == Constructor ==
    /// Creates a new TtlCache with specified capacity and default TTL.
    ///
    /// A capacity of 0 is treated as 1.
    pub fn new(max_size: usize, default_ttl_ms: u64) -> Self {
        Self {
            entries: HashMap::new(),
            ages: AgeIndex::new(),
            stats: CacheStats::new(),
            max_size: max_size.max(1),
            default_ttl_ms,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.max_size, config.default_ttl_ms)
    }

    // == Set ==
    /// Stores a value, overwriting any existing entry and resetting its age.
    ///
    /// When the key is new and the cache is full, the entry with the oldest
    /// creation time is evicted first.
    pub fn set(&mut self, key: impl Into<String>, value: Value, ttl_ms: Option<u64>) {
        self.set_at(key, value, ttl_ms, current_timestamp_ms());
    }

    pub fn set_at(&mut self, key: impl Into<String>, value: Value, ttl_ms: Option<u64>, now: u64) {
        let key = key.into();

        if !self.entries.contains_key(&key) && self.entries.len() >= self.max_size {
            if let Some(evicted) = self.ages.evict_oldest() {
                self.entries.remove(&evicted);
                self.stats.record_eviction();
                debug!(key = %evicted, "Evicted oldest cache entry at capacity");
            }
        }

        let ttl_ms = ttl_ms.unwrap_or(self.default_ttl_ms);
        self.ages.touch(&key, now);
        self.entries.insert(key, CacheEntry::new(value, ttl_ms, now));
    }

    /// Serializes `value` to JSON and stores it.
    pub fn set_json<T: Serialize>(
        &mut self,
        key: impl Into<String>,
        value: &T,
        ttl_ms: Option<u64>,
    ) -> Result<()> {
        let value = serde_json::to_value(value)?;
        self.set(key, value, ttl_ms);
        Ok(())
    }

    // == Get ==
    /// Returns a clone of the value if the entry exists and is live.
    ///
    /// A stale entry is removed as a side effect. Hit/miss counters are not
    /// updated here; see `record_hit` and `record_miss`.
    pub fn get(&mut self, key: &str) -> Option<Value> {
        self.get_at(key, current_timestamp_ms())
    }

    pub fn get_at(&mut self, key: &str, now: u64) -> Option<Value> {
        if self.expire_if_stale(key, now) {
            return None;
        }
        self.entries.get(key).map(|entry| entry.value.clone())
    }

    /// Looks up a live entry and decodes it into `T`.
    pub fn get_json<T: DeserializeOwned>(&mut self, key: &str) -> Result<Option<T>> {
        match self.get(key) {
            Some(value) => Ok(Some(serde_json::from_value(value)?)),
            None => Ok(None),
        }
    }

    // == Has ==
    /// Same liveness check as `get` without cloning the value.
    pub fn has(&mut self, key: &str) -> bool {
        self.has_at(key, current_timestamp_ms())
    }

    pub fn has_at(&mut self, key: &str, now: u64) -> bool {
        !self.expire_if_stale(key, now) && self.entries.contains_key(key)
    }

    // == Delete ==
    /// Removes an entry. Returns whether it was present.
    pub fn delete(&mut self, key: &str) -> bool {
        if self.entries.remove(key).is_some() {
            self.ages.remove(key);
            true
        } else {
            false
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
        self.ages.clear();
    }

    pub fn size(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys currently held, including stale entries not yet purged.
    pub fn keys(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    // == Cleanup ==
    /// Removes every entry that is no longer live.
    ///
    /// Returns the number of entries removed.
    pub fn cleanup(&mut self) -> usize {
        self.cleanup_at(current_timestamp_ms())
    }

    pub fn cleanup_at(&mut self, now: u64) -> usize {
        let expired_keys: Vec<String> = self
            .entries
            .iter()
            .filter(|(_, entry)| entry.is_expired_at(now))
            .map(|(key, _)| key.clone())
            .collect();

        for key in &expired_keys {
            self.entries.remove(key);
            self.ages.remove(key);
        }

        expired_keys.len()
    }

    // == Hit/Miss Recording ==
    pub fn record_hit(&mut self) {
        self.stats.record_hit();
    }

    pub fn record_miss(&mut self) {
        self.stats.record_miss();
    }

    /// Running counters.
    pub fn counters(&self) -> &CacheStats {
        &self.stats
    }

    // == Stats ==
    /// Point-in-time report. Stale entries are counted, not removed.
    pub fn stats(&self) -> CacheReport {
        self.stats_at(current_timestamp_ms())
    }

    pub fn stats_at(&self, now: u64) -> CacheReport {
        let (expired_entries, total_data_size) =
            self.entries
                .values()
                .fold((0, 0), |(expired, bytes), entry| {
                    let expired = expired + usize::from(entry.is_expired_at(now));
                    (expired, bytes + entry.data_size())
                });

        CacheReport {
            size: self.entries.len(),
            max_size: self.max_size,
            expired_entries,
            total_data_size,
            hit_rate: self.stats.hit_rate(),
        }
    }

    /// Removes `key` if it is present and stale. Returns true if it was removed.
    fn expire_if_stale(&mut self, key: &str, now: u64) -> bool {
        let stale = self
            .entries
            .get(key)
            .is_some_and(|entry| entry.is_expired_at(now));
        if stale {
            self.entries.remove(key);
            self.ages.remove(key);
            debug!(key, "Lazily expired stale cache entry");
        }
        stale
    }
}

impl Default for TtlCache {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}
