//! Age Index Module
//!
//! Orders cache keys by creation time for capacity eviction.

use std::collections::{BTreeMap, HashMap};

/// Position of a key in the age order: creation time, then insertion sequence.
type AgeStamp = (u64, u64);

// == Age Index ==
/// Tracks key creation order for oldest-first eviction.
///
/// Keys are ordered by `created_at`; keys stamped in the same millisecond
/// fall back to insertion order, so eviction is always deterministic.
#[derive(Debug, Default)]
pub struct AgeIndex {
    /// Keys ordered oldest first
    order: BTreeMap<AgeStamp, String>,
    /// Reverse lookup from key to its stamp
    stamps: HashMap<String, AgeStamp>,
    /// Next insertion sequence number
    next_seq: u64,
}

impl AgeIndex {
    // == Constructor ==
    /// Creates a new empty age index.
    pub fn new() -> Self {
        Self::default()
    }

    // == Touch ==
    /// Records that `key` was (re)created at `created_at`.
    ///
    /// An existing key is moved to its new position.
    pub fn touch(&mut self, key: &str, created_at: u64) {
        self.remove(key);
        let stamp = (created_at, self.next_seq);
        self.next_seq += 1;
        self.order.insert(stamp, key.to_string());
        self.stamps.insert(key.to_string(), stamp);
    }

    // == Remove ==
    /// Removes a key from the index.
    pub fn remove(&mut self, key: &str) {
        if let Some(stamp) = self.stamps.remove(key) {
            self.order.remove(&stamp);
        }
    }

    // == Evict Oldest ==
    /// Returns and removes the key with the smallest creation time.
    ///
    /// Returns None if the index is empty.
    pub fn evict_oldest(&mut self) -> Option<String> {
        let (_, key) = self.order.pop_first()?;
        self.stamps.remove(&key);
        Some(key)
    }

    pub fn clear(&mut self) {
        self.order.clear();
        self.stamps.clear();
    }
}
