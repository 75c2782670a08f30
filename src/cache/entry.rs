//! Cache Entry Module
//!
//! Defines the structure for individual cache entries with TTL support.

use serde_json::Value;

// == Cache Entry ==
/// Represents a single cache entry with value and metadata.
#[derive(Debug, Clone)]
pub struct CacheEntry {
    /// The stored value
    pub value: Value,
    /// Creation timestamp (Unix milliseconds), reset on overwrite
    pub created_at: u64,
    /// Time to live in milliseconds, relative to `created_at`
    pub ttl_ms: u64,
}

impl CacheEntry {
    // == Constructor ==
    /// Creates a new cache entry stamped at `now`.
    ///
    /// # Arguments
    /// * `value` - The value to store
    /// * `ttl_ms` - TTL in milliseconds
    /// * `now` - Creation timestamp (Unix milliseconds)
    pub fn new(value: Value, ttl_ms: u64, now: u64) -> Self {
        Self {
            value,
            created_at: now,
            ttl_ms,
        }
    }

    // == Liveness ==
    /// Checks if the entry is still live at `now`.
    ///
    /// Boundary condition: an entry is live while `now - created_at <= ttl_ms`,
    /// so it is still returned at exactly `created_at + ttl_ms` and stale one
    /// millisecond later. An entry stamped after `now` counts as live.
    pub fn is_live_at(&self, now: u64) -> bool {
        now.saturating_sub(self.created_at) <= self.ttl_ms
    }

    /// Checks if the entry has expired at `now`.
    pub fn is_expired_at(&self, now: u64) -> bool {
        !self.is_live_at(now)
    }

    /// Byte length of the value's compact JSON encoding.
    pub fn data_size(&self) -> usize {
        serde_json::to_string(&self.value)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}

// == Unit Tests ==
#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_entry_creation() {
        let entry = CacheEntry::new(json!({"name": "Oil"}), 1000, 0);

        assert_eq!(entry.value, json!({"name": "Oil"}));
        assert_eq!(entry.created_at, 0);
        assert_eq!(entry.ttl_ms, 1000);
    }

    #[test]
    fn test_entry_live_before_ttl() {
        let entry = CacheEntry::new(json!("v"), 1000, 10_000);

        assert!(entry.is_live_at(10_000));
        assert!(entry.is_live_at(10_500));
        assert!(!entry.is_expired_at(10_999));
    }

    #[test]
    fn test_expiration_boundary_condition() {
        let entry = CacheEntry::new(json!("v"), 1000, 10_000);

        // Exactly ttl elapsed is still live, one more millisecond is not
        assert!(entry.is_live_at(11_000));
        assert!(entry.is_expired_at(11_001));
    }

    #[test]
    fn test_zero_ttl_live_only_at_creation_instant() {
        let entry = CacheEntry::new(json!("v"), 0, 500);

        assert!(entry.is_live_at(500));
        assert!(entry.is_expired_at(501));
    }

    #[test]
    fn test_future_stamp_is_live() {
        let entry = CacheEntry::new(json!("v"), 10, 5_000);
        assert!(entry.is_live_at(1_000));
    }

    #[test]
    fn test_data_size_is_json_length() {
        let entry = CacheEntry::new(json!({"name": "Oil"}), 1000, 0);
        assert_eq!(entry.data_size(), r#"{"name":"Oil"}"#.len());

        let entry = CacheEntry::new(json!(42), 1000, 0);
        assert_eq!(entry.data_size(), 2);
    }
}
