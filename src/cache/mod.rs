//! Cache Module
//!
//! Provides a bounded in-memory cache with per-entry TTL, lazy expiry on
//! lookup and oldest-first eviction at capacity.

mod age;
mod entry;
pub mod keys;
mod stats;
mod store;


// Re-export public types
pub use age::AgeIndex;
pub use entry::CacheEntry;
pub use keys::ttl;
pub use stats::{CacheReport, CacheStats};
pub use store::TtlCache;
