//! Configuration Module
//!
//! Loads cache and rate limiter settings from environment variables. Only the
//! composition root reads the environment; the core takes a `Config` value.

use std::env;
use std::time::Duration;

use crate::error::{GuardError, Result};

/// Default TTL applied when `set` is called without one (5 minutes)
pub const DEFAULT_TTL_MS: u64 = 5 * 60 * 1000;

/// Default cache capacity
pub const DEFAULT_MAX_SIZE: usize = 1000;

/// Default cache sweep interval (1 minute)
pub const DEFAULT_CACHE_CLEANUP_INTERVAL_MS: u64 = 60 * 1000;

/// Default rate limiter sweep interval (5 minutes)
pub const DEFAULT_RATE_LIMIT_CLEANUP_INTERVAL_MS: u64 = 5 * 60 * 1000;

/// Guard configuration parameters.
///
/// All values can be configured via environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    /// Maximum number of entries the cache can hold
    pub max_size: usize,
    /// Default TTL in milliseconds for entries without explicit TTL
    pub default_ttl_ms: u64,
    /// Cache sweep interval in milliseconds
    pub cache_cleanup_interval_ms: u64,
    /// Rate limiter sweep interval in milliseconds
    pub rate_limit_cleanup_interval_ms: u64,
}

impl Config {
    /// Creates a new Config by loading values from environment variables.
    ///
    /// # Environment Variables
    /// - `CACHE_MAX_SIZE` - Maximum cache entries (default: 1000)
    /// - `CACHE_DEFAULT_TTL_MS` - Default TTL in milliseconds (default: 300000)
    /// - `CACHE_CLEANUP_INTERVAL_MS` - Cache sweep frequency (default: 60000)
    /// - `RATE_LIMIT_CLEANUP_INTERVAL_MS` - Limiter sweep frequency (default: 300000)
    ///
    /// Values that fail to parse fall back to their defaults.
    pub fn from_env() -> Self {
        Self {
            max_size: env_or("CACHE_MAX_SIZE", DEFAULT_MAX_SIZE),
            default_ttl_ms: env_or("CACHE_DEFAULT_TTL_MS", DEFAULT_TTL_MS),
            cache_cleanup_interval_ms: env_or(
                "CACHE_CLEANUP_INTERVAL_MS",
                DEFAULT_CACHE_CLEANUP_INTERVAL_MS,
            ),
            rate_limit_cleanup_interval_ms: env_or(
                "RATE_LIMIT_CLEANUP_INTERVAL_MS",
                DEFAULT_RATE_LIMIT_CLEANUP_INTERVAL_MS,
            ),
        }
    }

    /// Rejects values the cache or the sweepers cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_size == 0 {
            return Err(GuardError::InvalidConfig(
                "max_size must be at least 1".to_string(),
            ));
        }
        if self.cache_cleanup_interval_ms == 0 {
            return Err(GuardError::InvalidConfig(
                "cache_cleanup_interval_ms must be greater than 0".to_string(),
            ));
        }
        if self.rate_limit_cleanup_interval_ms == 0 {
            return Err(GuardError::InvalidConfig(
                "rate_limit_cleanup_interval_ms must be greater than 0".to_string(),
            ));
        }
        Ok(())
    }

    pub fn cache_cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.cache_cleanup_interval_ms)
    }

    pub fn rate_limit_cleanup_interval(&self) -> Duration {
        Duration::from_millis(self.rate_limit_cleanup_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_size: DEFAULT_MAX_SIZE,
            default_ttl_ms: DEFAULT_TTL_MS,
            cache_cleanup_interval_ms: DEFAULT_CACHE_CLEANUP_INTERVAL_MS,
            rate_limit_cleanup_interval_ms: DEFAULT_RATE_LIMIT_CLEANUP_INTERVAL_MS,
        }
    }
}

fn env_or<T: std::str::FromStr>(name: &str, default: T) -> T {
    env::var(name)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
