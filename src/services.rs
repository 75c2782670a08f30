//! Services Context
//!
//! Owns the shared cache and rate limiter for one application instance and
//! the sweep tasks that keep them bounded. Built once by the composition root
//! and passed to whatever needs caching or admission control.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::cache::{CacheReport, TtlCache};
use crate::config::Config;
use crate::error::{GuardError, Result};
use crate::ratelimit::{RateLimitDecision, RateLimitPolicy, RateLimitStats, RateLimiter};
use crate::tasks::SweepHandle;

/// Message used when a denying policy carries none.
pub const DEFAULT_DENIAL_MESSAGE: &str = "Rate limit exceeded";

/// Cache shared across tasks.
pub type SharedCache = Arc<RwLock<TtlCache>>;

/// Rate limiter shared across tasks.
pub type SharedLimiter = Arc<RwLock<RateLimiter>>;

/// Application context holding the cache, the limiter and their sweepers.
///
/// Each mutating operation runs under a single write guard, so capacity
/// check + eviction + insert, and rollover check + increment, are atomic
/// with respect to other callers and to the sweepers.
#[derive(Debug)]
pub struct Services {
    /// Thread-safe TTL cache
    pub cache: SharedCache,
    /// Thread-safe rate limiter
    pub limiter: SharedLimiter,
    cache_sweeper: SweepHandle,
    limiter_sweeper: SweepHandle,
    cache_sweep_interval: Duration,
    limiter_sweep_interval: Duration,
}

impl Services {
    /// Creates a context around existing components. Sweepers are not
    /// started until `initialize` is called.
    pub fn new(
        cache: TtlCache,
        limiter: RateLimiter,
        cache_sweep_interval: Duration,
        limiter_sweep_interval: Duration,
    ) -> Self {
        Self {
            cache: Arc::new(RwLock::new(cache)),
            limiter: Arc::new(RwLock::new(limiter)),
            cache_sweeper: SweepHandle::new(),
            limiter_sweeper: SweepHandle::new(),
            cache_sweep_interval,
            limiter_sweep_interval,
        }
    }

    /// Creates a context from configuration with the built-in policies.
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            TtlCache::from_config(config),
            RateLimiter::new(),
            config.cache_cleanup_interval(),
            config.rate_limit_cleanup_interval(),
        ))
    }

    // == Lifecycle ==
    /// Starts both sweepers. Calling it again restarts them rather than
    /// adding a second pair. Must be called from within a tokio runtime.
    pub fn initialize(&mut self) {
        self.cache_sweeper
            .start(self.cache.clone(), self.cache_sweep_interval);
        self.limiter_sweeper
            .start(self.limiter.clone(), self.limiter_sweep_interval);
        info!(
            cache_interval_ms = self.cache_sweep_interval.as_millis() as u64,
            limiter_interval_ms = self.limiter_sweep_interval.as_millis() as u64,
            "Sweepers started"
        );
    }

    /// Stops both sweepers and empties the cache. Rate limit windows and
    /// hit/miss counters are kept.
    pub async fn destroy(&mut self) {
        let stopped = self.cache_sweeper.stop() | self.limiter_sweeper.stop();
        self.cache.write().await.clear();
        if stopped {
            info!("Sweepers stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.cache_sweeper.is_running() && self.limiter_sweeper.is_running()
    }

    // == Read-Through Cache ==
    /// Returns the live cached value for `key`, or runs `fetch`, caches its
    /// result for `ttl_ms` and returns it.
    ///
    /// Records a hit only when the cached value decodes as `T`. A live entry
    /// of another shape is dropped and counted as a miss, then refetched.
    /// A failed fetch caches nothing.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: &str, ttl_ms: u64, fetch: F) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        {
            let mut cache = self.cache.write().await;
            if let Some(value) = cache.get(key) {
                match serde_json::from_value(value) {
                    Ok(cached) => {
                        cache.record_hit();
                        return Ok(cached);
                    }
                    Err(err) => {
                        warn!(key, error = %err, "Cached value has unexpected shape, dropping");
                        cache.delete(key);
                    }
                }
            }
            cache.record_miss();
        }

        // The lock is not held while fetching
        debug!(key, "Cache miss, fetching");
        let fresh = fetch().await?;
        let value = serde_json::to_value(&fresh).map_err(GuardError::from)?;
        self.cache.write().await.set(key, value, Some(ttl_ms));
        Ok(fresh)
    }

    /// Drops `key` from the cache. Returns whether it was present.
    pub async fn invalidate(&self, key: &str) -> bool {
        self.cache.write().await.delete(key)
    }

    /// Invalidates `key` and fetches it again.
    pub async fn refresh<T, F, Fut>(&self, key: &str, ttl_ms: u64, fetch: F) -> anyhow::Result<T>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = anyhow::Result<T>>,
    {
        self.invalidate(key).await;
        self.get_or_fetch(key, ttl_ms, fetch).await
    }

    pub async fn cache_report(&self) -> CacheReport {
        self.cache.read().await.stats()
    }

    // == Admission Control ==
    /// Counts one request against `endpoint` and returns the raw decision.
    pub async fn check(&self, identifier: &str, endpoint: &str) -> RateLimitDecision {
        self.limiter.write().await.check(identifier, endpoint)
    }

    /// Like `check`, but turns a denial into `GuardError::RateLimited`.
    pub async fn admit(&self, identifier: &str, endpoint: &str) -> Result<RateLimitDecision> {
        let decision = self.check(identifier, endpoint).await;
        if decision.allowed {
            return Ok(decision);
        }
        Err(GuardError::RateLimited {
            message: decision
                .message
                .unwrap_or_else(|| DEFAULT_DENIAL_MESSAGE.to_string()),
            reset_at_ms: decision.reset_time,
        })
    }

    pub async fn remaining_requests(&self, identifier: &str, endpoint: &str) -> u32 {
        self.limiter
            .read()
            .await
            .remaining_requests(identifier, endpoint)
    }

    pub async fn reset_time(&self, identifier: &str, endpoint: &str) -> u64 {
        self.limiter.read().await.reset_time(identifier, endpoint)
    }

    pub async fn rate_limit_stats(&self, identifier: &str, endpoint: &str) -> RateLimitStats {
        self.limiter.read().await.stats(identifier, endpoint)
    }

    pub async fn reset_rate_limit(&self, identifier: &str, endpoint: Option<&str>) {
        self.limiter.write().await.reset(identifier, endpoint);
    }

    pub async fn set_policy(&self, endpoint: &str, policy: RateLimitPolicy) {
        self.limiter.write().await.set_config(endpoint, policy);
    }
}
