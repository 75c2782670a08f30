//! Rate Limiter Module
//!
//! Fixed-window admission control keyed by (identifier, endpoint).

use std::collections::{HashMap, HashSet};

use tracing::{debug, warn};

use crate::clock::current_timestamp_ms;
use crate::ratelimit::policy::{default_policies, endpoints};
use crate::ratelimit::{RateLimitDecision, RateLimitPolicy, RateLimitStats, RateLimitWindow, WindowKey};

// == Rate Limiter ==
/// Per-identifier, per-endpoint request counter.
///
/// Denial is a value (`allowed: false`), never an error. Callers sharing one
/// instance wrap it in a lock so the rollover check and the increment happen
/// in the same critical section.
#[derive(Debug)]
pub struct RateLimiter {
    /// Live and stale windows, until the next cleanup
    windows: HashMap<WindowKey, RateLimitWindow>,
    /// Registered policies by endpoint name
    policies: HashMap<String, RateLimitPolicy>,
    /// Unregistered endpoints already reported
    warned_endpoints: HashSet<String>,
}

impl RateLimiter {
    // == Constructor ==
    /// Creates a limiter with the built-in storefront policies.
    pub fn new() -> Self {
        let mut limiter = Self::empty();
        for (endpoint, policy) in default_policies() {
            limiter.set_config(endpoint, policy);
        }
        limiter
    }

    /// Creates a limiter with no registered policies; every endpoint uses the
    /// built-in general fallback until configured.
    pub fn empty() -> Self {
        Self {
            windows: HashMap::new(),
            policies: HashMap::new(),
            warned_endpoints: HashSet::new(),
        }
    }

    // == Policies ==
    /// Registers or replaces the policy for `endpoint`.
    ///
    /// Open windows keep the quota they started with until they roll over.
    pub fn set_config(&mut self, endpoint: impl Into<String>, policy: RateLimitPolicy) {
        let endpoint = endpoint.into();
        self.warned_endpoints.remove(&endpoint);
        self.policies.insert(endpoint, policy);
    }

    /// Policy applied to `endpoint`: its own if registered, otherwise the
    /// registered `general` policy, otherwise the built-in general policy.
    pub fn policy_for(&self, endpoint: &str) -> RateLimitPolicy {
        self.policies
            .get(endpoint)
            .or_else(|| self.policies.get(endpoints::GENERAL))
            .cloned()
            .unwrap_or_else(RateLimitPolicy::general)
    }

    // == Check ==
    /// Counts one request and decides whether it is admitted.
    ///
    /// The counter is incremented even when the request is denied.
    pub fn check(&mut self, identifier: &str, endpoint: &str) -> RateLimitDecision {
        self.check_at(identifier, endpoint, current_timestamp_ms())
    }

    pub fn check_at(&mut self, identifier: &str, endpoint: &str, now: u64) -> RateLimitDecision {
        self.warn_if_unregistered(endpoint);
        let policy = self.policy_for(endpoint);
        let key = WindowKey::new(identifier, endpoint);

        let window = self
            .windows
            .entry(key)
            .or_insert_with(|| RateLimitWindow::open(&policy, now));
        if window.is_stale_at(now) {
            *window = RateLimitWindow::open(&policy, now);
        }
        window.count = window.count.saturating_add(1);

        if window.is_exceeded() {
            debug!(identifier, endpoint, count = window.count, "Rate limit exceeded");
            RateLimitDecision {
                allowed: false,
                remaining: 0,
                reset_time: window.reset_at,
                message: policy.message,
            }
        } else {
            RateLimitDecision {
                allowed: true,
                remaining: window.remaining(),
                reset_time: window.reset_at,
                message: None,
            }
        }
    }

    // == Queries ==
    /// Quota left in the current window, or a full quota if none is open.
    pub fn remaining_requests(&self, identifier: &str, endpoint: &str) -> u32 {
        self.stats_at(identifier, endpoint, current_timestamp_ms()).remaining
    }

    pub fn remaining_requests_at(&self, identifier: &str, endpoint: &str, now: u64) -> u32 {
        self.stats_at(identifier, endpoint, now).remaining
    }

    /// End of the current window, or of a window opened now if none is live.
    pub fn reset_time(&self, identifier: &str, endpoint: &str) -> u64 {
        self.stats_at(identifier, endpoint, current_timestamp_ms()).reset_time
    }

    pub fn reset_time_at(&self, identifier: &str, endpoint: &str, now: u64) -> u64 {
        self.stats_at(identifier, endpoint, now).reset_time
    }

    pub fn stats(&self, identifier: &str, endpoint: &str) -> RateLimitStats {
        self.stats_at(identifier, endpoint, current_timestamp_ms())
    }

    /// Snapshot of the window without counting a request.
    pub fn stats_at(&self, identifier: &str, endpoint: &str, now: u64) -> RateLimitStats {
        let key = WindowKey::new(identifier, endpoint);
        let window = match self.windows.get(&key) {
            Some(window) if !window.is_stale_at(now) => window.clone(),
            _ => RateLimitWindow::open(&self.policy_for(endpoint), now),
        };

        RateLimitStats {
            count: window.count,
            limit: window.limit,
            remaining: window.remaining(),
            reset_time: window.reset_at,
        }
    }

    // == Reset ==
    /// Forgets the window for one endpoint, or for every endpoint of
    /// `identifier` when `endpoint` is None.
    pub fn reset(&mut self, identifier: &str, endpoint: Option<&str>) {
        match endpoint {
            Some(endpoint) => {
                self.windows.remove(&WindowKey::new(identifier, endpoint));
            }
            None => self.windows.retain(|key, _| key.identifier != identifier),
        }
    }

    // == Cleanup ==
    /// Drops every window whose reset time has passed.
    ///
    /// Also forgets which unregistered endpoints were reported, so each one
    /// is warned about at most once per sweep interval.
    /// Returns the number of windows removed.
    pub fn cleanup(&mut self) -> usize {
        self.cleanup_at(current_timestamp_ms())
    }

    pub fn cleanup_at(&mut self, now: u64) -> usize {
        self.warned_endpoints.clear();
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_stale_at(now));
        before - self.windows.len()
    }

    /// Number of tracked windows, stale ones included.
    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    fn warn_if_unregistered(&mut self, endpoint: &str) {
        if self.policies.contains_key(endpoint) || self.warned_endpoints.contains(endpoint) {
            return;
        }
        warn!(
            endpoint,
            "No rate limit policy registered for endpoint, using general policy"
        );
        self.warned_endpoints.insert(endpoint.to_string());
    }
}

impl Default for RateLimiter {
    fn default() -> Self {
        Self::new()
    }
}
