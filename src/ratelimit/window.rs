//! Rate Limit Window Module
//!
//! Counter state for one (identifier, endpoint) pair.

use crate::ratelimit::RateLimitPolicy;

// == Window Key ==
/// Composite key identifying whose requests a window counts.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct WindowKey {
    pub identifier: String,
    pub endpoint: String,
}

impl WindowKey {
    pub fn new(identifier: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            endpoint: endpoint.into(),
        }
    }
}

// == Rate Limit Window ==
/// A fixed window that resets wholesale once `reset_at` has passed.
///
/// The quota is captured when the window opens, so replacing a policy only
/// takes effect for windows opened afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RateLimitWindow {
    /// Requests observed in this window, denied ones included
    pub count: u32,
    /// End of the window (Unix milliseconds)
    pub reset_at: u64,
    /// Quota captured from the policy when the window opened
    pub limit: u32,
}

impl RateLimitWindow {
    /// Opens an empty window at `now` under `policy`.
    pub fn open(policy: &RateLimitPolicy, now: u64) -> Self {
        Self {
            count: 0,
            reset_at: now.saturating_add(policy.window_ms),
            limit: policy.max_requests,
        }
    }

    /// A window is stale strictly after its reset time.
    pub fn is_stale_at(&self, now: u64) -> bool {
        now > self.reset_at
    }

    pub fn remaining(&self) -> u32 {
        self.limit.saturating_sub(self.count)
    }

    pub fn is_exceeded(&self) -> bool {
        self.count > self.limit
    }
}
