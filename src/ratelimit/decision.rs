//! Results returned by the rate limiter.

use chrono::{DateTime, Utc};
use serde::Serialize;

// == Rate Limit Decision ==
/// Outcome of `RateLimiter::check`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request may proceed
    pub allowed: bool,
    /// Requests left in the current window after this one
    pub remaining: u32,
    /// End of the current window (Unix milliseconds)
    pub reset_time: u64,
    /// Policy message, present only on denial
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl RateLimitDecision {
    /// Window end as a UTC timestamp.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.reset_time)
    }
}

// == Rate Limit Stats ==
/// Non-mutating snapshot of one window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RateLimitStats {
    /// Requests counted in the current window
    pub count: u32,
    /// Quota for the window
    pub limit: u32,
    pub remaining: u32,
    /// End of the current (or a fresh) window
    pub reset_time: u64,
}

impl RateLimitStats {
    /// Window end as a UTC timestamp.
    pub fn reset_at(&self) -> Option<DateTime<Utc>> {
        millis_to_utc(self.reset_time)
    }
}

fn millis_to_utc(ms: u64) -> Option<DateTime<Utc>> {
    i64::try_from(ms).ok().and_then(DateTime::from_timestamp_millis)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reset_at_renders_utc() {
        let decision = RateLimitDecision {
            allowed: true,
            remaining: 4,
            reset_time: 1_700_000_000_000,
            message: None,
        };
        let reset_at = decision.reset_at().unwrap();
        assert_eq!(reset_at.timestamp_millis(), 1_700_000_000_000);
        assert_eq!(reset_at.to_rfc3339(), "2023-11-14T22:13:20+00:00");

        let stats = RateLimitStats {
            count: 1,
            limit: 5,
            remaining: 4,
            reset_time: 1_700_000_000_000,
        };
        assert_eq!(stats.reset_at(), Some(reset_at));
    }

    #[test]
    fn test_allowed_decision_omits_message() {
        let decision = RateLimitDecision {
            allowed: true,
            remaining: 1,
            reset_time: 10,
            message: None,
        };
        let json = serde_json::to_string(&decision).unwrap();
        assert!(!json.contains("message"));
    }
}
