//! Rate Limit Policy Module
//!
//! Per-endpoint quota configuration and the built-in policy table.

use serde::{Deserialize, Serialize};

/// Endpoint names used by storefront callers.
pub mod endpoints {
    pub const LOGIN: &str = "login";
    pub const REGISTER: &str = "register";
    pub const ADD_TO_CART: &str = "addToCart";
    pub const PLACE_ORDER: &str = "placeOrder";
    pub const ADD_REVIEW: &str = "addReview";
    pub const APPLY_COUPON: &str = "applyCoupon";
    /// Fallback for any endpoint without its own policy
    pub const GENERAL: &str = "general";
}

const MINUTE_MS: u64 = 60 * 1000;
const HOUR_MS: u64 = 60 * MINUTE_MS;

// == Rate Limit Policy ==
/// Quota for one endpoint: at most `max_requests` per `window_ms`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimitPolicy {
    /// Window duration in milliseconds
    pub window_ms: u64,
    /// Requests allowed per window
    pub max_requests: u32,
    /// Denial reason shown to the caller
    #[serde(default)]
    pub message: Option<String>,
}

impl RateLimitPolicy {
    pub fn new(window_ms: u64, max_requests: u32) -> Self {
        Self {
            window_ms,
            max_requests,
            message: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Fallback policy for unregistered endpoints: 100 requests per minute.
    pub fn general() -> Self {
        Self::new(MINUTE_MS, 100).with_message("Too many requests. Please slow down.")
    }
}

/// The built-in storefront policies, keyed by endpoint name.
pub fn default_policies() -> Vec<(&'static str, RateLimitPolicy)> {
    vec![
        (
            endpoints::LOGIN,
            RateLimitPolicy::new(15 * MINUTE_MS, 5)
                .with_message("Too many login attempts. Please try again later."),
        ),
        (
            endpoints::REGISTER,
            RateLimitPolicy::new(HOUR_MS, 3)
                .with_message("Too many registration attempts. Please try again later."),
        ),
        (
            endpoints::ADD_TO_CART,
            RateLimitPolicy::new(MINUTE_MS, 20)
                .with_message("Too many cart operations. Please slow down."),
        ),
        (
            endpoints::PLACE_ORDER,
            RateLimitPolicy::new(5 * MINUTE_MS, 3)
                .with_message("Too many order attempts. Please try again later."),
        ),
        (
            endpoints::ADD_REVIEW,
            RateLimitPolicy::new(HOUR_MS, 5)
                .with_message("Too many review submissions. Please try again later."),
        ),
        (
            endpoints::APPLY_COUPON,
            RateLimitPolicy::new(MINUTE_MS, 10)
                .with_message("Too many coupon attempts. Please slow down."),
        ),
        (endpoints::GENERAL, RateLimitPolicy::general()),
    ]
}
