//! Rate Limiting Module
//!
//! Fixed windows per (identifier, endpoint) that reset wholesale once they
//! elapse, with named per-endpoint policies and a general fallback.

mod decision;
mod limiter;
pub mod policy;
mod window;


pub use decision::{RateLimitDecision, RateLimitStats};
pub use limiter::RateLimiter;
pub use policy::{default_policies, endpoints, RateLimitPolicy};
pub use window::{RateLimitWindow, WindowKey};
