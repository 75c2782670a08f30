//! Storefront Guard - in-process caching and admission control
//!
//! Provides a bounded TTL cache and a per-endpoint fixed-window rate limiter,
//! owned by an explicit `Services` context with background sweepers.

pub mod cache;
pub mod clock;
pub mod config;
pub mod error;
pub mod ratelimit;
pub mod services;
pub mod tasks;

pub use cache::TtlCache;
pub use config::Config;
pub use error::{GuardError, Result};
pub use ratelimit::{RateLimitDecision, RateLimitPolicy, RateLimiter};
pub use services::Services;
