//! Error types for the storefront guard
//!
//! The cache and limiter operations themselves are total; only configuration,
//! typed JSON access and the admission guard produce errors.

use thiserror::Error;

// == Guard Error Enum ==
/// Unified error type for the storefront guard.
#[derive(Error, Debug)]
pub enum GuardError {
    /// Configuration value out of range
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Cached value could not be encoded or decoded
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Request denied by the rate limiter
    #[error("{message}")]
    RateLimited {
        /// Human-readable denial reason from the endpoint policy
        message: String,
        /// When the current window ends (Unix milliseconds)
        reset_at_ms: u64,
    },
}

impl GuardError {
    /// Returns true if this error is a rate-limit denial.
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, GuardError::RateLimited { .. })
    }
}

// == Result Type Alias ==
/// Convenience Result type for the storefront guard.
pub type Result<T> = std::result::Result<T, GuardError>;
