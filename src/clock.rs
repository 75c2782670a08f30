//! Wall-clock helper shared by the cache and the rate limiter.

use std::time::{SystemTime, UNIX_EPOCH};

/// Returns current Unix timestamp in milliseconds.
///
/// A clock set before the epoch reads as 0.
pub fn current_timestamp_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timestamp_is_unix_millis() {
        // Later than 2020-09-13 in milliseconds, earlier than the same in microseconds
        let now = current_timestamp_ms();
        assert!(now > 1_600_000_000_000);
        assert!(now < 1_600_000_000_000_000);
    }
}
