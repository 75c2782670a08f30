//! Integration Tests for the Services Context
//!
//! Drives the cache and the rate limiter through the public context the way
//! storefront callers do, including the background sweepers.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::json;
use storefront_guard::cache::{keys, ttl};
use storefront_guard::ratelimit::endpoints;
use storefront_guard::{Config, GuardError, RateLimitPolicy, RateLimiter, Services, TtlCache};
use tokio_test::{assert_err, assert_ok};

// == Helper Functions ==

fn create_test_services() -> Services {
    Services::new(
        TtlCache::new(100, 300_000),
        RateLimiter::new(),
        Duration::from_millis(30),
        Duration::from_millis(30),
    )
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct Review {
    author: String,
    stars: u8,
}

// == Read-Through Cache ==

#[tokio::test]
async fn test_reviews_served_from_cache_until_invalidated() {
    let services = create_test_services();
    let key = keys::reviews("42");

    let fetched: Vec<Review> = assert_ok!(
        services
            .get_or_fetch(&key, ttl::MEDIUM, || async {
                Ok(vec![Review {
                    author: "ana".to_string(),
                    stars: 5,
                }])
            })
            .await
    );
    assert_eq!(fetched.len(), 1);

    // A second fetcher is never run while the entry is live
    let cached: Vec<Review> = assert_ok!(
        services
            .get_or_fetch(&key, ttl::MEDIUM, || async {
                Ok(Vec::<Review>::new())
            })
            .await
    );
    assert_eq!(cached, fetched);

    assert!(services.invalidate(&key).await);
    let refetched: Vec<Review> = assert_ok!(
        services
            .get_or_fetch(&key, ttl::MEDIUM, || async { Ok(Vec::<Review>::new()) })
            .await
    );
    assert!(refetched.is_empty());

    let report = services.cache_report().await;
    assert_eq!(report.size, 1);
    assert!((report.hit_rate - 100.0 / 3.0).abs() < 1e-9);
}

#[tokio::test]
async fn test_short_ttl_entry_refetched_after_expiry() {
    let services = create_test_services();

    let first: u32 = assert_ok!(
        services
            .get_or_fetch(&keys::inventory(), 20, || async { Ok(1) })
            .await
    );
    tokio::time::sleep(Duration::from_millis(60)).await;
    let second: u32 = assert_ok!(
        services
            .get_or_fetch(&keys::inventory(), 20, || async { Ok(2) })
            .await
    );

    assert_eq!(first, 1);
    assert_eq!(second, 2);
}

#[tokio::test]
async fn test_cached_value_of_wrong_shape_is_refetched_as_miss() {
    let services = create_test_services();
    services
        .cache
        .write()
        .await
        .set(keys::user("u1"), json!("legacy string"), None);

    let fresh = Review {
        author: "x".to_string(),
        stars: 1,
    };
    for _ in 0..3 {
        let review: Review = assert_ok!(
            services
                .get_or_fetch(&keys::user("u1"), ttl::SHORT, || async { Ok(fresh.clone()) })
                .await
        );
        assert_eq!(review, fresh);
    }

    // Only the first call missed; the refetched value served the rest
    let cache = services.cache.read().await;
    assert_eq!(cache.counters().misses, 1);
    assert_eq!(cache.counters().hits, 2);
    drop(cache);
    assert_eq!(
        services.cache.write().await.get(&keys::user("u1")),
        Some(json!({"author": "x", "stars": 1}))
    );
}

#[tokio::test]
async fn test_failed_fetch_surfaces_error() {
    let services = create_test_services();

    let result: anyhow::Result<u32> = services
        .get_or_fetch(&keys::coupons(), ttl::SHORT, || async {
            Err(anyhow::anyhow!("upstream down"))
        })
        .await;

    let err = assert_err!(result);
    assert_eq!(err.to_string(), "upstream down");
    assert_eq!(services.cache_report().await.size, 0);
}

// == Sweepers ==

#[tokio::test]
async fn test_initialized_sweepers_purge_expired_state() {
    let mut services = create_test_services();
    services.set_policy("fast", RateLimitPolicy::new(10, 5)).await;
    services
        .cache
        .write()
        .await
        .set(keys::tracking("TRK1"), json!({"status": "in transit"}), Some(10));
    services.check("id", "fast").await;

    services.initialize();
    tokio::time::sleep(Duration::from_millis(200)).await;

    assert_eq!(services.cache.read().await.size(), 0);
    assert_eq!(services.limiter.read().await.window_count(), 0);

    services.destroy().await;
    assert!(!services.is_running());
}

#[tokio::test]
async fn test_reinitialize_keeps_single_sweeper_pair() {
    let mut services = create_test_services();

    for _ in 0..5 {
        services.initialize();
    }
    assert!(services.is_running());

    services.destroy().await;
    assert!(!services.is_running());

    // Restart after destroy
    services.initialize();
    assert!(services.is_running());
    services.destroy().await;
}

// == Admission Control ==

#[tokio::test]
async fn test_login_throttle_through_context() {
    let services = create_test_services();

    for expected in [4, 3, 2, 1, 0] {
        let decision = assert_ok!(services.admit("a@b.com", endpoints::LOGIN).await);
        assert_eq!(decision.remaining, expected);
    }

    let err = assert_err!(services.admit("a@b.com", endpoints::LOGIN).await);
    match err {
        GuardError::RateLimited {
            message,
            reset_at_ms,
        } => {
            assert_eq!(message, "Too many login attempts. Please try again later.");
            assert_eq!(
                reset_at_ms,
                services.reset_time("a@b.com", endpoints::LOGIN).await
            );
        }
        other => panic!("unexpected error: {:?}", other),
    }

    assert_eq!(
        services.remaining_requests("a@b.com", endpoints::LOGIN).await,
        0
    );
    let stats = services
        .rate_limit_stats("a@b.com", endpoints::LOGIN)
        .await;
    assert_eq!(stats.count, 6);
    assert_eq!(stats.limit, 5);

    // Other identifiers are unaffected
    assert_ok!(services.admit("c@d.com", endpoints::LOGIN).await);
}

#[tokio::test]
async fn test_reset_restores_quota() {
    let services = create_test_services();

    for _ in 0..4 {
        services.check("u1", endpoints::PLACE_ORDER).await;
        services.check("u1", endpoints::APPLY_COUPON).await;
    }
    assert!(!services.check("u1", endpoints::PLACE_ORDER).await.allowed);

    services
        .reset_rate_limit("u1", Some(endpoints::PLACE_ORDER))
        .await;
    let decision = services.check("u1", endpoints::PLACE_ORDER).await;
    assert!(decision.allowed);
    assert_eq!(decision.remaining, 2);
    assert_eq!(
        services
            .rate_limit_stats("u1", endpoints::APPLY_COUPON)
            .await
            .count,
        4
    );

    services.reset_rate_limit("u1", None).await;
    assert_eq!(
        services
            .rate_limit_stats("u1", endpoints::APPLY_COUPON)
            .await
            .count,
        0
    );
}

#[tokio::test]
async fn test_concurrent_checks_count_each_request_once() {
    let services = std::sync::Arc::new(create_test_services());
    services
        .set_policy("burst", RateLimitPolicy::new(60_000, 50))
        .await;

    let mut handles = Vec::new();
    for _ in 0..80 {
        let services = services.clone();
        handles.push(tokio::spawn(async move {
            services.check("shared", "burst").await.allowed
        }));
    }

    let mut allowed = 0;
    for handle in handles {
        if assert_ok!(handle.await) {
            allowed += 1;
        }
    }

    assert_eq!(allowed, 50);
    assert_eq!(services.rate_limit_stats("shared", "burst").await.count, 80);
}

#[tokio::test]
async fn test_default_config_builds_services() {
    let services = assert_ok!(Services::from_config(&Config::default()));
    assert_eq!(services.cache_report().await.max_size, 1000);
}
