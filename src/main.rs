//! Storefront Guard - in-process caching and admission control
//!
//! Composition root: wires the cache and rate limiter into one `Services`
//! context, runs a short simulated storefront workload and keeps the
//! sweepers alive until shutdown.

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use storefront_guard::cache::{keys, ttl};
use storefront_guard::ratelimit::endpoints;
use storefront_guard::{Config, Services};

#[derive(Debug, Clone, Serialize, Deserialize)]
struct Product {
    id: String,
    name: String,
    price_cents: u32,
}

/// Main entry point.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Build the services context and start the sweepers
/// 4. Run the simulated workload
/// 5. Wait for SIGINT/SIGTERM, then stop the sweepers
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "storefront_guard=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Storefront Guard");

    let config = Config::from_env();
    info!(
        "Configuration loaded: max_size={}, default_ttl={}ms, cache_cleanup={}ms, rate_limit_cleanup={}ms",
        config.max_size,
        config.default_ttl_ms,
        config.cache_cleanup_interval_ms,
        config.rate_limit_cleanup_interval_ms
    );

    let mut services = Services::from_config(&config).context("invalid configuration")?;
    services.initialize();

    simulate_storefront(&services).await?;

    shutdown_signal().await;
    services.destroy().await;

    info!("Shutdown complete");
    Ok(())
}

/// Exercises the read-through cache and the login throttle the way the
/// storefront pages do.
async fn simulate_storefront(services: &Services) -> anyhow::Result<()> {
    for _ in 0..3 {
        let product: Product = services
            .get_or_fetch(&keys::product("1"), ttl::MEDIUM, || async {
                Ok(Product {
                    id: "1".to_string(),
                    name: "Olive Oil".to_string(),
                    price_cents: 1299,
                })
            })
            .await?;
        info!(id = %product.id, name = %product.name, price_cents = product.price_cents, "Product loaded");
    }

    for attempt in 1..=6 {
        match services.admit("demo@example.com", endpoints::LOGIN).await {
            Ok(decision) => info!(attempt, remaining = decision.remaining, "Login attempt admitted"),
            Err(err) => {
                let stats = services
                    .rate_limit_stats("demo@example.com", endpoints::LOGIN)
                    .await;
                let reset_at = stats
                    .reset_at()
                    .map(|at| at.to_rfc3339())
                    .unwrap_or_default();
                warn!(attempt, %err, reset_at = %reset_at, "Login attempt denied");
            }
        }
    }

    let report = services.cache_report().await;
    info!(
        "Cache report: {}",
        serde_json::to_string(&report).context("failed to encode cache report")?
    );
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
