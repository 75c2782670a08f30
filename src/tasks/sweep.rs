//! Periodic Sweep Task
//!
//! Background task that periodically purges expired cache entries or stale
//! rate limit windows.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::RwLock;
use tokio::task::JoinHandle;
use tracing::{debug, info};

use crate::cache::TtlCache;
use crate::ratelimit::RateLimiter;

/// State that can drop its expired contents in one pass.
pub trait Sweep: Send + Sync + 'static {
    /// Name used in log lines
    const LABEL: &'static str;

    /// Removes everything expired right now. Returns how many were removed.
    fn sweep(&mut self) -> usize;
}

impl Sweep for TtlCache {
    const LABEL: &'static str = "cache";

    fn sweep(&mut self) -> usize {
        self.cleanup()
    }
}

impl Sweep for RateLimiter {
    const LABEL: &'static str = "rate_limit";

    fn sweep(&mut self) -> usize {
        self.cleanup()
    }
}

/// Spawns a background task that periodically sweeps `target`.
///
/// The task runs in an infinite loop, sleeping for `interval` between passes.
/// Each pass holds the write lock for its whole duration, so it never
/// interleaves with a caller's read-check-write sequence.
///
/// # Example
/// ```ignore
/// let cache = Arc::new(RwLock::new(TtlCache::new(1000, 300_000)));
/// let handle = spawn_sweep_task(cache.clone(), Duration::from_secs(60));
/// // Later, during shutdown:
/// handle.abort();
/// ```
pub fn spawn_sweep_task<T: Sweep>(target: Arc<RwLock<T>>, interval: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        info!(
            "Starting {} sweep task with interval of {}ms",
            T::LABEL,
            interval.as_millis()
        );

        loop {
            tokio::time::sleep(interval).await;

            let removed = {
                let mut guard = target.write().await;
                guard.sweep()
            };

            if removed > 0 {
                info!("{} sweep: removed {} expired entries", T::LABEL, removed);
            } else {
                debug!("{} sweep: no expired entries found", T::LABEL);
            }
        }
    })
}

// == Sweep Handle ==
/// Owns at most one running sweep task.
///
/// Starting again replaces the running task instead of stacking a second
/// one. Dropping the handle stops the task.
#[derive(Debug, Default)]
pub struct SweepHandle {
    task: Option<JoinHandle<()>>,
}

impl SweepHandle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts sweeping `target`, aborting any task this handle already owns.
    pub fn start<T: Sweep>(&mut self, target: Arc<RwLock<T>>, interval: Duration) {
        self.stop();
        self.task = Some(spawn_sweep_task(target, interval));
    }

    /// Aborts the running task, if any. Returns whether one was running.
    pub fn stop(&mut self) -> bool {
        match self.task.take() {
            Some(task) => {
                task.abort();
                true
            }
            None => false,
        }
    }

    pub fn is_running(&self) -> bool {
        self.task.as_ref().is_some_and(|task| !task.is_finished())
    }
}

impl Drop for SweepHandle {
    fn drop(&mut self) {
        self.stop();
    }
}
