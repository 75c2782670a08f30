//! Background Tasks Module
//!
//! Contains background tasks that run periodically while the services are up.
//!
//! # Tasks
//! - Cache sweep: removes expired cache entries
//! - Rate limit sweep: removes windows whose reset time has passed

mod sweep;

pub use sweep::{spawn_sweep_task, Sweep, SweepHandle};
