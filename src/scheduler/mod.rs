//! Request scheduling subsystem.
//!
//! # Data Flow
//! ```text
//! Site::process
//!     → pool.rs submit (zero-capacity hand-off, waits for a free worker)
//!     → worker thread: delay at head, reply with timings (one-shot)
//!     → scaling.rs evaluate (queuing delay vs service time)
//!     → pool.rs scale_up / scale_down
//! ```
//!
//! # Design Decisions
//! - Backpressure is latency, never rejection; the autoscaler reads that latency
//! - Scale-up always starts a worker; scale-down is a non-blocking offer that
//!   only an idle scalable worker can accept
//! - One permanent worker keeps the pool from reaching zero
//! - The only shared state outside the channels is an atomic worker count

pub mod pool;
pub mod scaling;

use thiserror::Error;

pub use pool::{Scheduler, ServiceTiming};
pub use scaling::ScalingDecision;

/// Errors from the worker pool.
#[derive(Debug, Error)]
pub enum SchedulerError {
    /// Every worker is gone and the request cannot be served.
    #[error("worker pool is closed")]
    Closed,

    /// The OS refused to start a worker thread.
    #[error("failed to spawn worker: {0}")]
    Spawn(#[source] std::io::Error),

    /// The blocking hand-off task panicked or was cancelled.
    #[error("request hand-off failed: {0}")]
    Handoff(#[from] tokio::task::JoinError),
}
