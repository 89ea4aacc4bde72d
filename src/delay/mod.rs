//! Service-time generation.
//!
//! # Data Flow
//! ```text
//! SiteSpec
//!     → "service-time"              → fixed.rs (parse duration string)
//!     → "service-time-distribution" → distribution.rs (sample)
//!     → sum of both = time the worker sleeps
//! ```
//!
//! # Design Decisions
//! - Malformed input never fails a request; it contributes zero delay
//! - Sampling is the only source of randomness in a site

pub mod distribution;
pub mod fixed;

use std::time::Duration;

pub use distribution::Distribution;
pub use fixed::parse_fixed_delay;

/// Anything that can produce the next simulated service time.
pub trait DelayGenerator {
    /// Draw the next delay. Implementations return `Duration::ZERO` rather than fail.
    fn next_delay(&self) -> Duration;
}

impl<T: DelayGenerator> DelayGenerator for Option<T> {
    fn next_delay(&self) -> Duration {
        self.as_ref().map(|g| g.next_delay()).unwrap_or(Duration::ZERO)
    }
}
