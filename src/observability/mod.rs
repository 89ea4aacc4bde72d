//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → logging.rs (structured log events, path id on every hop)
//!     → metrics.rs (pool size, hop timings, scaling events)
//!
//! Consumers:
//!     → stdout (fmt subscriber)
//!     → Metrics endpoint (Prometheus scrape, optional)
//! ```
//!
//! # Design Decisions
//! - Structured fields instead of formatted messages
//! - Metrics calls are no-ops until a recorder is installed

pub mod logging;
pub mod metrics;
