//! One hop of a path.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::delay::{parse_fixed_delay, DelayGenerator, Distribution};

/// A site's address plus the recipe for its simulated service time.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct SiteSpec {
    /// URL the previous hop posts to.
    pub addr: String,

    /// Fixed service time, e.g. `"20ms"`.
    #[serde(
        rename = "service-time",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub service_time: Option<String>,

    /// Additional sampled service time.
    #[serde(
        rename = "service-time-distribution",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub distribution: Option<Distribution>,
}

impl SiteSpec {
    pub fn new(addr: impl Into<String>) -> Self {
        Self {
            addr: addr.into(),
            service_time: None,
            distribution: None,
        }
    }

    pub fn with_service_time(mut self, service_time: impl Into<String>) -> Self {
        self.service_time = Some(service_time.into());
        self
    }

    pub fn with_distribution(mut self, distribution: Distribution) -> Self {
        self.distribution = Some(distribution);
        self
    }

    /// Name used in reports.
    pub fn name(&self) -> &str {
        &self.addr
    }

    /// Parsed fixed delay; `None` when absent or malformed.
    pub fn fixed_delay(&self) -> Option<Duration> {
        self.service_time.as_deref().and_then(parse_fixed_delay)
    }

    /// A fresh sample from the distribution, zero when there is none.
    pub fn sampled_delay(&self) -> Duration {
        self.distribution.next_delay()
    }

    /// Block the calling thread for the fixed delay, then the sampled one.
    ///
    /// Runs on a pool worker thread and is not interruptible.
    pub fn delay_by_sleeping(&self) {
        if let Some(d) = self.fixed_delay() {
            std::thread::sleep(d);
        }
        let sampled = self.sampled_delay();
        if !sampled.is_zero() {
            std::thread::sleep(sampled);
        }
    }
}

impl fmt::Display for SiteSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "addr: {}", self.addr)?;
        if let Some(st) = &self.service_time {
            write!(f, "; service-time: {}", st)?;
        }
        if let Some(dist) = &self.distribution {
            write!(f, "; service-time-distribution: {}", dist)?;
        }
        Ok(())
    }
}
