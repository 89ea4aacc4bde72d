//! One site's handling of a path: queue, delay, measure, scale, forward.
//!
//! # Data Flow
//! ```text
//! PathSpec (validated at the boundary)
//!     → Scheduler::submit (waits for a worker, head delay runs there)
//!     → queuing delay = dequeued - submitted, service time = finished - dequeued
//!     → Scheduler::observe (only when autoscaling)
//!     → PathSpec::forward_to_next_hop
//!     → HopReport (timing line + downstream bytes or forward error)
//! ```

pub mod report;

use std::sync::Arc;
use std::time::Instant;

use thiserror::Error;

use crate::observability::metrics;
use crate::path::{Forwarder, PathError, PathSpec};
use crate::scheduler::{Scheduler, SchedulerError};

pub use report::HopReport;

/// Errors that stop a hop before anything can be reported.
#[derive(Debug, Error)]
pub enum SiteError {
    #[error("You should at least specify one site")]
    EmptyPath,

    #[error(transparent)]
    Scheduler(#[from] SchedulerError),

    #[error("Error occurred on site {site}: {source}")]
    Delay {
        site: String,
        #[source]
        source: PathError,
    },
}

/// A site: its worker pool and its outbound client.
#[derive(Clone)]
pub struct Site {
    scheduler: Arc<Scheduler>,
    forwarder: Forwarder,
}

impl Site {
    pub fn new(scheduler: Arc<Scheduler>, forwarder: Forwarder) -> Self {
        Self {
            scheduler,
            forwarder,
        }
    }

    pub fn scheduler(&self) -> &Scheduler {
        &self.scheduler
    }

    /// Serve the head of `path` here, then relay the remainder.
    pub async fn process(&self, path: PathSpec) -> Result<HopReport, SiteError> {
        let site = path.head().ok_or(SiteError::EmptyPath)?.name().to_string();
        let path = Arc::new(path);

        let submitted = Instant::now();
        let timing = self.scheduler.submit(path.clone()).await?;
        let queuing_delay = timing.queuing_delay(submitted);
        let service_time = timing.service_time();
        if let Err(source) = timing.outcome {
            metrics::record_request("delay_error");
            return Err(SiteError::Delay { site, source });
        }
        metrics::record_hop_timing(queuing_delay, service_time);

        tracing::info!(
            path_id = %path.id,
            site = %site,
            queuing_delay = ?queuing_delay,
            service_time = ?service_time,
            remaining = path.len() - 1,
            "Hop served"
        );

        if self.scheduler.auto_scale() {
            self.scheduler.observe(queuing_delay, service_time);
        }

        let downstream = path.forward_to_next_hop(&self.forwarder).await;
        match &downstream {
            Ok(_) => metrics::record_request("ok"),
            Err(e) => {
                metrics::record_request("forward_error");
                tracing::warn!(path_id = %path.id, site = %site, error = %e, "Forward failed");
            }
        }

        Ok(HopReport {
            site,
            queuing_delay,
            service_time,
            downstream,
        })
    }
}
