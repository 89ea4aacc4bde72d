//! Metrics collection and exposition.
//!
//! # Metrics
//! - `site_pool_workers` (gauge): live worker count
//! - `site_queuing_delay_seconds` (histogram): wait for a free worker
//! - `site_service_time_seconds` (histogram): time spent in the delay step
//! - `site_scaling_events_total` (counter): by direction and whether it took effect
//! - `site_requests_total` (counter): by outcome
//! - `site_forward_failures_total` (counter): failed relays to the next hop

use std::net::SocketAddr;
use std::time::Duration;

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

/// Install the Prometheus recorder and its scrape listener.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

pub fn record_pool_size(workers: usize) {
    metrics::gauge!("site_pool_workers").set(workers as f64);
}

pub fn record_hop_timing(queuing_delay: Duration, service_time: Duration) {
    metrics::histogram!("site_queuing_delay_seconds").record(queuing_delay.as_secs_f64());
    metrics::histogram!("site_service_time_seconds").record(service_time.as_secs_f64());
}

pub fn record_scaling(direction: &'static str, applied: bool) {
    let applied = if applied { "true" } else { "false" };
    metrics::counter!(
        "site_scaling_events_total",
        "direction" => direction,
        "applied" => applied
    )
    .increment(1);
}

pub fn record_request(outcome: &'static str) {
    metrics::counter!("site_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_forward_failure() {
    metrics::counter!("site_forward_failures_total").increment(1);
}
