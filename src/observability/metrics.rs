//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): forwarded requests by operation, status
//! - `relay_request_duration_seconds` (histogram): end-to-end forward latency
//!
//! Metric updates are cheap atomic operations; recording without an
//! installed exporter is a no-op, so handlers never need to care.

use metrics::{counter, histogram};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter. Failure is logged, not fatal; the relay
/// keeps serving traffic without metrics.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(error) => tracing::error!(%error, "Failed to install metrics exporter"),
    }
}

/// Record one forwarded request.
pub fn record_forward(operation: &'static str, status: u16, start: Instant) {
    let elapsed = start.elapsed().as_secs_f64();
    counter!(
        "relay_requests_total",
        "operation" => operation,
        "status" => status.to_string()
    )
    .increment(1);
    histogram!("relay_request_duration_seconds", "operation" => operation).record(elapsed);
}
