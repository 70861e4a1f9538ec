//! Metrics collection and exposition.
//!
//! # Metrics
//! - `relay_requests_total` (counter): inbound requests by method, status
//! - `relay_request_duration_seconds` (histogram): end-to-end latency
//! - `relay_upstream_duration_seconds` (histogram): upstream call latency
//! - `relay_upstream_failures_total` (counter): failed upstream calls by kind
//!
//! Recording without an installed recorder is a no-op.

use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus recorder and its scrape endpoint.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics endpoint listening");
    Ok(())
}

/// Record a completed inbound request.
pub fn record_request(method: &str, status: u16, started: Instant) {
    ::metrics::counter!(
        "relay_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string()
    )
    .increment(1);
    ::metrics::histogram!("relay_request_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record how long the upstream call took, whatever its outcome.
pub fn record_upstream_duration(started: Instant) {
    ::metrics::histogram!("relay_upstream_duration_seconds")
        .record(started.elapsed().as_secs_f64());
}

/// Record an upstream call that produced no response.
pub fn record_upstream_failure(kind: &'static str) {
    ::metrics::counter!("relay_upstream_failures_total", "kind" => kind).increment(1);
}
