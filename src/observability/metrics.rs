//! Metrics collection and exposition.
//!
//! # Metrics
//! - `cotacao_requests_total` (counter): inbound requests by outcome
//! - `cotacao_request_duration_seconds` (histogram): inbound latency
//! - `cotacao_upstream_fetch_total` (counter): upstream fetches by outcome
//! - `cotacao_upstream_fetch_duration_seconds` (histogram)
//! - `cotacao_persist_total` (counter): store writes by outcome
//!
//! Recording is a no-op until a recorder is installed, so library code and
//! tests can call these freely.

use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::time::Instant;

/// Install the Prometheus exporter listening on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics exporter listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

/// Record one finished inbound request.
pub fn record_request(outcome: &'static str, status: u16, start: Instant) {
    metrics::counter!(
        "cotacao_requests_total",
        "outcome" => outcome,
        "status" => status.to_string()
    )
    .increment(1);
    metrics::histogram!("cotacao_request_duration_seconds").record(start.elapsed().as_secs_f64());
}

/// Record one upstream fetch attempt.
pub fn record_upstream_fetch(outcome: &'static str, start: Instant) {
    metrics::counter!("cotacao_upstream_fetch_total", "outcome" => outcome).increment(1);
    metrics::histogram!("cotacao_upstream_fetch_duration_seconds")
        .record(start.elapsed().as_secs_f64());
}

/// Record one persistence attempt.
pub fn record_persist(outcome: &'static str) {
    metrics::counter!("cotacao_persist_total", "outcome" => outcome).increment(1);
}
