//! Metrics collection and exposition.
//!
//! # Metrics
//! - `proxy_requests_total` (counter): requests by method, status, upstream
//! - `proxy_request_duration_seconds` (histogram): latency by method, upstream
//! - `proxy_body_rewrites_total` (counter): bodies by transform kind
//! - `proxy_upstream_errors_total` (counter): failed upstream calls
//!
//! # Design Decisions
//! - Recorded through the `metrics` facade; no-ops until a recorder exists
//! - The Prometheus listener is started by the binary, never by the library

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

/// Start the Prometheus scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(address = %addr, error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_request(method: &str, status: u16, upstream: &'static str, start: Instant) {
    metrics::counter!(
        "proxy_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "upstream" => upstream
    )
    .increment(1);

    metrics::histogram!(
        "proxy_request_duration_seconds",
        "method" => method.to_string(),
        "upstream" => upstream
    )
    .record(start.elapsed().as_secs_f64());
}

pub fn record_rewrite(kind: &'static str) {
    metrics::counter!("proxy_body_rewrites_total", "kind" => kind).increment(1);
}

pub fn record_upstream_error(upstream: &'static str) {
    metrics::counter!("proxy_upstream_errors_total", "upstream" => upstream).increment(1);
}
