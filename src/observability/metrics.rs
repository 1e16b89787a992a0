//! Metrics collection and exposition.
//!
//! # Metrics
//! - `prerender_requests_total` (counter): requests by outcome
//!   (`passthrough`, `rendered`, `fallback`)
//! - `prerender_fallbacks_total` (counter): fallbacks by failure reason
//! - `prerender_backend_duration_seconds` (histogram): service latency by status
//!   (`error` for transport failures)
//!
//! Updates are no-ops until a recorder is installed with [`init_metrics`].

use std::net::SocketAddr;
use std::time::Instant;

use metrics_exporter_prometheus::PrometheusBuilder;

pub const OUTCOME_PASSTHROUGH: &str = "passthrough";
pub const OUTCOME_RENDERED: &str = "rendered";
pub const OUTCOME_FALLBACK: &str = "fallback";

/// Install the Prometheus recorder and its scrape endpoint on `addr`.
pub fn init_metrics(addr: SocketAddr) {
    match PrometheusBuilder::new().with_http_listener(addr).install() {
        Ok(()) => tracing::info!(address = %addr, "Metrics endpoint listening"),
        Err(e) => tracing::error!(error = %e, "Failed to install metrics exporter"),
    }
}

pub fn record_outcome(outcome: &'static str) {
    metrics::counter!("prerender_requests_total", "outcome" => outcome).increment(1);
}

pub fn record_fallback(reason: &'static str) {
    record_outcome(OUTCOME_FALLBACK);
    metrics::counter!("prerender_fallbacks_total", "reason" => reason).increment(1);
}

/// Label for a service call: the status code, or `error` when no response came back.
pub fn backend_status_label(status: Option<u16>) -> String {
    status.map_or_else(|| "error".to_string(), |s| s.to_string())
}

pub fn record_backend(status: Option<u16>, started: Instant) {
    metrics::histogram!("prerender_backend_duration_seconds", "status" => backend_status_label(status))
        .record(started.elapsed().as_secs_f64());
}
