//! Metrics collection and exposition.
//!
//! # Metrics
//! - `dispatcher_requests_total` (counter): requests by method, status, outcome
//! - `dispatcher_request_duration_seconds` (histogram): latency distribution
//! - `dispatcher_rejected_requests_total` (counter): requests whose body could not be read
//!
//! # Design Decisions
//! - Recording is a no-op until a recorder is installed
//! - Labels stay low-cardinality: no paths, only the routing outcome

use std::net::SocketAddr;
use std::time::Instant;

use metrics::{counter, histogram};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder};

use crate::routing::RouteOutcome;

/// Install the Prometheus recorder and serve `/metrics` on `addr`.
///
/// Must be called from within a Tokio runtime.
pub fn init_metrics(addr: SocketAddr) -> Result<(), BuildError> {
    PrometheusBuilder::new().with_http_listener(addr).install()?;
    tracing::info!(address = %addr, "Metrics exporter listening");
    Ok(())
}

/// Record one routed request.
pub fn record_request(method: &str, status: u16, outcome: RouteOutcome, start: Instant) {
    counter!(
        "dispatcher_requests_total",
        "method" => method.to_string(),
        "status" => status.to_string(),
        "outcome" => outcome.as_str()
    )
    .increment(1);
    histogram!(
        "dispatcher_request_duration_seconds",
        "method" => method.to_string(),
        "outcome" => outcome.as_str()
    )
    .record(start.elapsed().as_secs_f64());
}

/// Record a request rejected before routing.
pub fn record_rejected(method: &str, start: Instant) {
    counter!("dispatcher_rejected_requests_total", "method" => method.to_string()).increment(1);
    histogram!("dispatcher_request_duration_seconds", "method" => method.to_string(), "outcome" => "rejected")
        .record(start.elapsed().as_secs_f64());
}
