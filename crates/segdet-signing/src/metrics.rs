//! Signed request metrics.

use metrics::{counter, histogram};

/// Metric name constants.
pub mod names {
    /// Signed requests by service, operation and status.
    pub const REQUESTS_TOTAL: &str = "segdet_signed_requests_total";

    /// Request latency in seconds by service and operation.
    pub const LATENCY_SECONDS: &str = "segdet_signed_request_latency_seconds";
}

/// Record metrics for a completed signed request.
pub fn record_request(service: &str, operation: &str, status: u16, latency_ms: f64) {
    counter!(
        names::REQUESTS_TOTAL,
        "service" => service.to_string(),
        "operation" => operation.to_string(),
        "status" => status.to_string()
    )
    .increment(1);

    histogram!(
        names::LATENCY_SECONDS,
        "service" => service.to_string(),
        "operation" => operation.to_string()
    )
    .record(latency_ms / 1000.0);
}
