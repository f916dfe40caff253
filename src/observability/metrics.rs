//! Metrics names, descriptions and exposition.
//!
//! # Metrics
//! - `client_handle_total` (counter): storage requests by type, name,
//!   method, bucket, code
//! - `client_handle_seconds` (histogram): request latency through body
//!   close, by type, name, method, bucket
//!
//! # Design Decisions
//! - Recording goes through the `metrics` facade; the process picks the
//!   recorder (Prometheus here, a debugging recorder in tests)
//! - Label order is fixed so exporters render series consistently

use metrics::{describe_counter, describe_histogram, Unit};
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

/// Counter of storage requests.
pub const CLIENT_HANDLE_TOTAL: &str = "client_handle_total";

/// Histogram of storage request latency, measured until the body closes.
pub const CLIENT_HANDLE_SECONDS: &str = "client_handle_seconds";

/// Value of the `type` label on every storage metric.
pub const COMPONENT_TYPE: &str = "oss";

/// Outcome label used when the transport fails without a response.
pub const REQUEST_ERROR: &str = "request error";

/// Latency buckets in seconds, tuned for object-storage round trips.
const LATENCY_BUCKETS: &[f64] = &[
    0.005, 0.01, 0.025, 0.05, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0, 30.0,
];

/// Register units and help text with the installed recorder.
pub fn describe_metrics() {
    describe_counter!(CLIENT_HANDLE_TOTAL, Unit::Count, "Object storage requests by outcome");
    describe_histogram!(
        CLIENT_HANDLE_SECONDS,
        Unit::Seconds,
        "Object storage request latency, measured until the response body closes"
    );
}

/// Install a Prometheus recorder as the global recorder.
///
/// The returned handle renders the text exposition format on demand.
pub fn install_prometheus_recorder() -> Result<PrometheusHandle, BuildError> {
    let handle = PrometheusBuilder::new()
        .set_buckets_for_metric(
            metrics_exporter_prometheus::Matcher::Full(CLIENT_HANDLE_SECONDS.to_string()),
            LATENCY_BUCKETS,
        )?
        .install_recorder()?;

    describe_metrics();
    tracing::debug!("Prometheus recorder installed");
    Ok(handle)
}
