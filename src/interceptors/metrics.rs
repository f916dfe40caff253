//! Request counting and latency histograms.

use std::sync::Arc;

use http::StatusCode;
use metrics::{counter, histogram};

use crate::config::StorageConfig;
use crate::observability::metrics::{CLIENT_HANDLE_SECONDS, CLIENT_HANDLE_TOTAL, COMPONENT_TYPE, REQUEST_ERROR};
use crate::transport::{Intercepted, Interceptor, InterceptorLayer, Outcome, RequestRecord, ResponseRecord};

/// Counts every exchange and times it until the response body closes.
#[derive(Debug, Clone)]
pub struct Metrics {
    name: String,
    bucket: String,
    bucket_key: String,
}

impl Metrics {
    pub fn new(name: impl Into<String>, config: &StorageConfig) -> Self {
        Self {
            name: name.into(),
            bucket: config.bucket.clone(),
            bucket_key: config.bucket_key().to_string(),
        }
    }
}

/// Reason phrase for `status`, or the numeric code when it has none.
pub fn status_text(status: StatusCode) -> String {
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.as_str().to_string())
}

impl Interceptor for Metrics {
    fn after_response(&self, request: &RequestRecord, outcome: Outcome<'_>) {
        let code = match outcome {
            Outcome::Response(response) => status_text(response.status()),
            Outcome::Error(_) => REQUEST_ERROR.to_string(),
        };

        counter!(
            CLIENT_HANDLE_TOTAL,
            "type" => COMPONENT_TYPE,
            "name" => self.name.clone(),
            "method" => request.method().to_string(),
            "bucket" => self.bucket.clone(),
            "code" => code,
        )
        .increment(1);
    }

    fn on_body_close(&self, request: &RequestRecord, _response: &ResponseRecord) {
        let Some(elapsed) = request.elapsed() else {
            tracing::debug!(
                name = %self.name,
                method = %request.method(),
                "No start time on request, skipping latency"
            );
            return;
        };

        histogram!(
            CLIENT_HANDLE_SECONDS,
            "type" => COMPONENT_TYPE,
            "name" => self.name.clone(),
            "method" => request.method().to_string(),
            "bucket" => self.bucket_key.clone(),
        )
        .record(elapsed.as_secs_f64());
    }
}

/// Wrap `inner` so every exchange is counted and timed.
pub fn metrics_interceptor<S>(name: &str, config: &StorageConfig, inner: S) -> Intercepted<S> {
    Intercepted::new(inner, Arc::new(Metrics::new(name, config)))
}

/// Layer form of [`metrics_interceptor`].
pub fn metrics_layer(name: &str, config: &StorageConfig) -> InterceptorLayer {
    InterceptorLayer::new(Metrics::new(name, config))
}
