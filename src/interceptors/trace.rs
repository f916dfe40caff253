//! Request-id correlation on the caller's trace span.
//!
//! Storage backends return their own request id in a response header. Putting
//! it on the span lets a trace be matched against the provider's logs.

use std::sync::Arc;

use opentelemetry::trace::TraceContextExt;
use opentelemetry::KeyValue;

use crate::config::{StorageConfig, StorageType};
use crate::transport::{Intercepted, Interceptor, InterceptorLayer, Outcome, RequestRecord};

/// Span attribute carrying the backend request id.
pub const REQUEST_ID_ATTRIBUTE: &str = "request-id";

/// Copies the backend request-id header onto the request's span.
#[derive(Debug, Clone)]
pub struct TraceRequestId {
    name: String,
    storage_type: StorageType,
}

impl TraceRequestId {
    pub fn new(name: impl Into<String>, storage_type: StorageType) -> Self {
        Self {
            name: name.into(),
            storage_type,
        }
    }
}

impl Interceptor for TraceRequestId {
    fn after_response(&self, request: &RequestRecord, outcome: Outcome<'_>) {
        let Outcome::Response(response) = outcome else {
            return;
        };

        let span = request.trace_context().span();
        if !span.span_context().is_valid() {
            return;
        }

        let Some(request_id) = response.header_str(self.storage_type.request_id_header()) else {
            return;
        };

        tracing::trace!(name = %self.name, request_id = %request_id, "Tagging span with request id");
        span.set_attribute(KeyValue::new(REQUEST_ID_ATTRIBUTE, request_id.to_string()));
    }
}

/// Wrap `inner` so the backend request id lands on the active span.
pub fn trace_request_id_interceptor<S>(name: &str, config: &StorageConfig, inner: S) -> Intercepted<S> {
    Intercepted::new(inner, Arc::new(TraceRequestId::new(name, config.storage_type)))
}

/// Layer form of [`trace_request_id_interceptor`].
pub fn trace_request_id_layer(name: &str, config: &StorageConfig) -> InterceptorLayer {
    InterceptorLayer::new(TraceRequestId::new(name, config.storage_type))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::ResponseRecord;
    use http::{Request, Response};
    use opentelemetry::trace::{Tracer, TracerProvider as _};
    use opentelemetry::Context;
    use opentelemetry_sdk::trace::{InMemorySpanExporter, SdkTracerProvider};

    fn response_with(header: Option<(&str, &str)>) -> Arc<ResponseRecord> {
        let mut builder = Response::builder();
        if let Some((name, value)) = header {
            builder = builder.header(name, value);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        ResponseRecord::attach(&mut parts)
    }

    fn request_with(cx: Context) -> Arc<RequestRecord> {
        let mut request = Request::get("http://storage.local/bucket/key")
            .extension(cx)
            .body(())
            .unwrap();
        RequestRecord::attach(&mut request)
    }

    /// Run `after_response` under a recording span and return its request-id attribute.
    fn tagged(storage_type: StorageType, header: Option<(&str, &str)>) -> Option<String> {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let cx = Context::current_with_span(provider.tracer("test").start("get_object"));

        let interceptor = TraceRequestId::new("media", storage_type);
        let response = response_with(header);
        interceptor.after_response(&request_with(cx.clone()), Outcome::Response(&response));
        cx.span().end();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        spans[0]
            .attributes
            .iter()
            .find(|kv| kv.key.as_str() == REQUEST_ID_ATTRIBUTE)
            .map(|kv| kv.value.as_str().into_owned())
    }

    #[test]
    fn s3_request_id_is_tagged() {
        assert_eq!(
            tagged(StorageType::S3, Some(("X-Amz-Request-Id", "abc123"))),
            Some("abc123".to_string())
        );
    }

    #[test]
    fn oss_request_id_is_tagged() {
        assert_eq!(
            tagged(StorageType::Oss, Some(("X-Oss-Request-Id", "5C1B138A109F4E4A"))),
            Some("5C1B138A109F4E4A".to_string())
        );
    }

    #[test]
    fn header_of_other_backend_is_ignored() {
        assert_eq!(tagged(StorageType::Oss, Some(("X-Amz-Request-Id", "abc123"))), None);
        assert_eq!(tagged(StorageType::S3, None), None);
    }

    #[test]
    fn invalid_span_is_left_alone() {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let sibling = provider.tracer("test").start("list_objects");

        let interceptor = TraceRequestId::new("media", StorageType::Oss);
        let response = response_with(Some(("X-Oss-Request-Id", "5C1B138A109F4E4A")));
        let _guard = Context::current_with_span(sibling).attach();
        interceptor.after_response(&request_with(Context::new()), Outcome::Response(&response));
        Context::current().span().end();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0]
            .attributes
            .iter()
            .all(|kv| kv.key.as_str() != REQUEST_ID_ATTRIBUTE));
    }

    #[test]
    fn transport_error_is_ignored() {
        let exporter = InMemorySpanExporter::default();
        let provider = SdkTracerProvider::builder()
            .with_simple_exporter(exporter.clone())
            .build();
        let cx = Context::current_with_span(provider.tracer("test").start("get_object"));

        let interceptor = TraceRequestId::new("media", StorageType::S3);
        let error = std::io::Error::new(std::io::ErrorKind::TimedOut, "timed out");
        interceptor.after_response(&request_with(cx.clone()), Outcome::Error(&error));
        cx.span().end();

        let spans = exporter.get_finished_spans().unwrap();
        assert_eq!(spans.len(), 1);
        assert!(spans[0]
            .attributes
            .iter()
            .all(|kv| kv.key.as_str() != REQUEST_ID_ATTRIBUTE));
    }
}
