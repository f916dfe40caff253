//! Per-request and per-response decoration records.
//!
//! A [`RequestRecord`] travels with the request in its [`http::Extensions`].
//! The first decorator in a chain creates it; every other decorator reuses
//! the same `Arc`, so a start time stamped by one wrapper is visible to all.

use std::sync::{Arc, OnceLock};
use std::time::{Duration, Instant};

use http::{response, HeaderMap, Method, Request, StatusCode, Uri};

/// What the interceptors know about one outbound request.
#[derive(Debug)]
pub struct RequestRecord {
    method: Method,
    uri: Uri,
    trace_context: opentelemetry::Context,
    started_at: OnceLock<Instant>,
}

impl RequestRecord {
    /// Return the record already attached to `request`, or attach a new one.
    ///
    /// The trace context is taken from an `opentelemetry::Context` in the
    /// request extensions when present, otherwise from the current context.
    pub fn attach<B>(request: &mut Request<B>) -> Arc<Self> {
        if let Some(record) = request.extensions().get::<Arc<RequestRecord>>() {
            return Arc::clone(record);
        }

        let trace_context = request
            .extensions()
            .get::<opentelemetry::Context>()
            .cloned()
            .unwrap_or_else(opentelemetry::Context::current);

        let record = Arc::new(Self {
            method: request.method().clone(),
            uri: request.uri().clone(),
            trace_context,
            started_at: OnceLock::new(),
        });
        request.extensions_mut().insert(Arc::clone(&record));
        record
    }

    /// Look up the record attached to `request`.
    pub fn of<B>(request: &Request<B>) -> Option<&Arc<Self>> {
        request.extensions().get::<Arc<RequestRecord>>()
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Trace context the request was sent under.
    pub fn trace_context(&self) -> &opentelemetry::Context {
        &self.trace_context
    }

    /// Stamp the start time. Returns `false` if one was already stored.
    pub fn mark_started(&self, at: Instant) -> bool {
        self.started_at.set(at).is_ok()
    }

    pub fn started_at(&self) -> Option<Instant> {
        self.started_at.get().copied()
    }

    /// Time since the stored start time, if any.
    pub fn elapsed(&self) -> Option<Duration> {
        self.started_at().map(|at| at.elapsed())
    }
}

/// Status and headers of one response, minus its body.
#[derive(Debug)]
pub struct ResponseRecord {
    status: StatusCode,
    headers: HeaderMap,
}

impl ResponseRecord {
    /// Return the record already attached to `parts`, or attach a new one.
    pub fn attach(parts: &mut response::Parts) -> Arc<Self> {
        if let Some(record) = parts.extensions.get::<Arc<ResponseRecord>>() {
            return Arc::clone(record);
        }

        let record = Arc::new(Self {
            status: parts.status,
            headers: parts.headers.clone(),
        });
        parts.extensions.insert(Arc::clone(&record));
        record
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Header value as text, ignoring empty and non-UTF-8 values.
    pub fn header_str(&self, name: &http::HeaderName) -> Option<&str> {
        self.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.is_empty())
    }
}
