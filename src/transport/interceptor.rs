//! The hook interface decorators call around each request.

use std::fmt;

use crate::transport::record::{RequestRecord, ResponseRecord};

/// Result of the inner transport as seen by `after_response`.
#[derive(Clone, Copy)]
pub enum Outcome<'a> {
    /// The transport produced a response. Its body has not been read yet.
    Response(&'a ResponseRecord),
    /// The transport failed before producing a response.
    Error(&'a dyn fmt::Display),
}

impl fmt::Debug for Outcome<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Response(response) => f.debug_tuple("Response").field(&response.status()).finish(),
            Outcome::Error(error) => f.debug_tuple("Error").field(&error.to_string()).finish(),
        }
    }
}

/// Observation hooks invoked by [`Intercepted`](crate::transport::Intercepted).
///
/// Every method defaults to a no-op. Hooks only observe: they cannot alter
/// the request, the response or the error the caller receives.
pub trait Interceptor: Send + Sync + 'static {
    /// Called before the request is handed to the inner transport.
    fn before_send(&self, _request: &RequestRecord) {}

    /// Called once the inner transport returns, on success or failure, or
    /// when the caller drops the request before it resolves.
    fn after_response(&self, _request: &RequestRecord, _outcome: Outcome<'_>) {}

    /// Called when reading the response body yields an error.
    fn on_error(&self, _request: &RequestRecord, _response: &ResponseRecord, _error: &dyn fmt::Display) {}

    /// Called once per response body, at end of stream or when it is dropped.
    fn on_body_close(&self, _request: &RequestRecord, _response: &ResponseRecord) {}
}
