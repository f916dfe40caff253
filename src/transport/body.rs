//! Response body wrapper that reports close and read errors.
//!
//! # Responsibilities
//! - Forward frames from the real body untouched
//! - Fire `on_error` for every error frame
//! - Fire `on_body_close` exactly once, at end of stream or on drop
//!
//! # Design Decisions
//! - The close hook lives in a RAII guard; taking the guard out of the body
//!   at end of stream fires it, dropping the body fires it otherwise
//! - Bodies are single-consumer, no synchronisation on the guard

use std::fmt;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use http_body::{Body, Frame, SizeHint};
use pin_project_lite::pin_project;

use crate::transport::interceptor::Interceptor;
use crate::transport::record::{RequestRecord, ResponseRecord};

pin_project! {
    /// A response body that reports its lifecycle to an [`Interceptor`].
    pub struct InstrumentedBody<B> {
        #[pin]
        inner: B,
        guard: Option<BodyCloseGuard>,
    }
}

impl<B> InstrumentedBody<B> {
    pub(crate) fn new(
        inner: B,
        interceptor: Arc<dyn Interceptor>,
        request: Arc<RequestRecord>,
        response: Arc<ResponseRecord>,
    ) -> Self {
        Self {
            inner,
            guard: Some(BodyCloseGuard {
                interceptor,
                request,
                response,
            }),
        }
    }

    /// Whether the close hook has already fired.
    pub fn is_closed(&self) -> bool {
        self.guard.is_none()
    }
}

impl<B> fmt::Debug for InstrumentedBody<B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InstrumentedBody")
            .field("closed", &self.is_closed())
            .finish_non_exhaustive()
    }
}

impl<B> Body for InstrumentedBody<B>
where
    B: Body,
    B::Error: fmt::Display,
{
    type Data = B::Data;
    type Error = B::Error;

    fn poll_frame(
        self: Pin<&mut Self>,
        cx: &mut Context<'_>,
    ) -> Poll<Option<Result<Frame<Self::Data>, Self::Error>>> {
        let mut this = self.project();

        match ready!(this.inner.as_mut().poll_frame(cx)) {
            Some(Ok(frame)) => {
                if this.inner.is_end_stream() {
                    this.guard.take();
                }
                Poll::Ready(Some(Ok(frame)))
            }
            Some(Err(error)) => {
                if let Some(guard) = this.guard.as_ref() {
                    guard.body_error(&error);
                }
                Poll::Ready(Some(Err(error)))
            }
            None => {
                this.guard.take();
                Poll::Ready(None)
            }
        }
    }

    fn is_end_stream(&self) -> bool {
        self.inner.is_end_stream()
    }

    fn size_hint(&self) -> SizeHint {
        self.inner.size_hint()
    }
}

/// Fires `on_body_close` when dropped.
struct BodyCloseGuard {
    interceptor: Arc<dyn Interceptor>,
    request: Arc<RequestRecord>,
    response: Arc<ResponseRecord>,
}

impl BodyCloseGuard {
    fn body_error(&self, error: &dyn fmt::Display) {
        tracing::debug!(
            method = %self.request.method(),
            uri = %self.request.uri(),
            status = %self.response.status(),
            error = %error,
            "Response body read failed"
        );
        self.interceptor.on_error(&self.request, &self.response, error);
    }
}

impl Drop for BodyCloseGuard {
    fn drop(&mut self) {
        tracing::trace!(
            method = %self.request.method(),
            uri = %self.request.uri(),
            "Response body closed"
        );
        self.interceptor.on_body_close(&self.request, &self.response);
    }
}
