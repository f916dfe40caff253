//! The transport decorator and its tower layer.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{ready, Context, Poll};

use http::{Request, Response};
use pin_project_lite::pin_project;
use tower::{Layer, Service};

use crate::transport::body::InstrumentedBody;
use crate::transport::interceptor::{Interceptor, Outcome};
use crate::transport::record::{RequestRecord, ResponseRecord};

/// Wraps an inner transport and reports each exchange to an [`Interceptor`].
///
/// Requests, responses and errors pass through unchanged apart from the
/// response body, which is wrapped in an [`InstrumentedBody`].
#[derive(Clone)]
pub struct Intercepted<S> {
    inner: S,
    interceptor: Arc<dyn Interceptor>,
}

impl<S> Intercepted<S> {
    pub fn new(inner: S, interceptor: Arc<dyn Interceptor>) -> Self {
        Self { inner, interceptor }
    }

}

impl<S: fmt::Debug> fmt::Debug for Intercepted<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Intercepted")
            .field("inner", &self.inner)
            .finish_non_exhaustive()
    }
}

impl<S, ReqBody, ResBody> Service<Request<ReqBody>> for Intercepted<S>
where
    S: Service<Request<ReqBody>, Response = Response<ResBody>>,
    S::Error: fmt::Display,
{
    type Response = Response<InstrumentedBody<ResBody>>;
    type Error = S::Error;
    type Future = ResponseFuture<S::Future>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, mut request: Request<ReqBody>) -> Self::Future {
        let record = RequestRecord::attach(&mut request);
        self.interceptor.before_send(&record);

        ResponseFuture {
            inner: self.inner.call(request),
            interceptor: Arc::clone(&self.interceptor),
            request: record,
            completed: false,
        }
    }
}

/// Outcome reported when the caller drops the response future early.
pub const REQUEST_CANCELED: &str = "request canceled";

pin_project! {
    /// Response future for [`Intercepted`].
    ///
    /// Dropping it before it resolves reports [`REQUEST_CANCELED`] as the
    /// error outcome, so a caller-side timeout still reaches `after_response`.
    pub struct ResponseFuture<F> {
        #[pin]
        inner: F,
        interceptor: Arc<dyn Interceptor>,
        request: Arc<RequestRecord>,
        completed: bool,
    }

    impl<F> PinnedDrop for ResponseFuture<F> {
        fn drop(this: Pin<&mut Self>) {
            let this = this.project();
            if *this.completed {
                return;
            }
            tracing::debug!(
                method = %this.request.method(),
                uri = %this.request.uri(),
                "Storage request canceled before completion"
            );
            this.interceptor
                .after_response(this.request, Outcome::Error(&REQUEST_CANCELED));
        }
    }
}

impl<F, B, E> Future for ResponseFuture<F>
where
    F: Future<Output = Result<Response<B>, E>>,
    E: fmt::Display,
{
    type Output = Result<Response<InstrumentedBody<B>>, E>;

    fn poll(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        let this = self.project();

        let result = ready!(this.inner.poll(cx));
        *this.completed = true;

        match result {
            Ok(response) => {
                let (mut parts, body) = response.into_parts();
                let record = ResponseRecord::attach(&mut parts);
                this.interceptor.after_response(this.request, Outcome::Response(&record));

                let body = InstrumentedBody::new(
                    body,
                    Arc::clone(this.interceptor),
                    Arc::clone(this.request),
                    record,
                );
                Poll::Ready(Ok(Response::from_parts(parts, body)))
            }
            Err(error) => {
                tracing::debug!(
                    method = %this.request.method(),
                    uri = %this.request.uri(),
                    error = %error,
                    "Storage request failed"
                );
                // No response means no body to wrap.
                this.interceptor.after_response(this.request, Outcome::Error(&error));
                Poll::Ready(Err(error))
            }
        }
    }
}

/// Applies an [`Interceptor`] to a service.
#[derive(Clone)]
pub struct InterceptorLayer {
    interceptor: Arc<dyn Interceptor>,
}

impl InterceptorLayer {
    pub fn new(interceptor: impl Interceptor) -> Self {
        Self {
            interceptor: Arc::new(interceptor),
        }
    }
}

impl fmt::Debug for InterceptorLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InterceptorLayer").finish_non_exhaustive()
    }
}

impl<S> Layer<S> for InterceptorLayer {
    type Service = Intercepted<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Intercepted::new(inner, Arc::clone(&self.interceptor))
    }
}
