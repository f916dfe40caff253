//! Instrumented transport subsystem.
//!
//! # Data Flow
//! ```text
//! caller request
//!     → service.rs (attach RequestRecord, before_send)
//!     → inner transport (hyper client or another decorator)
//!     → service.rs (after_response with response or error)
//!     → body.rs (wrap body; on_error per failed frame, on_body_close once)
//!     → caller reads or drops the body
//! ```
//!
//! # Design Decisions
//! - A transport is any `tower::Service<http::Request<B>>` returning
//!   `http::Response<_>`; decorators compose by nesting
//! - Errors from the inner transport are returned unchanged
//! - Bodies are only wrapped when a response exists

pub mod body;
pub mod interceptor;
pub mod record;
pub mod service;

pub use body::InstrumentedBody;
pub use interceptor::{Interceptor, Outcome};
pub use record::{RequestRecord, ResponseRecord};
pub use service::{Intercepted, InterceptorLayer, ResponseFuture, REQUEST_CANCELED};
