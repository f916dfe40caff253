//! Instrumented HTTP transport for object-storage clients.
//!
//! Decorates any `tower::Service<http::Request<B>>` with timing, trace
//! correlation and metrics, without touching call sites.
//!
//! ```no_run
//! use hyper_util::client::legacy::Client;
//! use hyper_util::rt::TokioExecutor;
//! use objstore_instrument::{instrument, StorageConfig};
//!
//! let config = StorageConfig { bucket: "media".into(), ..StorageConfig::default() };
//! let client = Client::builder(TokioExecutor::new())
//!     .build_http::<http_body_util::Empty<bytes::Bytes>>();
//! let client = instrument("media", &config, client);
//! ```

pub mod config;
pub mod interceptors;
pub mod observability;
pub mod transport;

pub use config::{ClientConfig, StorageConfig, StorageType};
pub use interceptors::{instrument, metrics_interceptor, timing_interceptor, trace_request_id_interceptor, Instrumented};
pub use transport::{InstrumentedBody, Intercepted, Interceptor, InterceptorLayer, Outcome, RequestRecord, ResponseRecord};
