//! The interceptors shipped with the crate.
//!
//! # Chain
//! ```text
//! instrument(name, config, client)
//!     = metrics( trace_request_id( timing( client ) ) )
//!
//! before_send:    metrics → trace → timing (stamps start)
//! after_response: timing → trace (tags span) → metrics (counts)
//! body close:     timing → trace → metrics (records latency)
//! canceled:       metrics (counts) → trace → timing
//! ```
//!
//! All three share one `RequestRecord`, so the start time is visible to the
//! metrics wrapper whatever the nesting order.

pub mod metrics;
pub mod timing;
pub mod trace;

pub use self::metrics::{metrics_interceptor, metrics_layer, Metrics};
pub use self::timing::{timing_interceptor, timing_layer, Timing};
pub use self::trace::{trace_request_id_interceptor, trace_request_id_layer, TraceRequestId};

use crate::config::StorageConfig;
use crate::transport::Intercepted;

/// A transport wrapped by all three interceptors.
pub type Instrumented<S> = Intercepted<Intercepted<Intercepted<S>>>;

/// Wrap `inner` with timing, request-id tagging and metrics.
pub fn instrument<S>(name: &str, config: &StorageConfig, inner: S) -> Instrumented<S> {
    let inner = timing_interceptor(name, config, inner);
    let inner = trace_request_id_interceptor(name, config, inner);
    metrics_interceptor(name, config, inner)
}
