//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! interceptors produce:
//!     → tracing events (structured logs)
//!     → metrics.rs names (counters, histograms via the metrics facade)
//!     → OpenTelemetry span attributes (request-id)
//!
//! Consumers:
//!     → logging.rs subscriber (stdout)
//!     → Prometheus recorder (rendered on demand)
//!     → whatever tracer provider the application installed
//! ```

pub mod logging;
pub mod metrics;
