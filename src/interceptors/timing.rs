//! Start-time stamping.

use std::sync::Arc;
use std::time::Instant;

use crate::config::StorageConfig;
use crate::transport::{Intercepted, Interceptor, InterceptorLayer, RequestRecord};

/// Stamps the request record with the moment it is handed to the transport.
#[derive(Debug, Clone)]
pub struct Timing {
    name: String,
}

impl Timing {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Interceptor for Timing {
    fn before_send(&self, request: &RequestRecord) {
        if !request.mark_started(Instant::now()) {
            tracing::trace!(name = %self.name, "Start time already stamped");
        }
    }
}

/// Wrap `inner` so every request carries its start time.
pub fn timing_interceptor<S>(name: &str, _config: &StorageConfig, inner: S) -> Intercepted<S> {
    Intercepted::new(inner, Arc::new(Timing::new(name)))
}

/// Layer form of [`timing_interceptor`].
pub fn timing_layer(name: &str, _config: &StorageConfig) -> InterceptorLayer {
    InterceptorLayer::new(Timing::new(name))
}
