//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate required values (client name, bucket)
//! - Validate endpoint URL and log level
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: ClientConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::ClientConfig;

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

/// A single semantic problem with a configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("client name must not be empty")]
    EmptyName,

    #[error("storage.bucket must not be empty")]
    EmptyBucket,

    #[error("storage.bucket_key must not be empty when set")]
    EmptyBucketKey,

    #[error("storage.endpoint '{0}' is not an absolute http(s) URL")]
    InvalidEndpoint(String),

    #[error("observability.log_level '{0}' is not one of trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Check a parsed configuration, collecting every error found.
pub fn validate_config(config: &ClientConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.name.trim().is_empty() {
        errors.push(ValidationError::EmptyName);
    }
    if config.storage.bucket.trim().is_empty() {
        errors.push(ValidationError::EmptyBucket);
    }
    if matches!(config.storage.bucket_key.as_deref(), Some(key) if key.trim().is_empty()) {
        errors.push(ValidationError::EmptyBucketKey);
    }

    match Url::parse(&config.storage.endpoint) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => {}
        _ => errors.push(ValidationError::InvalidEndpoint(config.storage.endpoint.clone())),
    }

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::InvalidLogLevel(config.observability.log_level.clone()));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
