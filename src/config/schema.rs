//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use http::HeaderName;
use serde::{Deserialize, Serialize};

/// Response header carrying the request id on S3-compatible backends.
pub static S3_REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-amz-request-id");

/// Response header carrying the request id on OSS-compatible backends.
pub static OSS_REQUEST_ID_HEADER: HeaderName = HeaderName::from_static("x-oss-request-id");

/// Root configuration for an instrumented storage client.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ClientConfig {
    /// Logical client name, used as the `name` metric label.
    pub name: String,

    /// Storage backend settings.
    pub storage: StorageConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            name: "default".to_string(),
            storage: StorageConfig::default(),
            observability: ObservabilityConfig::default(),
        }
    }
}

/// Storage provider flavour. Selects header-name conventions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageType {
    #[default]
    S3,
    Oss,
}

impl StorageType {
    /// Header the backend uses to report its own request id.
    pub fn request_id_header(&self) -> &'static HeaderName {
        match self {
            StorageType::S3 => &S3_REQUEST_ID_HEADER,
            StorageType::Oss => &OSS_REQUEST_ID_HEADER,
        }
    }
}

/// Storage backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Backend flavour (`s3` or `oss`).
    pub storage_type: StorageType,

    /// Endpoint base URL (e.g., "http://127.0.0.1:9000").
    pub endpoint: String,

    /// Bucket name.
    pub bucket: String,

    /// Key used for the bucket on latency histograms. Falls back to `bucket`.
    pub bucket_key: Option<String>,
}

impl StorageConfig {
    /// Bucket label used on duration histograms.
    pub fn bucket_key(&self) -> &str {
        self.bucket_key.as_deref().unwrap_or(&self.bucket)
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            storage_type: StorageType::S3,
            endpoint: "http://127.0.0.1:9000".to_string(),
            bucket: String::new(),
            bucket_key: None,
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Install the Prometheus recorder.
    pub metrics_enabled: bool,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bucket_key_falls_back_to_bucket() {
        let mut storage = StorageConfig {
            bucket: "media".into(),
            ..StorageConfig::default()
        };
        assert_eq!(storage.bucket_key(), "media");

        storage.bucket_key = Some("media-eu".into());
        assert_eq!(storage.bucket_key(), "media-eu");
    }

    #[test]
    fn storage_type_selects_header() {
        assert_eq!(StorageType::S3.request_id_header().as_str(), "x-amz-request-id");
        assert_eq!(StorageType::Oss.request_id_header().as_str(), "x-oss-request-id");
    }

    #[test]
    fn deserialize_minimal_toml() {
        let config: ClientConfig = toml::from_str(
            r#"
            name = "avatars"

            [storage]
            storage_type = "oss"
            bucket = "avatars-prod"
            "#,
        )
        .unwrap();

        assert_eq!(config.name, "avatars");
        assert_eq!(config.storage.storage_type, StorageType::Oss);
        assert_eq!(config.storage.bucket_key(), "avatars-prod");
        assert_eq!(config.observability.log_level, "info");
    }
}
