//! Configuration loading from disk.

use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::config::schema::ClientConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Parse error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation failed: {}", join_errors(.0))]
    Validation(Vec<ValidationError>),
}

fn join_errors(errors: &[ValidationError]) -> String {
    errors
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Parse and validate configuration from TOML text.
pub fn parse_config(content: &str) -> Result<ClientConfig, ConfigError> {
    let config: ClientConfig = toml::from_str(content)?;
    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Load and validate configuration from a TOML file.
pub fn load_config(path: &Path) -> Result<ClientConfig, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config = parse_config(&content)?;

    tracing::debug!(
        path = %path.display(),
        name = %config.name,
        bucket = %config.storage.bucket,
        "Configuration loaded"
    );
    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::StorageType;

    #[test]
    fn parses_and_validates() {
        let config = parse_config(
            r#"
            name = "reports"

            [storage]
            storage_type = "s3"
            endpoint = "https://s3.eu-west-1.amazonaws.com"
            bucket = "reports"
            bucket_key = "reports-eu"
            "#,
        )
        .unwrap();

        assert_eq!(config.storage.storage_type, StorageType::S3);
        assert_eq!(config.storage.bucket_key(), "reports-eu");
    }

    #[test]
    fn validation_errors_are_joined() {
        let err = parse_config("name = \"reports\"").unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert_eq!(err.to_string(), "Validation failed: storage.bucket must not be empty");
    }

    #[test]
    fn parse_errors_surface() {
        let err = parse_config("[storage\nbucket = 1").unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = load_config(Path::new("does/not/exist.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Io(_)));
    }
}
