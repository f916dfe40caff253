//! objstore-probe
//!
//! Sends one request for an object through the instrumented transport and
//! reports what the interceptors saw.
//!
//! ```text
//! objstore-probe --config storage.toml photos/cat.png
//!     → load + validate config
//!     → init logging, install Prometheus recorder
//!     → hyper client wrapped by instrument()
//!     → GET/HEAD {endpoint}/{bucket}/{key}, drain body
//!     → print status, request id, bytes and rendered metrics
//! ```

use std::path::PathBuf;

use bytes::Bytes;
use clap::{Parser, ValueEnum};
use http::{Method, Request};
use http_body_util::{BodyExt, Empty};
use hyper_util::{client::legacy::Client, rt::TokioExecutor};
use thiserror::Error;
use tower::ServiceExt;
use url::Url;

use objstore_instrument::config::{load_config, validation::validate_config, ClientConfig, ConfigError};
use objstore_instrument::observability::{logging, metrics};
use objstore_instrument::{instrument, StorageConfig};

#[derive(Parser)]
#[command(name = "objstore-probe")]
#[command(about = "Send one instrumented request to an object-storage bucket", long_about = None)]
struct Cli {
    /// TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Override the configured endpoint.
    #[arg(long)]
    endpoint: Option<String>,

    /// Override the configured bucket.
    #[arg(long)]
    bucket: Option<String>,

    #[arg(short, long, value_enum, default_value_t = ProbeMethod::Get)]
    method: ProbeMethod,

    /// Print the Prometheus exposition after the request.
    #[arg(long)]
    print_metrics: bool,

    /// Object key to request.
    key: String,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum ProbeMethod {
    Get,
    Head,
}

impl From<ProbeMethod> for Method {
    fn from(method: ProbeMethod) -> Self {
        match method {
            ProbeMethod::Get => Method::GET,
            ProbeMethod::Head => Method::HEAD,
        }
    }
}

#[derive(Debug, Error)]
enum ProbeError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid object URL: {0}")]
    Url(#[from] url::ParseError),

    #[error("Failed to build request: {0}")]
    Request(#[from] http::Error),

    #[error("Storage request failed: {0}")]
    Transport(#[from] hyper_util::client::legacy::Error),

    #[error("Failed to read response body: {0}")]
    Body(#[from] hyper::Error),

    #[error("Failed to install metrics recorder: {0}")]
    Metrics(#[from] metrics_exporter_prometheus::BuildError),
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    run(cli).await?;
    Ok(())
}

async fn run(cli: Cli) -> Result<(), ProbeError> {
    let config = resolve_config(&cli)?;
    logging::init_logging(&config.observability);

    let prometheus = if config.observability.metrics_enabled {
        Some(metrics::install_prometheus_recorder()?)
    } else {
        None
    };

    let url = object_url(&config.storage, &cli.key)?;
    tracing::info!(
        name = %config.name,
        storage_type = ?config.storage.storage_type,
        url = %url,
        "Probing object"
    );

    let client = Client::builder(TokioExecutor::new()).build_http::<Empty<Bytes>>();
    let client = instrument(&config.name, &config.storage, client);

    let request = Request::builder()
        .method(Method::from(cli.method))
        .uri(url.as_str())
        .body(Empty::new())?;

    let response = client.oneshot(request).await?;
    let status = response.status();
    let request_id = response
        .headers()
        .get(config.storage.storage_type.request_id_header())
        .and_then(|value| value.to_str().ok())
        .unwrap_or("-")
        .to_string();

    let body = response.into_body().collect().await?.to_bytes();
    tracing::info!(status = %status, request_id = %request_id, bytes = body.len(), "Probe complete");

    println!("status:     {}", status);
    println!("request id: {}", request_id);
    println!("bytes:      {}", body.len());

    if cli.print_metrics {
        if let Some(handle) = prometheus {
            println!();
            print!("{}", handle.render());
        }
    }
    Ok(())
}

/// Load the config file (or defaults), apply CLI overrides, then validate.
fn resolve_config(cli: &Cli) -> Result<ClientConfig, ConfigError> {
    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ClientConfig::default(),
    };
    if let Some(endpoint) = &cli.endpoint {
        config.storage.endpoint = endpoint.clone();
    }
    if let Some(bucket) = &cli.bucket {
        config.storage.bucket = bucket.clone();
    }

    validate_config(&config).map_err(ConfigError::Validation)?;
    Ok(config)
}

/// Path-style object URL: `{endpoint}/{bucket}/{key}`.
fn object_url(storage: &StorageConfig, key: &str) -> Result<Url, url::ParseError> {
    let mut base = Url::parse(&storage.endpoint)?;
    if !base.path().ends_with('/') {
        let path = format!("{}/", base.path());
        base.set_path(&path);
    }
    base.join(&format!("{}/{}", storage.bucket, key.trim_start_matches('/')))
}
