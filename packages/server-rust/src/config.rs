//! Command-line and environment configuration for the server binary.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::apidoc::registry::{DEFAULT_TITLE, DEFAULT_VERSION};
use crate::network::NetworkConfig;

/// Output format of the tracing subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum LogFormat {
    /// Human-readable lines.
    #[default]
    Pretty,
    /// One JSON object per event.
    Json,
}

/// Server settings. Every flag can also be set through its `STRATA_*`
/// environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "strata-server", version, about, long_about = None)]
pub struct ServerArgs {
    /// Bind address.
    #[arg(long, env = "STRATA_HOST", default_value = "0.0.0.0")]
    pub host: String,

    /// Port to listen on; 0 lets the OS choose.
    #[arg(long, env = "STRATA_PORT", default_value_t = 8080)]
    pub port: u16,

    /// Public base URL written into the API document. Derived from the bound
    /// address when unset.
    #[arg(long, env = "STRATA_BASE_URL")]
    pub base_url: Option<String>,

    /// Path serving the OpenAPI document.
    #[arg(long, env = "STRATA_DOCS_PATH", default_value = "/api/docs")]
    pub docs_path: String,

    /// Path serving the topic document.
    #[arg(long, env = "STRATA_TOPICS_PATH", default_value = "/api/topics")]
    pub topics_path: String,

    #[arg(long, env = "STRATA_API_TITLE", default_value = DEFAULT_TITLE)]
    pub api_title: String,

    #[arg(long, env = "STRATA_API_VERSION", default_value = DEFAULT_VERSION)]
    pub api_version: String,

    /// Allowed CORS origins, comma separated.
    #[arg(
        long,
        env = "STRATA_CORS_ORIGINS",
        value_delimiter = ',',
        default_value = "*"
    )]
    pub cors_origins: Vec<String>,

    #[arg(long, env = "STRATA_REQUEST_TIMEOUT_SECS", default_value_t = 30)]
    pub request_timeout_secs: u64,

    #[arg(long, env = "STRATA_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl ServerArgs {
    #[must_use]
    pub fn network_config(&self) -> NetworkConfig {
        NetworkConfig {
            host: self.host.clone(),
            port: self.port,
            cors_origins: self.cors_origins.clone(),
            request_timeout: Duration::from_secs(self.request_timeout_secs),
        }
    }

    /// Base URL advertised in published documents.
    ///
    /// A wildcard bind address is reported as `localhost`.
    #[must_use]
    pub fn base_url(&self, bound_port: u16) -> String {
        if let Some(url) = &self.base_url {
            return url.trim_end_matches('/').to_string();
        }
        let host = match self.host.as_str() {
            "0.0.0.0" | "::" | "[::]" => "localhost",
            other => other,
        };
        format!("http://{host}:{bound_port}")
    }
}
