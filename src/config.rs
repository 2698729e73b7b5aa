//! Server configuration

use axum::http::HeaderValue;
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use subtext_lib::FallbackPolicy;

use crate::error::{Result, ServerError};

/// Command-line and environment overrides for the server.
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "subtext-server")]
#[command(author, version, about = "HTTP API for extracting video subtitles as plain text", long_about = None)]
pub struct Args {
    /// TOML configuration file.
    #[arg(short, long, env = "SUBTEXT_CONFIG", default_value = "subtext.toml")]
    pub config: PathBuf,

    /// Write a default configuration file to --config and exit.
    #[arg(long)]
    pub init_config: bool,

    /// Host address to bind to.
    #[arg(long, env = "SUBTEXT_HOST")]
    pub host: Option<String>,

    /// Port to listen on.
    #[arg(short, long, env = "SUBTEXT_PORT")]
    pub port: Option<u16>,

    /// Maximum number of extractions running at once.
    #[arg(short, long, env = "SUBTEXT_WORKERS")]
    pub workers: Option<usize>,

    /// Logging level (trace, debug, info, warn, error).
    #[arg(long, env = "SUBTEXT_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Comma-separated CORS allow-list ("*" allows any origin).
    #[arg(long, env = "SUBTEXT_CORS_ORIGINS", value_delimiter = ',')]
    pub cors_origins: Option<Vec<String>>,
}

/// CORS configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CorsConfig {
    /// Add the CORS layer at all
    pub enabled: bool,

    /// Allowed origins; `"*"` allows any origin
    pub allowed_origins: Vec<String>,
}

impl Default for CorsConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            allowed_origins: vec!["*".to_string()],
        }
    }
}

impl CorsConfig {
    /// Whether any origin is allowed
    pub fn allows_any(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// Extraction configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// yt-dlp binary; searched in PATH when unset
    pub yt_dlp_path: Option<PathBuf>,

    /// Track selection fallback policy
    pub fallback: FallbackPolicy,
}

/// Server configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Host address to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Maximum concurrent extractions
    pub workers: usize,

    /// CORS configuration
    pub cors: CorsConfig,

    /// Extraction configuration
    pub extraction: ExtractionConfig,

    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,

    /// Log output format (pretty, json)
    pub log_format: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8000,
            workers: 4,
            cors: CorsConfig::default(),
            extraction: ExtractionConfig::default(),
            log_level: "info".to_string(),
            log_format: "pretty".to_string(),
        }
    }
}

impl ServerConfig {
    /// Get the socket address string
    pub fn socket_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Apply command-line and environment overrides
    pub fn with_args(mut self, args: &Args) -> Self {
        if let Some(host) = &args.host {
            self.host = host.clone();
        }
        if let Some(port) = args.port {
            self.port = port;
        }
        if let Some(workers) = args.workers {
            self.workers = workers;
        }
        if let Some(level) = &args.log_level {
            self.log_level = level.clone();
        }
        if let Some(origins) = &args.cors_origins {
            self.cors.allowed_origins = origins.iter().map(|o| o.trim().to_string()).collect();
        }
        self
    }

    /// Reject settings the server cannot start with
    pub fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(ServerError::Config("port must be non-zero".to_string()));
        }
        if self.workers == 0 {
            return Err(ServerError::Config("workers must be at least 1".to_string()));
        }
        if !matches!(
            self.log_level.as_str(),
            "trace" | "debug" | "info" | "warn" | "error"
        ) {
            return Err(ServerError::Config(format!(
                "unknown log level '{}'",
                self.log_level
            )));
        }
        if !matches!(self.log_format.as_str(), "pretty" | "json") {
            return Err(ServerError::Config(format!(
                "unknown log format '{}' (expected pretty or json)",
                self.log_format
            )));
        }
        if self.cors.enabled {
            if self.cors.allowed_origins.is_empty() {
                return Err(ServerError::Config(
                    "CORS is enabled but no origins are allowed".to_string(),
                ));
            }
            for origin in &self.cors.allowed_origins {
                if origin.is_empty() || HeaderValue::from_str(origin).is_err() {
                    return Err(ServerError::Config(format!(
                        "invalid CORS origin '{}'",
                        origin
                    )));
                }
            }
        }
        Ok(())
    }
}
