//! Configuration file support
//!
//! Loads server configuration from TOML files. Every section and key is
//! optional; missing values fall back to [`ServerConfig::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use subtext_lib::FallbackPolicy;

use crate::config::{Args, CorsConfig, ExtractionConfig, ServerConfig};
use crate::error::Result;

/// Configuration file format
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// Server settings
    pub server: Option<ServerSettings>,
    /// CORS settings
    pub cors: Option<CorsSettings>,
    /// Extraction settings
    pub extraction: Option<ExtractionSettings>,
    /// Logging settings
    pub logging: Option<LoggingSettings>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServerSettings {
    /// Host address to bind to
    pub host: Option<String>,
    /// Port to listen on
    pub port: Option<u16>,
    /// Maximum concurrent extractions
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CorsSettings {
    /// Enable CORS
    pub enabled: Option<bool>,
    /// Allowed origins
    pub allowed_origins: Option<Vec<String>>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExtractionSettings {
    /// yt-dlp binary
    pub yt_dlp_path: Option<PathBuf>,
    /// strict or best-effort
    pub fallback: Option<FallbackPolicy>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingSettings {
    /// Log level (trace, debug, info, warn, error)
    pub level: Option<String>,
    /// Output format (json, pretty)
    pub format: Option<String>,
}

impl ConfigFile {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ConfigFile = toml::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to a TOML file
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), content)?;
        Ok(())
    }

    /// Generate default configuration file
    pub fn default_config() -> Self {
        let defaults = ServerConfig::default();
        Self {
            server: Some(ServerSettings {
                host: Some(defaults.host),
                port: Some(defaults.port),
                workers: Some(defaults.workers),
            }),
            cors: Some(CorsSettings {
                enabled: Some(defaults.cors.enabled),
                allowed_origins: Some(defaults.cors.allowed_origins),
            }),
            extraction: Some(ExtractionSettings {
                yt_dlp_path: None,
                fallback: Some(defaults.extraction.fallback),
            }),
            logging: Some(LoggingSettings {
                level: Some(defaults.log_level),
                format: Some(defaults.log_format),
            }),
        }
    }

    /// Convert to ServerConfig
    pub fn into_server_config(self) -> ServerConfig {
        let defaults = ServerConfig::default();
        let server = self.server.unwrap_or_default();
        let cors = self.cors.unwrap_or_default();
        let extraction = self.extraction.unwrap_or_default();
        let logging = self.logging.unwrap_or_default();

        ServerConfig {
            host: server.host.unwrap_or(defaults.host),
            port: server.port.unwrap_or(defaults.port),
            workers: server.workers.unwrap_or(defaults.workers),
            cors: CorsConfig {
                enabled: cors.enabled.unwrap_or(defaults.cors.enabled),
                allowed_origins: cors
                    .allowed_origins
                    .unwrap_or(defaults.cors.allowed_origins),
            },
            extraction: ExtractionConfig {
                yt_dlp_path: extraction.yt_dlp_path,
                fallback: extraction.fallback.unwrap_or(defaults.extraction.fallback),
            },
            log_level: logging.level.unwrap_or(defaults.log_level),
            log_format: logging.format.unwrap_or(defaults.log_format),
        }
    }
}

/// Build the effective configuration: file values (when the file exists),
/// then command-line and environment overrides.
pub fn load(args: &Args) -> Result<ServerConfig> {
    let base = if args.config.exists() {
        ConfigFile::from_file(&args.config)?.into_server_config()
    } else {
        ServerConfig::default()
    };
    Ok(base.with_args(args))
}
