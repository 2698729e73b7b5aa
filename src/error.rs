use thiserror::Error;

/// Startup and runtime errors of the server process
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),

    #[error("Failed to write config file: {0}")]
    ConfigWrite(#[from] toml::ser::Error),

    #[error("Extraction backend unavailable: {0}")]
    Backend(#[from] subtext_lib::SourceError),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, ServerError>;
