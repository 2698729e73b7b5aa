//! Subtitle extraction server
//!
//! Serves `POST /extract-subtitles`, which resolves a video URL with yt-dlp
//! and returns its subtitles as plain text.

mod config;
mod config_file;
mod error;
mod http;
mod state;
#[cfg(test)]
mod test_support;

use clap::Parser;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use subtext_lib::{Extractor, YtDlpSource};

use crate::config::{Args, ServerConfig};
use crate::config_file::ConfigFile;
use crate::error::Result;
use crate::http::create_router;
use crate::state::AppState;

/// Application version
const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Application name
const APP_NAME: &str = "subtext-server";

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if args.init_config {
        ConfigFile::default_config().to_file(&args.config)?;
        println!("Wrote default configuration to {}", args.config.display());
        return Ok(());
    }

    // Load configuration
    let config = config_file::load(&args)?;
    config.validate()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!("{} v{} starting", APP_NAME, VERSION);
    tracing::info!("Configuration loaded: {:?}", config);

    let source = YtDlpSource::from_config(config.extraction.yt_dlp_path.as_deref())?;
    tracing::info!("Using yt-dlp at {}", source.ytdlp_path().display());

    // Create application state
    let extractor = Extractor::new(Arc::new(source));
    let state = Arc::new(AppState::new(config.clone(), extractor));
    tracing::info!(
        "Extraction pool: {} workers, {:?} fallback",
        state.pool.workers(),
        config.extraction.fallback
    );

    // Build router
    let app = create_router(state);

    // Start server
    let addr = config.socket_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Starting HTTP server on {}", listener.local_addr()?);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Initialize logging with tracing. `RUST_LOG` takes precedence over the
/// configured level.
fn init_logging(config: &ServerConfig) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.log_level.as_str()));
    let registry = tracing_subscriber::registry().with(filter);

    if config.log_format == "json" {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
