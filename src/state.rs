//! Application state management
//!
//! This module defines the AppState structure that holds:
//! - Server configuration
//! - The extraction pool shared by all requests

use std::sync::Arc;
use tokio::sync::Semaphore;

use subtext_lib::{ExtractionRequest, ExtractionResult, Extractor, SubtitleError};

use crate::config::ServerConfig;

/// Runs blocking extractions off the async runtime, at most `workers` at a time.
#[derive(Debug, Clone)]
pub struct ExtractionPool {
    extractor: Arc<Extractor>,
    permits: Arc<Semaphore>,
    workers: usize,
}

impl ExtractionPool {
    pub fn new(extractor: Extractor, workers: usize) -> Self {
        Self {
            extractor: Arc::new(extractor),
            permits: Arc::new(Semaphore::new(workers)),
            workers,
        }
    }

    /// Configured concurrency limit
    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Workers not currently running an extraction
    pub fn available(&self) -> usize {
        self.permits.available_permits()
    }

    /// Run one extraction on the blocking pool.
    ///
    /// The permit moves into the blocking task, so it stays held until the
    /// extraction finishes even if the caller stops waiting.
    pub async fn extract(
        &self,
        request: ExtractionRequest,
    ) -> Result<ExtractionResult, SubtitleError> {
        let permit = self
            .permits
            .clone()
            .acquire_owned()
            .await
            .map_err(|e| SubtitleError::Internal(format!("Extraction pool closed: {}", e)))?;

        let extractor = self.extractor.clone();
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            extractor.extract(&request)
        })
        .await
        .map_err(|e| {
            tracing::error!("Extraction worker failed: {}", e);
            SubtitleError::Internal(format!("Extraction worker failed: {}", e))
        })?
    }
}

/// Application state
#[derive(Debug)]
pub struct AppState {
    /// Server configuration
    pub config: ServerConfig,
    /// Extraction workers
    pub pool: ExtractionPool,
}

impl AppState {
    pub fn new(config: ServerConfig, extractor: Extractor) -> Self {
        let extractor = extractor.with_policy(config.extraction.fallback);
        let pool = ExtractionPool::new(extractor, config.workers);
        Self { config, pool }
    }
}
