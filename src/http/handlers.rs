//! HTTP request handlers

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;

use subtext_lib::{ErrorKind, ExtractionRequest, SubtitleError};

use crate::state::AppState;

/// Extraction failure rendered as a JSON error envelope
#[derive(Debug)]
pub struct ApiError(pub SubtitleError);

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self.0.kind() {
            ErrorKind::InvalidInput => StatusCode::BAD_REQUEST,
            ErrorKind::VideoUnavailable | ErrorKind::NoSubtitlesAvailable => {
                StatusCode::NOT_FOUND
            }
            ErrorKind::ExtractionFailed | ErrorKind::Internal => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl From<SubtitleError> for ApiError {
    fn from(err: SubtitleError) -> Self {
        ApiError(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError(SubtitleError::InvalidInput(rejection.body_text()))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(kind = %self.0.kind(), "Extraction failed: {}", self.0);
        } else {
            tracing::warn!(kind = %self.0.kind(), "Request rejected: {}", self.0);
        }

        let body = ErrorResponse {
            success: false,
            error: self.0.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// `POST /extract-subtitles` body
#[derive(Debug, Deserialize)]
pub struct ExtractBody {
    pub url: String,
    #[serde(default)]
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ExtractResponse {
    pub success: bool,
    pub subtitles: String,
    pub language: String,
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub success: bool,
    pub error: String,
}

/// Health check endpoint
pub async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

/// Version endpoint
pub async fn version_check() -> &'static str {
    concat!("subtext-server v", env!("CARGO_PKG_VERSION"))
}

/// Service description
pub async fn service_info() -> Json<Value> {
    Json(json!({
        "service": "subtext-server",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Subtitle extraction endpoint
/// POST /extract-subtitles
pub async fn extract_subtitles(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ExtractBody>, JsonRejection>,
) -> Result<Json<ExtractResponse>, ApiError> {
    let Json(body) = payload?;
    let request = ExtractionRequest::new(&body.url, body.language.as_deref())?;

    tracing::info!(
        url = %request.url(),
        language = %request.language(),
        idle_workers = state.pool.available(),
        "Extracting subtitles"
    );

    let result = state.pool.extract(request).await?;

    tracing::info!(
        language = %result.language,
        kind = result.kind.as_str(),
        chars = result.text.len(),
        "Extraction succeeded"
    );

    Ok(Json(ExtractResponse {
        success: true,
        subtitles: result.text,
        language: result.language,
    }))
}
