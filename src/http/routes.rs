//! Axum router configuration

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::CorsConfig;
use crate::state::AppState;

use super::handlers::{extract_subtitles, health_check, service_info, version_check};

/// Build the CORS layer from the configured allow-list, or `None` when CORS is off
pub fn cors_layer(config: &CorsConfig) -> Option<CorsLayer> {
    if !config.enabled {
        return None;
    }

    let origin = if config.allows_any() {
        AllowOrigin::any()
    } else {
        // origins are checked by ServerConfig::validate
        AllowOrigin::list(
            config
                .allowed_origins
                .iter()
                .filter_map(|origin| HeaderValue::from_str(origin).ok()),
        )
    };

    Some(
        CorsLayer::new()
            .allow_origin(origin)
            .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
            .allow_headers([header::CONTENT_TYPE]),
    )
}

/// Create the Axum router with all routes
pub fn create_router(state: Arc<AppState>) -> Router {
    let mut router = Router::new()
        .route("/", get(service_info))
        .route("/health", get(health_check))
        .route("/version", get(version_check))
        .route("/extract-subtitles", post(extract_subtitles))
        .layer(TraceLayer::new_for_http());

    if let Some(cors) = cors_layer(&state.config.cors) {
        router = router.layer(cors);
    }

    router.with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ServerConfig;
    use crate::test_support::test_state;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::util::ServiceExt;

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method(Method::OPTIONS)
            .uri("/extract-subtitles")
            .header(header::ORIGIN, origin)
            .header(header::ACCESS_CONTROL_REQUEST_METHOD, "POST")
            .header(header::ACCESS_CONTROL_REQUEST_HEADERS, "content-type")
            .body(Body::empty())
            .unwrap()
    }

    fn config_with_origins(origins: &[&str]) -> ServerConfig {
        let mut config = ServerConfig::default();
        config.cors.allowed_origins = origins.iter().map(|o| o.to_string()).collect();
        config
    }

    #[tokio::test]
    async fn test_cors_any_origin() {
        let app = create_router(test_state(ServerConfig::default()));
        let response = app.oneshot(preflight("http://localhost:3000")).await.unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "*"
        );
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_METHODS)
            .unwrap()
            .to_str()
            .unwrap()
            .contains("POST"));
    }

    #[tokio::test]
    async fn test_cors_allow_list() {
        let config = config_with_origins(&["https://app.example.com"]);

        let app = create_router(test_state(config.clone()));
        let response = app
            .oneshot(preflight("https://app.example.com"))
            .await
            .unwrap();
        assert_eq!(
            response
                .headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .unwrap(),
            "https://app.example.com"
        );

        let app = create_router(test_state(config));
        let response = app
            .oneshot(preflight("https://evil.example.com"))
            .await
            .unwrap();
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_cors_disabled() {
        let mut config = ServerConfig::default();
        config.cors.enabled = false;
        assert!(cors_layer(&config.cors).is_none());

        let app = create_router(test_state(config));
        let request = Request::builder()
            .uri("/health")
            .header(header::ORIGIN, "http://localhost:3000")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .is_none());
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let app = create_router(test_state(ServerConfig::default()));
        let request = Request::builder()
            .uri("/subtitles")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_extract_requires_post() {
        let app = create_router(test_state(ServerConfig::default()));
        let request = Request::builder()
            .uri("/extract-subtitles")
            .body(Body::empty())
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
