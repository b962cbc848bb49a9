//! API module
//!
//! Route table and the HTTP layers wrapped around it.

pub mod health;
pub mod middleware;
pub mod upload;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::warn;

use crate::config::CorsOrigins;
use crate::state::SharedState;

/// Build the application router
///
/// # Arguments
/// * `state` - Shared state holding the loaded configuration
///
/// # Returns
/// Router with the upload and health routes, body limit, request tracing
/// and CORS applied
pub fn router(state: SharedState) -> Router {
    let body_limit = state.config.upload.max_bytes;
    let cors = cors_layer(&state.config.server.cors_origins);

    Router::new()
        .route("/upload", post(upload::upload_file))
        .route("/api/health", get(health::health_check))
        .layer(DefaultBodyLimit::max(body_limit))
        // Middleware (order matters - request_id should be first)
        .layer(axum::middleware::from_fn(middleware::request_id_middleware))
        .layer(
            TraceLayer::new_for_http().make_span_with(|request: &axum::http::Request<_>| {
                tracing::info_span!(
                    "http_request",
                    method = %request.method(),
                    uri = %request.uri(),
                )
            }),
        )
        .layer(cors)
        .with_state(state)
}

/// CORS policy for the configured origins
pub fn cors_layer(origins: &CorsOrigins) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST])
        .allow_headers(Any);

    match origins {
        CorsOrigins::Any => layer.allow_origin(Any),
        CorsOrigins::List(list) => {
            let values: Vec<HeaderValue> = list
                .iter()
                .filter_map(|origin| match HeaderValue::from_str(origin) {
                    Ok(value) => Some(value),
                    Err(_) => {
                        warn!(origin = %origin, "Skipping invalid CORS origin");
                        None
                    }
                })
                .collect();
            layer.allow_origin(AllowOrigin::list(values))
        }
    }
}
