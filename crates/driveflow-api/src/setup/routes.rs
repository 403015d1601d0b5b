//! Route configuration and setup

use crate::handlers;
use crate::state::AppState;
use anyhow::{Context, Result};
use axum::{
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use driveflow_infra::request_id_middleware;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;

/// Setup all application routes
pub fn setup_routes(state: Arc<AppState>) -> Result<Router<()>> {
    let cors = setup_cors(&state)?;
    let body_limit = state.config.max_upload_size_bytes;

    let app = Router::new()
        .route("/health", get(health))
        .route(
            "/api/webhook/config",
            post(handlers::save_webhook_config).get(handlers::get_webhook_config),
        )
        .route("/api/webhook/trigger", post(handlers::trigger_webhook))
        .route(
            "/api/uploads/history",
            get(handlers::list_upload_history).delete(handlers::clear_upload_history),
        )
        .with_state(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(cors);

    Ok(app)
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

fn setup_cors(state: &AppState) -> Result<CorsLayer> {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::DELETE])
        .allow_headers(Any);

    if state.config.cors_origins.is_empty() {
        return Ok(cors.allow_origin(Any));
    }

    let origins = state
        .config
        .cors_origins
        .iter()
        .map(|origin| {
            origin
                .parse::<HeaderValue>()
                .with_context(|| format!("Invalid CORS origin: {}", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(cors.allow_origin(origins))
}
