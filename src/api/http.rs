//! HTTP server setup with Axum

use std::sync::Arc;

use axum::{
    routing::{get, post},
    Json, Router,
};
use serde_json::{json, Value};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use super::rest::{dashboard, events, webhooks};
use super::state::AppState;

/// Create the Axum router with all endpoints
pub fn create_router(state: Arc<AppState>) -> Router {
    // CORS configuration - allow all origins for development
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        // Health check
        .route("/health", get(health_check))
        // Dashboard
        .route("/", get(dashboard::dashboard))
        .route("/resolve/:id", post(dashboard::resolve_and_return))
        // Ingestion
        .route("/webhooks/n8n", post(webhooks::n8n_webhook))
        // REST API endpoints
        .route("/api/events", get(events::list_events))
        .route("/api/events/:id", get(events::get_event))
        .route("/api/events/:id/resolve", post(events::resolve_event))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Health check endpoint
async fn health_check() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}
