//! Observability HTTP Routes
//!
//! Health checks and metrics.

use std::sync::Arc;

use axum::{extract::State, http::StatusCode, response::IntoResponse, routing::get, Json, Router};
use serde::{Deserialize, Serialize};

use super::state::CatalogState;

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub store: String,
    pub database: String,
    pub started_at: String,
    pub uptime_seconds: i64,
}

/// Create observability routes
pub fn observability_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/metrics", get(metrics_handler))
        .with_state(state)
}

/// Health check route (also available under /observability)
pub fn health_routes(state: Arc<CatalogState>) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .with_state(state)
}

/// 200 while the store answers pings, 503 otherwise
async fn health_handler(State(state): State<Arc<CatalogState>>) -> impl IntoResponse {
    let (status, store) = match state.ping().await {
        Ok(()) => (StatusCode::OK, "ok".to_string()),
        Err(e) => (StatusCode::SERVICE_UNAVAILABLE, e.to_string()),
    };

    let response = HealthResponse {
        status: if status.is_success() { "ok" } else { "degraded" }.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        store,
        database: state.database.name().to_string(),
        started_at: state.started_at.to_rfc3339(),
        uptime_seconds: state.uptime_seconds(),
    };

    (status, Json(response))
}

/// Metrics handler - returns counters as JSON
async fn metrics_handler(State(state): State<Arc<CatalogState>>) -> impl IntoResponse {
    (StatusCode::OK, Json(state.metrics.snapshot()))
}
