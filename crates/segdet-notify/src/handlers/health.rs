//! Health check handlers.

use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use crate::state::AppState;

/// Health response.
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
}

/// Health check endpoint (liveness probe).
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

/// Readiness check response.
#[derive(Serialize)]
pub struct ReadinessResponse {
    pub status: String,
    /// Configured correlation store backend.
    pub store: String,
    pub services: Vec<String>,
}

/// Readiness check endpoint. Reports wiring only, no store round-trip.
pub async fn ready(State(state): State<AppState>) -> Json<ReadinessResponse> {
    let context = &state.context;
    Json(ReadinessResponse {
        status: "ready".to_string(),
        store: context.store().backend().to_string(),
        services: context
            .normalizers()
            .services()
            .map(|s| s.as_str().to_string())
            .collect(),
    })
}
