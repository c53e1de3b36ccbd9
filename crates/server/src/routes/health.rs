//! Liveness and readiness probes.

use axum::{Json, extract::State, http::StatusCode};
use serde_json::{Value, json};

use pantry_core::PantryStore;

use crate::state::AppState;

/// GET /health
///
/// Does not check dependencies.
pub async fn health() -> &'static str {
    "ok"
}

/// GET /health/ready
///
/// 503 when the store cannot be reached.
pub async fn readiness(State(state): State<AppState>) -> (StatusCode, Json<Value>) {
    match state.store().ping().await {
        Ok(()) => (StatusCode::OK, Json(json!({"status": "ready"}))),
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                Json(json!({"status": "unavailable"})),
            )
        }
    }
}
