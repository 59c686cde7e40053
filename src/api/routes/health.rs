//! Health Routes
//!
//! Health check endpoints for monitoring.
//!
//! - GET /health/live - Liveness probe (process is alive)
//! - GET /health/ready - Readiness probe (store readable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::storage::SETTINGS_KEY;

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
///
/// Returns 200 if the local store can be read.
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    match check_storage_health(&state) {
        true => StatusCode::OK,
        false => StatusCode::SERVICE_UNAVAILABLE,
    }
}

/// GET /health
///
/// Full health status with component details.
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let storage_ok = check_storage_health(&state);

    Json(HealthResponse {
        status: if storage_ok { "healthy" } else { "unhealthy" }.to_string(),
        storage: if storage_ok { "ok" } else { "error" }.to_string(),
        entries: state.logs.len().await,
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn check_storage_health(state: &AppState) -> bool {
    match state.kv.get(SETTINGS_KEY) {
        Ok(_) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Storage health check failed");
            false
        }
    }
}
