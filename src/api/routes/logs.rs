//! Log Routes
//!
//! - GET /api/v1/logs - All daily logs, most recent first

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::dto::LogListResponse;
use crate::api::state::AppState;

/// GET /api/v1/logs
pub async fn list_logs(State(state): State<Arc<AppState>>) -> Json<LogListResponse> {
    let logs = state.logs.load().await;
    Json(LogListResponse {
        total: logs.len(),
        logs,
    })
}
