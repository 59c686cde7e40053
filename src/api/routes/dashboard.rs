//! Dashboard Routes
//!
//! - GET /api/v1/dashboard - Entry counter and recent activity

use axum::{extract::State, Json};
use std::sync::Arc;

use crate::api::state::AppState;
use crate::dashboard::DashboardSummary;

/// GET /api/v1/dashboard
pub async fn get_dashboard(State(state): State<Arc<AppState>>) -> Json<DashboardSummary> {
    let logs = state.logs.load().await;
    Json(DashboardSummary::from_logs(&logs))
}
