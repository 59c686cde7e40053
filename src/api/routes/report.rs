//! Report Routes
//!
//! - GET /api/v1/report - Current month's register as a PDF

use axum::{extract::State, response::Response};
use chrono::Local;
use std::sync::Arc;

use crate::api::error::ApiResult;
use crate::api::routes::pdf_response;
use crate::api::state::AppState;
use crate::documents::MonthlyReport;

/// GET /api/v1/report
///
/// 404 when nothing was logged this month. Incomplete company details are
/// reported through notice headers; the export still happens.
pub async fn monthly_report(State(state): State<Arc<AppState>>) -> ApiResult<Response> {
    let logs = state.logs.load().await;
    let settings = state.settings.load().await;

    let report = MonthlyReport::build(&logs, &settings, &Local::now())?;
    let notices = report.notices();
    let document = report
        .render()
        .map_err(crate::documents::ReportError::from)?;

    Ok(pdf_response(document, &notices))
}
