//! Label Routes
//!
//! - POST /api/v1/labels - Render a 60×40 mm label PDF

use axum::{response::Response, Json};

use crate::api::error::ApiResult;
use crate::api::routes::pdf_response;
use crate::documents::LabelSpec;

/// POST /api/v1/labels
///
/// Body: `{"kind": "ingredient", "name": ..., "prep_date": "YYYY-MM-DD",
/// "expiry_date": optional}` or `kind: "preparation"` with `ingredients`.
pub async fn create_label(Json(label): Json<LabelSpec>) -> ApiResult<Response> {
    let document = label.render()?;
    Ok(pdf_response(document, &[]))
}
