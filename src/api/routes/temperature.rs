//! Temperature Routes
//!
//! - GET /api/v1/temperature - Fridges to fill in and the session status
//! - POST /api/v1/temperature - Submit readings and a signature
//!
//! One capture session is shared by every client. A submission arriving
//! while another one is saving, or while a success is still displayed,
//! is rejected with 409.

use axum::{extract::State, http::StatusCode, Json};
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::OwnedMutexGuard;

use crate::api::dto::{SubmitTemperatureRequest, SubmitTemperatureResponse, TemperatureFormResponse};
use crate::api::error::{ApiError, ApiResult};
use crate::api::state::AppState;
use crate::capture::{CaptureDeps, CaptureError, CaptureStatus, TemperatureCapture};
use crate::prompt::CollectingPrompter;
use crate::storage::SignatureImage;

/// GET /api/v1/temperature
pub async fn get_form(State(state): State<Arc<AppState>>) -> Json<TemperatureFormResponse> {
    let settings = state.settings.load().await;

    // A locked session is mid-submission
    let (status, can_submit) = match state.capture.try_lock() {
        Ok(capture) => (capture.status().clone(), capture.can_submit()),
        Err(_) => (CaptureStatus::Saving, false),
    };
    let error = match &status {
        CaptureStatus::Error(message) => Some(message.clone()),
        _ => None,
    };

    Json(TemperatureFormResponse {
        webhook_enabled: settings.webhook_enabled(),
        fridges: settings.fridges,
        status: status.as_str().to_string(),
        error,
        can_submit,
    })
}

/// POST /api/v1/temperature
///
/// The submission runs on its own task holding the session lock, so a
/// request that times out or disconnects mid-save still finishes the attempt
/// and never leaves the session stuck in `Saving`.
pub async fn submit(
    State(state): State<Arc<AppState>>,
    Json(req): Json<SubmitTemperatureRequest>,
) -> ApiResult<(StatusCode, Json<SubmitTemperatureResponse>)> {
    let capture = Arc::clone(&state.capture)
        .try_lock_owned()
        .map_err(|_| ApiError::from(CaptureError::Busy))?;
    if !capture.can_submit() {
        return Err(CaptureError::Busy.into());
    }

    let signature = if req.signature.trim().is_empty() {
        SignatureImage::default()
    } else {
        SignatureImage::from_data_url(req.signature)
            .map_err(|e| ApiError::Validation(format!("Invalid signature: {}", e)))?
    };

    tokio::spawn(run_submission(state, capture, req.readings, signature))
        .await
        .map_err(|e| ApiError::Internal(format!("Submission task failed: {}", e)))?
}

async fn run_submission(
    state: Arc<AppState>,
    mut capture: OwnedMutexGuard<TemperatureCapture>,
    readings: HashMap<String, String>,
    signature: SignatureImage,
) -> ApiResult<(StatusCode, Json<SubmitTemperatureResponse>)> {
    capture.readings_mut().clear();
    for (fridge_id, raw) in readings {
        capture.readings_mut().set(fridge_id, raw);
    }
    capture.signature_mut().adopt(signature);

    let prompter = CollectingPrompter::new(true);
    let deps = CaptureDeps {
        settings: &state.settings,
        logs: &state.logs,
        webhook: state.webhook.as_ref(),
        prompter: &prompter,
    };
    let receipt = capture.submit(&deps, Utc::now()).await?;
    let delay = capture.success_display();
    drop(capture);

    // Hold the success state, then reset the form
    TemperatureCapture::settle_later(Arc::clone(&state.capture), delay);

    Ok((
        StatusCode::CREATED,
        Json(SubmitTemperatureResponse::new(
            receipt.log,
            receipt.delivery,
            prompter.notices(),
        )),
    ))
}
