//! Settings Routes
//!
//! - GET /api/v1/settings - Current settings
//! - PUT /api/v1/settings - Replace the settings wholesale
//! - POST /api/v1/settings/fridges - Add a fridge
//! - DELETE /api/v1/settings/fridges/:id - Remove a fridge
//!
//! Removal is confirmed by the client before the request is sent.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::Utc;
use std::sync::Arc;

use crate::api::dto::{AddFridgeRequest, SettingsResponse};
use crate::api::error::ApiResult;
use crate::api::state::AppState;
use crate::prompt::CollectingPrompter;
use crate::settings_editor::SettingsEditor;
use crate::storage::Settings;

/// GET /api/v1/settings
pub async fn get_settings(State(state): State<Arc<AppState>>) -> Json<Settings> {
    Json(state.settings.load().await)
}

/// PUT /api/v1/settings
pub async fn save_settings(
    State(state): State<Arc<AppState>>,
    Json(settings): Json<Settings>,
) -> ApiResult<Json<SettingsResponse>> {
    let editor = SettingsEditor::new(settings);
    let prompter = CollectingPrompter::new(true);
    editor.save(&state.settings, &prompter).await?;

    Ok(Json(SettingsResponse {
        settings: state.settings.load().await,
        notices: prompter.notices(),
    }))
}

/// POST /api/v1/settings/fridges
pub async fn add_fridge(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AddFridgeRequest>,
) -> ApiResult<(StatusCode, Json<SettingsResponse>)> {
    let mut editor = SettingsEditor::from_store(&state.settings).await;
    editor.add_fridge(&req.name, Utc::now())?;

    let prompter = CollectingPrompter::new(true);
    editor.save(&state.settings, &prompter).await?;

    Ok((
        StatusCode::CREATED,
        Json(SettingsResponse {
            settings: state.settings.load().await,
            notices: prompter.notices(),
        }),
    ))
}

/// DELETE /api/v1/settings/fridges/:id
pub async fn remove_fridge(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> ApiResult<Json<SettingsResponse>> {
    let mut editor = SettingsEditor::from_store(&state.settings).await;

    let prompter = CollectingPrompter::new(true);
    editor.remove_fridge(&id, &prompter)?;
    editor.save(&state.settings, &prompter).await?;

    Ok(Json(SettingsResponse {
        settings: state.settings.load().await,
        notices: prompter.notices(),
    }))
}
