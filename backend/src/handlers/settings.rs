//! Settings handlers

use axum::{extract::State, Json};
use shared::{SettingsInput, SettingsView};

use crate::error::AppResult;
use crate::AppState;

/// Current settings, without the password hash
pub async fn get_settings(State(state): State<AppState>) -> Json<SettingsView> {
    Json(SettingsView::from(state.registry.read().await.settings()))
}

/// Replace the settings
pub async fn update_settings(
    State(state): State<AppState>,
    Json(input): Json<SettingsInput>,
) -> AppResult<Json<SettingsView>> {
    let settings = state.registry.write().await.update_settings(input)?;
    Ok(Json(SettingsView::from(&settings)))
}
