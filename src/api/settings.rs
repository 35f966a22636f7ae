//! Admin endpoints for reading, updating and resetting tax settings.

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde::Serialize;

use super::{json_body, AppState};
use crate::domain::TaxSettings;
use crate::error::AppError;
use crate::provider::{SettingsUpdate, TaxSettingsProvider};

const ADMIN_EDITOR: &str = "admin";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsResponse {
    pub success: bool,
    pub data: TaxSettings,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub timestamp: String,
}

impl SettingsResponse {
    fn new(data: TaxSettings, message: Option<&str>) -> Json<Self> {
        Json(Self {
            success: true,
            data,
            message: message.map(str::to_string),
            timestamp: Utc::now().to_rfc3339(),
        })
    }
}

pub async fn get_settings(State(state): State<AppState>) -> Result<Json<SettingsResponse>, AppError> {
    let settings = state.settings.current().await?;
    Ok(SettingsResponse::new(settings, None))
}

pub async fn update_settings(
    State(state): State<AppState>,
    payload: Result<Json<SettingsUpdate>, JsonRejection>,
) -> Result<Json<SettingsResponse>, AppError> {
    let update = json_body(payload)?;
    let settings = state.settings.update(update, ADMIN_EDITOR).await?;
    Ok(SettingsResponse::new(
        settings,
        Some("Tax settings updated successfully"),
    ))
}

pub async fn reset_settings(State(state): State<AppState>) -> Json<SettingsResponse> {
    let settings = state.settings.reset(ADMIN_EDITOR).await;
    SettingsResponse::new(settings, Some("Tax settings reset to defaults"))
}
