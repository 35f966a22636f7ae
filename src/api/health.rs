use axum::extract::State;
use axum::Json;
use chrono::Utc;

use super::AppState;
use crate::error::AppError;
use crate::ledger::LogFilter;
use crate::provider::TaxSettingsProvider;

pub async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({"status": "ok"}))
}

/// Ready once settings load and the transaction log answers a query.
pub async fn ready(State(state): State<AppState>) -> Result<Json<serde_json::Value>, AppError> {
    state.settings.current().await?;
    let probe = LogFilter {
        since: Some(Utc::now()),
        ..LogFilter::default()
    };
    state.log.query(&probe).await?;
    Ok(Json(serde_json::json!({"status": "ready"})))
}
