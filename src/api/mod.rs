pub mod health;
pub mod settings;
pub mod staking;
pub mod stats;
pub mod swap;

use crate::ledger::TransactionLog;
use crate::orchestration::TaxCollector;
use crate::provider::SettingsStore;
use axum::extract::rejection::JsonRejection;
use axum::{routing::get, Json, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub collector: TaxCollector,
    pub settings: Arc<SettingsStore>,
    pub log: Arc<dyn TransactionLog>,
}

impl AppState {
    /// `collector` must read its settings from `settings` for admin updates
    /// to take effect on subsequent requests.
    pub fn new(collector: TaxCollector, settings: Arc<SettingsStore>) -> Self {
        let log = collector.log().clone();
        Self {
            collector,
            settings,
            log,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route(
            "/tax/swap",
            get(swap::get_swap_stats).post(swap::post_swap_tax),
        )
        .route(
            "/tax/staking",
            get(staking::get_staking_stats).post(staking::post_staking_tax),
        )
        .route(
            "/tax/settings",
            get(settings::get_settings)
                .post(settings::update_settings)
                .put(settings::reset_settings),
        )
        .layer(cors)
        .with_state(state)
}

/// Unwrap a JSON body, turning extractor rejections into our 400 shape.
pub(crate) fn json_body<T>(payload: Result<Json<T>, JsonRejection>) -> Result<T, AppError> {
    payload
        .map(|Json(body)| body)
        .map_err(|rejection| AppError::BadRequest(rejection.body_text()))
}

/// Treat absent and blank strings alike, as the dashboard sends `""` for unset inputs.
pub(crate) fn require_str(value: Option<String>, field: &str) -> Result<String, AppError> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::BadRequest(format!("Missing required field: {}", field)))
}
