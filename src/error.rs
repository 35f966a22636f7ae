use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::engine::InvalidRequest;
use crate::ledger::LogError;
use crate::orchestration::CollectError;
use crate::provider::SettingsError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),
    #[error("Internal server error: {0}")]
    Internal(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
}

impl From<InvalidRequest> for AppError {
    fn from(err: InvalidRequest) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<LogError> for AppError {
    fn from(err: LogError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<SettingsError> for AppError {
    fn from(err: SettingsError) -> Self {
        match err {
            SettingsError::Unavailable(_) => AppError::Config(err.to_string()),
            SettingsError::MissingField(_) | SettingsError::Invalid(_) => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<CollectError> for AppError {
    fn from(err: CollectError) -> Self {
        match err {
            CollectError::Configuration(e) => AppError::Config(e.to_string()),
            CollectError::Invalid(e) => e.into(),
            CollectError::Log(e) => e.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Config(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
        };

        if status.is_server_error() {
            tracing::error!(status = status.as_u16(), error = %error_message, "Request failed");
        }

        let body = Json(json!({
            "success": false,
            "error": error_message,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        }));

        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::SettingsValidationError;

    #[test]
    fn test_invalid_request_is_bad_request() {
        let err: AppError = InvalidRequest::MissingField("swapAmount").into();
        let resp = err.into_response();
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_unavailable_settings_is_server_error() {
        let err: AppError = CollectError::Configuration(SettingsError::Unavailable(
            "down".to_string(),
        ))
        .into();
        assert!(matches!(err, AppError::Config(_)));
        assert_eq!(err.into_response().status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_invalid_settings_is_bad_request() {
        let err: AppError = SettingsError::Invalid(SettingsValidationError::InvalidWalletAddress).into();
        match err {
            AppError::BadRequest(msg) => assert_eq!(msg, "Invalid Solana wallet address format"),
            other => panic!("unexpected {:?}", other),
        }
    }
}
