//! Tax settings sources.

use crate::domain::{SettingsValidationError, TaxSettings};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod fixed;
pub mod store;

pub use fixed::StaticSettingsProvider;
pub use store::{SettingsStore, SettingsUpdate};

/// Supplies the settings snapshot used for one computation.
///
/// Each call is authoritative for the request that made it; implementations
/// are free to re-read their backing store every time.
#[async_trait]
pub trait TaxSettingsProvider: Send + Sync + fmt::Debug {
    async fn current(&self) -> Result<TaxSettings, SettingsError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsError {
    #[error("Failed to load tax settings: {0}")]
    Unavailable(String),
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    #[error(transparent)]
    Invalid(#[from] SettingsValidationError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_settings_error_display() {
        let err = SettingsError::Unavailable("store offline".to_string());
        assert_eq!(err.to_string(), "Failed to load tax settings: store offline");

        let err = SettingsError::MissingField("swapTaxRate");
        assert_eq!(err.to_string(), "Missing required field: swapTaxRate");

        let err = SettingsError::from(SettingsValidationError::InvalidWalletAddress);
        assert_eq!(err.to_string(), "Invalid Solana wallet address format");
    }
}
