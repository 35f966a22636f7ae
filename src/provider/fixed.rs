//! Provider returning one fixed snapshot.

use super::{SettingsError, TaxSettingsProvider};
use crate::domain::TaxSettings;
use async_trait::async_trait;

/// Always returns the snapshot it was built with.
#[derive(Debug, Clone, Default)]
pub struct StaticSettingsProvider {
    settings: TaxSettings,
}

impl StaticSettingsProvider {
    pub fn new(settings: TaxSettings) -> Self {
        Self { settings }
    }
}

#[async_trait]
impl TaxSettingsProvider for StaticSettingsProvider {
    async fn current(&self) -> Result<TaxSettings, SettingsError> {
        Ok(self.settings.clone())
    }
}
