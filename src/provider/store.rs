//! Mutable in-process settings store backing the admin endpoints.

use super::{SettingsError, TaxSettingsProvider};
use crate::domain::{Decimal, TaxSettings, TradingPair, WalletId};
use async_trait::async_trait;
use chrono::Utc;
use serde::Deserialize;
use std::collections::BTreeSet;
use tokio::sync::RwLock;
use tracing::info;

/// Admin update payload.
///
/// The six rates and the tax wallet are required; everything else keeps its
/// current value when omitted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettingsUpdate {
    pub swap_tax_rate: Option<Decimal>,
    pub buy_tax_rate: Option<Decimal>,
    pub sell_tax_rate: Option<Decimal>,
    pub stake_tax_rate: Option<Decimal>,
    pub unstake_tax_rate: Option<Decimal>,
    pub reward_tax_rate: Option<Decimal>,
    pub tax_wallet_address: Option<String>,
    pub minimum_tax_amount: Option<Decimal>,
    pub maximum_tax_amount: Option<Decimal>,
    pub auto_distribution: Option<bool>,
    pub enabled_for_pairs: Option<Vec<String>>,
    pub exempt_wallets: Option<Vec<String>>,
    pub is_enabled: Option<bool>,
}

fn required<T>(value: Option<T>, field: &'static str) -> Result<T, SettingsError> {
    value.ok_or(SettingsError::MissingField(field))
}

impl SettingsUpdate {
    /// Merge this update over `current`, without validating the result.
    fn apply(self, current: &TaxSettings) -> Result<TaxSettings, SettingsError> {
        let mut next = current.clone();
        next.trading_rates.swap = required(self.swap_tax_rate, "swapTaxRate")?;
        next.trading_rates.buy = required(self.buy_tax_rate, "buyTaxRate")?;
        next.trading_rates.sell = required(self.sell_tax_rate, "sellTaxRate")?;
        next.staking_rates.stake = required(self.stake_tax_rate, "stakeTaxRate")?;
        next.staking_rates.unstake = required(self.unstake_tax_rate, "unstakeTaxRate")?;
        next.staking_rates.claim_rewards = required(self.reward_tax_rate, "rewardTaxRate")?;
        next.tax_wallet_address = required(self.tax_wallet_address, "taxWalletAddress")?;

        if let Some(min) = self.minimum_tax_amount {
            next.minimum_tax_amount = min;
        }
        if let Some(max) = self.maximum_tax_amount {
            next.maximum_tax_amount = max;
        }
        if let Some(auto) = self.auto_distribution {
            next.auto_distribution = auto;
        }
        if let Some(pairs) = self.enabled_for_pairs {
            next.enabled_trading_pairs = pairs.into_iter().map(TradingPair::new).collect();
        }
        if let Some(wallets) = self.exempt_wallets {
            next.exempt_wallets = wallets.into_iter().map(WalletId::new).collect::<BTreeSet<_>>();
        }
        if let Some(enabled) = self.is_enabled {
            next.is_enabled = enabled;
        }
        Ok(next)
    }
}

/// Settings held in memory, replaced wholesale on every update.
#[derive(Debug)]
pub struct SettingsStore {
    defaults: TaxSettings,
    current: RwLock<TaxSettings>,
}

impl SettingsStore {
    pub fn new(defaults: TaxSettings) -> Self {
        Self {
            current: RwLock::new(defaults.clone()),
            defaults,
        }
    }

    /// Apply and validate an admin update. On error the stored settings are untouched.
    pub async fn update(
        &self,
        update: SettingsUpdate,
        updated_by: &str,
    ) -> Result<TaxSettings, SettingsError> {
        let mut guard = self.current.write().await;
        let mut next = update.apply(&guard)?;
        next.validate()?;
        next.last_updated = Utc::now();
        next.updated_by = updated_by.to_string();

        info!(
            swap_rate = %next.trading_rates.swap,
            tax_wallet = %next.tax_wallet_address,
            auto_distribution = next.auto_distribution,
            is_enabled = next.is_enabled,
            "Tax settings updated"
        );

        *guard = next.clone();
        Ok(next)
    }

    /// Restore the defaults this store was created with.
    pub async fn reset(&self, updated_by: &str) -> TaxSettings {
        let mut next = self.defaults.clone();
        next.last_updated = Utc::now();
        next.updated_by = updated_by.to_string();

        let mut guard = self.current.write().await;
        *guard = next.clone();
        info!("Tax settings reset to defaults");
        next
    }
}

impl Default for SettingsStore {
    fn default() -> Self {
        Self::new(TaxSettings::default())
    }
}

#[async_trait]
impl TaxSettingsProvider for SettingsStore {
    async fn current(&self) -> Result<TaxSettings, SettingsError> {
        Ok(self.current.read().await.clone())
    }
}
