//! Tax settings snapshot and its validation rules.
//!
//! The wire form keeps the flat field names used by the admin dashboard
//! (`swapTaxRate`, `enabledForPairs`, ...) while the Rust side groups the two
//! rate namespaces into separate structs.

use crate::domain::{Decimal, OperationKind, TaxCategory, TradingPair, WalletId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

pub const DEFAULT_TAX_WALLET: &str = "fa1ra81T7g5DzSn7XT6z36zNqupHpG1Eh7omB2F6GTh";
pub const DEFAULT_TAXED_PAIRS: [&str; 3] = ["SOL/AURA", "USDC/AURA", "RAY/AURA"];

/// Percent rates for the trading family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TradingRates {
    #[serde(rename = "swapTaxRate")]
    pub swap: Decimal,
    #[serde(rename = "buyTaxRate")]
    pub buy: Decimal,
    #[serde(rename = "sellTaxRate")]
    pub sell: Decimal,
}

/// Percent rates for the staking family.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StakingRates {
    #[serde(rename = "stakeTaxRate")]
    pub stake: Decimal,
    #[serde(rename = "unstakeTaxRate")]
    pub unstake: Decimal,
    #[serde(rename = "rewardTaxRate")]
    pub claim_rewards: Decimal,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxSettings {
    #[serde(flatten)]
    pub trading_rates: TradingRates,
    #[serde(flatten)]
    pub staking_rates: StakingRates,
    pub minimum_tax_amount: Decimal,
    pub maximum_tax_amount: Decimal,
    pub tax_wallet_address: String,
    pub auto_distribution: bool,
    #[serde(rename = "enabledForPairs")]
    pub enabled_trading_pairs: BTreeSet<TradingPair>,
    pub exempt_wallets: BTreeSet<WalletId>,
    pub is_enabled: bool,
    pub last_updated: DateTime<Utc>,
    pub updated_by: String,
}

impl TaxSettings {
    /// Rate for `operation` looked up in the namespace of `category`.
    ///
    /// Returns `None` when the operation does not belong to the category.
    pub fn rate_for(&self, category: TaxCategory, operation: OperationKind) -> Option<Decimal> {
        match (category, operation) {
            (TaxCategory::Trading, OperationKind::Swap) => Some(self.trading_rates.swap),
            (TaxCategory::Trading, OperationKind::Buy) => Some(self.trading_rates.buy),
            (TaxCategory::Trading, OperationKind::Sell) => Some(self.trading_rates.sell),
            (TaxCategory::Staking, OperationKind::Stake) => Some(self.staking_rates.stake),
            (TaxCategory::Staking, OperationKind::Unstake) => Some(self.staking_rates.unstake),
            (TaxCategory::Staking, OperationKind::ClaimRewards) => {
                Some(self.staking_rates.claim_rewards)
            }
            _ => None,
        }
    }

    pub fn is_wallet_exempt(&self, wallet: &WalletId) -> bool {
        self.exempt_wallets.contains(wallet)
    }

    pub fn is_pair_taxed(&self, pair: &TradingPair) -> bool {
        self.enabled_trading_pairs.contains(pair)
    }

    /// Check rate ranges, clamp bounds and the tax wallet address.
    pub fn validate(&self) -> Result<(), SettingsValidationError> {
        let limits = [
            ("Swap", self.trading_rates.swap, 10),
            ("Buy", self.trading_rates.buy, 5),
            ("Sell", self.trading_rates.sell, 5),
            ("Stake", self.staking_rates.stake, 10),
            ("Unstake", self.staking_rates.unstake, 10),
            ("Reward", self.staking_rates.claim_rewards, 10),
        ];
        for (label, rate, max) in limits {
            if rate.is_negative() || rate > Decimal::from(max) {
                return Err(SettingsValidationError::RateOutOfRange { label, max });
            }
        }

        if self.minimum_tax_amount.is_negative()
            || self.minimum_tax_amount > self.maximum_tax_amount
        {
            return Err(SettingsValidationError::ClampBounds {
                minimum: self.minimum_tax_amount,
                maximum: self.maximum_tax_amount,
            });
        }

        if !is_solana_address(&self.tax_wallet_address) {
            return Err(SettingsValidationError::InvalidWalletAddress);
        }

        Ok(())
    }
}

impl Default for TaxSettings {
    fn default() -> Self {
        let pct = |s: &str| Decimal::from_str_canonical(s).unwrap_or_default();
        TaxSettings {
            trading_rates: TradingRates {
                swap: pct("2.0"),
                buy: pct("1.5"),
                sell: pct("2.5"),
            },
            staking_rates: StakingRates {
                stake: pct("1.0"),
                unstake: pct("2.0"),
                claim_rewards: pct("1.5"),
            },
            minimum_tax_amount: pct("0.001"),
            maximum_tax_amount: pct("10.0"),
            tax_wallet_address: DEFAULT_TAX_WALLET.to_string(),
            auto_distribution: true,
            enabled_trading_pairs: DEFAULT_TAXED_PAIRS.iter().map(|p| TradingPair::new(*p)).collect(),
            exempt_wallets: BTreeSet::new(),
            is_enabled: true,
            last_updated: Utc::now(),
            updated_by: "admin".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettingsValidationError {
    #[error("{label} tax rate must be between 0% and {max}%")]
    RateOutOfRange { label: &'static str, max: i64 },
    #[error("Minimum tax amount {minimum} must be >= 0 and <= maximum tax amount {maximum}")]
    ClampBounds { minimum: Decimal, maximum: Decimal },
    #[error("Invalid Solana wallet address format")]
    InvalidWalletAddress,
}

/// Base58 alphabet, 32 to 44 characters.
pub fn is_solana_address(s: &str) -> bool {
    (32..=44).contains(&s.len())
        && s.chars().all(|c| {
            c.is_ascii_alphanumeric() && !matches!(c, '0' | 'O' | 'I' | 'l')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> Decimal {
        Decimal::from_str_canonical(s).unwrap()
    }

    #[test]
    fn test_defaults_are_valid() {
        let settings = TaxSettings::default();
        assert!(settings.validate().is_ok());
        assert_eq!(settings.trading_rates.swap, d("2"));
        assert!(settings.is_pair_taxed(&TradingPair::new("SOL/AURA")));
        assert!(!settings.is_pair_taxed(&TradingPair::new("SOL/USDC")));
    }

    #[test]
    fn test_rate_namespaces_are_independent() {
        let mut settings = TaxSettings::default();
        settings.trading_rates.swap = d("3");
        settings.staking_rates.unstake = d("4");

        assert_eq!(
            settings.rate_for(TaxCategory::Trading, OperationKind::Swap),
            Some(d("3"))
        );
        assert_eq!(
            settings.rate_for(TaxCategory::Staking, OperationKind::Unstake),
            Some(d("4"))
        );
        assert_eq!(settings.rate_for(TaxCategory::Staking, OperationKind::Swap), None);
        assert_eq!(settings.rate_for(TaxCategory::Trading, OperationKind::Stake), None);
    }

    #[test]
    fn test_validate_rejects_buy_rate_above_five() {
        let mut settings = TaxSettings::default();
        settings.trading_rates.buy = d("5.5");
        let err = settings.validate().unwrap_err();
        assert_eq!(err.to_string(), "Buy tax rate must be between 0% and 5%");
    }

    #[test]
    fn test_validate_rejects_negative_reward_rate() {
        let mut settings = TaxSettings::default();
        settings.staking_rates.claim_rewards = d("-0.1");
        assert_eq!(
            settings.validate().unwrap_err(),
            SettingsValidationError::RateOutOfRange {
                label: "Reward",
                max: 10
            }
        );
    }

    #[test]
    fn test_validate_rejects_inverted_clamp() {
        let mut settings = TaxSettings::default();
        settings.minimum_tax_amount = d("11");
        assert!(matches!(
            settings.validate(),
            Err(SettingsValidationError::ClampBounds { .. })
        ));
    }

    #[test]
    fn test_validate_rejects_bad_wallet() {
        let mut settings = TaxSettings::default();
        settings.tax_wallet_address = "0x1234".to_string();
        assert_eq!(
            settings.validate().unwrap_err(),
            SettingsValidationError::InvalidWalletAddress
        );
    }

    #[test]
    fn test_solana_address_alphabet() {
        assert!(is_solana_address(DEFAULT_TAX_WALLET));
        assert!(!is_solana_address("0OIl0OIl0OIl0OIl0OIl0OIl0OIl0OIl"));
    }

    #[test]
    fn test_wire_names_are_flat() {
        let json = serde_json::to_value(TaxSettings::default()).unwrap();
        assert!(json["swapTaxRate"].is_number());
        assert!(json["rewardTaxRate"].is_number());
        assert!(json["enabledForPairs"].is_array());
        assert_eq!(json["isEnabled"], true);
        assert!(json.get("tradingRates").is_none());
    }
}
