//! Domain primitives: WalletId, TradingPair, OperationKind, TaxCategory.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Opaque wallet identifier (base58 address on Solana, but never parsed here).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletId(pub String);

impl WalletId {
    pub fn new(id: impl Into<String>) -> Self {
        WalletId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for WalletId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Trading pair identifier (e.g., "SOL/AURA").
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TradingPair(pub String);

impl TradingPair {
    pub fn new(pair: impl Into<String>) -> Self {
        TradingPair(pair.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Which rate namespace a request is taxed under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaxCategory {
    Trading,
    Staking,
}

impl TaxCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            TaxCategory::Trading => "trading",
            TaxCategory::Staking => "staking",
        }
    }

    /// Operations that belong to this category, in display order.
    pub fn operations(&self) -> &'static [OperationKind] {
        match self {
            TaxCategory::Trading => &[OperationKind::Swap, OperationKind::Buy, OperationKind::Sell],
            TaxCategory::Staking => &[
                OperationKind::Stake,
                OperationKind::Unstake,
                OperationKind::ClaimRewards,
            ],
        }
    }
}

impl fmt::Display for TaxCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TaxCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "trading" => Ok(TaxCategory::Trading),
            "staking" => Ok(TaxCategory::Staking),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// A taxable operation.
///
/// `Swap`, `Buy` and `Sell` form the trading family; the rest are staking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Swap,
    Buy,
    Sell,
    Stake,
    Unstake,
    ClaimRewards,
}

impl OperationKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationKind::Swap => "swap",
            OperationKind::Buy => "buy",
            OperationKind::Sell => "sell",
            OperationKind::Stake => "stake",
            OperationKind::Unstake => "unstake",
            OperationKind::ClaimRewards => "claim_rewards",
        }
    }

    pub fn category(&self) -> TaxCategory {
        match self {
            OperationKind::Swap | OperationKind::Buy | OperationKind::Sell => TaxCategory::Trading,
            OperationKind::Stake | OperationKind::Unstake | OperationKind::ClaimRewards => {
                TaxCategory::Staking
            }
        }
    }

    pub fn is_trading(&self) -> bool {
        self.category() == TaxCategory::Trading
    }
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationKind {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "swap" => Ok(OperationKind::Swap),
            "buy" => Ok(OperationKind::Buy),
            "sell" => Ok(OperationKind::Sell),
            "stake" => Ok(OperationKind::Stake),
            "unstake" => Ok(OperationKind::Unstake),
            "claim_rewards" => Ok(OperationKind::ClaimRewards),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

/// Returned when a string does not name a known enum variant.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_operation_serialization() {
        let json = serde_json::to_string(&OperationKind::ClaimRewards).unwrap();
        assert_eq!(json, "\"claim_rewards\"");
        let op: OperationKind = serde_json::from_str("\"unstake\"").unwrap();
        assert_eq!(op, OperationKind::Unstake);
    }

    #[test]
    fn test_operation_from_str_matches_as_str() {
        for op in TaxCategory::Trading
            .operations()
            .iter()
            .chain(TaxCategory::Staking.operations())
        {
            assert_eq!(op.as_str().parse::<OperationKind>().unwrap(), *op);
        }
        assert!("claimRewards".parse::<OperationKind>().is_err());
    }

    #[test]
    fn test_operation_category() {
        assert!(OperationKind::Buy.is_trading());
        assert!(!OperationKind::Stake.is_trading());
        assert_eq!(OperationKind::ClaimRewards.category(), TaxCategory::Staking);
    }

    #[test]
    fn test_wallet_id_is_transparent() {
        let json = serde_json::to_string(&WalletId::new("abc")).unwrap();
        assert_eq!(json, "\"abc\"");
    }
}
