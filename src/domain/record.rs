//! Tax transaction history entry.

use crate::domain::{Decimal, OperationKind, TaxCategory, TradingPair, WalletId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TransactionStatus {
    type Err = super::primitives::UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(TransactionStatus::Pending),
            "completed" => Ok(TransactionStatus::Completed),
            "failed" => Ok(TransactionStatus::Failed),
            other => Err(super::primitives::UnknownVariant(other.to_string())),
        }
    }
}

/// Proof that the settlement step collected the tax.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SettlementReceipt {
    pub transaction_reference: String,
    pub block_reference: u64,
}

/// A persisted tax transaction.
///
/// Created `Pending`, then consumed by [`complete`](Self::complete) or
/// [`fail`](Self::fail) before being appended to the log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxTransactionRecord {
    pub id: String,
    pub timestamp: DateTime<Utc>,
    pub wallet_id: WalletId,
    pub category: TaxCategory,
    pub operation: OperationKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trading_pair: Option<TradingPair>,
    pub gross_amount: Decimal,
    pub tax_amount: Decimal,
    pub net_amount: Decimal,
    pub applied_rate: Decimal,
    pub status: TransactionStatus,
    /// Caller-supplied reference of the swap being taxed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_reference: Option<String>,
    /// Settlement transaction reference.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_reference_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub block_reference: Option<u64>,
}

impl TaxTransactionRecord {
    /// Id prefix per category: `tax_` for trading, `stake_tax_` for staking.
    pub fn generate_id(category: TaxCategory) -> String {
        let prefix = match category {
            TaxCategory::Trading => "tax",
            TaxCategory::Staking => "stake_tax",
        };
        format!("{}_{}", prefix, uuid::Uuid::new_v4().simple())
    }

    pub fn is_completed(&self) -> bool {
        self.status == TransactionStatus::Completed
    }

    pub fn complete(self, receipt: SettlementReceipt) -> Self {
        debug_assert_eq!(self.status, TransactionStatus::Pending);
        Self {
            status: TransactionStatus::Completed,
            external_reference_id: Some(receipt.transaction_reference),
            block_reference: Some(receipt.block_reference),
            ..self
        }
    }

    pub fn fail(self) -> Self {
        debug_assert_eq!(self.status, TransactionStatus::Pending);
        Self {
            status: TransactionStatus::Failed,
            ..self
        }
    }
}
