//! Append-only history of tax transactions.
//!
//! Two backends implement [`TransactionLog`]:
//! - [`MemoryTransactionLog`] keeps records for the life of the process
//! - [`crate::db::Repository`] persists them to SQLite

use crate::domain::{OperationKind, TaxCategory, TaxTransactionRecord, WalletId};
use crate::engine::TaxStats;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::fmt;
use thiserror::Error;

pub mod memory;

pub use memory::MemoryTransactionLog;

/// Maximum number of records returned by [`TransactionLog::query`].
pub const QUERY_LIMIT: usize = 50;

/// Record selection shared by `query` and `aggregate`. Unset fields match everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub wallet_id: Option<WalletId>,
    pub category: Option<TaxCategory>,
    pub operation: Option<OperationKind>,
    /// Inclusive lower bound on the record timestamp.
    pub since: Option<DateTime<Utc>>,
}

impl LogFilter {
    pub fn category(category: TaxCategory) -> Self {
        Self {
            category: Some(category),
            ..Self::default()
        }
    }

    pub fn matches(&self, record: &TaxTransactionRecord) -> bool {
        self.wallet_id.as_ref().map_or(true, |w| &record.wallet_id == w)
            && self.category.map_or(true, |c| record.category == c)
            && self.operation.map_or(true, |op| record.operation == op)
            && self.since.map_or(true, |since| record.timestamp >= since)
    }

    /// Operations always listed in the aggregate breakdown for this filter.
    pub fn breakdown_seed(&self) -> &'static [OperationKind] {
        match self.category {
            Some(category) => category.operations(),
            None => &[],
        }
    }
}

#[derive(Debug, Error)]
pub enum LogError {
    #[error("Transaction log storage error: {0}")]
    Storage(#[from] sqlx::Error),
    #[error("Corrupt transaction record {id}: {reason}")]
    Corrupt { id: String, reason: String },
}

#[async_trait]
pub trait TransactionLog: Send + Sync + fmt::Debug {
    /// Store a finalized record. Records are never updated afterwards.
    async fn append(&self, record: TaxTransactionRecord) -> Result<(), LogError>;

    /// Matching records, newest first, at most [`QUERY_LIMIT`].
    async fn query(&self, filter: &LogFilter) -> Result<Vec<TaxTransactionRecord>, LogError>;

    /// Statistics over every matching record (not limited).
    async fn aggregate(&self, filter: &LogFilter) -> Result<TaxStats, LogError>;
}
