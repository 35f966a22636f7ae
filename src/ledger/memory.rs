//! Process-local transaction log.

use super::{LogError, LogFilter, TransactionLog, QUERY_LIMIT};
use crate::domain::TaxTransactionRecord;
use crate::engine::{self, TaxStats};
use async_trait::async_trait;
use tokio::sync::RwLock;

/// Records kept in append order behind a lock; concurrent appends are serialized.
#[derive(Debug, Default)]
pub struct MemoryTransactionLog {
    records: RwLock<Vec<TaxTransactionRecord>>,
}

impl MemoryTransactionLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }
}

#[async_trait]
impl TransactionLog for MemoryTransactionLog {
    async fn append(&self, record: TaxTransactionRecord) -> Result<(), LogError> {
        self.records.write().await.push(record);
        Ok(())
    }

    async fn query(&self, filter: &LogFilter) -> Result<Vec<TaxTransactionRecord>, LogError> {
        let records = self.records.read().await;
        let mut matching: Vec<TaxTransactionRecord> =
            records.iter().filter(|r| filter.matches(r)).cloned().collect();
        // Append order breaks timestamp ties: later appends first.
        matching.reverse();
        matching.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        matching.truncate(QUERY_LIMIT);
        Ok(matching)
    }

    async fn aggregate(&self, filter: &LogFilter) -> Result<TaxStats, LogError> {
        let records = self.records.read().await;
        Ok(engine::aggregate(
            records.iter().filter(|r| filter.matches(r)),
            filter.breakdown_seed(),
        ))
    }
}
