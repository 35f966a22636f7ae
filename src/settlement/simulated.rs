//! Settlement stand-in that waits a fixed delay and always succeeds.

use super::{Settlement, SettlementError};
use crate::domain::{SettlementReceipt, TaxTransactionRecord};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use std::time::Duration;

const BASE_BLOCK: u64 = 245_789_000;
const BLOCK_SPREAD: u64 = 1_000_000;

#[derive(Debug, Clone)]
pub struct SimulatedSettlement {
    delay: Duration,
}

impl SimulatedSettlement {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    /// Deterministic receipt derived from the record id.
    ///
    /// The reference is the hex SHA-256 of the id; the block reference is
    /// taken from the first eight digest bytes.
    pub fn receipt_for(record_id: &str) -> SettlementReceipt {
        let digest = Sha256::digest(record_id.as_bytes());
        let mut head = [0u8; 8];
        head.copy_from_slice(&digest[..8]);

        SettlementReceipt {
            transaction_reference: hex::encode(digest),
            block_reference: BASE_BLOCK + u64::from_le_bytes(head) % BLOCK_SPREAD,
        }
    }
}

#[async_trait]
impl Settlement for SimulatedSettlement {
    async fn settle(&self, record: &TaxTransactionRecord) -> Result<SettlementReceipt, SettlementError> {
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        Ok(Self::receipt_for(&record.id))
    }
}
