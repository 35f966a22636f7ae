//! Scriptable settlement for tests.

use super::{Settlement, SettlementError};
use crate::domain::{SettlementReceipt, TaxTransactionRecord};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

/// Settlement that either succeeds with a fixed receipt or fails with a fixed
/// error, optionally after a delay.
#[derive(Debug)]
pub struct MockSettlement {
    outcome: Result<SettlementReceipt, SettlementError>,
    delay: Duration,
    calls: AtomicUsize,
}

impl MockSettlement {
    pub fn succeeding() -> Self {
        Self {
            outcome: Ok(SettlementReceipt {
                transaction_reference: "mock_tx".to_string(),
                block_reference: 1,
            }),
            delay: Duration::ZERO,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(error: SettlementError) -> Self {
        Self {
            outcome: Err(error),
            ..Self::succeeding()
        }
    }

    /// Delay every settle call, e.g. to trigger the caller's timeout.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Default for MockSettlement {
    fn default() -> Self {
        Self::succeeding()
    }
}

#[async_trait]
impl Settlement for MockSettlement {
    async fn settle(&self, _record: &TaxTransactionRecord) -> Result<SettlementReceipt, SettlementError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.outcome.clone()
    }
}
