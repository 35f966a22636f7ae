//! Settlement boundary: the step that actually collects a computed tax.

use crate::domain::{SettlementReceipt, TaxTransactionRecord};
use async_trait::async_trait;
use std::fmt;
use thiserror::Error;

pub mod mock;
pub mod simulated;

pub use mock::MockSettlement;
pub use simulated::SimulatedSettlement;

/// Collects the tax described by a pending record.
///
/// Implementations must not retry; the caller records a failure instead.
#[async_trait]
pub trait Settlement: Send + Sync + fmt::Debug {
    async fn settle(&self, record: &TaxTransactionRecord) -> Result<SettlementReceipt, SettlementError>;
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SettlementError {
    #[error("Settlement rejected: {0}")]
    Rejected(String),
    #[error("Settlement timed out after {0}ms")]
    Timeout(u64),
    #[error("Settlement unavailable: {0}")]
    Unavailable(String),
}
