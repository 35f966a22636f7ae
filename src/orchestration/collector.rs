use crate::domain::{TaxCategory, TaxTransactionRecord, TransactionStatus};
use crate::engine::{InvalidRequest, TaxCalculator, TaxComputationRequest, TaxComputationResult};
use crate::ledger::{LogError, TransactionLog};
use crate::provider::{SettingsError, TaxSettingsProvider};
use crate::settlement::{Settlement, SettlementError};
use chrono::Utc;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;
use tracing::{info, warn};

/// Destination reported for staking tax, which is redistributed to stakers.
pub const STAKING_POOL_WALLET: &str = "staking_pool_redistribution";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionRequest {
    pub category: TaxCategory,
    pub computation: TaxComputationRequest,
    /// Caller's reference for the taxed operation (e.g. a swap transaction id).
    pub source_reference: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionOutcome {
    pub category: TaxCategory,
    pub result: TaxComputationResult,
    /// `None` for exempt requests, which are never recorded.
    pub record: Option<TaxTransactionRecord>,
    pub tax_wallet: String,
}

impl CollectionOutcome {
    pub fn status(&self) -> Option<TransactionStatus> {
        self.record.as_ref().map(|r| r.status)
    }
}

#[derive(Debug, Error)]
pub enum CollectError {
    #[error(transparent)]
    Configuration(#[from] SettingsError),
    #[error(transparent)]
    Invalid(#[from] InvalidRequest),
    #[error(transparent)]
    Log(#[from] LogError),
}

/// Runs one request through settings lookup, computation, settlement and logging.
#[derive(Clone)]
pub struct TaxCollector {
    settings: Arc<dyn TaxSettingsProvider>,
    settlement: Arc<dyn Settlement>,
    log: Arc<dyn TransactionLog>,
    settlement_timeout: Duration,
}

impl TaxCollector {
    pub fn new(
        settings: Arc<dyn TaxSettingsProvider>,
        settlement: Arc<dyn Settlement>,
        log: Arc<dyn TransactionLog>,
        settlement_timeout: Duration,
    ) -> Self {
        Self {
            settings,
            settlement,
            log,
            settlement_timeout,
        }
    }

    pub fn log(&self) -> &Arc<dyn TransactionLog> {
        &self.log
    }

    /// Compute and, unless exempt, settle and record the tax for `request`.
    ///
    /// Settlement failures do not fail the call: the record is stored as
    /// `failed` and returned like any other outcome.
    pub async fn collect(&self, request: CollectionRequest) -> Result<CollectionOutcome, CollectError> {
        let settings = self.settings.current().await?;
        let category = request.category;
        let computation = &request.computation;

        let result = TaxCalculator::compute(computation, &settings, category)?;
        let tax_wallet = match category {
            TaxCategory::Trading => settings.tax_wallet_address.clone(),
            TaxCategory::Staking => STAKING_POOL_WALLET.to_string(),
        };

        if let Some(reason) = result.exempt_reason {
            info!(
                wallet = %computation.wallet_id,
                operation = %computation.operation,
                reason = reason.message(category),
                "Operation exempt from tax"
            );
            return Ok(CollectionOutcome {
                category,
                result,
                record: None,
                tax_wallet,
            });
        }

        info!(
            wallet = %computation.wallet_id,
            operation = %computation.operation,
            gross = %result.gross_amount,
            rate = %result.applied_rate,
            tax = %result.tax_amount,
            net = %result.net_amount,
            "Tax computed"
        );

        let pending = TaxTransactionRecord {
            id: TaxTransactionRecord::generate_id(category),
            timestamp: Utc::now(),
            wallet_id: computation.wallet_id.clone(),
            category,
            operation: computation.operation,
            trading_pair: computation.trading_pair.clone(),
            gross_amount: result.gross_amount,
            tax_amount: result.tax_amount,
            net_amount: result.net_amount,
            applied_rate: result.applied_rate,
            status: TransactionStatus::Pending,
            source_reference: request.source_reference.clone(),
            external_reference_id: None,
            block_reference: None,
        };

        let record = match self.settle(&pending).await {
            Ok(receipt) => {
                info!(id = %pending.id, reference = %receipt.transaction_reference, "Tax settled");
                pending.complete(receipt)
            }
            Err(e) => {
                warn!(id = %pending.id, error = %e, "Tax settlement failed");
                pending.fail()
            }
        };

        self.log.append(record.clone()).await?;

        Ok(CollectionOutcome {
            category,
            result,
            record: Some(record),
            tax_wallet,
        })
    }

    async fn settle(
        &self,
        record: &TaxTransactionRecord,
    ) -> Result<crate::domain::SettlementReceipt, SettlementError> {
        match tokio::time::timeout(self.settlement_timeout, self.settlement.settle(record)).await {
            Ok(outcome) => outcome,
            Err(_) => Err(SettlementError::Timeout(
                self.settlement_timeout.as_millis() as u64,
            )),
        }
    }
}
