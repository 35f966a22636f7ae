use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stats::{windowed_stats, StatsQuery, StatsResponse};
use super::{json_body, require_str, AppState};
use crate::domain::{Decimal, OperationKind, TaxCategory, TransactionStatus, WalletId};
use crate::engine::TaxComputationRequest;
use crate::error::AppError;
use crate::orchestration::CollectionRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingTaxBody {
    pub user_wallet: Option<String>,
    pub amount: Option<Decimal>,
    pub operation: Option<String>,
    /// Accepted from the dashboard but not used in the computation.
    pub current_staked_amount: Option<Decimal>,
    pub current_reward_amount: Option<Decimal>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StakingTaxResponse {
    pub success: bool,
    pub gross_amount: Decimal,
    pub tax_amount: Decimal,
    pub net_amount: Decimal,
    pub tax_rate: Decimal,
    pub operation: OperationKind,
    pub is_exempt: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exempt_reason: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<TransactionStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tax_wallet: Option<String>,
    pub message: String,
    pub timestamp: String,
}

impl StakingTaxBody {
    fn into_request(self) -> Result<CollectionRequest, AppError> {
        let wallet = require_str(self.user_wallet, "userWallet")?;
        let amount = self
            .amount
            .ok_or_else(|| AppError::BadRequest("Missing required field: amount".into()))?;
        let operation = require_str(self.operation, "operation")?;

        let operation = operation
            .parse::<OperationKind>()
            .ok()
            .filter(|op| !op.is_trading())
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid operation. Must be: stake, unstake, or claim_rewards".into(),
                )
            })?;

        if !amount.is_positive() {
            return Err(AppError::BadRequest("amount must be greater than zero".into()));
        }

        info!(wallet = %wallet, operation = %operation, amount = %amount, "Processing staking tax");

        Ok(CollectionRequest {
            category: TaxCategory::Staking,
            computation: TaxComputationRequest {
                wallet_id: WalletId::new(wallet),
                operation,
                gross_amount: amount,
                trading_pair: None,
            },
            source_reference: None,
        })
    }
}

pub async fn post_staking_tax(
    State(state): State<AppState>,
    payload: Result<Json<StakingTaxBody>, JsonRejection>,
) -> Result<Json<StakingTaxResponse>, AppError> {
    let request = json_body(payload)?.into_request()?;
    let operation = request.computation.operation;
    let outcome = state.collector.collect(request).await?;
    let result = &outcome.result;

    let message = match (result.is_exempt(), outcome.status()) {
        (true, _) => "Staking operation exempt from redistribution tax",
        (false, Some(TransactionStatus::Completed)) => {
            "Staking tax added to reward pool for redistribution"
        }
        (false, _) => "Staking tax collection failed",
    };

    Ok(Json(StakingTaxResponse {
        success: true,
        gross_amount: result.gross_amount,
        tax_amount: result.tax_amount,
        net_amount: result.net_amount,
        tax_rate: result.applied_rate,
        operation,
        is_exempt: result.is_exempt(),
        exempt_reason: result
            .exempt_reason
            .map(|r| r.message(TaxCategory::Staking).to_string()),
        transaction_id: outcome.record.as_ref().map(|r| r.id.clone()),
        status: outcome.status(),
        tax_wallet: outcome.record.as_ref().map(|_| outcome.tax_wallet.clone()),
        message: message.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub async fn get_staking_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    windowed_stats(&state, TaxCategory::Staking, params)
        .await
        .map(Json)
}
