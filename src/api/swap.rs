use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::Json;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::stats::{windowed_stats, StatsQuery, StatsResponse};
use super::{json_body, require_str, AppState};
use crate::domain::{Decimal, OperationKind, TaxCategory, TradingPair, TransactionStatus, WalletId};
use crate::engine::{ExemptReason, TaxComputationRequest};
use crate::error::AppError;
use crate::orchestration::CollectionRequest;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTaxBody {
    pub user_wallet: Option<String>,
    pub from_token: Option<String>,
    pub to_token: Option<String>,
    pub swap_amount: Option<Decimal>,
    pub trading_pair: Option<String>,
    pub transaction_type: Option<String>,
    pub jupiter_transaction_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapTaxResponse {
    pub success: bool,
    pub tax_amount: Decimal,
    pub tax_rate: Decimal,
    pub after_tax_amount: Decimal,
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

impl SwapTaxBody {
    fn into_request(self) -> Result<CollectionRequest, AppError> {
        let wallet = require_str(self.user_wallet, "userWallet")?;
        let from_token = require_str(self.from_token, "fromToken")?;
        let to_token = require_str(self.to_token, "toToken")?;
        let amount = self
            .swap_amount
            .ok_or_else(|| AppError::BadRequest("Missing required field: swapAmount".into()))?;
        let pair = require_str(self.trading_pair, "tradingPair")?;
        let transaction_type = require_str(self.transaction_type, "transactionType")?;

        if !amount.is_positive() {
            return Err(AppError::BadRequest(
                "swapAmount must be greater than zero".into(),
            ));
        }

        let operation = transaction_type
            .parse::<OperationKind>()
            .ok()
            .filter(OperationKind::is_trading)
            .ok_or_else(|| {
                AppError::BadRequest(
                    "Invalid transactionType. Must be: buy, sell, or swap".into(),
                )
            })?;

        info!(
            wallet = %wallet,
            from = %from_token,
            to = %to_token,
            amount = %amount,
            pair = %pair,
            "Processing swap tax"
        );

        Ok(CollectionRequest {
            category: TaxCategory::Trading,
            computation: TaxComputationRequest {
                wallet_id: WalletId::new(wallet),
                operation,
                gross_amount: amount,
                trading_pair: Some(TradingPair::new(pair)),
            },
            source_reference: self
                .jupiter_transaction_id
                .filter(|s| !s.trim().is_empty()),
        })
    }
}

pub async fn post_swap_tax(
    State(state): State<AppState>,
    payload: Result<Json<SwapTaxBody>, JsonRejection>,
) -> Result<Json<SwapTaxResponse>, AppError> {
    let request = json_body(payload)?.into_request()?;
    let outcome = state.collector.collect(request).await?;
    let result = &outcome.result;

    let message = match (result.exempt_reason, outcome.status()) {
        (Some(ExemptReason::PairNotTaxed), _) => "Trading pair exempt from tax",
        (Some(_), _) => "Transaction exempt from tax",
        (None, Some(TransactionStatus::Completed)) => "Tax collected successfully",
        (None, _) => "Tax collection failed",
    };

    Ok(Json(SwapTaxResponse {
        success: true,
        tax_amount: result.tax_amount,
        tax_rate: result.applied_rate,
        after_tax_amount: result.net_amount,
        is_exempt: result.is_exempt(),
        exempt_reason: result
            .exempt_reason
            .map(|r| r.message(TaxCategory::Trading).to_string()),
        transaction_id: outcome.record.as_ref().map(|r| r.id.clone()),
        status: outcome.status(),
        tax_wallet: outcome.record.as_ref().map(|_| outcome.tax_wallet.clone()),
        message: message.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }))
}

pub async fn get_swap_stats(
    State(state): State<AppState>,
    Query(params): Query<StatsQuery>,
) -> Result<Json<StatsResponse>, AppError> {
    windowed_stats(&state, TaxCategory::Trading, params)
        .await
        .map(Json)
}
