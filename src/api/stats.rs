//! Windowed statistics shared by the swap and staking GET endpoints.

use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::AppState;
use crate::domain::{Decimal, OperationKind, TaxCategory, TaxTransactionRecord, WalletId};
use crate::engine::{OperationStats, TaxStats};
use crate::error::AppError;
use crate::ledger::LogFilter;

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    pub period: Option<String>,
    pub wallet: Option<String>,
    pub operation: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Day,
    Week,
    Month,
}

impl Period {
    pub fn parse(raw: Option<&str>) -> Result<Self, AppError> {
        match raw.map(str::trim).filter(|s| !s.is_empty()).unwrap_or("24h") {
            "24h" => Ok(Period::Day),
            "7d" => Ok(Period::Week),
            "30d" => Ok(Period::Month),
            other => Err(AppError::BadRequest(format!(
                "Invalid period {}. Must be: 24h, 7d, or 30d",
                other
            ))),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Period::Day => "24h",
            Period::Week => "7d",
            Period::Month => "30d",
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            Period::Day => Duration::hours(24),
            Period::Week => Duration::days(7),
            Period::Month => Duration::days(30),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsResponse {
    pub success: bool,
    pub data: StatsData,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsData {
    pub period: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub operation: Option<String>,
    pub total_transactions: usize,
    pub completed_transactions: usize,
    pub total_tax_collected: Decimal,
    pub success_rate: Decimal,
    pub average_tax_amount: Decimal,
    pub operation_breakdown: BTreeMap<OperationKind, OperationStats>,
    pub transactions: Vec<TaxTransactionRecord>,
    /// All-time statistics for the category, ignoring period and wallet.
    pub global_stats: TaxStats,
}

/// Build the stats payload for `category`.
///
/// `operation` is only honoured when it names an operation of the category;
/// anything else reports on all operations.
pub async fn windowed_stats(
    state: &AppState,
    category: TaxCategory,
    query: StatsQuery,
) -> Result<StatsResponse, AppError> {
    let period = Period::parse(query.period.as_deref())?;

    let operation = query
        .operation
        .as_deref()
        .and_then(|op| op.parse::<OperationKind>().ok())
        .filter(|op| op.category() == category);

    let filter = LogFilter {
        wallet_id: query
            .wallet
            .map(|w| w.trim().to_string())
            .filter(|w| !w.is_empty())
            .map(WalletId::new),
        category: Some(category),
        operation,
        since: Some(Utc::now() - period.window()),
    };

    let stats = state.log.aggregate(&filter).await?;
    let transactions = state.log.query(&filter).await?;
    let global_stats = state.log.aggregate(&LogFilter::category(category)).await?;

    let operation_label = match category {
        TaxCategory::Staking => Some(
            operation
                .map(|op| op.as_str().to_string())
                .unwrap_or_else(|| "all".to_string()),
        ),
        TaxCategory::Trading => operation.map(|op| op.as_str().to_string()),
    };

    Ok(StatsResponse {
        success: true,
        data: StatsData {
            period: period.as_str(),
            operation: operation_label,
            total_transactions: stats.total_count,
            completed_transactions: stats.completed_count,
            total_tax_collected: stats.total_tax_collected,
            success_rate: stats.success_rate,
            average_tax_amount: stats.average_tax_amount,
            operation_breakdown: stats.per_operation_breakdown,
            transactions,
            global_stats,
        },
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_defaults_to_day() {
        assert_eq!(Period::parse(None).unwrap(), Period::Day);
        assert_eq!(Period::parse(Some("")).unwrap(), Period::Day);
    }

    #[test]
    fn test_period_windows() {
        assert_eq!(Period::parse(Some("7d")).unwrap().window(), Duration::days(7));
        assert_eq!(Period::parse(Some("30d")).unwrap().window(), Duration::days(30));
    }

    #[test]
    fn test_unknown_period_rejected() {
        assert!(matches!(
            Period::parse(Some("1y")),
            Err(AppError::BadRequest(_))
        ));
    }
}
