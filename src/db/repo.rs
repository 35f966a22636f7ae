//! SQLite-backed transaction log.

use crate::domain::{
    Decimal, OperationKind, TaxCategory, TaxTransactionRecord, TradingPair, TransactionStatus,
    WalletId,
};
use crate::engine::{self, TaxStats};
use crate::ledger::{LogError, LogFilter, TransactionLog, QUERY_LIMIT};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqlitePool, SqliteRow};
use sqlx::Row;
use std::str::FromStr;

/// Repository for tax transaction records.
///
/// Amounts are stored as canonical decimal strings, timestamps as
/// milliseconds since the Unix epoch.
#[derive(Debug, Clone)]
pub struct Repository {
    pool: SqlitePool,
}

impl Repository {
    pub fn new(pool: SqlitePool) -> Self {
        Repository { pool }
    }

    /// Matching records, newest first. A `limit` of `None` returns all of them.
    async fn fetch(
        &self,
        filter: &LogFilter,
        limit: Option<usize>,
    ) -> Result<Vec<TaxTransactionRecord>, LogError> {
        // SQLite treats a negative LIMIT as unbounded.
        let limit = limit.map_or(-1, |l| l as i64);

        let rows = sqlx::query(
            r#"
            SELECT id, timestamp_ms, wallet_id, category, operation, trading_pair,
                   gross_amount, tax_amount, net_amount, applied_rate, status,
                   source_reference, external_reference_id, block_reference
            FROM tax_transactions
            WHERE (?1 IS NULL OR wallet_id = ?1)
              AND (?2 IS NULL OR category = ?2)
              AND (?3 IS NULL OR operation = ?3)
              AND (?4 IS NULL OR timestamp_ms >= ?4)
            ORDER BY timestamp_ms DESC, rowid DESC
            LIMIT ?5
            "#,
        )
        .bind(filter.wallet_id.as_ref().map(|w| w.as_str()))
        .bind(filter.category.map(|c| c.as_str()))
        .bind(filter.operation.map(|op| op.as_str()))
        .bind(filter.since.map(|t| t.timestamp_millis()))
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        rows.iter().map(record_from_row).collect()
    }
}

#[async_trait]
impl TransactionLog for Repository {
    async fn append(&self, record: TaxTransactionRecord) -> Result<(), LogError> {
        sqlx::query(
            r#"
            INSERT INTO tax_transactions (
                id, timestamp_ms, wallet_id, category, operation, trading_pair,
                gross_amount, tax_amount, net_amount, applied_rate, status,
                source_reference, external_reference_id, block_reference
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(record.id.as_str())
        .bind(record.timestamp.timestamp_millis())
        .bind(record.wallet_id.as_str())
        .bind(record.category.as_str())
        .bind(record.operation.as_str())
        .bind(record.trading_pair.as_ref().map(|p| p.as_str()))
        .bind(record.gross_amount.to_canonical_string())
        .bind(record.tax_amount.to_canonical_string())
        .bind(record.net_amount.to_canonical_string())
        .bind(record.applied_rate.to_canonical_string())
        .bind(record.status.as_str())
        .bind(record.source_reference.as_deref())
        .bind(record.external_reference_id.as_deref())
        .bind(record.block_reference.map(|b| b as i64))
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn query(&self, filter: &LogFilter) -> Result<Vec<TaxTransactionRecord>, LogError> {
        self.fetch(filter, Some(QUERY_LIMIT)).await
    }

    async fn aggregate(&self, filter: &LogFilter) -> Result<TaxStats, LogError> {
        let records = self.fetch(filter, None).await?;
        Ok(engine::aggregate(&records, filter.breakdown_seed()))
    }
}

fn record_from_row(row: &SqliteRow) -> Result<TaxTransactionRecord, LogError> {
    let id: String = row.get("id");
    let corrupt = |reason: String| LogError::Corrupt {
        id: id.clone(),
        reason,
    };

    let decimal = |column: &str| -> Result<Decimal, LogError> {
        let raw: String = row.get(column);
        Decimal::from_str(&raw).map_err(|e| corrupt(format!("{}: {}", column, e)))
    };

    let timestamp_ms: i64 = row.get("timestamp_ms");
    let timestamp = DateTime::<Utc>::from_timestamp_millis(timestamp_ms)
        .ok_or_else(|| corrupt(format!("timestamp out of range: {}", timestamp_ms)))?;

    let category: String = row.get("category");
    let operation: String = row.get("operation");
    let status: String = row.get("status");
    let block_reference: Option<i64> = row.get("block_reference");

    let category: TaxCategory = category.parse().map_err(|e| corrupt(format!("{}", e)))?;
    let operation: OperationKind = operation.parse().map_err(|e| corrupt(format!("{}", e)))?;
    let status: TransactionStatus = status.parse().map_err(|e| corrupt(format!("{}", e)))?;
    let gross_amount = decimal("gross_amount")?;
    let tax_amount = decimal("tax_amount")?;
    let net_amount = decimal("net_amount")?;
    let applied_rate = decimal("applied_rate")?;

    Ok(TaxTransactionRecord {
        id,
        timestamp,
        wallet_id: WalletId::new(row.get::<String, _>("wallet_id")),
        category,
        operation,
        trading_pair: row.get::<Option<String>, _>("trading_pair").map(TradingPair::new),
        gross_amount,
        tax_amount,
        net_amount,
        applied_rate,
        status,
        source_reference: row.get("source_reference"),
        external_reference_id: row.get("external_reference_id"),
        block_reference: block_reference.map(|b| b as u64),
    })
}
