//! Aggregate statistics over tax transaction records.

use crate::domain::{Decimal, OperationKind, TaxTransactionRecord, TransactionStatus};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationStats {
    pub count: usize,
    pub total_tax: Decimal,
    pub average_tax: Decimal,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxStats {
    pub total_count: usize,
    pub completed_count: usize,
    pub failed_count: usize,
    /// Sum of tax over completed records only.
    pub total_tax_collected: Decimal,
    pub average_tax_amount: Decimal,
    /// `completed / total * 100`, zero for an empty set.
    pub success_rate: Decimal,
    pub per_operation_breakdown: BTreeMap<OperationKind, OperationStats>,
}

/// Aggregate `records`.
///
/// Every operation in `seed` appears in the breakdown even when it has no
/// completed records; other operations appear only when present.
pub fn aggregate<'a, I>(records: I, seed: &[OperationKind]) -> TaxStats
where
    I: IntoIterator<Item = &'a TaxTransactionRecord>,
{
    let mut stats = TaxStats::default();
    for op in seed {
        stats.per_operation_breakdown.insert(*op, OperationStats::default());
    }

    for record in records {
        stats.total_count += 1;
        match record.status {
            TransactionStatus::Completed => {
                stats.completed_count += 1;
                stats.total_tax_collected =
                    stats.total_tax_collected.saturating_add(record.tax_amount);
                let entry = stats
                    .per_operation_breakdown
                    .entry(record.operation)
                    .or_default();
                entry.count += 1;
                entry.total_tax = entry.total_tax.saturating_add(record.tax_amount);
            }
            TransactionStatus::Failed => stats.failed_count += 1,
            TransactionStatus::Pending => {}
        }
    }

    stats.average_tax_amount = Decimal::mean(stats.total_tax_collected, stats.completed_count);
    stats.success_rate = Decimal::ratio_pct(stats.completed_count, stats.total_count);
    for entry in stats.per_operation_breakdown.values_mut() {
        entry.average_tax = Decimal::mean(entry.total_tax, entry.count);
    }

    stats
}
