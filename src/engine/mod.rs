//! Pure computation: tax calculation and history aggregation.

pub mod calculator;
pub mod stats;

pub use calculator::{
    ExemptReason, InvalidRequest, TaxCalculator, TaxComputationRequest, TaxComputationResult,
};
pub use stats::{aggregate, OperationStats, TaxStats};
