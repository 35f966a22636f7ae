//! Domain types for the tax service.
//!
//! This module provides:
//! - Exact numeric handling via the Decimal wrapper
//! - Primitives: WalletId, TradingPair, OperationKind, TaxCategory
//! - The TaxSettings snapshot and its validation rules
//! - The TaxTransactionRecord history entry and its lifecycle

pub mod decimal;
pub mod primitives;
pub mod record;
pub mod settings;

pub use decimal::Decimal;
pub use primitives::{OperationKind, TaxCategory, TradingPair, UnknownVariant, WalletId};
pub use record::{SettlementReceipt, TaxTransactionRecord, TransactionStatus};
pub use settings::{SettingsValidationError, StakingRates, TaxSettings, TradingRates};
