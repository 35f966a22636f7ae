pub mod api;
pub mod config;
pub mod db;
pub mod domain;
pub mod engine;
pub mod error;
pub mod ledger;
pub mod orchestration;
pub mod provider;
pub mod settlement;

pub use config::{Config, LedgerBackend};
pub use db::{init_db, Repository};
pub use domain::{
    Decimal, OperationKind, TaxCategory, TaxSettings, TaxTransactionRecord, TradingPair,
    TransactionStatus, WalletId,
};
pub use engine::{TaxCalculator, TaxComputationRequest, TaxComputationResult};
pub use error::AppError;
pub use ledger::{LogFilter, MemoryTransactionLog, TransactionLog};
pub use orchestration::{CollectionRequest, TaxCollector};
pub use provider::{SettingsStore, StaticSettingsProvider, TaxSettingsProvider};
pub use settlement::{MockSettlement, Settlement, SimulatedSettlement};
