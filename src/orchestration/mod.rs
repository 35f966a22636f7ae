pub mod collector;

pub use collector::{
    CollectError, CollectionOutcome, CollectionRequest, TaxCollector, STAKING_POOL_WALLET,
};
