//! SQLite persistence for the transaction log.
//!
//! This module provides:
//! - Database initialization, pragmas and schema bootstrap
//! - `Repository`, the SQLite implementation of `TransactionLog`

pub mod migrations;
pub mod repo;

pub use migrations::init_db;
pub use repo::Repository;
