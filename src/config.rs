use crate::domain::settings::{is_solana_address, DEFAULT_TAX_WALLET};
use std::collections::HashMap;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    pub ledger_backend: LedgerBackend,
    pub settlement_delay: Duration,
    pub settlement_timeout: Duration,
    pub tax_wallet_address: String,
}

/// Where tax transaction records are kept.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LedgerBackend {
    Memory,
    Sqlite { database_path: String },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Missing required environment variable: {0}")]
    MissingEnv(String),
    #[error("Invalid value for {0}: {1}")]
    InvalidValue(String, String),
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_env_map(std::env::vars().collect())
    }

    pub fn from_env_map(env_map: HashMap<String, String>) -> Result<Self, ConfigError> {
        let port = env_map
            .get("PORT")
            .map(|s| s.as_str())
            .unwrap_or("8080")
            .parse::<u16>()
            .map_err(|_| {
                ConfigError::InvalidValue("PORT".to_string(), "must be a valid u16".to_string())
            })?;

        let ledger_backend = match env_map
            .get("LEDGER_BACKEND")
            .map(|s| s.as_str())
            .unwrap_or("memory")
        {
            "memory" => LedgerBackend::Memory,
            "sqlite" => LedgerBackend::Sqlite {
                database_path: env_map
                    .get("DATABASE_PATH")
                    .cloned()
                    .ok_or_else(|| ConfigError::MissingEnv("DATABASE_PATH".to_string()))?,
            },
            other => {
                return Err(ConfigError::InvalidValue(
                    "LEDGER_BACKEND".to_string(),
                    format!("must be memory or sqlite, got {}", other),
                ))
            }
        };

        let settlement_delay = parse_millis(&env_map, "SETTLEMENT_DELAY_MS", 1_000)?;
        let settlement_timeout = parse_millis(&env_map, "SETTLEMENT_TIMEOUT_MS", 30_000)?;
        if settlement_timeout.is_zero() {
            return Err(ConfigError::InvalidValue(
                "SETTLEMENT_TIMEOUT_MS".to_string(),
                "must be greater than zero".to_string(),
            ));
        }

        let tax_wallet_address = env_map
            .get("TAX_WALLET_ADDRESS")
            .map(|s| s.trim().to_string())
            .unwrap_or_else(|| DEFAULT_TAX_WALLET.to_string());
        if !is_solana_address(&tax_wallet_address) {
            return Err(ConfigError::InvalidValue(
                "TAX_WALLET_ADDRESS".to_string(),
                "must be a base58 Solana address".to_string(),
            ));
        }

        Ok(Config {
            port,
            ledger_backend,
            settlement_delay,
            settlement_timeout,
            tax_wallet_address,
        })
    }
}

fn parse_millis(
    env_map: &HashMap<String, String>,
    key: &str,
    default_ms: u64,
) -> Result<Duration, ConfigError> {
    match env_map.get(key) {
        None => Ok(Duration::from_millis(default_ms)),
        Some(raw) => raw
            .trim()
            .parse::<u64>()
            .map(Duration::from_millis)
            .map_err(|_| ConfigError::InvalidValue(key.to_string(), "must be a valid u64".to_string())),
    }
}
