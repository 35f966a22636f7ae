use anyhow::Context;
use auratax::provider::{SettingsStore, TaxSettingsProvider};
use auratax::settlement::{Settlement, SimulatedSettlement};
use auratax::{
    api, init_db, Config, LedgerBackend, MemoryTransactionLog, Repository, TaxCollector,
    TaxSettings, TransactionLog,
};
use std::net::SocketAddr;
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into()),
        )
        .init();

    let config = Config::from_env().context("Configuration error")?;
    let port = config.port;

    let log: Arc<dyn TransactionLog> = match &config.ledger_backend {
        LedgerBackend::Memory => Arc::new(MemoryTransactionLog::new()),
        LedgerBackend::Sqlite { database_path } => {
            let pool = init_db(database_path)
                .await
                .with_context(|| format!("Failed to initialize database at {}", database_path))?;
            Arc::new(Repository::new(pool))
        }
    };
    tracing::info!(backend = ?config.ledger_backend, "Transaction log ready");

    let settings = Arc::new(SettingsStore::new(TaxSettings {
        tax_wallet_address: config.tax_wallet_address.clone(),
        ..TaxSettings::default()
    }));
    let settlement: Arc<dyn Settlement> = Arc::new(SimulatedSettlement::new(config.settlement_delay));
    let collector = TaxCollector::new(
        settings.clone() as Arc<dyn TaxSettingsProvider>,
        settlement,
        log,
        config.settlement_timeout,
    );

    let app = api::create_router(api::AppState::new(collector, settings));

    let addr = SocketAddr::from(([127, 0, 0, 1], port));
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    tracing::info!("Server listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
