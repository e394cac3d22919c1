use bursar::application::jobs::RegistrationQueue;
use bursar::application::registry::ApplicationRegistry;
use bursar::application::wallet::WalletService;
use bursar::config::PortalConfig;
use bursar::domain::ports::{ApplicationStoreBox, SharedProvider};
use bursar::infrastructure::in_memory::InMemoryApplicationStore;
use bursar::infrastructure::payman::PaymanClient;
use bursar::interfaces::http::{AppState, router};
use clap::Parser;
use miette::{IntoDiagnostic, Result};
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Scholarship disbursement portal backend", long_about = None)]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Listen address (overrides config)
    #[arg(long)]
    listen: Option<SocketAddr>,

    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long)]
    db_path: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("bursar=info")),
        )
        .init();

    let cli = Cli::parse();
    let mut config = PortalConfig::load(cli.config.as_deref()).into_diagnostic()?;
    if let Some(listen) = cli.listen {
        config.server.listen = listen;
    }
    if let Some(db_path) = cli.db_path {
        config.storage.db_path = Some(db_path);
    }

    let store = build_store(&config).into_diagnostic()?;
    let provider: SharedProvider =
        Arc::new(PaymanClient::new(config.provider.clone()).into_diagnostic()?);

    let registry = Arc::new(ApplicationRegistry::new(
        store,
        RegistrationQueue::new(provider.clone()),
    ));
    let wallet = Arc::new(WalletService::new(provider.clone(), config.provider.wallet));

    let app = router(AppState {
        registry,
        wallet,
        provider,
    });

    let listener = tokio::net::TcpListener::bind(config.server.listen)
        .await
        .into_diagnostic()?;
    tracing::info!(addr = %config.server.listen, "portal listening");
    axum::serve(listener, app).await.into_diagnostic()?;

    Ok(())
}

fn build_store(config: &PortalConfig) -> bursar::error::Result<ApplicationStoreBox> {
    match &config.storage.db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = bursar::infrastructure::rocksdb::RocksDbApplicationStore::open(path)?;
            Ok(Box::new(store))
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            eprintln!(
                "WARNING: Persistent storage requested via --db-path, but 'storage-rocksdb' feature is not enabled. Falling back to In-Memory storage."
            );
            Ok(Box::new(InMemoryApplicationStore::new()))
        }
        None => Ok(Box::new(InMemoryApplicationStore::new())),
    }
}
