use std::io::stderr;
use std::sync::Arc;

use anyhow::{Context, Result};
use tokio::net::TcpListener;
use tokio::signal::ctrl_c;
use tracing::level_filters::LevelFilter;
use tracing::{info, warn};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{Layer, fmt};

use transaction_authorizer::config::Config;
use transaction_authorizer::seed::load_seed_file;
use transaction_authorizer::server::create_router;
use transaction_authorizer::{Authorizer, MemoryStore};

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;

    setup_logging(config.log_level);

    let storage = Arc::new(MemoryStore::new());

    if let Some(path) = &config.seed {
        load_seed_file(path, &storage)?;
    }

    if config.api_keys.is_empty() {
        warn!("AUTHORIZER_API_KEYS is empty, every request will be rejected");
    }

    let authorizer = Authorizer::new(storage)
        .with_mcc_policy(config.mcc_policy)
        .with_store_timeout(config.store_timeout)
        .with_conflict_retries(config.conflict_retries);

    let router = create_router(Arc::new(authorizer), config.api_keys.clone());

    let listener = TcpListener::bind(config.bind).await
        .with_context(|| format!("Could not bind {}", config.bind))?;

    info!("Server starting on {}...", config.bind);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            let _ = ctrl_c().await;
            info!("Shutting down");
        })
        .await?;

    Ok(())
}

fn setup_logging(level: LevelFilter) {
    let terminal_log = fmt::layer()
        .with_target(false)
        .with_writer(stderr)
        .with_filter(level);

    tracing_subscriber::registry()
        .with(terminal_log)
        .init();
}
