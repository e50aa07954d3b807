use std::sync::Arc;

use anyhow::Context;
use migration::{Migrator, MigratorTrait};
use tokio::sync::watch;

use inscriptions_indexer::application::indexer::{BlockchainProcessor, ChainProcessor};
use inscriptions_indexer::config::AppConfig;
use inscriptions_indexer::domain::protocols::{bridge, ProtocolRegistry};
use inscriptions_indexer::domain::services::BridgeSigner;
use inscriptions_indexer::infrastructure::chain::CosmosClient;
use inscriptions_indexer::infrastructure::persistence::{DbPool, RepositoryFactory};
use inscriptions_indexer::utils::logging;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    logging::init_logger();

    logging::log_info(&format!(
        "Starting inscriptions indexer v{}",
        env!("CARGO_PKG_VERSION")
    ));

    let config = AppConfig::from_env();
    logging::log_chain_connection_details(
        &config.chain.chain_id,
        &config.chain.rpc_url,
        &config.chain.rest_url,
    );
    logging::log_database_connection_details(&config.database.url);

    // An unusable bridge key must stop startup
    let signer = match config.bridge.private_key.as_deref() {
        Some(key) => Some(Arc::new(
            BridgeSigner::from_hex(key).context("invalid BRIDGE_PRIVATE_KEY")?,
        )),
        None => None,
    };
    if signer.is_some() {
        if let Err(reason) = config.bridge.validate_escrow() {
            anyhow::bail!(reason);
        }
    }

    let db_pool = DbPool::new(&config)
        .await
        .context("failed to connect to database")?;
    let db = db_pool.get_connection().clone();

    Migrator::up(&db, None)
        .await
        .context("failed to run migrations")?;

    if signer.is_some() {
        let seeded = bridge::seed_remote_chains(&db, &config.chain.chain_id, &config.bridge)
            .await
            .context("failed to seed bridge remote chains")?;
        logging::log_info(&format!(
            "[{}] 🌉 Bridge enabled with {} remote chain(s)",
            config.chain.chain_id, seeded
        ));
    }

    let repositories = RepositoryFactory::create_repositories(&db_pool);
    let registry = Arc::new(ProtocolRegistry::from_config(db, &config, signer));
    let client = Arc::new(CosmosClient::new(&config.chain).context("invalid chain configuration")?);

    let mut processor = ChainProcessor::new(&config, client, registry, repositories.checkpoint);

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let handle = tokio::spawn(async move { processor.start_processing(shutdown_rx).await });

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for Ctrl+C")?;
    logging::log_info("Shutdown signal received, finishing current height...");
    shutdown_tx.send(true).ok();

    handle.await.context("processor task panicked")??;
    Ok(())
}
