//! Polling loop that drives ingestion for one chain

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::watch;
use tokio::time;

use crate::application::indexer::block_processor::BlockProcessor;
use crate::application::indexer::processor_trait::BlockchainProcessor;
use crate::application::indexer::retry_handler::RetryHandler;
use crate::config::AppConfig;
use crate::domain::errors::BlockProcessorError;
use crate::domain::protocols::ProtocolRegistry;
use crate::infrastructure::chain::ChainClient;
use crate::infrastructure::persistence::repositories::CheckpointRepository;
use crate::utils::logging;

/// Ingests blocks of one chain, one height at a time, behind a persisted checkpoint
pub struct ChainProcessor {
    chain_id: String,
    client: Arc<dyn ChainClient>,
    registry: Arc<ProtocolRegistry>,
    checkpoint_repository: CheckpointRepository,
    start_height: Option<u64>,
    process_interval_ms: u64,
    retry_handler: RetryHandler,
    /// Next height to fetch, loaded from the checkpoint
    next_height: Option<u64>,
}

impl ChainProcessor {
    pub fn new(
        config: &AppConfig,
        client: Arc<dyn ChainClient>,
        registry: Arc<ProtocolRegistry>,
        checkpoint_repository: CheckpointRepository,
    ) -> Self {
        Self {
            chain_id: config.chain.chain_id.clone(),
            client,
            registry,
            checkpoint_repository,
            start_height: config.indexer.start_height,
            process_interval_ms: config.indexer.process_interval_ms,
            retry_handler: RetryHandler::new(),
            next_height: None,
        }
    }

    pub fn with_retry_handler(mut self, retry_handler: RetryHandler) -> Self {
        self.retry_handler = retry_handler;
        self
    }

    /// Next height the loop will fetch, once initialized
    pub fn next_height(&self) -> Option<u64> {
        self.next_height
    }

    /// Load the checkpoint, seeding it from the start height or the chain tip on a cold start
    pub async fn initialize_checkpoint(&mut self) -> Result<u64, BlockProcessorError> {
        if let Some(height) = self.next_height {
            return Ok(height);
        }

        let stored = self
            .retry_handler
            .execute_with_retry_and_logging(
                || self.checkpoint_repository.get_checkpoint(&self.chain_id),
                "get_checkpoint",
                &self.chain_id,
            )
            .await?;

        let height = match stored {
            Some(height) => {
                logging::log_info(&format!(
                    "[{}] ✅ Resuming from checkpoint at height {}",
                    self.chain_id, height
                ));
                height
            }
            None => {
                let seed = match self.start_height {
                    Some(height) => height,
                    None => {
                        self.retry_handler
                            .execute_with_retry_and_logging(
                                || self.client.get_current_height(),
                                "get_current_height",
                                &self.chain_id,
                            )
                            .await?
                    }
                };
                self.checkpoint_repository
                    .save_checkpoint(&self.chain_id, seed)
                    .await?;
                logging::log_info(&format!(
                    "[{}] 📭 No checkpoint found, starting at height {}",
                    self.chain_id, seed
                ));
                seed
            }
        };

        self.next_height = Some(height);
        Ok(height)
    }

    /// Process every height from the checkpoint to the current tip.
    /// The checkpoint only moves after a height is fully processed.
    pub async fn process_available_blocks(
        &mut self,
        shutdown: &watch::Receiver<bool>,
    ) -> Result<u64, BlockProcessorError> {
        let mut next_height = self.initialize_checkpoint().await?;

        let latest_height = self
            .retry_handler
            .execute_with_retry_and_logging(
                || self.client.get_current_height(),
                "get_current_height",
                &self.chain_id,
            )
            .await?;

        let mut processed = 0;
        while next_height <= latest_height {
            if *shutdown.borrow() {
                logging::log_info(&format!(
                    "[{}] 🛑 Shutdown requested, stopping before height {}",
                    self.chain_id, next_height
                ));
                break;
            }

            let summary = BlockProcessor::new(
                &self.chain_id,
                self.client.as_ref(),
                self.registry.as_ref(),
                &self.retry_handler,
            )
            .process_block(next_height)
            .await?;

            self.checkpoint_repository
                .save_checkpoint(&self.chain_id, next_height + 1)
                .await?;
            next_height += 1;
            self.next_height = Some(next_height);
            processed += 1;

            let remaining = latest_height.saturating_sub(summary.height);
            if summary.carriers > 0 || remaining % 100 == 0 {
                logging::log_info(&format!(
                    "[{}] ✅ Block {}: Tx {} | Carriers {} | Applied {} | Rejected {} ({} remaining)",
                    self.chain_id,
                    summary.height,
                    summary.transactions,
                    summary.carriers,
                    summary.applied,
                    summary.rejected,
                    remaining
                ));
            }
        }

        Ok(processed)
    }
}

#[async_trait]
impl BlockchainProcessor for ChainProcessor {
    fn chain_id(&self) -> &str {
        &self.chain_id
    }

    async fn start_processing(
        &mut self,
        mut shutdown: watch::Receiver<bool>,
    ) -> Result<(), BlockProcessorError> {
        logging::log_info(&format!(
            "[{}] 🚀 Starting processing with protocols: {}",
            self.chain_id,
            self.registry.protocols().join(", ")
        ));

        loop {
            if *shutdown.borrow() {
                break;
            }

            if let Err(e) = self.process_available_blocks(&shutdown).await {
                // Reload the checkpoint on the next cycle
                self.next_height = None;
                logging::log_error(&format!(
                    "[{}] ❌ Error processing blocks: {}. Will retry after interval.",
                    self.chain_id, e
                ));
            }

            tokio::select! {
                _ = time::sleep(Duration::from_millis(self.process_interval_ms)) => {}
                changed = shutdown.changed() => {
                    if changed.is_err() {
                        break;
                    }
                }
            }
        }

        logging::log_info(&format!("[{}] 👋 Processing stopped", self.chain_id));
        Ok(())
    }

    async fn process_block(&self, height: u64) -> Result<(), BlockProcessorError> {
        BlockProcessor::new(
            &self.chain_id,
            self.client.as_ref(),
            self.registry.as_ref(),
            &self.retry_handler,
        )
        .process_block(height)
        .await?;
        Ok(())
    }
}
