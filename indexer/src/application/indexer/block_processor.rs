//! Block processor for handling a single height

use crate::application::indexer::retry_handler::RetryHandler;
use crate::domain::errors::{BlockProcessorError, ProtocolError};
use crate::domain::protocols::{DispatchStatus, ProtocolRegistry};
use crate::domain::services::classifier;
use crate::infrastructure::chain::ChainClient;
use crate::utils::logging;

/// Counters for one processed block
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BlockSummary {
    pub height: u64,
    pub transactions: usize,
    pub carriers: usize,
    pub applied: usize,
    pub rejected: usize,
}

/// Fetches, classifies and dispatches the transactions of one block
pub struct BlockProcessor<'a> {
    chain_id: &'a str,
    client: &'a dyn ChainClient,
    registry: &'a ProtocolRegistry,
    retry_handler: &'a RetryHandler,
}

impl<'a> BlockProcessor<'a> {
    pub fn new(
        chain_id: &'a str,
        client: &'a dyn ChainClient,
        registry: &'a ProtocolRegistry,
        retry_handler: &'a RetryHandler,
    ) -> Self {
        Self {
            chain_id,
            client,
            registry,
            retry_handler,
        }
    }

    /// Process a single block; any returned error leaves the height unprocessed
    pub async fn process_block(&self, height: u64) -> Result<BlockSummary, BlockProcessorError> {
        let block = self
            .retry_handler
            .execute_with_retry_and_logging(
                || self.client.get_block_transactions(height),
                "get_block_transactions",
                self.chain_id,
            )
            .await?;

        let mut summary = BlockSummary {
            height,
            transactions: block.transactions.len(),
            ..Default::default()
        };

        for raw in &block.transactions {
            let decoded = self
                .retry_handler
                .execute_with_retry_and_logging(
                    || self.client.get_transaction(&raw.hash),
                    "get_transaction",
                    self.chain_id,
                )
                .await?;

            if !decoded.is_success() {
                logging::log_debug(&format!(
                    "[{}] Skipping failed tx {} (code {})",
                    self.chain_id, raw.hash, decoded.code
                ));
                continue;
            }

            let carrier = match classifier::classify(&decoded, block.time, raw.size) {
                Ok(Some(carrier)) => carrier,
                Ok(None) => continue,
                Err(e) => {
                    logging::log_debug(&format!(
                        "[{}] Tx {} is not a usable carrier: {}",
                        self.chain_id, raw.hash, e
                    ));
                    continue;
                }
            };
            summary.carriers += 1;

            match self.registry.process(&carrier).await {
                Ok(DispatchStatus::Applied) => summary.applied += 1,
                Ok(DispatchStatus::Rejected(_)) => summary.rejected += 1,
                Ok(DispatchStatus::Replayed) | Ok(DispatchStatus::Skipped) => {}
                Err(ProtocolError::Db(e)) => return Err(BlockProcessorError::DbError(e)),
                Err(e) => return Err(BlockProcessorError::ProcessingError(e.to_string())),
            }
        }

        Ok(summary)
    }
}
