use async_trait::async_trait;
use tokio::sync::watch;

use crate::domain::errors::BlockProcessorError;

/// Defines common interface for chain processors
#[async_trait]
pub trait BlockchainProcessor: Send + Sync {
    /// Returns the chain identifier for this processor
    fn chain_id(&self) -> &str;

    /// Runs the polling loop until the shutdown signal turns true
    async fn start_processing(
        &mut self,
        shutdown: watch::Receiver<bool>,
    ) -> Result<(), BlockProcessorError>;

    /// Processes a single block at specified height
    async fn process_block(&self, height: u64) -> Result<(), BlockProcessorError>;
}
