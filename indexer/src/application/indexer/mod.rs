//! Ingestion of chain blocks into the protocol ledgers

pub mod block_processor;
pub mod chain_processor;
pub mod processor_trait;
pub mod retry_handler;

pub use block_processor::{BlockProcessor, BlockSummary};
pub use chain_processor::ChainProcessor;
pub use processor_trait::BlockchainProcessor;
pub use retry_handler::{RetryHandler, Retryable};
