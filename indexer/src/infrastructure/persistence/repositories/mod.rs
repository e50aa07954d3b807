pub mod bridge_repository;
pub mod checkpoint_repository;
pub mod inscription_repository;
pub mod launchpad_repository;
pub mod marketplace_repository;
pub mod token_repository;
pub mod transaction_repository;

pub use checkpoint_repository::CheckpointRepository;

/// Repositories bound to a pooled connection.
/// Protocol state is written through the free functions of each module so it can share a transaction.
pub struct Repositories {
    /// Repository for the ingestion checkpoint
    pub checkpoint: CheckpointRepository,
}

impl Repositories {
    /// Create a new Repositories instance
    pub fn new(checkpoint: CheckpointRepository) -> Self {
        Self { checkpoint }
    }
}
