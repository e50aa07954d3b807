//! Metaprotocol handlers and the dispatch contract they share

pub mod bridge;
pub mod cft20;
pub mod fields;
pub mod inscription;
pub mod launchpad;
pub mod marketplace;
pub mod payload;
pub mod registry;

use async_trait::async_trait;
use chrono::NaiveDateTime;
use sea_orm::{DatabaseConnection, DatabaseTransaction};

use crate::domain::errors::ProtocolError;
use crate::domain::models::{CarrierTransaction, ProtocolUrn};
use crate::domain::services::SendAttestation;
use crate::infrastructure::persistence::entities::transaction;
use crate::infrastructure::persistence::error::DbError;

pub use bridge::BridgeHandler;
pub use cft20::Cft20Handler;
pub use inscription::InscriptionHandler;
pub use launchpad::LaunchpadHandler;
pub use marketplace::MarketplaceHandler;
pub use payload::ExtensionPayload;
pub use registry::{DispatchStatus, ProtocolRegistry};

/// Everything a handler sees while processing one carrier transaction
pub struct ProtocolContext<'a> {
    /// Open database transaction; committed by the dispatcher on success
    pub db: &'a DatabaseTransaction,
    /// Chain the indexer is configured for
    pub chain_id: &'a str,
    pub tx: &'a CarrierTransaction,
    pub urn: &'a ProtocolUrn,
    pub payload: &'a ExtensionPayload,
    /// Id of the `transaction` row inserted for this carrier
    pub transaction_id: i32,
}

impl<'a> ProtocolContext<'a> {
    pub fn sender(&self) -> &str {
        &self.tx.sender
    }

    pub fn height(&self) -> u64 {
        self.tx.height
    }

    pub fn block_time(&self) -> NaiveDateTime {
        self.tx.block_time
    }

    /// Block time as unix seconds
    pub fn block_timestamp(&self) -> i64 {
        self.tx.block_time.and_utc().timestamp()
    }

    pub fn ensure_chain_id(&self) -> Result<(), ProtocolError> {
        if self.urn.chain_id != self.chain_id {
            return Err(ProtocolError::ChainIdMismatch {
                expected: self.chain_id.to_string(),
                found: self.urn.chain_id.clone(),
            });
        }
        Ok(())
    }

    /// Value of a required key; empty values count as missing
    pub fn require(&self, key: &'static str) -> Result<&'a str, ProtocolError> {
        self.optional(key).ok_or(ProtocolError::MissingField(key))
    }

    pub fn optional(&self, key: &str) -> Option<&'a str> {
        self.urn.get(key).map(str::trim).filter(|v| !v.is_empty())
    }
}

/// Work that may only run once the ledger effects are committed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PostCommit {
    /// Sign a bridge send and store the signature on its history row
    BridgeAttestation {
        history_id: i32,
        attestation: SendAttestation,
    },
}

/// A metaprotocol handler owning its ledger tables
#[async_trait]
pub trait ProtocolHandler: Send + Sync {
    /// Protocol id as it appears in `urn:<protocol>:...`
    fn protocol(&self) -> &'static str;

    /// Apply the operation inside the dispatcher's database transaction
    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError>;

    /// Post-commit work still outstanding for an already recorded transaction
    async fn pending(
        &self,
        _db: &DatabaseConnection,
        _transaction: &transaction::Model,
    ) -> Result<Vec<PostCommit>, DbError> {
        Ok(Vec::new())
    }

    /// Execute one post-commit action against the pooled connection
    async fn settle(&self, _db: &DatabaseConnection, _action: PostCommit) -> Result<(), DbError> {
        Ok(())
    }
}
