//! Protocol registry and the per-transaction dispatcher

use std::collections::HashMap;
use std::sync::Arc;

use sea_orm::{DatabaseConnection, TransactionTrait};

use crate::config::AppConfig;
use crate::domain::errors::ProtocolError;
use crate::domain::models::CarrierTransaction;
use crate::domain::protocols::{
    payload, BridgeHandler, Cft20Handler, InscriptionHandler, LaunchpadHandler,
    MarketplaceHandler, PostCommit, ProtocolContext, ProtocolHandler,
};
use crate::domain::services::{urn_parser, BridgeSigner};
use crate::infrastructure::persistence::repositories::transaction_repository;
use crate::utils::logging;

/// Outcome of dispatching one carrier transaction
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchStatus {
    /// Ledger effects committed
    Applied,
    /// Hash already recorded; only outstanding post-commit work was run
    Replayed,
    /// Recorded with the rejection reason, no ledger effects
    Rejected(String),
    /// Protocol not handled here, nothing written
    Skipped,
}

/// Committed result of the first dispatch phase, with the work left for after the commit
#[derive(Debug)]
pub struct Dispatch {
    pub status: DispatchStatus,
    pub protocol: String,
    pub actions: Vec<PostCommit>,
}

impl Dispatch {
    fn done(status: DispatchStatus, protocol: &str) -> Self {
        Self {
            status,
            protocol: protocol.to_string(),
            actions: Vec::new(),
        }
    }
}

/// Maps protocol ids to handlers and owns transaction atomicity
pub struct ProtocolRegistry {
    db: DatabaseConnection,
    chain_id: String,
    handlers: HashMap<&'static str, Arc<dyn ProtocolHandler>>,
}

impl ProtocolRegistry {
    /// Create an empty registry
    pub fn new(db: DatabaseConnection, chain_id: impl Into<String>) -> Self {
        Self {
            db,
            chain_id: chain_id.into(),
            handlers: HashMap::new(),
        }
    }

    /// Registry with every protocol enabled by the configuration.
    /// The bridge is only registered when a signing key is available.
    pub fn from_config(
        db: DatabaseConnection,
        config: &AppConfig,
        signer: Option<Arc<BridgeSigner>>,
    ) -> Self {
        let mut registry = Self::new(db, config.chain.chain_id.clone());
        registry.register(Arc::new(InscriptionHandler::new()));
        registry.register(Arc::new(Cft20Handler::new()));
        registry.register(Arc::new(MarketplaceHandler::new(
            &config.chain,
            &config.marketplace,
        )));
        registry.register(Arc::new(LaunchpadHandler::new(&config.chain)));

        match signer {
            Some(signer) => {
                registry.register(Arc::new(BridgeHandler::new(signer, &config.bridge)));
            }
            None => logging::log_warning(&format!(
                "[{}] ⚠️ No bridge key configured, bridge protocol disabled",
                config.chain.chain_id
            )),
        }

        registry
    }

    pub fn register(&mut self, handler: Arc<dyn ProtocolHandler>) {
        self.handlers.insert(handler.protocol(), handler);
    }

    pub fn handler(&self, protocol: &str) -> Option<&Arc<dyn ProtocolHandler>> {
        self.handlers.get(protocol)
    }

    pub fn protocols(&self) -> Vec<&'static str> {
        let mut protocols: Vec<_> = self.handlers.keys().copied().collect();
        protocols.sort_unstable();
        protocols
    }

    async fn reject(
        &self,
        tx: &CarrierTransaction,
        protocol: &str,
        error: &ProtocolError,
    ) -> Result<Dispatch, ProtocolError> {
        let reason = error.to_string();
        logging::log_warning(&format!(
            "[{}] ⚠️ Rejected {} tx {} at {}: {}",
            self.chain_id, protocol, tx.hash, tx.height, reason
        ));
        transaction_repository::insert(&self.db, tx, &reason).await?;
        Ok(Dispatch::done(DispatchStatus::Rejected(reason), protocol))
    }

    /// Record and apply a carrier transaction atomically.
    /// Post-commit work is returned, not executed.
    pub async fn apply(&self, tx: &CarrierTransaction) -> Result<Dispatch, ProtocolError> {
        let protocol = tx.payload.protocol_id.as_str();

        let Some(handler) = self.handler(protocol) else {
            logging::log_debug(&format!(
                "[{}] Skipping tx {} with unknown protocol '{}'",
                self.chain_id, tx.hash, protocol
            ));
            return Ok(Dispatch::done(DispatchStatus::Skipped, protocol));
        };

        if let Some(existing) = transaction_repository::find_by_hash(&self.db, &tx.hash).await? {
            let actions = handler.pending(&self.db, &existing).await?;
            logging::log_debug(&format!(
                "[{}] Tx {} already processed, {} pending action(s)",
                self.chain_id,
                tx.hash,
                actions.len()
            ));
            return Ok(Dispatch {
                status: DispatchStatus::Replayed,
                protocol: protocol.to_string(),
                actions,
            });
        }

        let urn = match urn_parser::parse(&tx.payload.urn) {
            Ok(urn) => urn,
            Err(e) => return self.reject(tx, protocol, &ProtocolError::from(e)).await,
        };
        let payload = match payload::decode(protocol, &urn.operation, &tx.payload) {
            Ok(payload) => payload,
            Err(e) => return self.reject(tx, protocol, &e).await,
        };

        let db_tx = self.db.begin().await?;
        let row = match transaction_repository::insert(&db_tx, tx, transaction_repository::STATUS_OK).await {
            Ok(row) => row,
            Err(e) => {
                db_tx.rollback().await?;
                return Err(e.into());
            }
        };

        let ctx = ProtocolContext {
            db: &db_tx,
            chain_id: &self.chain_id,
            tx,
            urn: &urn,
            payload: &payload,
            transaction_id: row.id,
        };

        match handler.process(&ctx).await {
            Ok(actions) => {
                db_tx.commit().await?;
                logging::log_info(&format!(
                    "[{}] ✅ {} {} tx {} at {}",
                    self.chain_id, protocol, urn.operation, tx.hash, tx.height
                ));
                Ok(Dispatch {
                    status: DispatchStatus::Applied,
                    protocol: protocol.to_string(),
                    actions,
                })
            }
            Err(e) if e.is_fatal() => {
                db_tx.rollback().await?;
                logging::log_error(&format!(
                    "[{}] ❌ Database failure on tx {}: {}",
                    self.chain_id, tx.hash, e
                ));
                Err(e)
            }
            Err(e) => {
                db_tx.rollback().await?;
                self.reject(tx, protocol, &e).await
            }
        }
    }

    /// Execute post-commit work of a dispatch
    pub async fn settle(&self, dispatch: Dispatch) -> Result<DispatchStatus, ProtocolError> {
        if !dispatch.actions.is_empty() {
            if let Some(handler) = self.handler(&dispatch.protocol) {
                for action in dispatch.actions {
                    handler.settle(&self.db, action).await?;
                }
            }
        }
        Ok(dispatch.status)
    }

    /// Apply a carrier transaction, then settle its post-commit work
    pub async fn process(&self, tx: &CarrierTransaction) -> Result<DispatchStatus, ProtocolError> {
        let dispatch = self.apply(tx).await?;
        self.settle(dispatch).await
    }
}
