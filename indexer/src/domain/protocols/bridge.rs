//! Cross-chain bridge: escrowed sends with signed attestations, admin receives and token enablement

use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use rust_decimal::Decimal;
use sea_orm::{DatabaseConnection, Set};

use crate::config::BridgeConfig;
use crate::domain::errors::ProtocolError;
use crate::domain::protocols::cft20::{self, TransferOptions};
use crate::domain::protocols::fields;
use crate::domain::protocols::{PostCommit, ProtocolContext, ProtocolHandler};
use crate::domain::services::{BridgeSigner, EnableAttestation, SendAttestation};
use crate::infrastructure::persistence::entities::{bridge_history, bridge_remote_chain, token, transaction};
use crate::infrastructure::persistence::error::DbError;
use crate::infrastructure::persistence::repositories::bridge_repository;
use crate::utils::logging;

pub const PROTOCOL: &str = "bridge";

pub const ACTION_SEND: &str = "send";
pub const ACTION_RECV: &str = "recv";
pub const ACTION_ENABLE: &str = "enable";

/// Store the configured remote chains so handlers can resolve them
pub async fn seed_remote_chains(
    db: &DatabaseConnection,
    chain_id: &str,
    config: &BridgeConfig,
) -> Result<usize, DbError> {
    let now = Utc::now().naive_utc();
    for remote in &config.remote_chains {
        bridge_repository::upsert_remote_chain(
            db,
            chain_id,
            &remote.remote_chain_id,
            &remote.remote_contract,
            remote.ibc_channel.as_deref(),
            now,
        )
        .await?;
    }
    Ok(config.remote_chains.len())
}

/// Handler for the `bridge` protocol
#[derive(Debug, Clone)]
pub struct BridgeHandler {
    signer: Arc<BridgeSigner>,
    admin_address: String,
    escrow_address: String,
}

impl BridgeHandler {
    pub fn new(signer: Arc<BridgeSigner>, config: &BridgeConfig) -> Self {
        Self {
            signer,
            admin_address: config.admin_address.clone(),
            escrow_address: config.escrow_address.clone(),
        }
    }

    fn ensure_admin(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        if self.admin_address.is_empty() || ctx.sender() != self.admin_address {
            return Err(ProtocolError::Unauthorized(ctx.sender().to_string()));
        }
        Ok(())
    }

    async fn remote_chain(
        &self,
        ctx: &ProtocolContext<'_>,
        remote_chain_id: &str,
    ) -> Result<bridge_remote_chain::Model, ProtocolError> {
        bridge_repository::find_remote_chain(ctx.db, ctx.chain_id, remote_chain_id)
            .await?
            .ok_or_else(|| ProtocolError::UnknownRemoteChain(remote_chain_id.to_string()))
    }

    /// Remote chain, contract and token checks shared by `send` and `recv`
    async fn checked_route(
        &self,
        ctx: &ProtocolContext<'_>,
    ) -> Result<(token::Model, bridge_remote_chain::Model), ProtocolError> {
        let ticker = ctx.require("tic")?;
        let remote_chain_id = ctx.require("rch")?;
        let remote_contract = ctx.require("rco")?;

        let remote = self.remote_chain(ctx, remote_chain_id).await?;
        if remote.remote_contract != remote_contract {
            return Err(ProtocolError::RemoteContractMismatch {
                remote_chain_id: remote_chain_id.to_string(),
                expected: remote.remote_contract.clone(),
                found: remote_contract.to_string(),
            });
        }

        let token = cft20::find_token(ctx, ticker).await?;
        let enabled = bridge_repository::find_bridge_token(ctx.db, remote_chain_id, token.id)
            .await?
            .is_some_and(|t| t.enabled);
        if !enabled {
            return Err(ProtocolError::TokenNotEnabled {
                ticker: token.ticker.clone(),
                remote_chain_id: remote_chain_id.to_string(),
            });
        }

        Ok((token, remote))
    }

    #[allow(clippy::too_many_arguments)]
    async fn record_history(
        &self,
        ctx: &ProtocolContext<'_>,
        action: &str,
        token: &token::Model,
        amount: Decimal,
        remote: &bridge_remote_chain::Model,
        receiver: &str,
        signature: Option<String>,
    ) -> Result<bridge_history::Model, ProtocolError> {
        let model = bridge_history::ActiveModel {
            chain_id: Set(ctx.chain_id.to_string()),
            height: Set(ctx.height() as i64),
            transaction_id: Set(ctx.transaction_id),
            action: Set(action.to_string()),
            sender: Set(ctx.sender().to_string()),
            token_id: Set(token.id),
            ticker: Set(token.ticker.clone()),
            amount: Set(amount),
            remote_chain_id: Set(remote.remote_chain_id.clone()),
            remote_contract: Set(remote.remote_contract.clone()),
            receiver: Set(receiver.to_string()),
            signature: Set(signature),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        Ok(bridge_repository::insert_history(ctx.db, model).await?)
    }

    async fn send(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        let (token, remote) = self.checked_route(ctx).await?;
        let amount = cft20::token_amount(ctx, &token)?;
        let receiver = ctx.require("dst")?;

        cft20::transfer(
            ctx,
            &token,
            ctx.sender(),
            &self.escrow_address,
            amount,
            ACTION_SEND,
            TransferOptions {
                from_virtual: false,
                to_virtual: true,
            },
        )
        .await?;

        let history = self
            .record_history(ctx, ACTION_SEND, &token, amount, &remote, receiver, None)
            .await?;

        Ok(vec![PostCommit::BridgeAttestation {
            history_id: history.id,
            attestation: SendAttestation {
                chain_id: ctx.chain_id.to_string(),
                tx_hash: ctx.tx.hash.clone(),
                ticker: token.ticker.clone(),
                amount,
                remote_chain_id: remote.remote_chain_id.clone(),
                remote_contract: remote.remote_contract.clone(),
                receiver: receiver.to_string(),
            },
        }])
    }

    async fn recv(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        self.ensure_admin(ctx)?;
        let (token, remote) = self.checked_route(ctx).await?;
        let amount = cft20::token_amount(ctx, &token)?;
        let receiver = fields::validate_address("dst", ctx.require("dst")?)?;

        cft20::transfer(
            ctx,
            &token,
            &self.escrow_address,
            &receiver,
            amount,
            ACTION_RECV,
            TransferOptions {
                from_virtual: true,
                to_virtual: false,
            },
        )
        .await?;

        self.record_history(ctx, ACTION_RECV, &token, amount, &remote, &receiver, None)
            .await?;
        Ok(Vec::new())
    }

    async fn enable(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        self.ensure_admin(ctx)?;
        let token = cft20::find_token(ctx, ctx.require("tic")?).await?;
        let remote = self.remote_chain(ctx, ctx.require("rch")?).await?;

        if let Some(remote_contract) = ctx.optional("rco") {
            if remote_contract != remote.remote_contract {
                return Err(ProtocolError::RemoteContractMismatch {
                    remote_chain_id: remote.remote_chain_id.clone(),
                    expected: remote.remote_contract.clone(),
                    found: remote_contract.to_string(),
                });
            }
        }

        let attestation = EnableAttestation {
            chain_id: ctx.chain_id.to_string(),
            ticker: token.ticker.clone(),
            decimals: token.decimals,
            remote_chain_id: remote.remote_chain_id.clone(),
            remote_contract: remote.remote_contract.clone(),
        };
        let signature = self.signer.sign(&attestation.message());

        bridge_repository::enable_token(
            ctx.db,
            ctx.chain_id,
            &remote.remote_chain_id,
            token.id,
            &signature,
            ctx.block_time(),
        )
        .await?;

        self.record_history(
            ctx,
            ACTION_ENABLE,
            &token,
            Decimal::ZERO,
            &remote,
            &remote.remote_contract,
            Some(signature),
        )
        .await?;

        logging::log_info(&format!(
            "[{}] 🌉 Enabled {} for {}",
            ctx.chain_id, token.ticker, remote.remote_chain_id
        ));
        Ok(Vec::new())
    }
}

#[async_trait]
impl ProtocolHandler for BridgeHandler {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        ctx.ensure_chain_id()?;

        match ctx.urn.operation.as_str() {
            "send" => self.send(ctx).await,
            "recv" => self.recv(ctx).await,
            "enable" => self.enable(ctx).await,
            other => Err(ProtocolError::UnknownOperation(other.to_string())),
        }
    }

    async fn pending(
        &self,
        db: &DatabaseConnection,
        transaction: &transaction::Model,
    ) -> Result<Vec<PostCommit>, DbError> {
        let unsigned = bridge_repository::find_unsigned(db, transaction.id).await?;

        Ok(unsigned
            .into_iter()
            .filter(|row| row.action == ACTION_SEND)
            .map(|row| PostCommit::BridgeAttestation {
                history_id: row.id,
                attestation: SendAttestation {
                    chain_id: row.chain_id,
                    tx_hash: transaction.hash.clone(),
                    ticker: row.ticker,
                    amount: row.amount,
                    remote_chain_id: row.remote_chain_id,
                    remote_contract: row.remote_contract,
                    receiver: row.receiver,
                },
            })
            .collect())
    }

    async fn settle(&self, db: &DatabaseConnection, action: PostCommit) -> Result<(), DbError> {
        match action {
            PostCommit::BridgeAttestation {
                history_id,
                attestation,
            } => {
                let signature = self.signer.sign(&attestation.message());
                if bridge_repository::attach_signature(db, history_id, &signature).await? {
                    logging::log_info(&format!(
                        "[{}] ✍️ Signed bridge send {} of {} {} to {}",
                        attestation.chain_id,
                        attestation.tx_hash,
                        attestation.amount,
                        attestation.ticker,
                        attestation.remote_chain_id
                    ));
                }
                Ok(())
            }
        }
    }
}
