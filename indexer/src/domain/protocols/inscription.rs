//! Generic inscriptions, NFT collections and ownership transfers

use async_trait::async_trait;
use sea_orm::Set;
use serde_json::Value;

use crate::domain::errors::ProtocolError;
use crate::domain::protocols::fields;
use crate::domain::protocols::payload::{ExtensionPayload, InscriptionPayload};
use crate::domain::protocols::{PostCommit, ProtocolContext, ProtocolHandler};
use crate::infrastructure::persistence::entities::{collection, inscription};
use crate::infrastructure::persistence::repositories::inscription_repository;
use crate::utils::logging;

pub const PROTOCOL: &str = "inscription";

pub const TYPE_GENERIC: &str = "generic";
pub const TYPE_NFT: &str = "nft";
pub const TYPE_NFT_COLLECTION: &str = "nft-collection";
pub const TYPE_MULTIPART: &str = "multipart";

pub const ACTION_INSCRIBE: &str = "inscribe";
pub const ACTION_TRANSFER: &str = "transfer";
pub const ACTION_COLLECTION: &str = "collection";

const COLLECTION_PARENT_TYPE: &str = "/collection";

fn require_payload<'a>(ctx: &ProtocolContext<'a>) -> Result<&'a InscriptionPayload, ProtocolError> {
    match ctx.payload {
        ExtensionPayload::Inscription(payload) => Ok(payload),
        _ => Err(ProtocolError::InvalidPayload("metadata is required".to_string())),
    }
}

/// Attached content must hash to the declared key
fn verify_content(key: &str, payload: &InscriptionPayload) -> Result<usize, ProtocolError> {
    match payload.content.as_deref() {
        Some(content) => {
            let computed = fields::content_hash(content);
            if computed != key {
                return Err(ProtocolError::ContentHashMismatch {
                    declared: key.to_string(),
                    computed,
                });
            }
            Ok(content.len())
        }
        None => Ok(0),
    }
}

fn metadata_string<'a>(metadata: &'a Value, key: &'static str) -> Result<&'a str, ProtocolError> {
    metadata
        .get(key)
        .and_then(|v| v.as_str())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(ProtocolError::MissingField(key))
}

/// Handler for the `inscription` protocol
#[derive(Debug, Default)]
pub struct InscriptionHandler;

impl InscriptionHandler {
    pub fn new() -> Self {
        Self
    }

    async fn ensure_new(&self, ctx: &ProtocolContext<'_>, hash: &str) -> Result<(), ProtocolError> {
        if inscription_repository::find_by_content_hash(ctx.db, hash)
            .await?
            .is_some()
        {
            return Err(ProtocolError::DuplicateInscription(hash.to_string()));
        }
        Ok(())
    }

    #[allow(clippy::too_many_arguments)]
    async fn insert(
        &self,
        ctx: &ProtocolContext<'_>,
        hash: &str,
        inscription_type: &str,
        collection_id: Option<i32>,
        metadata: Value,
        content_size: usize,
    ) -> Result<inscription::Model, ProtocolError> {
        let model = inscription::ActiveModel {
            chain_id: Set(ctx.chain_id.to_string()),
            height: Set(ctx.height() as i64),
            transaction_id: Set(ctx.transaction_id),
            content_hash: Set(hash.to_string()),
            creator: Set(ctx.sender().to_string()),
            current_owner: Set(ctx.sender().to_string()),
            inscription_type: Set(inscription_type.to_string()),
            collection_id: Set(collection_id),
            metadata: Set(metadata),
            content_size: Set(content_size as i32),
            content_path: Set(None),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        let inscription = inscription_repository::insert_inscription(ctx.db, model).await?;

        inscription_repository::insert_history(
            ctx.db,
            &inscription,
            ctx.sender(),
            Some(ctx.sender()),
            ACTION_INSCRIBE,
            ctx.transaction_id,
            ctx.height(),
            ctx.block_time(),
        )
        .await?;
        Ok(inscription)
    }

    async fn inscribe(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let payload = require_payload(ctx)?;
        let hashes = ctx
            .require("h")?
            .split(',')
            .map(|h| fields::parse_content_hash("h", h))
            .collect::<Result<Vec<_>, _>>()?;
        let key = hashes[0].clone();

        self.ensure_new(ctx, &key).await?;
        let content_size = verify_content(&key, payload)?;

        let mut metadata = payload.metadata.clone();
        let parent = metadata
            .get("parent")
            .filter(|p| p.get("type").and_then(|t| t.as_str()) == Some(COLLECTION_PARENT_TYPE))
            .and_then(|p| p.get("identifier"))
            .and_then(|i| i.as_str())
            .map(|i| fields::parse_content_hash("parent.identifier", i))
            .transpose()?;

        let mut collection_id = None;
        let mut inscription_type = if hashes.len() > 1 {
            TYPE_MULTIPART
        } else {
            TYPE_GENERIC
        };

        if let Some(parent_hash) = parent {
            let collection = inscription_repository::find_collection_by_hash(ctx.db, &parent_hash)
                .await?
                .ok_or(ProtocolError::CollectionNotFound(parent_hash))?;
            if collection.creator != ctx.sender() {
                return Err(ProtocolError::NotOwner {
                    address: ctx.sender().to_string(),
                    asset: collection.content_hash.clone(),
                });
            }
            collection_id = Some(collection.id);
            inscription_type = TYPE_NFT;
        }

        if hashes.len() > 1 {
            if let Some(object) = metadata.as_object_mut() {
                object.insert("parts".to_string(), Value::from(hashes[1..].to_vec()));
            }
        }

        self.insert(ctx, &key, inscription_type, collection_id, metadata, content_size)
            .await?;

        logging::log_debug(&format!(
            "[{}] 📜 Inscribed {} ({}) by {}",
            ctx.chain_id,
            key,
            inscription_type,
            ctx.sender()
        ));
        Ok(())
    }

    async fn collection(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let payload = require_payload(ctx)?;
        let hash = fields::parse_content_hash("h", ctx.require("h")?)?;
        let name = metadata_string(&payload.metadata, "name")?;
        let symbol = metadata_string(&payload.metadata, "symbol")?;

        if inscription_repository::find_collection_by_hash(ctx.db, &hash)
            .await?
            .is_some()
        {
            return Err(ProtocolError::DuplicateCollection(hash));
        }
        if inscription_repository::find_collection_by_symbol(ctx.db, ctx.chain_id, symbol)
            .await?
            .is_some()
        {
            return Err(ProtocolError::DuplicateCollection(symbol.to_string()));
        }
        self.ensure_new(ctx, &hash).await?;
        let content_size = verify_content(&hash, payload)?;

        let model = collection::ActiveModel {
            chain_id: Set(ctx.chain_id.to_string()),
            height: Set(ctx.height() as i64),
            transaction_id: Set(ctx.transaction_id),
            content_hash: Set(hash.clone()),
            creator: Set(ctx.sender().to_string()),
            name: Set(name.to_string()),
            symbol: Set(symbol.to_string()),
            metadata: Set(payload.metadata.clone()),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        let collection = inscription_repository::insert_collection(ctx.db, model).await?;

        self.insert(
            ctx,
            &hash,
            TYPE_NFT_COLLECTION,
            Some(collection.id),
            payload.metadata.clone(),
            content_size,
        )
        .await?;

        logging::log_info(&format!(
            "[{}] 🖼️ Collection {} ({}) created by {}",
            ctx.chain_id,
            name,
            symbol,
            ctx.sender()
        ));
        Ok(())
    }

    async fn transfer(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let hash = fields::parse_content_hash("h", ctx.require("h")?)?;
        let destination = fields::validate_address("dst", ctx.require("dst")?)?;

        let inscription = inscription_repository::find_by_content_hash(ctx.db, &hash)
            .await?
            .ok_or_else(|| ProtocolError::InscriptionNotFound(hash.clone()))?;
        if inscription.current_owner != ctx.sender() {
            return Err(ProtocolError::NotOwner {
                address: ctx.sender().to_string(),
                asset: hash,
            });
        }

        inscription_repository::transfer_ownership(
            ctx.db,
            &inscription,
            &destination,
            ctx.sender(),
            ACTION_TRANSFER,
            ctx.transaction_id,
            ctx.height(),
            ctx.block_time(),
        )
        .await?;
        Ok(())
    }
}

#[async_trait]
impl ProtocolHandler for InscriptionHandler {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        ctx.ensure_chain_id()?;

        match ctx.urn.operation.as_str() {
            "inscribe" => self.inscribe(ctx).await?,
            ACTION_COLLECTION => self.collection(ctx).await?,
            "transfer" => self.transfer(ctx).await?,
            other => return Err(ProtocolError::UnknownOperation(other.to_string())),
        }

        Ok(Vec::new())
    }
}
