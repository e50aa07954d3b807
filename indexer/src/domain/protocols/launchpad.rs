//! Launchpads: staged mint campaigns for collections

use std::collections::HashSet;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDateTime};
use rust_decimal::Decimal;
use sea_orm::Set;

use crate::config::ChainConfig;
use crate::domain::errors::ProtocolError;
use crate::domain::protocols::fields;
use crate::domain::protocols::payload::{ExtensionPayload, LaunchPayload, LaunchStage};
use crate::domain::protocols::{PostCommit, ProtocolContext, ProtocolHandler};
use crate::infrastructure::persistence::entities::{
    collection, launchpad, launchpad_mint_reservation, launchpad_stage,
};
use crate::infrastructure::persistence::repositories::{
    inscription_repository, launchpad_repository,
};
use crate::utils::logging;

pub const PROTOCOL: &str = "launchpad";

pub const ACTION_LAUNCH: &str = "launch";

fn timestamp(field: &'static str, seconds: Option<i64>) -> Result<Option<NaiveDateTime>, ProtocolError> {
    seconds
        .map(|s| {
            DateTime::from_timestamp(s, 0)
                .map(|t| t.naive_utc())
                .ok_or_else(|| ProtocolError::invalid(field, "timestamp out of range"))
        })
        .transpose()
}

fn validate_stage(stage: &LaunchStage) -> Result<(), ProtocolError> {
    if stage.price < Decimal::ZERO {
        return Err(ProtocolError::invalid("price", "must not be negative"));
    }
    if stage.per_user_limit < 0 {
        return Err(ProtocolError::invalid("per_user_limit", "must not be negative"));
    }
    if let (Some(start), Some(finish)) = (stage.start, stage.finish) {
        if start > finish {
            return Err(ProtocolError::invalid("finish", "must not be before start"));
        }
    }
    if let Some(whitelist) = &stage.whitelist {
        let mut seen = HashSet::new();
        if let Some(repeated) = whitelist.iter().find(|address| !seen.insert(address.as_str())) {
            return Err(ProtocolError::InvalidPayload(format!(
                "whitelist lists {} more than once",
                repeated
            )));
        }
    }
    Ok(())
}

/// Handler for the `launchpad` protocol
#[derive(Debug, Clone)]
pub struct LaunchpadHandler {
    native_denom: String,
}

impl LaunchpadHandler {
    pub fn new(chain: &ChainConfig) -> Self {
        Self {
            native_denom: chain.native_denom.clone(),
        }
    }

    async fn collection(&self, ctx: &ProtocolContext<'_>) -> Result<collection::Model, ProtocolError> {
        let hash = fields::parse_content_hash("h", ctx.require("h")?)?;
        inscription_repository::find_collection_by_hash(ctx.db, &hash)
            .await?
            .ok_or(ProtocolError::CollectionNotFound(hash))
    }

    async fn launch(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let collection = self.collection(ctx).await?;
        if collection.creator != ctx.sender() {
            return Err(ProtocolError::NotOwner {
                address: ctx.sender().to_string(),
                asset: collection.content_hash.clone(),
            });
        }
        if launchpad_repository::find_by_collection(ctx.db, collection.id)
            .await?
            .is_some()
        {
            return Err(ProtocolError::LaunchpadExists(collection.content_hash.clone()));
        }

        let ExtensionPayload::Launch(LaunchPayload { max_supply, stages }) = ctx.payload else {
            return Err(ProtocolError::InvalidPayload(
                "launch requires a stage configuration".to_string(),
            ));
        };
        if stages.is_empty() {
            return Err(ProtocolError::InvalidPayload("at least one stage is required".to_string()));
        }
        if max_supply.is_some_and(|m| m <= 0) {
            return Err(ProtocolError::invalid("max_supply", "must be positive"));
        }
        for stage in stages {
            validate_stage(stage)?;
        }

        let launchpad = launchpad_repository::insert_launchpad(
            ctx.db,
            launchpad::ActiveModel {
                chain_id: Set(ctx.chain_id.to_string()),
                transaction_id: Set(ctx.transaction_id),
                collection_id: Set(collection.id),
                max_supply: Set(*max_supply),
                minted_supply: Set(0),
                date_created: Set(ctx.block_time()),
                ..Default::default()
            },
        )
        .await?;

        for stage in stages {
            let whitelist = stage.whitelist.clone().unwrap_or_default();
            let row = launchpad_repository::insert_stage(
                ctx.db,
                launchpad_stage::ActiveModel {
                    launchpad_id: Set(launchpad.id),
                    collection_id: Set(collection.id),
                    name: Set(stage.name.clone()),
                    description: Set(stage.description.clone()),
                    start_date: Set(timestamp("start", stage.start)?),
                    finish_date: Set(timestamp("finish", stage.finish)?),
                    price: Set(stage.price),
                    per_user_limit: Set(stage.per_user_limit),
                    has_whitelist: Set(!whitelist.is_empty()),
                    ..Default::default()
                },
            )
            .await?;
            launchpad_repository::insert_whitelist(ctx.db, launchpad.id, row.id, &whitelist)
                .await?;
        }

        logging::log_info(&format!(
            "[{}] 🚀 Launchpad for {} with {} stage(s)",
            ctx.chain_id,
            collection.symbol,
            stages.len()
        ));
        Ok(())
    }

    async fn reserve(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let collection = self.collection(ctx).await?;
        let launchpad = launchpad_repository::find_by_collection(ctx.db, collection.id)
            .await?
            .ok_or_else(|| ProtocolError::LaunchpadNotFound(collection.content_hash.clone()))?;

        let stage_id = ctx
            .require("stg")?
            .parse::<i32>()
            .map_err(|_| ProtocolError::invalid("stg", "must be a stage id"))?;
        let stage = launchpad_repository::stages(ctx.db, launchpad.id)
            .await?
            .into_iter()
            .find(|s| s.id == stage_id)
            .ok_or(ProtocolError::StageNotFound(stage_id))?;

        let now = ctx.block_time();
        let started = stage.start_date.map_or(true, |start| start <= now);
        let not_finished = stage.finish_date.map_or(true, |finish| now <= finish);
        if !started || !not_finished {
            return Err(ProtocolError::StageNotActive(stage_id));
        }

        let minter = ctx.sender();
        if stage.has_whitelist
            && !launchpad_repository::is_whitelisted(ctx.db, stage.id, minter).await?
        {
            return Err(ProtocolError::NotWhitelisted(minter.to_string()));
        }

        if stage.per_user_limit > 0 {
            let reserved = launchpad_repository::reservations_by(ctx.db, stage.id, minter).await?;
            if reserved >= stage.per_user_limit as u64 {
                return Err(ProtocolError::UserLimitReached(minter.to_string()));
            }
        }

        if launchpad
            .max_supply
            .is_some_and(|max| launchpad.minted_supply >= max)
        {
            return Err(ProtocolError::SupplyExhausted(collection.content_hash.clone()));
        }

        let sent = ctx
            .tx
            .decoded
            .amount_sent(minter, &collection.creator, &self.native_denom);
        if sent < stage.price {
            return Err(ProtocolError::InsufficientPayment {
                sent,
                required: stage.price,
            });
        }

        let token_id = launchpad.minted_supply + 1;
        launchpad_repository::insert_reservation(
            ctx.db,
            launchpad_mint_reservation::ActiveModel {
                chain_id: Set(ctx.chain_id.to_string()),
                transaction_id: Set(ctx.transaction_id),
                launchpad_id: Set(launchpad.id),
                collection_id: Set(collection.id),
                stage_id: Set(stage.id),
                address: Set(minter.to_string()),
                token_id: Set(token_id),
                is_minted: Set(false),
                is_expired: Set(false),
                date_created: Set(now),
                ..Default::default()
            },
        )
        .await?;
        launchpad_repository::set_minted_supply(ctx.db, &launchpad, token_id).await?;
        Ok(())
    }
}

#[async_trait]
impl ProtocolHandler for LaunchpadHandler {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        ctx.ensure_chain_id()?;

        match ctx.urn.operation.as_str() {
            ACTION_LAUNCH => self.launch(ctx).await?,
            "reserve" => self.reserve(ctx).await?,
            other => return Err(ProtocolError::UnknownOperation(other.to_string())),
        }

        Ok(Vec::new())
    }
}
