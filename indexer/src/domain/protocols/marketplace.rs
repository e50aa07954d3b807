//! Escrowed marketplace listings for CFT20 tokens and inscriptions

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::Set;

use crate::config::{ChainConfig, MarketplaceConfig};
use crate::domain::errors::ProtocolError;
use crate::domain::protocols::cft20::{self, TransferOptions};
use crate::domain::protocols::fields;
use crate::domain::protocols::{PostCommit, ProtocolContext, ProtocolHandler};
use crate::infrastructure::persistence::entities::{
    marketplace_cft20_detail, marketplace_inscription_detail, marketplace_listing,
};
use crate::infrastructure::persistence::repositories::{
    inscription_repository, marketplace_repository, token_repository,
};
use crate::utils::logging;

pub const PROTOCOL: &str = "marketplace";

pub const ACTION_LIST: &str = "list";
pub const ACTION_BUY: &str = "buy";
pub const ACTION_DELIST: &str = "delist";

/// Account holding the listed asset until the listing is filled or cancelled
pub fn escrow_address(listing_hash: &str) -> String {
    format!("marketplace:{}", listing_hash)
}

/// What a listing sells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ListingKind {
    Cft20,
    Inscription,
}

/// Handler for the `marketplace` protocol
#[derive(Debug, Clone)]
pub struct MarketplaceHandler {
    native_denom: String,
    max_deposit_timeout: i64,
}

impl MarketplaceHandler {
    pub fn new(chain: &ChainConfig, config: &MarketplaceConfig) -> Self {
        Self {
            native_denom: chain.native_denom.clone(),
            max_deposit_timeout: config.max_deposit_timeout,
        }
    }

    /// Native coins the sender pays to `payee` in this transaction
    fn payment_to(&self, ctx: &ProtocolContext<'_>, payee: &str) -> Decimal {
        ctx.tx
            .decoded
            .amount_sent(ctx.sender(), payee, &self.native_denom)
    }

    /// `mindep` and `to`, shared by both listing kinds
    fn deposit_terms(
        &self,
        ctx: &ProtocolContext<'_>,
        total: Decimal,
    ) -> Result<(Decimal, i64), ProtocolError> {
        let min_deposit = fields::parse_fraction("mindep", ctx.require("mindep")?)?;
        let timeout = fields::parse_i64("to", ctx.require("to")?)?;
        if timeout < 1 || timeout > self.max_deposit_timeout {
            return Err(ProtocolError::invalid(
                "to",
                format!("must be between 1 and {}", self.max_deposit_timeout),
            ));
        }

        let deposit_total = total
            .checked_mul(min_deposit)
            .map(|d| d.ceil())
            .ok_or_else(|| ProtocolError::invalid("mindep", "deposit overflows"))?;
        Ok((deposit_total, timeout))
    }

    async fn insert_listing(
        &self,
        ctx: &ProtocolContext<'_>,
        total: Decimal,
        deposit_total: Decimal,
        deposit_timeout: i64,
    ) -> Result<marketplace_listing::Model, ProtocolError> {
        let model = marketplace_listing::ActiveModel {
            chain_id: Set(ctx.chain_id.to_string()),
            transaction_id: Set(ctx.transaction_id),
            hash: Set(ctx.tx.hash.clone()),
            seller_address: Set(ctx.sender().to_string()),
            total: Set(total),
            deposit_total: Set(deposit_total),
            deposit_timeout: Set(deposit_timeout),
            depositor_address: Set(None),
            depositor_timedout_block: Set(None),
            is_deposited: Set(false),
            is_filled: Set(false),
            is_cancelled: Set(false),
            date_created: Set(ctx.block_time()),
            date_updated: Set(ctx.block_time()),
            ..Default::default()
        };
        Ok(marketplace_repository::insert_listing(ctx.db, model).await?)
    }

    async fn list_cft20(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let token = cft20::find_token(ctx, ctx.require("tic")?).await?;
        let amount = cft20::token_amount(ctx, &token)?;
        let whole_amount = fields::parse_positive_decimal("amt", ctx.require("amt")?)?;
        let price_per_token = fields::parse_positive_decimal("ppt", ctx.require("ppt")?)?;

        let total = whole_amount
            .checked_mul(price_per_token)
            .map(|t| t.ceil())
            .ok_or_else(|| ProtocolError::invalid("ppt", "total overflows"))?;
        let (deposit_total, deposit_timeout) = self.deposit_terms(ctx, total)?;

        let listing = self
            .insert_listing(ctx, total, deposit_total, deposit_timeout)
            .await?;

        cft20::transfer(
            ctx,
            &token,
            ctx.sender(),
            &escrow_address(&listing.hash),
            amount,
            ACTION_LIST,
            TransferOptions::default(),
        )
        .await?;

        let detail = marketplace_cft20_detail::ActiveModel {
            listing_id: Set(listing.id),
            token_id: Set(token.id),
            amount: Set(amount),
            ppt: Set(price_per_token),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        marketplace_repository::insert_cft20_detail(ctx.db, detail).await?;

        logging::log_info(&format!(
            "[{}] 🏷️ Listed {} {} for {} {}",
            ctx.chain_id, whole_amount, token.ticker, total, self.native_denom
        ));
        Ok(())
    }

    async fn list_inscription(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let hash = fields::parse_content_hash("h", ctx.require("h")?)?;
        let total = fields::parse_positive_integer("amt", ctx.require("amt")?)?;
        let (deposit_total, deposit_timeout) = self.deposit_terms(ctx, total)?;

        let inscription = inscription_repository::find_by_content_hash(ctx.db, &hash)
            .await?
            .ok_or_else(|| ProtocolError::InscriptionNotFound(hash.clone()))?;
        if inscription.current_owner != ctx.sender() {
            return Err(ProtocolError::NotOwner {
                address: ctx.sender().to_string(),
                asset: hash,
            });
        }

        let listing = self
            .insert_listing(ctx, total, deposit_total, deposit_timeout)
            .await?;

        inscription_repository::transfer_ownership(
            ctx.db,
            &inscription,
            &escrow_address(&listing.hash),
            ctx.sender(),
            ACTION_LIST,
            ctx.transaction_id,
            ctx.height(),
            ctx.block_time(),
        )
        .await?;

        let detail = marketplace_inscription_detail::ActiveModel {
            listing_id: Set(listing.id),
            inscription_id: Set(inscription.id),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        marketplace_repository::insert_inscription_detail(ctx.db, detail).await?;
        Ok(())
    }

    /// Listing referenced by `h`, refusing filled and cancelled ones
    async fn open_listing(
        &self,
        ctx: &ProtocolContext<'_>,
    ) -> Result<marketplace_listing::Model, ProtocolError> {
        let hash = ctx.require("h")?.trim().to_uppercase();
        let listing = marketplace_repository::find_by_hash(ctx.db, &hash)
            .await?
            .ok_or_else(|| ProtocolError::ListingNotFound(hash.clone()))?;
        if listing.is_filled || listing.is_cancelled {
            return Err(ProtocolError::ListingClosed(hash));
        }
        Ok(listing)
    }

    fn has_active_deposit(&self, ctx: &ProtocolContext<'_>, listing: &marketplace_listing::Model) -> bool {
        listing.is_deposited
            && listing
                .depositor_timedout_block
                .is_some_and(|block| ctx.height() as i64 <= block)
    }

    async fn deposit(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let listing = self.open_listing(ctx).await?;
        if listing.seller_address == ctx.sender() {
            return Err(ProtocolError::Unauthorized(ctx.sender().to_string()));
        }
        if self.has_active_deposit(ctx, &listing) {
            return Err(ProtocolError::ListingDeposited(listing.hash.clone()));
        }

        let sent = self.payment_to(ctx, &listing.seller_address);
        if sent < listing.deposit_total {
            return Err(ProtocolError::InsufficientPayment {
                sent,
                required: listing.deposit_total,
            });
        }

        let timedout_block = ctx.height() as i64 + listing.deposit_timeout;
        let mut active_model: marketplace_listing::ActiveModel = listing.into();
        active_model.is_deposited = Set(true);
        active_model.depositor_address = Set(Some(ctx.sender().to_string()));
        active_model.depositor_timedout_block = Set(Some(timedout_block));
        active_model.date_updated = Set(ctx.block_time());
        marketplace_repository::update_listing(ctx.db, active_model).await?;
        Ok(())
    }

    async fn listing_kind(
        &self,
        ctx: &ProtocolContext<'_>,
        listing: &marketplace_listing::Model,
    ) -> Result<ListingKind, ProtocolError> {
        if marketplace_repository::find_cft20_detail(ctx.db, listing.id)
            .await?
            .is_some()
        {
            return Ok(ListingKind::Cft20);
        }
        if marketplace_repository::find_inscription_detail(ctx.db, listing.id)
            .await?
            .is_some()
        {
            return Ok(ListingKind::Inscription);
        }
        Err(ProtocolError::InvalidPayload(format!(
            "listing {} has no details",
            listing.hash
        )))
    }

    /// Move the listed asset out of escrow to `receiver`
    async fn release(
        &self,
        ctx: &ProtocolContext<'_>,
        listing: &marketplace_listing::Model,
        kind: ListingKind,
        receiver: &str,
        action: &str,
    ) -> Result<(), ProtocolError> {
        let escrow = escrow_address(&listing.hash);
        match kind {
            ListingKind::Cft20 => {
                let detail = marketplace_repository::find_cft20_detail(ctx.db, listing.id)
                    .await?
                    .ok_or_else(|| ProtocolError::ListingNotFound(listing.hash.clone()))?;
                let token = token_repository::find_by_id(ctx.db, detail.token_id)
                    .await?
                    .ok_or_else(|| ProtocolError::TokenNotFound(detail.token_id.to_string()))?;
                cft20::transfer(
                    ctx,
                    &token,
                    &escrow,
                    receiver,
                    detail.amount,
                    action,
                    TransferOptions::default(),
                )
                .await?;
            }
            ListingKind::Inscription => {
                let detail = marketplace_repository::find_inscription_detail(ctx.db, listing.id)
                    .await?
                    .ok_or_else(|| ProtocolError::ListingNotFound(listing.hash.clone()))?;
                let inscription = inscription_repository::find_by_id(ctx.db, detail.inscription_id)
                    .await?
                    .ok_or_else(|| {
                        ProtocolError::InscriptionNotFound(detail.inscription_id.to_string())
                    })?;
                inscription_repository::transfer_ownership(
                    ctx.db,
                    &inscription,
                    receiver,
                    &escrow,
                    action,
                    ctx.transaction_id,
                    ctx.height(),
                    ctx.block_time(),
                )
                .await?;
            }
        }
        Ok(())
    }

    async fn buy(&self, ctx: &ProtocolContext<'_>, expected: Option<ListingKind>) -> Result<(), ProtocolError> {
        let listing = self.open_listing(ctx).await?;
        let kind = self.listing_kind(ctx, &listing).await?;
        if expected.is_some_and(|e| e != kind) {
            return Err(ProtocolError::InvalidPayload(format!(
                "listing {} does not sell this asset kind",
                listing.hash
            )));
        }

        let deposited_by_sender = listing.depositor_address.as_deref() == Some(ctx.sender());
        if !deposited_by_sender || !self.has_active_deposit(ctx, &listing) {
            return Err(ProtocolError::ListingNotDeposited(listing.hash.clone()));
        }

        let required = listing.total - listing.deposit_total;
        let sent = self.payment_to(ctx, &listing.seller_address);
        if sent < required {
            return Err(ProtocolError::InsufficientPayment { sent, required });
        }

        self.release(ctx, &listing, kind, ctx.sender(), ACTION_BUY)
            .await?;

        let hash = listing.hash.clone();
        let mut active_model: marketplace_listing::ActiveModel = listing.into();
        active_model.is_filled = Set(true);
        active_model.date_updated = Set(ctx.block_time());
        marketplace_repository::update_listing(ctx.db, active_model).await?;

        logging::log_info(&format!(
            "[{}] 🤝 Listing {} filled by {}",
            ctx.chain_id,
            hash,
            ctx.sender()
        ));
        Ok(())
    }

    async fn delist(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let listing = self.open_listing(ctx).await?;
        if listing.seller_address != ctx.sender() {
            return Err(ProtocolError::Unauthorized(ctx.sender().to_string()));
        }
        if self.has_active_deposit(ctx, &listing) {
            return Err(ProtocolError::ListingDeposited(listing.hash.clone()));
        }

        let kind = self.listing_kind(ctx, &listing).await?;
        let seller = listing.seller_address.clone();
        self.release(ctx, &listing, kind, &seller, ACTION_DELIST)
            .await?;

        let mut active_model: marketplace_listing::ActiveModel = listing.into();
        active_model.is_cancelled = Set(true);
        active_model.date_updated = Set(ctx.block_time());
        marketplace_repository::update_listing(ctx.db, active_model).await?;
        Ok(())
    }
}

#[async_trait]
impl ProtocolHandler for MarketplaceHandler {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        ctx.ensure_chain_id()?;

        match ctx.urn.operation.as_str() {
            "list.cft20" => self.list_cft20(ctx).await?,
            "list.inscription" => self.list_inscription(ctx).await?,
            "deposit" => self.deposit(ctx).await?,
            "buy.cft20" => self.buy(ctx, Some(ListingKind::Cft20)).await?,
            "buy.inscription" => self.buy(ctx, Some(ListingKind::Inscription)).await?,
            "buy" => self.buy(ctx, None).await?,
            "delist" => self.delist(ctx).await?,
            other => return Err(ProtocolError::UnknownOperation(other.to_string())),
        }

        Ok(Vec::new())
    }
}
