//! CFT20 fungible tokens: deploy, mint, transfer and burn

use async_trait::async_trait;
use rust_decimal::Decimal;
use sea_orm::Set;

use crate::domain::errors::ProtocolError;
use crate::domain::protocols::fields;
use crate::domain::protocols::{PostCommit, ProtocolContext, ProtocolHandler};
use crate::infrastructure::persistence::entities::{token, token_address_history};
use crate::infrastructure::persistence::repositories::token_repository;
use crate::utils::logging;

pub const PROTOCOL: &str = "cft20";

pub const ACTION_MINT: &str = "mint";
pub const ACTION_TRANSFER: &str = "transfer";
pub const ACTION_BURN: &str = "burn";

const MAX_NAME_LENGTH: usize = 32;
const MAX_TICKER_LENGTH: usize = 10;

/// Accounting flags for the two sides of a transfer
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransferOptions {
    /// Source is a liability account: no balance check, tokens re-enter circulation
    pub from_virtual: bool,
    /// Destination is a liability account: tokens leave circulation
    pub to_virtual: bool,
}

/// Look up a token by ticker on the context's chain
pub async fn find_token(ctx: &ProtocolContext<'_>, ticker: &str) -> Result<token::Model, ProtocolError> {
    let ticker = ticker.trim().to_uppercase();
    token_repository::find_by_ticker(ctx.db, ctx.chain_id, &ticker)
        .await?
        .ok_or(ProtocolError::TokenNotFound(ticker))
}

/// Parse `amt` for `token` into smallest units
pub fn token_amount(ctx: &ProtocolContext<'_>, token: &token::Model) -> Result<Decimal, ProtocolError> {
    let amount = ctx.require("amt")?;
    fields::parse_amount("amt", amount, token.decimals as u32)
}

/// Add a signed delta to the balance of `address`
async fn adjust_balance(
    ctx: &ProtocolContext<'_>,
    token: &token::Model,
    address: &str,
    delta: Decimal,
) -> Result<(), ProtocolError> {
    let balance = token_repository::get_balance(ctx.db, token.id, address).await?;
    let updated = balance
        .checked_add(delta)
        .ok_or_else(|| ProtocolError::invalid("amt", "balance overflows"))?;
    token_repository::set_balance(ctx.db, token, address, updated, ctx.block_time()).await?;
    Ok(())
}

#[allow(clippy::too_many_arguments)]
async fn record_history(
    ctx: &ProtocolContext<'_>,
    token: &token::Model,
    action: &str,
    address: &str,
    sender: &str,
    receiver: &str,
    amount: Decimal,
) -> Result<(), ProtocolError> {
    let model = token_address_history::ActiveModel {
        chain_id: Set(ctx.chain_id.to_string()),
        height: Set(ctx.height() as i64),
        transaction_id: Set(ctx.transaction_id),
        token_id: Set(token.id),
        action: Set(action.to_string()),
        address: Set(address.to_string()),
        sender: Set(sender.to_string()),
        receiver: Set(receiver.to_string()),
        amount: Set(amount),
        date_created: Set(ctx.block_time()),
        ..Default::default()
    };
    token_repository::insert_history(ctx.db, model).await?;
    Ok(())
}

/// Move `amount` of `token` between two addresses, writing one history row per side.
/// Returns the token with its updated circulating supply.
#[allow(clippy::too_many_arguments)]
pub async fn transfer(
    ctx: &ProtocolContext<'_>,
    token: &token::Model,
    from: &str,
    to: &str,
    amount: Decimal,
    action: &str,
    options: TransferOptions,
) -> Result<token::Model, ProtocolError> {
    if amount <= Decimal::ZERO {
        return Err(ProtocolError::invalid("amt", "must be positive"));
    }

    if !options.from_virtual {
        let available = token_repository::get_balance(ctx.db, token.id, from).await?;
        if available < amount {
            return Err(ProtocolError::InsufficientBalance {
                address: from.to_string(),
                available,
                required: amount,
            });
        }
    }

    let mut circulating_supply = token.circulating_supply;
    if options.to_virtual {
        circulating_supply = circulating_supply
            .checked_sub(amount)
            .ok_or_else(|| ProtocolError::invalid("amt", "circulating supply overflows"))?;
    }
    if options.from_virtual {
        circulating_supply = circulating_supply
            .checked_add(amount)
            .filter(|supply| *supply <= token.max_supply)
            .ok_or_else(|| ProtocolError::SupplyExceeded(token.ticker.clone()))?;
    }

    adjust_balance(ctx, token, from, -amount).await?;
    adjust_balance(ctx, token, to, amount).await?;

    record_history(ctx, token, action, from, from, to, -amount).await?;
    record_history(ctx, token, action, to, from, to, amount).await?;

    if circulating_supply != token.circulating_supply {
        let updated =
            token_repository::update_circulating_supply(ctx.db, token, circulating_supply).await?;
        return Ok(updated);
    }

    Ok(token.clone())
}

/// Handler for the `cft20` protocol
#[derive(Debug, Default)]
pub struct Cft20Handler;

impl Cft20Handler {
    pub fn new() -> Self {
        Self
    }

    async fn deploy(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let name = ctx.require("nam")?;
        let name_length = name.chars().count();
        if name_length == 0 || name_length > MAX_NAME_LENGTH {
            return Err(ProtocolError::invalid("nam", "must be 1 to 32 characters"));
        }

        let ticker = ctx.require("tic")?.to_uppercase();
        if ticker.len() > MAX_TICKER_LENGTH || !ticker.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(ProtocolError::invalid(
                "tic",
                "must be 1 to 10 alphanumeric characters",
            ));
        }

        let supply = fields::parse_positive_integer("sup", ctx.require("sup")?)?;
        let decimals = ctx
            .require("dec")?
            .parse::<u32>()
            .ok()
            .filter(|d| *d <= fields::MAX_DECIMALS)
            .ok_or_else(|| ProtocolError::invalid("dec", "must be between 0 and 18"))?;
        let limit = fields::parse_positive_integer("lim", ctx.require("lim")?)?;

        let launch_timestamp = ctx
            .optional("opn")
            .and_then(|v| v.parse::<i64>().ok())
            .unwrap_or_else(|| ctx.block_timestamp());

        let max_supply = fields::scale(supply, decimals)
            .ok_or_else(|| ProtocolError::invalid("sup", "supply overflows"))?;
        let per_wallet_limit = fields::scale(limit, decimals)
            .ok_or_else(|| ProtocolError::invalid("lim", "limit overflows"))?;

        if token_repository::find_by_ticker(ctx.db, ctx.chain_id, &ticker)
            .await?
            .is_some()
        {
            return Err(ProtocolError::DuplicateTicker(ticker));
        }

        let model = token::ActiveModel {
            chain_id: Set(ctx.chain_id.to_string()),
            height: Set(ctx.height() as i64),
            transaction_id: Set(ctx.transaction_id),
            creator: Set(ctx.sender().to_string()),
            current_owner: Set(ctx.sender().to_string()),
            name: Set(name.to_string()),
            ticker: Set(ticker.clone()),
            decimals: Set(decimals as i32),
            max_supply: Set(max_supply),
            per_wallet_limit: Set(per_wallet_limit),
            launch_timestamp: Set(launch_timestamp),
            circulating_supply: Set(Decimal::ZERO),
            date_created: Set(ctx.block_time()),
            ..Default::default()
        };
        token_repository::insert_token(ctx.db, model).await?;

        logging::log_info(&format!(
            "[{}] 🪙 Deployed {} ({}) max supply {} by {}",
            ctx.chain_id,
            ticker,
            name,
            max_supply,
            ctx.sender()
        ));
        Ok(())
    }

    async fn mint(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let token = find_token(ctx, ctx.require("tic")?).await?;
        let amount = token_amount(ctx, &token)?;
        let minter = ctx.sender();

        if token.launch_timestamp > ctx.block_timestamp() {
            return Err(ProtocolError::NotLaunched(token.ticker.clone()));
        }

        let minted = token_repository::minted_by(ctx.db, token.id, minter, ACTION_MINT).await?;
        let within_limit = minted
            .checked_add(amount)
            .is_some_and(|total| total <= token.per_wallet_limit);
        if !within_limit {
            return Err(ProtocolError::MintLimitExceeded(token.ticker.clone()));
        }

        let circulating_supply = token
            .circulating_supply
            .checked_add(amount)
            .filter(|supply| *supply <= token.max_supply)
            .ok_or_else(|| ProtocolError::SupplyExceeded(token.ticker.clone()))?;

        adjust_balance(ctx, &token, minter, amount).await?;
        record_history(ctx, &token, ACTION_MINT, minter, minter, minter, amount).await?;
        token_repository::update_circulating_supply(ctx.db, &token, circulating_supply).await?;
        Ok(())
    }

    async fn transfer(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let token = find_token(ctx, ctx.require("tic")?).await?;
        let amount = token_amount(ctx, &token)?;
        let destination = fields::validate_address("dst", ctx.require("dst")?)?;

        transfer(
            ctx,
            &token,
            ctx.sender(),
            &destination,
            amount,
            ACTION_TRANSFER,
            TransferOptions::default(),
        )
        .await?;
        Ok(())
    }

    async fn burn(&self, ctx: &ProtocolContext<'_>) -> Result<(), ProtocolError> {
        let token = find_token(ctx, ctx.require("tic")?).await?;
        let amount = token_amount(ctx, &token)?;
        let holder = ctx.sender();

        let available = token_repository::get_balance(ctx.db, token.id, holder).await?;
        if available < amount {
            return Err(ProtocolError::InsufficientBalance {
                address: holder.to_string(),
                available,
                required: amount,
            });
        }

        let circulating_supply = token
            .circulating_supply
            .checked_sub(amount)
            .ok_or_else(|| ProtocolError::invalid("amt", "circulating supply overflows"))?;

        adjust_balance(ctx, &token, holder, -amount).await?;
        record_history(ctx, &token, ACTION_BURN, holder, holder, "", -amount).await?;
        token_repository::update_circulating_supply(ctx.db, &token, circulating_supply).await?;
        Ok(())
    }
}

#[async_trait]
impl ProtocolHandler for Cft20Handler {
    fn protocol(&self) -> &'static str {
        PROTOCOL
    }

    async fn process(&self, ctx: &ProtocolContext<'_>) -> Result<Vec<PostCommit>, ProtocolError> {
        ctx.ensure_chain_id()?;

        match ctx.urn.operation.as_str() {
            "deploy" => self.deploy(ctx).await?,
            "mint" => self.mint(ctx).await?,
            "transfer" => self.transfer(ctx).await?,
            "burn" => self.burn(ctx).await?,
            other => return Err(ProtocolError::UnknownOperation(other.to_string())),
        }

        Ok(Vec::new())
    }
}
