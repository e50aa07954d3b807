//! Repository functions for CFT20 tokens, holders and address history

use chrono::NaiveDateTime;
use rust_decimal::Decimal;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::infrastructure::persistence::entities::{token, token_address_history, token_holder};
use crate::infrastructure::persistence::error::DbError;

/// Find a token by chain and ticker
pub async fn find_by_ticker<C: ConnectionTrait>(
    db: &C,
    chain_id: &str,
    ticker: &str,
) -> Result<Option<token::Model>, DbError> {
    let result = token::Entity::find()
        .filter(token::Column::ChainId.eq(chain_id))
        .filter(token::Column::Ticker.eq(ticker))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<token::Model>, DbError> {
    Ok(token::Entity::find_by_id(id).one(db).await?)
}

/// Insert a new token row
pub async fn insert_token<C: ConnectionTrait>(
    db: &C,
    model: token::ActiveModel,
) -> Result<token::Model, DbError> {
    Ok(model.insert(db).await?)
}

/// Set the circulating supply of a token
pub async fn update_circulating_supply<C: ConnectionTrait>(
    db: &C,
    token: &token::Model,
    circulating_supply: Decimal,
) -> Result<token::Model, DbError> {
    let mut active_model: token::ActiveModel = token.clone().into();
    active_model.circulating_supply = Set(circulating_supply);
    Ok(active_model.update(db).await?)
}

/// Get the balance of an address, zero when it never held the token
pub async fn get_balance<C: ConnectionTrait>(
    db: &C,
    token_id: i32,
    address: &str,
) -> Result<Decimal, DbError> {
    let holder = find_holder(db, token_id, address).await?;
    Ok(holder.map(|h| h.amount).unwrap_or(Decimal::ZERO))
}

/// Find the holder row of an address
pub async fn find_holder<C: ConnectionTrait>(
    db: &C,
    token_id: i32,
    address: &str,
) -> Result<Option<token_holder::Model>, DbError> {
    let result = token_holder::Entity::find()
        .filter(token_holder::Column::TokenId.eq(token_id))
        .filter(token_holder::Column::Address.eq(address))
        .one(db)
        .await?;
    Ok(result)
}

/// Store the balance of an address, creating its holder row if needed
pub async fn set_balance<C: ConnectionTrait>(
    db: &C,
    token: &token::Model,
    address: &str,
    amount: Decimal,
    at: NaiveDateTime,
) -> Result<(), DbError> {
    match find_holder(db, token.id, address).await? {
        Some(holder) => {
            let mut active_model: token_holder::ActiveModel = holder.into();
            active_model.amount = Set(amount);
            active_model.date_updated = Set(at);
            active_model.update(db).await?;
        }
        None => {
            let model = token_holder::ActiveModel {
                chain_id: Set(token.chain_id.clone()),
                token_id: Set(token.id),
                address: Set(address.to_string()),
                amount: Set(amount),
                date_updated: Set(at),
                ..Default::default()
            };
            model.insert(db).await?;
        }
    }
    Ok(())
}

/// Append one address history row
pub async fn insert_history<C: ConnectionTrait>(
    db: &C,
    model: token_address_history::ActiveModel,
) -> Result<(), DbError> {
    model.insert(db).await?;
    Ok(())
}

/// Total amount minted by an address for a token
pub async fn minted_by<C: ConnectionTrait>(
    db: &C,
    token_id: i32,
    address: &str,
    mint_action: &str,
) -> Result<Decimal, DbError> {
    let rows = token_address_history::Entity::find()
        .filter(token_address_history::Column::TokenId.eq(token_id))
        .filter(token_address_history::Column::Address.eq(address))
        .filter(token_address_history::Column::Action.eq(mint_action))
        .all(db)
        .await?;
    Ok(rows
        .into_iter()
        .fold(Decimal::ZERO, |total, r| total.saturating_add(r.amount)))
}
