//! Repository functions for inscriptions and collections

use chrono::NaiveDateTime;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::infrastructure::persistence::entities::{collection, inscription, inscription_history};
use crate::infrastructure::persistence::error::DbError;

pub async fn find_by_content_hash<C: ConnectionTrait>(
    db: &C,
    content_hash: &str,
) -> Result<Option<inscription::Model>, DbError> {
    let result = inscription::Entity::find()
        .filter(inscription::Column::ContentHash.eq(content_hash))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn find_by_id<C: ConnectionTrait>(
    db: &C,
    id: i32,
) -> Result<Option<inscription::Model>, DbError> {
    Ok(inscription::Entity::find_by_id(id).one(db).await?)
}

pub async fn insert_inscription<C: ConnectionTrait>(
    db: &C,
    model: inscription::ActiveModel,
) -> Result<inscription::Model, DbError> {
    Ok(model.insert(db).await?)
}

/// Move an inscription to a new owner and append the history row
#[allow(clippy::too_many_arguments)]
pub async fn transfer_ownership<C: ConnectionTrait>(
    db: &C,
    inscription: &inscription::Model,
    receiver: &str,
    sender: &str,
    action: &str,
    transaction_id: i32,
    height: u64,
    at: NaiveDateTime,
) -> Result<inscription::Model, DbError> {
    let mut active_model: inscription::ActiveModel = inscription.clone().into();
    active_model.current_owner = Set(receiver.to_string());
    let updated = active_model.update(db).await?;

    insert_history(
        db,
        inscription,
        sender,
        Some(receiver),
        action,
        transaction_id,
        height,
        at,
    )
    .await?;

    Ok(updated)
}

#[allow(clippy::too_many_arguments)]
pub async fn insert_history<C: ConnectionTrait>(
    db: &C,
    inscription: &inscription::Model,
    sender: &str,
    receiver: Option<&str>,
    action: &str,
    transaction_id: i32,
    height: u64,
    at: NaiveDateTime,
) -> Result<(), DbError> {
    let model = inscription_history::ActiveModel {
        chain_id: Set(inscription.chain_id.clone()),
        height: Set(height as i64),
        transaction_id: Set(transaction_id),
        inscription_id: Set(inscription.id),
        sender: Set(sender.to_string()),
        receiver: Set(receiver.map(|r| r.to_string())),
        action: Set(action.to_string()),
        date_created: Set(at),
        ..Default::default()
    };
    model.insert(db).await?;
    Ok(())
}

pub async fn find_collection_by_hash<C: ConnectionTrait>(
    db: &C,
    content_hash: &str,
) -> Result<Option<collection::Model>, DbError> {
    let result = collection::Entity::find()
        .filter(collection::Column::ContentHash.eq(content_hash))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn find_collection_by_symbol<C: ConnectionTrait>(
    db: &C,
    chain_id: &str,
    symbol: &str,
) -> Result<Option<collection::Model>, DbError> {
    let result = collection::Entity::find()
        .filter(collection::Column::ChainId.eq(chain_id))
        .filter(collection::Column::Symbol.eq(symbol))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn insert_collection<C: ConnectionTrait>(
    db: &C,
    model: collection::ActiveModel,
) -> Result<collection::Model, DbError> {
    Ok(model.insert(db).await?)
}
