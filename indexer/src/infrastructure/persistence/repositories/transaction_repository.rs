//! Repository functions for recorded metaprotocol transactions

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use serde_json::Value;

use crate::domain::models::CarrierTransaction;
use crate::infrastructure::persistence::entities::transaction;
use crate::infrastructure::persistence::error::DbError;

/// Status message stored for successfully applied transactions
pub const STATUS_OK: &str = "ok";

/// Find a recorded transaction by hash
pub async fn find_by_hash<C: ConnectionTrait>(
    db: &C,
    hash: &str,
) -> Result<Option<transaction::Model>, DbError> {
    let result = transaction::Entity::find()
        .filter(transaction::Column::Hash.eq(hash))
        .one(db)
        .await?;
    Ok(result)
}

/// Record a carrier transaction with the given status message
pub async fn insert<C: ConnectionTrait>(
    db: &C,
    tx: &CarrierTransaction,
    status_message: &str,
) -> Result<transaction::Model, DbError> {
    let content = if tx.decoded.raw.is_null() {
        Value::Object(Default::default())
    } else {
        tx.decoded.raw.clone()
    };

    let model = transaction::ActiveModel {
        hash: Set(tx.hash.clone()),
        height: Set(tx.height as i64),
        content: Set(content),
        content_length: Set(tx.size as i32),
        fees: Set(tx.decoded.fees_string()),
        gas_used: Set(tx.decoded.gas_used),
        status_message: Set(status_message.to_string()),
        date_created: Set(tx.block_time),
        ..Default::default()
    };

    Ok(model.insert(db).await?)
}
