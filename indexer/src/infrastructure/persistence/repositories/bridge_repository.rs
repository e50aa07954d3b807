//! Repository functions for bridge remote chains, enabled tokens and history

use chrono::NaiveDateTime;
use sea_orm::sea_query::Expr;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};

use crate::infrastructure::persistence::entities::{
    bridge_history, bridge_remote_chain, bridge_token,
};
use crate::infrastructure::persistence::error::DbError;

pub async fn find_remote_chain<C: ConnectionTrait>(
    db: &C,
    chain_id: &str,
    remote_chain_id: &str,
) -> Result<Option<bridge_remote_chain::Model>, DbError> {
    let result = bridge_remote_chain::Entity::find()
        .filter(bridge_remote_chain::Column::ChainId.eq(chain_id))
        .filter(bridge_remote_chain::Column::RemoteChainId.eq(remote_chain_id))
        .one(db)
        .await?;
    Ok(result)
}

/// Insert or refresh a configured remote chain
pub async fn upsert_remote_chain<C: ConnectionTrait>(
    db: &C,
    chain_id: &str,
    remote_chain_id: &str,
    remote_contract: &str,
    ibc_channel: Option<&str>,
    at: NaiveDateTime,
) -> Result<bridge_remote_chain::Model, DbError> {
    match find_remote_chain(db, chain_id, remote_chain_id).await? {
        Some(existing) => {
            let mut active_model: bridge_remote_chain::ActiveModel = existing.into();
            active_model.remote_contract = Set(remote_contract.to_string());
            active_model.ibc_channel = Set(ibc_channel.map(|c| c.to_string()));
            Ok(active_model.update(db).await?)
        }
        None => {
            let model = bridge_remote_chain::ActiveModel {
                chain_id: Set(chain_id.to_string()),
                remote_chain_id: Set(remote_chain_id.to_string()),
                remote_contract: Set(remote_contract.to_string()),
                ibc_channel: Set(ibc_channel.map(|c| c.to_string())),
                date_created: Set(at),
                ..Default::default()
            };
            Ok(model.insert(db).await?)
        }
    }
}

pub async fn find_bridge_token<C: ConnectionTrait>(
    db: &C,
    remote_chain_id: &str,
    token_id: i32,
) -> Result<Option<bridge_token::Model>, DbError> {
    let result = bridge_token::Entity::find()
        .filter(bridge_token::Column::RemoteChainId.eq(remote_chain_id))
        .filter(bridge_token::Column::TokenId.eq(token_id))
        .one(db)
        .await?;
    Ok(result)
}

/// Enable a token for a remote chain, replacing the stored signature when already present
pub async fn enable_token<C: ConnectionTrait>(
    db: &C,
    chain_id: &str,
    remote_chain_id: &str,
    token_id: i32,
    signature: &str,
    at: NaiveDateTime,
) -> Result<bridge_token::Model, DbError> {
    match find_bridge_token(db, remote_chain_id, token_id).await? {
        Some(existing) => {
            let mut active_model: bridge_token::ActiveModel = existing.into();
            active_model.enabled = Set(true);
            active_model.signature = Set(signature.to_string());
            Ok(active_model.update(db).await?)
        }
        None => {
            let model = bridge_token::ActiveModel {
                chain_id: Set(chain_id.to_string()),
                remote_chain_id: Set(remote_chain_id.to_string()),
                token_id: Set(token_id),
                enabled: Set(true),
                signature: Set(signature.to_string()),
                date_created: Set(at),
                ..Default::default()
            };
            Ok(model.insert(db).await?)
        }
    }
}

pub async fn insert_history<C: ConnectionTrait>(
    db: &C,
    model: bridge_history::ActiveModel,
) -> Result<bridge_history::Model, DbError> {
    Ok(model.insert(db).await?)
}

/// Store a signature on a history row that has none yet.
/// Returns false when the row was already signed.
pub async fn attach_signature<C: ConnectionTrait>(
    db: &C,
    history_id: i32,
    signature: &str,
) -> Result<bool, DbError> {
    let result = bridge_history::Entity::update_many()
        .col_expr(
            bridge_history::Column::Signature,
            Expr::value(signature.to_string()),
        )
        .filter(bridge_history::Column::Id.eq(history_id))
        .filter(bridge_history::Column::Signature.is_null())
        .exec(db)
        .await?;
    Ok(result.rows_affected > 0)
}

/// History rows of a transaction still waiting for a signature
pub async fn find_unsigned<C: ConnectionTrait>(
    db: &C,
    transaction_id: i32,
) -> Result<Vec<bridge_history::Model>, DbError> {
    let rows = bridge_history::Entity::find()
        .filter(bridge_history::Column::TransactionId.eq(transaction_id))
        .filter(bridge_history::Column::Signature.is_null())
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn find_history_by_transaction<C: ConnectionTrait>(
    db: &C,
    transaction_id: i32,
) -> Result<Vec<bridge_history::Model>, DbError> {
    let rows = bridge_history::Entity::find()
        .filter(bridge_history::Column::TransactionId.eq(transaction_id))
        .all(db)
        .await?;
    Ok(rows)
}
