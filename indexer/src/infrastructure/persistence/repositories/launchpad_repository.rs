//! Repository functions for launchpads, stages, whitelists and reservations

use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

use crate::infrastructure::persistence::entities::{
    launchpad, launchpad_mint_reservation, launchpad_stage, launchpad_whitelist,
};
use crate::infrastructure::persistence::error::DbError;

pub async fn find_by_collection<C: ConnectionTrait>(
    db: &C,
    collection_id: i32,
) -> Result<Option<launchpad::Model>, DbError> {
    let result = launchpad::Entity::find()
        .filter(launchpad::Column::CollectionId.eq(collection_id))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn insert_launchpad<C: ConnectionTrait>(
    db: &C,
    model: launchpad::ActiveModel,
) -> Result<launchpad::Model, DbError> {
    Ok(model.insert(db).await?)
}

pub async fn set_minted_supply<C: ConnectionTrait>(
    db: &C,
    launchpad: &launchpad::Model,
    minted_supply: i64,
) -> Result<launchpad::Model, DbError> {
    let mut active_model: launchpad::ActiveModel = launchpad.clone().into();
    active_model.minted_supply = Set(minted_supply);
    Ok(active_model.update(db).await?)
}

pub async fn insert_stage<C: ConnectionTrait>(
    db: &C,
    model: launchpad_stage::ActiveModel,
) -> Result<launchpad_stage::Model, DbError> {
    Ok(model.insert(db).await?)
}

/// Stages of a launchpad in creation order
pub async fn stages<C: ConnectionTrait>(
    db: &C,
    launchpad_id: i32,
) -> Result<Vec<launchpad_stage::Model>, DbError> {
    use sea_orm::QueryOrder;

    let rows = launchpad_stage::Entity::find()
        .filter(launchpad_stage::Column::LaunchpadId.eq(launchpad_id))
        .order_by_asc(launchpad_stage::Column::Id)
        .all(db)
        .await?;
    Ok(rows)
}

pub async fn insert_whitelist<C: ConnectionTrait>(
    db: &C,
    launchpad_id: i32,
    stage_id: i32,
    addresses: &[String],
) -> Result<(), DbError> {
    if addresses.is_empty() {
        return Ok(());
    }

    let models = addresses.iter().map(|address| launchpad_whitelist::ActiveModel {
        launchpad_id: Set(launchpad_id),
        stage_id: Set(stage_id),
        address: Set(address.clone()),
        ..Default::default()
    });
    launchpad_whitelist::Entity::insert_many(models)
        .exec(db)
        .await?;
    Ok(())
}

pub async fn is_whitelisted<C: ConnectionTrait>(
    db: &C,
    stage_id: i32,
    address: &str,
) -> Result<bool, DbError> {
    let count = launchpad_whitelist::Entity::find()
        .filter(launchpad_whitelist::Column::StageId.eq(stage_id))
        .filter(launchpad_whitelist::Column::Address.eq(address))
        .count(db)
        .await?;
    Ok(count > 0)
}

/// Number of reservations an address holds in a stage
pub async fn reservations_by<C: ConnectionTrait>(
    db: &C,
    stage_id: i32,
    address: &str,
) -> Result<u64, DbError> {
    let count = launchpad_mint_reservation::Entity::find()
        .filter(launchpad_mint_reservation::Column::StageId.eq(stage_id))
        .filter(launchpad_mint_reservation::Column::Address.eq(address))
        .count(db)
        .await?;
    Ok(count)
}

pub async fn insert_reservation<C: ConnectionTrait>(
    db: &C,
    model: launchpad_mint_reservation::ActiveModel,
) -> Result<launchpad_mint_reservation::Model, DbError> {
    Ok(model.insert(db).await?)
}

pub async fn reservations_of_collection<C: ConnectionTrait>(
    db: &C,
    collection_id: i32,
) -> Result<Vec<launchpad_mint_reservation::Model>, DbError> {
    let rows = launchpad_mint_reservation::Entity::find()
        .filter(launchpad_mint_reservation::Column::CollectionId.eq(collection_id))
        .all(db)
        .await?;
    Ok(rows)
}
