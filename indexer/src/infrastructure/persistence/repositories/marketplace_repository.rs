//! Repository functions for marketplace listings and their details

use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter};

use crate::infrastructure::persistence::entities::{
    marketplace_cft20_detail, marketplace_inscription_detail, marketplace_listing,
};
use crate::infrastructure::persistence::error::DbError;

pub async fn find_by_hash<C: ConnectionTrait>(
    db: &C,
    hash: &str,
) -> Result<Option<marketplace_listing::Model>, DbError> {
    let result = marketplace_listing::Entity::find()
        .filter(marketplace_listing::Column::Hash.eq(hash))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn insert_listing<C: ConnectionTrait>(
    db: &C,
    model: marketplace_listing::ActiveModel,
) -> Result<marketplace_listing::Model, DbError> {
    Ok(model.insert(db).await?)
}

pub async fn update_listing<C: ConnectionTrait>(
    db: &C,
    model: marketplace_listing::ActiveModel,
) -> Result<marketplace_listing::Model, DbError> {
    Ok(model.update(db).await?)
}

pub async fn insert_cft20_detail<C: ConnectionTrait>(
    db: &C,
    model: marketplace_cft20_detail::ActiveModel,
) -> Result<marketplace_cft20_detail::Model, DbError> {
    Ok(model.insert(db).await?)
}

pub async fn insert_inscription_detail<C: ConnectionTrait>(
    db: &C,
    model: marketplace_inscription_detail::ActiveModel,
) -> Result<marketplace_inscription_detail::Model, DbError> {
    Ok(model.insert(db).await?)
}

pub async fn find_cft20_detail<C: ConnectionTrait>(
    db: &C,
    listing_id: i32,
) -> Result<Option<marketplace_cft20_detail::Model>, DbError> {
    let result = marketplace_cft20_detail::Entity::find()
        .filter(marketplace_cft20_detail::Column::ListingId.eq(listing_id))
        .one(db)
        .await?;
    Ok(result)
}

pub async fn find_inscription_detail<C: ConnectionTrait>(
    db: &C,
    listing_id: i32,
) -> Result<Option<marketplace_inscription_detail::Model>, DbError> {
    let result = marketplace_inscription_detail::Entity::find()
        .filter(marketplace_inscription_detail::Column::ListingId.eq(listing_id))
        .one(db)
        .await?;
    Ok(result)
}
