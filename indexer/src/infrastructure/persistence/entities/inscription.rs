//! Inscription entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "inscription")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub height: i64,
    pub transaction_id: i32,
    #[sea_orm(unique)]
    pub content_hash: String,
    pub creator: String,
    pub current_owner: String,
    pub inscription_type: String,
    pub collection_id: Option<i32>,
    pub metadata: Json,
    pub content_size: i32,
    pub content_path: Option<String>,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
