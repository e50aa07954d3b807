use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "launchpad_mint_reservation")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub transaction_id: i32,
    pub launchpad_id: i32,
    pub collection_id: i32,
    pub stage_id: i32,
    pub address: String,
    pub token_id: i64,
    pub is_minted: bool,
    pub is_expired: bool,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
