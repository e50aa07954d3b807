//! CFT20 token entity for SeaORM

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub height: i64,
    pub transaction_id: i32,
    pub creator: String,
    pub current_owner: String,
    pub name: String,
    pub ticker: String,
    pub decimals: i32,
    pub max_supply: Decimal,
    pub per_wallet_limit: Decimal,
    pub launch_timestamp: i64,
    pub circulating_supply: Decimal,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
