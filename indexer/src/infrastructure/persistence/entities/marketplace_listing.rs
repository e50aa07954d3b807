//! Marketplace listing escrow state

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "marketplace_listing")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    #[sea_orm(unique)]
    pub transaction_id: i32,
    #[sea_orm(unique)]
    pub hash: String,
    pub seller_address: String,
    pub total: Decimal,
    pub deposit_total: Decimal,
    pub deposit_timeout: i64,
    pub depositor_address: Option<String>,
    pub depositor_timedout_block: Option<i64>,
    pub is_deposited: bool,
    pub is_filled: bool,
    pub is_cancelled: bool,
    pub date_created: DateTime,
    pub date_updated: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
