//! Bridge send/recv/enable actions

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bridge_history")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub height: i64,
    pub transaction_id: i32,
    pub action: String,
    pub sender: String,
    pub token_id: i32,
    pub ticker: String,
    pub amount: Decimal,
    pub remote_chain_id: String,
    pub remote_contract: String,
    pub receiver: String,
    #[sea_orm(column_type = "Text", nullable)]
    pub signature: Option<String>,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
