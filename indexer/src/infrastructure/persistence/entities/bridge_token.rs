use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bridge_token")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub remote_chain_id: String,
    pub token_id: i32,
    pub enabled: bool,
    #[sea_orm(column_type = "Text")]
    pub signature: String,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
