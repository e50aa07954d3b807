use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "bridge_remote_chain")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub chain_id: String,
    pub remote_chain_id: String,
    pub remote_contract: String,
    pub ibc_channel: Option<String>,
    pub date_created: DateTime,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
