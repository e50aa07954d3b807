//! Launchpad stage; optional fields stay NULL when not specified

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "launchpad_stage")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub launchpad_id: i32,
    pub collection_id: i32,
    pub name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub start_date: Option<DateTime>,
    pub finish_date: Option<DateTime>,
    pub price: Decimal,
    pub per_user_limit: i32,
    pub has_whitelist: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
