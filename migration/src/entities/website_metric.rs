//! 网站访问指标实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq)]
#[sea_orm(table_name = "website_metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub business_unit: String,
    pub country: String,
    pub date: Date,
    pub users: Option<i64>,
    pub clicks: Option<i64>,
    pub sessions: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
