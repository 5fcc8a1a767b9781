//! Newsletter 指标实体
//!
//! `open_rate` 以小数形式存储（0.25 表示 25%）。

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "newsletter_metrics")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub business_unit: String,
    pub country: String,
    pub date: Date,
    pub recipients: Option<i64>,
    pub open_rate: Option<f64>,
    pub number_of_emails: Option<i64>,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
