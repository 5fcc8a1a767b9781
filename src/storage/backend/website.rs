//! website_metrics 表操作

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait,
    QueryFilter, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::converters::{model_to_website, website_to_active_model};
use super::query::{KeyColumns, chronological, newest_first};
use super::{MetricFilter, SeaOrmStorage, retry};
use crate::errors::{DashboardError, Result};
use crate::model::{WebsiteMetric, WebsiteMetricInput};

use migration::entities::website_metric::{self, Column};

const COLUMNS: KeyColumns<Column> = KeyColumns {
    id: Column::Id,
    platform: None,
    business_unit: Column::BusinessUnit,
    country: Some(Column::Country),
    date: Column::Date,
};

impl SeaOrmStorage {
    pub async fn find_website(&self, filter: &MetricFilter) -> Result<Vec<WebsiteMetric>> {
        let db = &self.db;
        let models = retry::with_retry("find_website", self.retry_config, || async {
            chronological::<website_metric::Entity>(filter, &COLUMNS)
                .all(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询网站指标失败: {}", e)))?;

        models.into_iter().map(model_to_website).collect()
    }

    pub async fn latest_website(&self, filter: &MetricFilter) -> Result<Option<WebsiteMetric>> {
        let db = &self.db;
        let model = retry::with_retry("latest_website", self.retry_config, || async {
            newest_first::<website_metric::Entity>(filter, &COLUMNS)
                .one(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询最新网站指标失败: {}", e)))?;

        model.map(model_to_website).transpose()
    }

    /// 按 (business_unit, country, date) upsert，返回落库后的行
    pub async fn upsert_website(&self, input: &WebsiteMetricInput) -> Result<WebsiteMetric> {
        let db = &self.db;
        let key = format!(
            "{}/{}/{}",
            input.business_unit, input.country, input.date
        );

        let model = retry::with_retry(
            &format!("upsert_website({})", key),
            self.retry_config,
            || async {
                let txn = db.begin().await?;

                website_metric::Entity::insert(website_to_active_model(input, Utc::now()))
                    .on_conflict(
                        OnConflict::columns([Column::BusinessUnit, Column::Country, Column::Date])
                        .update_columns([
                            Column::Users,
                            Column::Clicks,
                            Column::Sessions,
                            Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await?;

                let stored = website_metric::Entity::find()
                    .filter(Column::BusinessUnit.eq(input.business_unit.to_string()))
                    .filter(Column::Country.eq(input.country.clone()))
                    .filter(Column::Date.eq(input.date))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("website metric {}", key)))?;

                txn.commit().await?;
                Ok(stored)
            },
        )
        .await
        .map_err(|e| DashboardError::database_operation(format!("Upsert 网站指标 '{}' 失败: {}", key, e)))?;

        info!("Website metric upserted: {} (id={})", key, model.id);
        model_to_website(model)
    }

    /// 按 id 整行更新（created_at 保持不变）
    pub async fn update_website(&self, id: i64, input: &WebsiteMetricInput) -> Result<WebsiteMetric> {
        let db = &self.db;
        let result = retry::with_retry(&format!("update_website({})", id), self.retry_config, || async {
            let mut active = website_to_active_model(input, Utc::now());
            active.id = Set(id);
            active.created_at = NotSet;
            active.update(db).await
        })
        .await;

        match result {
            Ok(model) => {
                info!("Website metric updated: id={}", id);
                model_to_website(model)
            }
            Err(DbErr::RecordNotUpdated) => Err(DashboardError::not_found(format!(
                "网站指标不存在: {}",
                id
            ))),
            Err(e) => Err(DashboardError::database_operation(format!(
                "更新网站指标 {} 失败: {}",
                id, e
            ))),
        }
    }

    pub async fn delete_website(&self, id: i64) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_website({})", id), self.retry_config, || async {
            website_metric::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("删除网站指标失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(DashboardError::not_found(format!("网站指标不存在: {}", id)));
        }

        info!("Website metric deleted: id={}", id);
        Ok(())
    }
}
