//! newsletter_metrics 表操作

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait,
    QueryFilter, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::converters::{model_to_newsletter, newsletter_to_active_model};
use super::query::{KeyColumns, chronological, newest_first};
use super::{MetricFilter, SeaOrmStorage, retry};
use crate::errors::{DashboardError, Result};
use crate::model::{NewsletterMetric, NewsletterMetricInput};

use migration::entities::newsletter_metric::{self, Column};

const COLUMNS: KeyColumns<Column> = KeyColumns {
    id: Column::Id,
    platform: None,
    business_unit: Column::BusinessUnit,
    country: Some(Column::Country),
    date: Column::Date,
};

impl SeaOrmStorage {
    pub async fn find_newsletter(&self, filter: &MetricFilter) -> Result<Vec<NewsletterMetric>> {
        let db = &self.db;
        let models = retry::with_retry("find_newsletter", self.retry_config, || async {
            chronological::<newsletter_metric::Entity>(filter, &COLUMNS)
                .all(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询Newsletter 指标失败: {}", e)))?;

        models.into_iter().map(model_to_newsletter).collect()
    }

    pub async fn latest_newsletter(&self, filter: &MetricFilter) -> Result<Option<NewsletterMetric>> {
        let db = &self.db;
        let model = retry::with_retry("latest_newsletter", self.retry_config, || async {
            newest_first::<newsletter_metric::Entity>(filter, &COLUMNS)
                .one(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询最新Newsletter 指标失败: {}", e)))?;

        model.map(model_to_newsletter).transpose()
    }

    /// 按 (business_unit, country, date) upsert，返回落库后的行
    pub async fn upsert_newsletter(&self, input: &NewsletterMetricInput) -> Result<NewsletterMetric> {
        let db = &self.db;
        let key = format!(
            "{}/{}/{}",
            input.business_unit, input.country, input.date
        );

        let model = retry::with_retry(
            &format!("upsert_newsletter({})", key),
            self.retry_config,
            || async {
                let txn = db.begin().await?;

                newsletter_metric::Entity::insert(newsletter_to_active_model(input, Utc::now()))
                    .on_conflict(
                        OnConflict::columns([Column::BusinessUnit, Column::Country, Column::Date])
                        .update_columns([
                            Column::Recipients,
                            Column::OpenRate,
                            Column::NumberOfEmails,
                            Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await?;

                let stored = newsletter_metric::Entity::find()
                    .filter(Column::BusinessUnit.eq(input.business_unit.to_string()))
                    .filter(Column::Country.eq(input.country.clone()))
                    .filter(Column::Date.eq(input.date))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("newsletter metric {}", key)))?;

                txn.commit().await?;
                Ok(stored)
            },
        )
        .await
        .map_err(|e| DashboardError::database_operation(format!("Upsert Newsletter 指标 '{}' 失败: {}", key, e)))?;

        info!("Newsletter metric upserted: {} (id={})", key, model.id);
        model_to_newsletter(model)
    }

    /// 按 id 整行更新（created_at 保持不变）
    pub async fn update_newsletter(&self, id: i64, input: &NewsletterMetricInput) -> Result<NewsletterMetric> {
        let db = &self.db;
        let result = retry::with_retry(&format!("update_newsletter({})", id), self.retry_config, || async {
            let mut active = newsletter_to_active_model(input, Utc::now());
            active.id = Set(id);
            active.created_at = NotSet;
            active.update(db).await
        })
        .await;

        match result {
            Ok(model) => {
                info!("Newsletter metric updated: id={}", id);
                model_to_newsletter(model)
            }
            Err(DbErr::RecordNotUpdated) => Err(DashboardError::not_found(format!(
                "Newsletter 指标不存在: {}",
                id
            ))),
            Err(e) => Err(DashboardError::database_operation(format!(
                "更新Newsletter 指标 {} 失败: {}",
                id, e
            ))),
        }
    }

    pub async fn delete_newsletter(&self, id: i64) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_newsletter({})", id), self.retry_config, || async {
            newsletter_metric::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("删除Newsletter 指标失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(DashboardError::not_found(format!("Newsletter 指标不存在: {}", id)));
        }

        info!("Newsletter metric deleted: id={}", id);
        Ok(())
    }
}
