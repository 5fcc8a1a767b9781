//! social_metrics 表操作

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait,
    QueryFilter, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::converters::{model_to_social, social_to_active_model};
use super::query::{KeyColumns, chronological, newest_first};
use super::{MetricFilter, SeaOrmStorage, retry};
use crate::errors::{DashboardError, Result};
use crate::model::{SocialMetric, SocialMetricInput};

use migration::entities::social_metric::{self, Column};

const COLUMNS: KeyColumns<Column> = KeyColumns {
    id: Column::Id,
    platform: Some(Column::Platform),
    business_unit: Column::BusinessUnit,
    country: Some(Column::Country),
    date: Column::Date,
};

impl SeaOrmStorage {
    pub async fn find_social(&self, filter: &MetricFilter) -> Result<Vec<SocialMetric>> {
        let db = &self.db;
        let models = retry::with_retry("find_social", self.retry_config, || async {
            chronological::<social_metric::Entity>(filter, &COLUMNS)
                .all(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询社交指标失败: {}", e)))?;

        models.into_iter().map(model_to_social).collect()
    }

    pub async fn latest_social(&self, filter: &MetricFilter) -> Result<Option<SocialMetric>> {
        let db = &self.db;
        let model = retry::with_retry("latest_social", self.retry_config, || async {
            newest_first::<social_metric::Entity>(filter, &COLUMNS)
                .one(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询最新社交指标失败: {}", e)))?;

        model.map(model_to_social).transpose()
    }

    /// 按 (platform, business_unit, country, date) upsert，返回落库后的行
    pub async fn upsert_social(&self, input: &SocialMetricInput) -> Result<SocialMetric> {
        let db = &self.db;
        let key = format!(
            "{}/{}/{}/{}",
            input.platform, input.business_unit, input.country, input.date
        );

        let model = retry::with_retry(
            &format!("upsert_social({})", key),
            self.retry_config,
            || async {
                let txn = db.begin().await?;

                social_metric::Entity::insert(social_to_active_model(input, Utc::now()))
                    .on_conflict(
                        OnConflict::columns([
                            Column::Platform,
                            Column::BusinessUnit,
                            Column::Country,
                            Column::Date,
                        ])
                        .update_columns([
                            Column::Impressions,
                            Column::Followers,
                            Column::NumberOfPosts,
                            Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await?;

                let stored = social_metric::Entity::find()
                    .filter(Column::Platform.eq(input.platform.to_string()))
                    .filter(Column::BusinessUnit.eq(input.business_unit.to_string()))
                    .filter(Column::Country.eq(input.country.clone()))
                    .filter(Column::Date.eq(input.date))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("social metric {}", key)))?;

                txn.commit().await?;
                Ok(stored)
            },
        )
        .await
        .map_err(|e| DashboardError::database_operation(format!("Upsert 社交指标 '{}' 失败: {}", key, e)))?;

        info!("Social metric upserted: {} (id={})", key, model.id);
        model_to_social(model)
    }

    /// 按 id 整行更新（created_at 保持不变）
    pub async fn update_social(&self, id: i64, input: &SocialMetricInput) -> Result<SocialMetric> {
        let db = &self.db;
        let result = retry::with_retry(&format!("update_social({})", id), self.retry_config, || async {
            let mut active = social_to_active_model(input, Utc::now());
            active.id = Set(id);
            active.created_at = NotSet;
            active.update(db).await
        })
        .await;

        match result {
            Ok(model) => {
                info!("Social metric updated: id={}", id);
                model_to_social(model)
            }
            Err(DbErr::RecordNotUpdated) => Err(DashboardError::not_found(format!(
                "社交指标不存在: {}",
                id
            ))),
            Err(e) => Err(DashboardError::database_operation(format!(
                "更新社交指标 {} 失败: {}",
                id, e
            ))),
        }
    }

    pub async fn delete_social(&self, id: i64) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_social({})", id), self.retry_config, || async {
            social_metric::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("删除社交指标失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(DashboardError::not_found(format!("社交指标不存在: {}", id)));
        }

        info!("Social metric deleted: id={}", id);
        Ok(())
    }
}
