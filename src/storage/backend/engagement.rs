//! social_engagement_metrics 表操作

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ActiveValue::Set, ColumnTrait, DbErr, EntityTrait,
    QueryFilter, TransactionTrait, sea_query::OnConflict,
};
use tracing::info;

use super::converters::{model_to_engagement, engagement_to_active_model};
use super::query::{KeyColumns, chronological, newest_first};
use super::{MetricFilter, SeaOrmStorage, retry};
use crate::errors::{DashboardError, Result};
use crate::model::{SocialEngagementMetric, SocialEngagementMetricInput};

use migration::entities::social_engagement_metric::{self, Column};

const COLUMNS: KeyColumns<Column> = KeyColumns {
    id: Column::Id,
    platform: Some(Column::Platform),
    business_unit: Column::BusinessUnit,
    country: None,
    date: Column::Date,
};

impl SeaOrmStorage {
    pub async fn find_engagement(&self, filter: &MetricFilter) -> Result<Vec<SocialEngagementMetric>> {
        let db = &self.db;
        let models = retry::with_retry("find_engagement", self.retry_config, || async {
            chronological::<social_engagement_metric::Entity>(filter, &COLUMNS)
                .all(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询互动指标失败: {}", e)))?;

        models.into_iter().map(model_to_engagement).collect()
    }

    pub async fn latest_engagement(&self, filter: &MetricFilter) -> Result<Option<SocialEngagementMetric>> {
        let db = &self.db;
        let model = retry::with_retry("latest_engagement", self.retry_config, || async {
            newest_first::<social_engagement_metric::Entity>(filter, &COLUMNS)
                .one(db)
                .await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("查询最新互动指标失败: {}", e)))?;

        model.map(model_to_engagement).transpose()
    }

    /// 按 (platform, business_unit, date) upsert，返回落库后的行
    pub async fn upsert_engagement(&self, input: &SocialEngagementMetricInput) -> Result<SocialEngagementMetric> {
        let db = &self.db;
        let key = format!(
            "{}/{}/{}",
            input.platform, input.business_unit, input.date
        );

        let model = retry::with_retry(
            &format!("upsert_engagement({})", key),
            self.retry_config,
            || async {
                let txn = db.begin().await?;

                social_engagement_metric::Entity::insert(engagement_to_active_model(input, Utc::now()))
                    .on_conflict(
                        OnConflict::columns([Column::Platform, Column::BusinessUnit, Column::Date])
                        .update_columns([
                            Column::Likes,
                            Column::Comments,
                            Column::Shares,
                            Column::Saves,
                            Column::Clicks,
                            Column::EngagementRate,
                            Column::UpdatedAt,
                        ])
                        .to_owned(),
                    )
                    .exec(&txn)
                    .await?;

                let stored = social_engagement_metric::Entity::find()
                    .filter(Column::Platform.eq(input.platform.to_string()))
                    .filter(Column::BusinessUnit.eq(input.business_unit.to_string()))
                    .filter(Column::Date.eq(input.date))
                    .one(&txn)
                    .await?
                    .ok_or_else(|| DbErr::RecordNotFound(format!("engagement metric {}", key)))?;

                txn.commit().await?;
                Ok(stored)
            },
        )
        .await
        .map_err(|e| DashboardError::database_operation(format!("Upsert 互动指标 '{}' 失败: {}", key, e)))?;

        info!("Engagement metric upserted: {} (id={})", key, model.id);
        model_to_engagement(model)
    }

    /// 按 id 整行更新（created_at 保持不变）
    pub async fn update_engagement(&self, id: i64, input: &SocialEngagementMetricInput) -> Result<SocialEngagementMetric> {
        let db = &self.db;
        let result = retry::with_retry(&format!("update_engagement({})", id), self.retry_config, || async {
            let mut active = engagement_to_active_model(input, Utc::now());
            active.id = Set(id);
            active.created_at = NotSet;
            active.update(db).await
        })
        .await;

        match result {
            Ok(model) => {
                info!("Engagement metric updated: id={}", id);
                model_to_engagement(model)
            }
            Err(DbErr::RecordNotUpdated) => Err(DashboardError::not_found(format!(
                "互动指标不存在: {}",
                id
            ))),
            Err(e) => Err(DashboardError::database_operation(format!(
                "更新互动指标 {} 失败: {}",
                id, e
            ))),
        }
    }

    pub async fn delete_engagement(&self, id: i64) -> Result<()> {
        let db = &self.db;
        let result = retry::with_retry(&format!("delete_engagement({})", id), self.retry_config, || async {
            social_engagement_metric::Entity::delete_by_id(id).exec(db).await
        })
        .await
        .map_err(|e| DashboardError::database_operation(format!("删除互动指标失败: {}", e)))?;

        if result.rows_affected == 0 {
            return Err(DashboardError::not_found(format!("互动指标不存在: {}", id)));
        }

        info!("Engagement metric deleted: id={}", id);
        Ok(())
    }
}
