//! Metric management service
//!
//! 写入前的校验与规范化，以及四类指标的统一读写入口。
//! 写操作总是返回落库后的规范记录，调用方应以返回值替换本地状态。

use std::sync::Arc;

use serde::{Deserialize, Serialize, Serializer};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use tracing::{debug, info};
use ts_rs::TS;

use crate::errors::{DashboardError, Result};
use crate::model::{
    NewsletterMetric, NewsletterMetricInput, NewsletterMetricView, SocialEngagementMetric,
    SocialEngagementMetricInput, SocialMetric, SocialMetricInput, TS_EXPORT_PATH, WebsiteMetric,
    WebsiteMetricInput, normalize_country,
};
use crate::storage::{MetricFilter, SeaOrmStorage};

/// 指标类型（URL 路径段）
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum MetricKind {
    Social,
    Website,
    Newsletter,
    Engagement,
}

/// 任意类型的指标记录
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum MetricRecord {
    Social(SocialMetric),
    Website(WebsiteMetric),
    #[serde(serialize_with = "serialize_newsletter")]
    Newsletter(NewsletterMetric),
    Engagement(SocialEngagementMetric),
}

fn serialize_newsletter<S: Serializer>(
    metric: &NewsletterMetric,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    NewsletterMetricView::from(metric).serialize(serializer)
}

impl MetricRecord {
    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Social(_) => MetricKind::Social,
            Self::Website(_) => MetricKind::Website,
            Self::Newsletter(_) => MetricKind::Newsletter,
            Self::Engagement(_) => MetricKind::Engagement,
        }
    }

    pub fn id(&self) -> i64 {
        match self {
            Self::Social(r) => r.id,
            Self::Website(r) => r.id,
            Self::Newsletter(r) => r.id,
            Self::Engagement(r) => r.id,
        }
    }
}

/// 任意类型的写入参数
#[derive(Debug, Clone, PartialEq)]
pub enum MetricInput {
    Social(SocialMetricInput),
    Website(WebsiteMetricInput),
    Newsletter(NewsletterMetricInput),
    Engagement(SocialEngagementMetricInput),
}

impl MetricInput {
    /// 按指标类型解析 JSON 请求体，结构不符视为校验错误
    pub fn from_json(kind: MetricKind, value: serde_json::Value) -> Result<Self> {
        let invalid = |e: serde_json::Error| {
            DashboardError::validation(format!("Invalid {} payload: {}", kind, e))
        };
        let input = match kind {
            MetricKind::Social => Self::Social(serde_json::from_value(value).map_err(invalid)?),
            MetricKind::Website => Self::Website(serde_json::from_value(value).map_err(invalid)?),
            MetricKind::Newsletter => {
                Self::Newsletter(serde_json::from_value(value).map_err(invalid)?)
            }
            MetricKind::Engagement => {
                Self::Engagement(serde_json::from_value(value).map_err(invalid)?)
            }
        };
        Ok(input)
    }

    pub fn kind(&self) -> MetricKind {
        match self {
            Self::Social(_) => MetricKind::Social,
            Self::Website(_) => MetricKind::Website,
            Self::Newsletter(_) => MetricKind::Newsletter,
            Self::Engagement(_) => MetricKind::Engagement,
        }
    }

    /// 校验并规范化（国家代码转大写，度量不得为负）
    pub fn validated(self) -> Result<Self> {
        match self {
            Self::Social(mut input) => {
                input.country = normalize_country(&input.country)?;
                ensure_non_negative("impressions", input.impressions)?;
                ensure_non_negative("followers", input.followers)?;
                ensure_non_negative("numberOfPosts", input.number_of_posts)?;
                Ok(Self::Social(input))
            }
            Self::Website(mut input) => {
                input.country = normalize_country(&input.country)?;
                ensure_non_negative("users", input.users)?;
                ensure_non_negative("clicks", input.clicks)?;
                ensure_non_negative("sessions", input.sessions)?;
                Ok(Self::Website(input))
            }
            Self::Newsletter(mut input) => {
                // open_rate 在反序列化时已校验为 0..=1
                input.country = normalize_country(&input.country)?;
                ensure_non_negative("recipients", input.recipients)?;
                ensure_non_negative("numberOfEmails", input.number_of_emails)?;
                Ok(Self::Newsletter(input))
            }
            Self::Engagement(input) => {
                ensure_non_negative("likes", input.likes)?;
                ensure_non_negative("comments", input.comments)?;
                ensure_non_negative("shares", input.shares)?;
                ensure_non_negative("saves", input.saves)?;
                ensure_non_negative("clicks", input.clicks)?;
                if let Some(rate) = input.engagement_rate
                    && (!rate.is_finite() || rate < 0.0)
                {
                    return Err(DashboardError::validation(format!(
                        "engagementRate must be a non-negative number, got {}",
                        rate
                    )));
                }
                Ok(Self::Engagement(input))
            }
        }
    }
}

fn ensure_non_negative(field: &str, value: Option<i64>) -> Result<()> {
    match value {
        Some(v) if v < 0 => Err(DashboardError::validation(format!(
            "{} must not be negative, got {}",
            field, v
        ))),
        _ => Ok(()),
    }
}

/// 指标读写服务
pub struct MetricService {
    storage: Arc<SeaOrmStorage>,
}

impl MetricService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self { storage }
    }

    /// 按维度与日期区间查询，按日期升序
    pub async fn list(&self, kind: MetricKind, filter: &MetricFilter) -> Result<Vec<MetricRecord>> {
        debug!("Listing {} metrics with {:?}", kind, filter);
        let records = match kind {
            MetricKind::Social => self
                .storage
                .find_social(filter)
                .await?
                .into_iter()
                .map(MetricRecord::Social)
                .collect(),
            MetricKind::Website => self
                .storage
                .find_website(filter)
                .await?
                .into_iter()
                .map(MetricRecord::Website)
                .collect(),
            MetricKind::Newsletter => self
                .storage
                .find_newsletter(filter)
                .await?
                .into_iter()
                .map(MetricRecord::Newsletter)
                .collect(),
            MetricKind::Engagement => self
                .storage
                .find_engagement(filter)
                .await?
                .into_iter()
                .map(MetricRecord::Engagement)
                .collect(),
        };
        Ok(records)
    }

    /// 满足过滤条件的最新一条记录
    pub async fn latest(
        &self,
        kind: MetricKind,
        filter: &MetricFilter,
    ) -> Result<Option<MetricRecord>> {
        let record = match kind {
            MetricKind::Social => self
                .storage
                .latest_social(filter)
                .await?
                .map(MetricRecord::Social),
            MetricKind::Website => self
                .storage
                .latest_website(filter)
                .await?
                .map(MetricRecord::Website),
            MetricKind::Newsletter => self
                .storage
                .latest_newsletter(filter)
                .await?
                .map(MetricRecord::Newsletter),
            MetricKind::Engagement => self
                .storage
                .latest_engagement(filter)
                .await?
                .map(MetricRecord::Engagement),
        };
        Ok(record)
    }

    /// 按逻辑主键 upsert
    pub async fn upsert(&self, input: MetricInput) -> Result<MetricRecord> {
        let record = match input.validated()? {
            MetricInput::Social(input) => {
                MetricRecord::Social(self.storage.upsert_social(&input).await?)
            }
            MetricInput::Website(input) => {
                MetricRecord::Website(self.storage.upsert_website(&input).await?)
            }
            MetricInput::Newsletter(input) => {
                MetricRecord::Newsletter(self.storage.upsert_newsletter(&input).await?)
            }
            MetricInput::Engagement(input) => {
                MetricRecord::Engagement(self.storage.upsert_engagement(&input).await?)
            }
        };
        Ok(record)
    }

    /// 按 id 整行更新
    pub async fn update(&self, id: i64, input: MetricInput) -> Result<MetricRecord> {
        let record = match input.validated()? {
            MetricInput::Social(input) => {
                MetricRecord::Social(self.storage.update_social(id, &input).await?)
            }
            MetricInput::Website(input) => {
                MetricRecord::Website(self.storage.update_website(id, &input).await?)
            }
            MetricInput::Newsletter(input) => {
                MetricRecord::Newsletter(self.storage.update_newsletter(id, &input).await?)
            }
            MetricInput::Engagement(input) => {
                MetricRecord::Engagement(self.storage.update_engagement(id, &input).await?)
            }
        };
        Ok(record)
    }

    pub async fn delete(&self, kind: MetricKind, id: i64) -> Result<()> {
        match kind {
            MetricKind::Social => self.storage.delete_social(id).await,
            MetricKind::Website => self.storage.delete_website(id).await,
            MetricKind::Newsletter => self.storage.delete_newsletter(id).await,
            MetricKind::Engagement => self.storage.delete_engagement(id).await,
        }
    }

    /// 批量 upsert（seed 文件导入）
    ///
    /// 逐条写入，遇到第一条失败即停止并返回错误，已写入的记录保留。
    pub async fn upsert_all(&self, inputs: Vec<MetricInput>) -> Result<usize> {
        let total = inputs.len();
        for (index, input) in inputs.into_iter().enumerate() {
            let kind = input.kind();
            self.upsert(input).await.map_err(|e| match e {
                DashboardError::Validation(msg) => DashboardError::validation(format!(
                    "{} record #{}: {}",
                    kind,
                    index + 1,
                    msg
                )),
                other => other,
            })?;
        }
        info!("Upserted {} metric records", total);
        Ok(total)
    }
}
