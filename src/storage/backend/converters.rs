//! 实体 Model 与领域记录之间的转换

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sea_orm::ActiveValue::{NotSet, Set};

use crate::errors::{DashboardError, Result};
use crate::model::{
    BusinessUnit, NewsletterMetric, NewsletterMetricInput, OpenRate, Platform,
    SocialEngagementMetric, SocialEngagementMetricInput, SocialMetric, SocialMetricInput,
    WebsiteMetric, WebsiteMetricInput,
};
use migration::entities::{
    newsletter_metric, social_engagement_metric, social_metric, website_metric,
};

fn parse_platform(raw: &str) -> Result<Platform> {
    Platform::from_str(raw)
        .map_err(|_| DashboardError::database_operation(format!("未知平台: {}", raw)))
}

fn parse_business_unit(raw: &str) -> Result<BusinessUnit> {
    BusinessUnit::from_str(raw)
        .map_err(|_| DashboardError::database_operation(format!("未知业务单元: {}", raw)))
}

// ============ Model -> 记录 ============

pub fn model_to_social(model: social_metric::Model) -> Result<SocialMetric> {
    Ok(SocialMetric {
        id: model.id,
        platform: parse_platform(&model.platform)?,
        business_unit: parse_business_unit(&model.business_unit)?,
        country: model.country,
        date: model.date,
        impressions: model.impressions,
        followers: model.followers,
        number_of_posts: model.number_of_posts,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_website(model: website_metric::Model) -> Result<WebsiteMetric> {
    Ok(WebsiteMetric {
        id: model.id,
        business_unit: parse_business_unit(&model.business_unit)?,
        country: model.country,
        date: model.date,
        users: model.users,
        clicks: model.clicks,
        sessions: model.sessions,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_newsletter(model: newsletter_metric::Model) -> Result<NewsletterMetric> {
    // 存量数据中的非法 open_rate 会直接报错，不做静默修正
    let open_rate = model.open_rate.map(OpenRate::from_fraction).transpose()?;
    Ok(NewsletterMetric {
        id: model.id,
        business_unit: parse_business_unit(&model.business_unit)?,
        country: model.country,
        date: model.date,
        recipients: model.recipients,
        open_rate,
        number_of_emails: model.number_of_emails,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

pub fn model_to_engagement(
    model: social_engagement_metric::Model,
) -> Result<SocialEngagementMetric> {
    Ok(SocialEngagementMetric {
        id: model.id,
        platform: parse_platform(&model.platform)?,
        business_unit: parse_business_unit(&model.business_unit)?,
        date: model.date,
        likes: model.likes,
        comments: model.comments,
        shares: model.shares,
        saves: model.saves,
        clicks: model.clicks,
        engagement_rate: model.engagement_rate,
        created_at: model.created_at,
        updated_at: model.updated_at,
    })
}

// ============ 写入参数 -> ActiveModel ============
//
// `now` 同时用作 created_at 与 updated_at；冲突更新时只覆盖度量列与 updated_at，
// 因此已存在行的 created_at 保持不变。

pub fn social_to_active_model(
    input: &SocialMetricInput,
    now: DateTime<Utc>,
) -> social_metric::ActiveModel {
    social_metric::ActiveModel {
        id: NotSet,
        platform: Set(input.platform.to_string()),
        business_unit: Set(input.business_unit.to_string()),
        country: Set(input.country.clone()),
        date: Set(input.date),
        impressions: Set(input.impressions),
        followers: Set(input.followers),
        number_of_posts: Set(input.number_of_posts),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn website_to_active_model(
    input: &WebsiteMetricInput,
    now: DateTime<Utc>,
) -> website_metric::ActiveModel {
    website_metric::ActiveModel {
        id: NotSet,
        business_unit: Set(input.business_unit.to_string()),
        country: Set(input.country.clone()),
        date: Set(input.date),
        users: Set(input.users),
        clicks: Set(input.clicks),
        sessions: Set(input.sessions),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn newsletter_to_active_model(
    input: &NewsletterMetricInput,
    now: DateTime<Utc>,
) -> newsletter_metric::ActiveModel {
    newsletter_metric::ActiveModel {
        id: NotSet,
        business_unit: Set(input.business_unit.to_string()),
        country: Set(input.country.clone()),
        date: Set(input.date),
        recipients: Set(input.recipients),
        open_rate: Set(input.open_rate.map(f64::from)),
        number_of_emails: Set(input.number_of_emails),
        created_at: Set(now),
        updated_at: Set(now),
    }
}

pub fn engagement_to_active_model(
    input: &SocialEngagementMetricInput,
    now: DateTime<Utc>,
) -> social_engagement_metric::ActiveModel {
    social_engagement_metric::ActiveModel {
        id: NotSet,
        platform: Set(input.platform.to_string()),
        business_unit: Set(input.business_unit.to_string()),
        date: Set(input.date),
        likes: Set(input.likes),
        comments: Set(input.comments),
        shares: Set(input.shares),
        saves: Set(input.saves),
        clicks: Set(input.clicks),
        engagement_rate: Set(input.engagement_rate),
        created_at: Set(now),
        updated_at: Set(now),
    }
}
