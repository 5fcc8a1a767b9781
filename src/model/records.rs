use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{BusinessUnit, OpenRate, Platform, TS_EXPORT_PATH};

/// 社交媒体指标（每个 platform + business unit + country + date 一行）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetric {
    pub id: i64,
    pub platform: Platform,
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    pub impressions: Option<i64>,
    pub followers: Option<i64>,
    pub number_of_posts: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// 网站指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteMetric {
    pub id: i64,
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    pub users: Option<i64>,
    pub clicks: Option<i64>,
    pub sessions: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Newsletter 指标
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterMetric {
    pub id: i64,
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    pub recipients: Option<i64>,
    /// 小数形式（0..=1）
    #[ts(type = "number | null")]
    pub open_rate: Option<OpenRate>,
    pub number_of_emails: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl NewsletterMetric {
    pub fn open_rate_percent(&self) -> Option<f64> {
        self.open_rate.map(OpenRate::percent)
    }
}

/// 对外输出的 newsletter 记录，附带由 `openRate` 换算的百分比
#[derive(Debug, Clone, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterMetricView {
    #[serde(flatten)]
    pub metric: NewsletterMetric,
    pub open_rate_percent: Option<f64>,
}

impl From<&NewsletterMetric> for NewsletterMetricView {
    fn from(metric: &NewsletterMetric) -> Self {
        Self {
            open_rate_percent: metric.open_rate_percent(),
            metric: metric.clone(),
        }
    }
}

/// 社交互动指标（不区分国家）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SocialEngagementMetric {
    pub id: i64,
    pub platform: Platform,
    pub business_unit: BusinessUnit,
    pub date: NaiveDate,
    pub likes: Option<i64>,
    pub comments: Option<i64>,
    pub shares: Option<i64>,
    pub saves: Option<i64>,
    pub clicks: Option<i64>,
    pub engagement_rate: Option<f64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// ============ 写入参数 ============
//
// 写入参数不含 id 和审计字段，这些由服务端分配。

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SocialMetricInput {
    pub platform: Platform,
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub impressions: Option<i64>,
    #[serde(default)]
    pub followers: Option<i64>,
    #[serde(default)]
    pub number_of_posts: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct WebsiteMetricInput {
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub users: Option<i64>,
    #[serde(default)]
    pub clicks: Option<i64>,
    #[serde(default)]
    pub sessions: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct NewsletterMetricInput {
    pub business_unit: BusinessUnit,
    pub country: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub recipients: Option<i64>,
    #[serde(default)]
    #[ts(type = "number | null")]
    pub open_rate: Option<OpenRate>,
    #[serde(default)]
    pub number_of_emails: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct SocialEngagementMetricInput {
    pub platform: Platform,
    pub business_unit: BusinessUnit,
    pub date: NaiveDate,
    #[serde(default)]
    pub likes: Option<i64>,
    #[serde(default)]
    pub comments: Option<i64>,
    #[serde(default)]
    pub shares: Option<i64>,
    #[serde(default)]
    pub saves: Option<i64>,
    #[serde(default)]
    pub clicks: Option<i64>,
    #[serde(default)]
    pub engagement_rate: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_input_uses_camel_case_and_defaults() {
        let input: SocialMetricInput = serde_json::from_str(
            r#"{"platform":"FACEBOOK","businessUnit":"ASM","country":"US","date":"2024-01-01","followers":100}"#,
        )
        .unwrap();
        assert_eq!(input.platform, Platform::Facebook);
        assert_eq!(input.followers, Some(100));
        assert_eq!(input.impressions, None);
        assert_eq!(input.number_of_posts, None);
    }

    #[test]
    fn test_newsletter_input_rejects_percentage_open_rate() {
        let raw = r#"{"businessUnit":"EM","country":"UK","date":"2024-02-05","openRate":35}"#;
        assert!(serde_json::from_str::<NewsletterMetricInput>(raw).is_err());

        let raw = r#"{"businessUnit":"EM","country":"UK","date":"2024-02-05","openRate":0.35}"#;
        let input: NewsletterMetricInput = serde_json::from_str(raw).unwrap();
        assert_eq!(input.open_rate.map(|r| r.fraction()), Some(0.35));
    }

    #[test]
    fn test_open_rate_percent_follows_fraction() {
        // 传入的 openRatePercent 不会被采信
        let raw = r#"{"id":1,"businessUnit":"EM","country":"UK","date":"2024-02-05",
            "recipients":10,"openRate":0.35,"openRatePercent":99.0,"numberOfEmails":1,
            "createdAt":"2024-02-05T00:00:00Z","updatedAt":"2024-02-05T00:00:00Z"}"#;
        let metric: NewsletterMetric = serde_json::from_str(raw).unwrap();
        assert!((metric.open_rate_percent().unwrap() - 35.0).abs() < 1e-9);

        let json = serde_json::to_value(NewsletterMetricView::from(&metric)).unwrap();
        assert_eq!(json["openRate"], 0.35);
        assert!((json["openRatePercent"].as_f64().unwrap() - 35.0).abs() < 1e-9);
        assert_eq!(json["recipients"], 10);
    }
}
