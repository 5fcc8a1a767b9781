//! API 类型定义

use std::str::FromStr;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::errors::{DashboardError, Result};
use crate::model::{BusinessUnit, Platform, TS_EXPORT_PATH, normalize_country};
use crate::services::MetricKind;
use crate::storage::MetricFilter;

/// 统一响应包装 `{code, message, data}`
#[derive(Serialize, Deserialize, Clone, Debug, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

/// 指标查询参数
///
/// 日期格式 `YYYY-MM-DD`，区间两端包含。
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MetricQuery {
    #[ts(optional)]
    pub platform: Option<String>,
    #[serde(alias = "businessUnit")]
    #[ts(optional)]
    pub business_unit: Option<String>,
    #[ts(optional)]
    pub country: Option<String>,
    #[serde(alias = "startDate")]
    #[ts(optional)]
    pub start_date: Option<String>,
    #[serde(alias = "endDate")]
    #[ts(optional)]
    pub end_date: Option<String>,
}

fn non_empty(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

/// 解析 `YYYY-MM-DD`
pub fn parse_date(field: &str, raw: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
        DashboardError::date_parse(format!(
            "Invalid {}: '{}'. Expected YYYY-MM-DD",
            field, raw
        ))
    })
}

impl MetricQuery {
    /// 转换为存储层过滤条件
    pub fn to_filter(&self) -> Result<MetricFilter> {
        let platform = non_empty(&self.platform)
            .map(|p| {
                Platform::from_str(p)
                    .map_err(|_| DashboardError::validation(format!("Unknown platform: {}", p)))
            })
            .transpose()?;
        let business_unit = non_empty(&self.business_unit)
            .map(|b| {
                BusinessUnit::from_str(b).map_err(|_| {
                    DashboardError::validation(format!("Unknown business unit: {}", b))
                })
            })
            .transpose()?;
        let country = non_empty(&self.country).map(normalize_country).transpose()?;
        let start_date = non_empty(&self.start_date)
            .map(|d| parse_date("start_date", d))
            .transpose()?;
        let end_date = non_empty(&self.end_date)
            .map(|d| parse_date("end_date", d))
            .transpose()?;

        if let (Some(start), Some(end)) = (start_date, end_date)
            && start > end
        {
            return Err(DashboardError::invalid_date_range(
                "start_date must not be later than end_date",
            ));
        }

        Ok(MetricFilter {
            platform,
            business_unit,
            country,
            start_date,
            end_date,
        })
    }
}

/// 看板查询参数
#[derive(Debug, Clone, Default, Deserialize, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DashboardQuery {
    #[serde(flatten)]
    pub filter: MetricQuery,
    /// 计算增长周期与趋势窗口时使用的"今天"，默认取服务器当前日期
    #[serde(alias = "asOf")]
    #[ts(optional)]
    pub as_of: Option<String>,
}

impl DashboardQuery {
    pub fn today(&self) -> Result<NaiveDate> {
        match non_empty(&self.as_of) {
            Some(raw) => parse_date("as_of", raw),
            None => Ok(chrono::Utc::now().date_naive()),
        }
    }
}

/// 趋势查询参数
#[derive(Debug, Clone, Deserialize, Serialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct TrendQuery {
    pub kind: String,
    pub measure: String,
    #[serde(flatten)]
    pub dashboard: DashboardQuery,
}

impl TrendQuery {
    pub fn metric_kind(&self) -> Result<MetricKind> {
        parse_kind(&self.kind)
    }
}

/// 解析路径中的指标类型
pub fn parse_kind(raw: &str) -> Result<MetricKind> {
    MetricKind::from_str(raw).map_err(|_| {
        DashboardError::unknown_metric_kind(format!(
            "Unknown metric kind: '{}'. Valid: social, website, newsletter, engagement",
            raw
        ))
    })
}

/// 删除结果
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct DeletedMetric {
    pub kind: MetricKind,
    pub id: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn export_typescript_types() {
        // 运行此测试会自动生成 TypeScript 类型文件
        // cargo test export_typescript_types -- --nocapture
        let cfg = ts_rs::Config::default();
        MetricQuery::export_all(&cfg).expect("Failed to export MetricQuery");
        DashboardQuery::export_all(&cfg).expect("Failed to export DashboardQuery");
        TrendQuery::export_all(&cfg).expect("Failed to export TrendQuery");
        DeletedMetric::export_all(&cfg).expect("Failed to export DeletedMetric");
        crate::services::DashboardOverview::export_all(&cfg)
            .expect("Failed to export DashboardOverview");

        println!("TypeScript types exported to {}", TS_EXPORT_PATH);
    }

    #[test]
    fn test_to_filter_parses_all_fields() {
        let query = MetricQuery {
            platform: Some("facebook".to_string()),
            business_unit: Some("IACL".to_string()),
            country: Some("us".to_string()),
            start_date: Some("2024-01-01".to_string()),
            end_date: Some("2024-03-31".to_string()),
        };
        let filter = query.to_filter().unwrap();
        assert_eq!(filter.platform, Some(Platform::Facebook));
        assert_eq!(filter.business_unit, Some(BusinessUnit::Iacl));
        assert_eq!(filter.country.as_deref(), Some("US"));
        assert_eq!(filter.start_date, NaiveDate::from_ymd_opt(2024, 1, 1));
    }

    #[test]
    fn test_to_filter_ignores_blank_values() {
        let query = MetricQuery {
            platform: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(query.to_filter().unwrap(), MetricFilter::default());
    }

    #[test]
    fn test_to_filter_errors() {
        let bad_date = MetricQuery {
            start_date: Some("01/02/2024".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            bad_date.to_filter(),
            Err(DashboardError::DateParse(_))
        ));

        let reversed = MetricQuery {
            start_date: Some("2024-02-01".to_string()),
            end_date: Some("2024-01-01".to_string()),
            ..Default::default()
        };
        assert!(matches!(
            reversed.to_filter(),
            Err(DashboardError::InvalidDateRange(_))
        ));

        let bad_unit = MetricQuery {
            business_unit: Some("HR".to_string()),
            ..Default::default()
        };
        assert!(bad_unit.to_filter().is_err());
    }

    #[test]
    fn test_dashboard_query_today() {
        let query = DashboardQuery {
            as_of: Some("2024-05-20".to_string()),
            ..Default::default()
        };
        assert_eq!(query.today().unwrap(), NaiveDate::from_ymd_opt(2024, 5, 20).unwrap());
    }

    #[test]
    fn test_parse_kind() {
        assert_eq!(parse_kind("website").unwrap(), MetricKind::Website);
        assert!(matches!(
            parse_kind("email"),
            Err(DashboardError::UnknownMetricKind(_))
        ));
    }
}
