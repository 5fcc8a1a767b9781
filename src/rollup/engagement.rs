//! 社交互动汇总

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::latest::records_at_latest_date;
use super::saturating_sum;
use crate::model::{SocialEngagementMetric, TS_EXPORT_PATH};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct EngagementTotals {
    /// 最新周期；无数据时为空
    pub date: Option<NaiveDate>,
    pub likes: i64,
    pub comments: i64,
    pub shares: i64,
    pub saves: i64,
    pub clicks: i64,
    /// 非空 engagement_rate 的简单平均
    pub average_engagement_rate: Option<f64>,
}

/// 最新周期的互动总量
pub fn engagement_totals(records: &[SocialEngagementMetric]) -> EngagementTotals {
    let latest = records_at_latest_date(records, |r| r.date);
    let Some(first) = latest.first() else {
        return EngagementTotals::default();
    };

    let sum = |f: fn(&SocialEngagementMetric) -> Option<i64>| -> i64 {
        saturating_sum(latest.iter().map(|r| f(r).unwrap_or(0)))
    };

    let rates: Vec<f64> = latest.iter().filter_map(|r| r.engagement_rate).collect();
    let average_engagement_rate = if rates.is_empty() {
        None
    } else {
        Some(rates.iter().sum::<f64>() / rates.len() as f64)
    };

    EngagementTotals {
        date: Some(first.date),
        likes: sum(|r| r.likes),
        comments: sum(|r| r.comments),
        shares: sum(|r| r.shares),
        saves: sum(|r| r.saves),
        clicks: sum(|r| r.clicks),
        average_engagement_rate,
    }
}
