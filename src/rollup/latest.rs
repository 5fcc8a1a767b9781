//! 最新周期总量

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::saturating_sum;
use crate::model::{NewsletterMetric, SocialMetric, TS_EXPORT_PATH, WebsiteMetric};

/// 单个度量在最新周期的总量
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PeriodTotal {
    pub total: i64,
}

/// 记录集中最大的 date（即"最新周期"）
pub fn latest_date<T>(records: &[T], date_of: impl Fn(&T) -> NaiveDate) -> Option<NaiveDate> {
    records.iter().map(date_of).max()
}

/// 过滤出 date 等于最新周期的记录
pub fn records_at_latest_date<T, D>(records: &[T], date_of: D) -> Vec<&T>
where
    D: Fn(&T) -> NaiveDate,
{
    match latest_date(records, &date_of) {
        Some(latest) => records.iter().filter(|r| date_of(*r) == latest).collect(),
        None => Vec::new(),
    }
}

/// 最新周期内某个度量之和
///
/// 空输入返回 0；`None` 按 0 计。
pub fn sum_measure_at_latest_date<T, D, M>(records: &[T], date_of: D, measure_of: M) -> i64
where
    D: Fn(&T) -> NaiveDate,
    M: Fn(&T) -> Option<i64>,
{
    saturating_sum(
        records_at_latest_date(records, date_of)
            .into_iter()
            .map(|r| measure_of(r).unwrap_or(0)),
    )
}

pub fn total_followers(records: &[SocialMetric]) -> PeriodTotal {
    PeriodTotal {
        total: sum_measure_at_latest_date(records, |r| r.date, |r| r.followers),
    }
}

pub fn total_posts(records: &[SocialMetric]) -> PeriodTotal {
    PeriodTotal {
        total: sum_measure_at_latest_date(records, |r| r.date, |r| r.number_of_posts),
    }
}

pub fn total_impressions(records: &[SocialMetric]) -> PeriodTotal {
    PeriodTotal {
        total: sum_measure_at_latest_date(records, |r| r.date, |r| r.impressions),
    }
}

pub fn total_website_users(records: &[WebsiteMetric]) -> PeriodTotal {
    PeriodTotal {
        total: sum_measure_at_latest_date(records, |r| r.date, |r| r.users),
    }
}

pub fn total_newsletter_recipients(records: &[NewsletterMetric]) -> PeriodTotal {
    PeriodTotal {
        total: sum_measure_at_latest_date(records, |r| r.date, |r| r.recipients),
    }
}

/// 最新周期的平均打开率（按收件人数加权，小数形式）
///
/// 收件人数全部缺失时退化为简单平均；没有任何打开率时返回 `None`。
pub fn average_open_rate(records: &[NewsletterMetric]) -> Option<f64> {
    let latest = records_at_latest_date(records, |r| r.date);

    let rated: Vec<(f64, i64)> = latest
        .iter()
        .filter_map(|r| r.open_rate.map(|rate| (rate.fraction(), r.recipients.unwrap_or(0))))
        .collect();
    if rated.is_empty() {
        return None;
    }

    let weight = saturating_sum(rated.iter().map(|(_, w)| *w));
    if weight > 0 {
        let weighted: f64 = rated.iter().map(|(rate, w)| rate * *w as f64).sum();
        Some(weighted / weight as f64)
    } else {
        Some(rated.iter().map(|(rate, _)| rate).sum::<f64>() / rated.len() as f64)
    }
}
