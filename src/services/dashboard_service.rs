//! Dashboard service
//!
//! 从持久层取数并交给 rollup 引擎汇总。

use std::sync::Arc;

use chrono::{Months, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;
use ts_rs::TS;

use super::MetricKind;
use crate::errors::{DashboardError, Result};
use crate::model::{
    NewsletterMetric, SocialEngagementMetric, SocialMetric, TS_EXPORT_PATH, WebsiteMetric,
};
use crate::rollup::{
    self, CountryRow, Dated, EngagementTotals, GrowthFigure, GrowthPeriods, MonthBucket,
    PeriodTotal, PlatformShare,
};
use crate::storage::{MetricFilter, SeaOrmStorage};

/// 单个看板指标：最新周期总量与环比增长
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct OverviewFigure {
    pub latest: PeriodTotal,
    pub growth: GrowthFigure,
}

/// 看板总览
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOverview {
    pub followers: OverviewFigure,
    pub posts: OverviewFigure,
    pub impressions: OverviewFigure,
    pub website_users: OverviewFigure,
    pub newsletter_recipients: OverviewFigure,
    /// 小数形式（0..=1）
    pub average_open_rate: Option<f64>,
    /// 百分比形式，仅用于展示
    pub average_open_rate_percent: Option<f64>,
    pub engagement: EngagementTotals,
    pub periods: GrowthPeriods,
}

/// 趋势接口可用的度量
const SOCIAL_MEASURES: &[&str] = &["followers", "impressions", "posts"];
const WEBSITE_MEASURES: &[&str] = &["users", "clicks", "sessions"];
const NEWSLETTER_MEASURES: &[&str] = &["recipients", "emails"];
const ENGAGEMENT_MEASURES: &[&str] = &["likes", "comments", "shares", "saves", "clicks"];

/// 某类指标支持的趋势度量名
pub fn trend_measures(kind: MetricKind) -> &'static [&'static str] {
    match kind {
        MetricKind::Social => SOCIAL_MEASURES,
        MetricKind::Website => WEBSITE_MEASURES,
        MetricKind::Newsletter => NEWSLETTER_MEASURES,
        MetricKind::Engagement => ENGAGEMENT_MEASURES,
    }
}

fn unknown_measure(kind: MetricKind, measure: &str) -> DashboardError {
    DashboardError::unknown_measure(format!(
        "Unknown measure '{}' for {} metrics. Valid: {}",
        measure,
        kind,
        trend_measures(kind).join(", ")
    ))
}

fn social_measure(measure: &str) -> Option<fn(&SocialMetric) -> Option<i64>> {
    match measure {
        "followers" => Some(|r| r.followers),
        "impressions" => Some(|r| r.impressions),
        "posts" => Some(|r| r.number_of_posts),
        _ => None,
    }
}

fn website_measure(measure: &str) -> Option<fn(&WebsiteMetric) -> Option<i64>> {
    match measure {
        "users" => Some(|r| r.users),
        "clicks" => Some(|r| r.clicks),
        "sessions" => Some(|r| r.sessions),
        _ => None,
    }
}

fn newsletter_measure(measure: &str) -> Option<fn(&NewsletterMetric) -> Option<i64>> {
    match measure {
        "recipients" => Some(|r| r.recipients),
        "emails" => Some(|r| r.number_of_emails),
        _ => None,
    }
}

fn engagement_measure(measure: &str) -> Option<fn(&SocialEngagementMetric) -> Option<i64>> {
    match measure {
        "likes" => Some(|r| r.likes),
        "comments" => Some(|r| r.comments),
        "shares" => Some(|r| r.shares),
        "saves" => Some(|r| r.saves),
        "clicks" => Some(|r| r.clicks),
        _ => None,
    }
}

fn figure<T: Dated>(
    records: &[T],
    measure_of: fn(&T) -> Option<i64>,
    periods: &GrowthPeriods,
) -> OverviewFigure {
    OverviewFigure {
        latest: PeriodTotal {
            total: rollup::sum_measure_at_latest_date(records, T::date, measure_of),
        },
        growth: rollup::period_growth(records, T::date, measure_of, periods),
    }
}

/// 趋势接口默认回溯月数
pub const DEFAULT_TREND_MONTHS: u32 = 12;

/// 看板汇总服务
pub struct DashboardService {
    storage: Arc<SeaOrmStorage>,
    trend_months: u32,
}

impl DashboardService {
    pub fn new(storage: Arc<SeaOrmStorage>) -> Self {
        Self {
            storage,
            trend_months: DEFAULT_TREND_MONTHS,
        }
    }

    /// 设置趋势接口默认回溯月数（0 表示不限制）
    pub fn with_trend_months(mut self, months: u32) -> Self {
        self.trend_months = months;
        self
    }

    /// 看板总览
    ///
    /// 增长率比较 `today` 的上一个自然月与再上一个自然月，
    /// 最新周期总量则取过滤条件下的全部数据。
    pub async fn overview(&self, filter: &MetricFilter, today: NaiveDate) -> Result<DashboardOverview> {
        let social = self.storage.find_social(filter).await?;
        let website = self.storage.find_website(filter).await?;
        let newsletter = self.storage.find_newsletter(filter).await?;
        let engagement = self.storage.find_engagement(filter).await?;

        debug!(
            "Overview over {} social, {} website, {} newsletter, {} engagement records",
            social.len(),
            website.len(),
            newsletter.len(),
            engagement.len()
        );

        let periods = GrowthPeriods::preceding(today);
        let average_open_rate = rollup::average_open_rate(&newsletter);

        Ok(DashboardOverview {
            followers: figure(&social, |r| r.followers, &periods),
            posts: figure(&social, |r| r.number_of_posts, &periods),
            impressions: figure(&social, |r| r.impressions, &periods),
            website_users: figure(&website, |r| r.users, &periods),
            newsletter_recipients: figure(&newsletter, |r| r.recipients, &periods),
            average_open_rate,
            average_open_rate_percent: average_open_rate.map(|rate| rate * 100.0),
            engagement: rollup::engagement_totals(&engagement),
            periods,
        })
    }

    /// 国家分布（首行为 Global 汇总）
    pub async fn country_distribution(&self, filter: &MetricFilter) -> Result<Vec<CountryRow>> {
        let social = self.storage.find_social(filter).await?;
        let website = self.storage.find_website(filter).await?;
        let newsletter = self.storage.find_newsletter(filter).await?;

        Ok(rollup::country_distribution(&social, &website, &newsletter))
    }

    /// 最新周期的平台 followers 占比
    pub async fn platform_breakdown(&self, filter: &MetricFilter) -> Result<Vec<PlatformShare>> {
        let social = self.storage.find_social(filter).await?;
        let latest: Vec<SocialMetric> = rollup::records_at_latest_date(&social, |r| r.date)
            .into_iter()
            .cloned()
            .collect();

        Ok(rollup::platform_breakdown(&latest))
    }

    /// 按月趋势
    ///
    /// 过滤条件未指定起始日期时，回溯 `trend_months` 个自然月（含 `today` 所在月）。
    pub async fn monthly_trend(
        &self,
        kind: MetricKind,
        measure: &str,
        filter: &MetricFilter,
        today: NaiveDate,
    ) -> Result<Vec<MonthBucket>> {
        let mut filter = filter.clone();
        if filter.start_date.is_none() {
            filter.start_date = trailing_window_start(today, self.trend_months);
        }

        let buckets = match kind {
            MetricKind::Social => {
                let measure_of =
                    social_measure(measure).ok_or_else(|| unknown_measure(kind, measure))?;
                let records = self.storage.find_social(&filter).await?;
                rollup::monthly_bucket(&records, Dated::date, measure_of)
            }
            MetricKind::Website => {
                let measure_of =
                    website_measure(measure).ok_or_else(|| unknown_measure(kind, measure))?;
                let records = self.storage.find_website(&filter).await?;
                rollup::monthly_bucket(&records, Dated::date, measure_of)
            }
            MetricKind::Newsletter => {
                let measure_of =
                    newsletter_measure(measure).ok_or_else(|| unknown_measure(kind, measure))?;
                let records = self.storage.find_newsletter(&filter).await?;
                rollup::monthly_bucket(&records, Dated::date, measure_of)
            }
            MetricKind::Engagement => {
                let measure_of =
                    engagement_measure(measure).ok_or_else(|| unknown_measure(kind, measure))?;
                let records = self.storage.find_engagement(&filter).await?;
                rollup::monthly_bucket(&records, Dated::date, measure_of)
            }
        };

        Ok(buckets)
    }
}

/// 回溯窗口的起始日（某月 1 日）；`months` 为 0 时不限制
fn trailing_window_start(today: NaiveDate, months: u32) -> Option<NaiveDate> {
    if months == 0 {
        return None;
    }
    let this_month = rollup::MonthRange::containing(today).start;
    this_month.checked_sub_months(Months::new(months - 1))
}
