//! Rollup engine
//!
//! 把持久层返回的原始指标记录汇总成看板使用的扁平结构：
//! - 最新周期总量（latest-period totals）
//! - 国家分布（country distribution）
//! - 环比增长率（month-over-month growth）
//! - 平台占比（platform breakdown）
//! - 按月分桶（monthly buckets）
//!
//! 全部为纯函数：不做 I/O，不修改输入。空输入或全空度量返回 0 / 空列表，
//! 除零返回 0 而不是 NaN/Infinity。
//!
//! 各类指标共用一套实现，通过取值闭包（date / measure / country accessor）参数化。

mod country;
mod engagement;
mod growth;
mod latest;
mod monthly;
mod platform;

use std::collections::HashMap;
use std::hash::Hash;

use chrono::NaiveDate;

use crate::model::{NewsletterMetric, SocialEngagementMetric, SocialMetric, WebsiteMetric};

pub use country::{CountryRow, GLOBAL_ROW_LABEL, country_distribution};
pub use engagement::{EngagementTotals, engagement_totals};
pub use growth::{
    GrowthFigure, GrowthPeriods, MonthRange, growth_rate, growth_rate_checked, period_growth,
};
pub use latest::{
    PeriodTotal, average_open_rate, latest_date, records_at_latest_date,
    sum_measure_at_latest_date, total_followers, total_impressions, total_newsletter_recipients,
    total_posts, total_website_users,
};
pub use monthly::{MonthBucket, monthly_bucket};
pub use platform::{
    DEFAULT_PLATFORM_COLOR, PlatformShare, platform_breakdown, platform_breakdown_by,
    platform_color,
};

/// 带报告周期日期的记录
pub trait Dated {
    fn date(&self) -> NaiveDate;
}

impl Dated for SocialMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for WebsiteMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for NewsletterMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

impl Dated for SocialEngagementMetric {
    fn date(&self) -> NaiveDate {
        self.date
    }
}

/// 度量求和，越界时停在 `i64::MAX`
pub(crate) fn saturating_sum<I>(values: I) -> i64
where
    I: IntoIterator<Item = i64>,
{
    values.into_iter().fold(0, i64::saturating_add)
}

/// 按 key 首次出现顺序分组累加
///
/// 输出顺序与输入中 key 的首次出现顺序一致。
pub(crate) struct OrderedGroups<K, V> {
    keys: Vec<K>,
    values: HashMap<K, V>,
}

impl<K, V> OrderedGroups<K, V>
where
    K: Eq + Hash + Clone,
    V: Default,
{
    pub(crate) fn new() -> Self {
        Self {
            keys: Vec::new(),
            values: HashMap::new(),
        }
    }

    pub(crate) fn entry(&mut self, key: K) -> &mut V {
        if !self.values.contains_key(&key) {
            self.keys.push(key.clone());
        }
        self.values.entry(key).or_default()
    }

    pub(crate) fn into_vec(self) -> Vec<(K, V)> {
        let mut values = self.values;
        self.keys
            .into_iter()
            .filter_map(|k| values.remove(&k).map(|v| (k, v)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ordered_groups_keeps_first_appearance() {
        let mut groups: OrderedGroups<&str, i64> = OrderedGroups::new();
        *groups.entry("US") += 1;
        *groups.entry("UK") += 2;
        *groups.entry("US") += 3;
        *groups.entry("FR") += 4;

        assert_eq!(groups.into_vec(), vec![("US", 4), ("UK", 2), ("FR", 4)]);
    }

    #[test]
    fn test_saturating_sum_stops_at_max() {
        assert_eq!(saturating_sum([i64::MAX, 1, 5]), i64::MAX);
        assert_eq!(saturating_sum(Vec::<i64>::new()), 0);
        assert_eq!(saturating_sum([2, 3]), 5);
    }
}
