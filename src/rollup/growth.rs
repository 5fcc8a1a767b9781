//! 环比增长率
//!
//! 周期定义：上一个自然月 vs. 再上一个自然月，以调用时的"今天"计算，
//! 与数据自身的日期范围无关。

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::latest::sum_measure_at_latest_date;
use crate::model::TS_EXPORT_PATH;

/// 增长率（百分比）
///
/// 基准为 0 时返回 0。注意这会把"没有基准"和"没有增长"混为一谈，
/// 需要区分时使用 [`growth_rate_checked`]。
pub fn growth_rate(current: f64, previous: f64) -> f64 {
    growth_rate_checked(current, Some(previous)).unwrap_or(0.0)
}

/// 增长率（百分比），没有基准时返回 `None`
pub fn growth_rate_checked(current: f64, previous: Option<f64>) -> Option<f64> {
    match previous {
        Some(prev) if prev != 0.0 && prev.is_finite() => Some((current - prev) / prev * 100.0),
        _ => None,
    }
}

/// 闭区间日期范围（一个自然月）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MonthRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl MonthRange {
    /// 包含 `day` 的自然月
    pub fn containing(day: NaiveDate) -> Self {
        let start = first_of_month(day);
        let next_start = first_of_month(start + Duration::days(31));
        Self {
            start,
            end: next_start - Duration::days(1),
        }
    }

    /// 上一个自然月
    pub fn previous(&self) -> Self {
        Self::containing(self.start - Duration::days(1))
    }

    pub fn contains(&self, day: NaiveDate) -> bool {
        self.start <= day && day <= self.end
    }
}

fn first_of_month(day: NaiveDate) -> NaiveDate {
    day - Duration::days(day.day0() as i64)
}

/// 增长率比较的两个周期
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct GrowthPeriods {
    /// 上一个自然月
    pub current: MonthRange,
    /// 再上一个自然月
    pub previous: MonthRange,
}

impl GrowthPeriods {
    pub fn preceding(today: NaiveDate) -> Self {
        let current = MonthRange::containing(today).previous();
        Self {
            current,
            previous: current.previous(),
        }
    }
}

/// 单个度量的增长数据
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct GrowthFigure {
    pub current: i64,
    pub previous: i64,
    /// 百分比；无基准时为 0
    pub growth: f64,
    pub has_baseline: bool,
}

/// 计算某个度量在两个周期间的增长
///
/// 每个周期取该月内最新一期的总量（快照语义）。
pub fn period_growth<T, D, M>(
    records: &[T],
    date_of: D,
    measure_of: M,
    periods: &GrowthPeriods,
) -> GrowthFigure
where
    D: Fn(&T) -> NaiveDate,
    M: Fn(&T) -> Option<i64>,
{
    let total_in = |range: &MonthRange| -> i64 {
        let in_range: Vec<&T> = records
            .iter()
            .filter(|r| range.contains(date_of(*r)))
            .collect();
        sum_measure_at_latest_date(&in_range, |r| date_of(*r), |r| measure_of(*r))
    };

    let current = total_in(&periods.current);
    let previous = total_in(&periods.previous);
    let checked = growth_rate_checked(current as f64, Some(previous as f64));

    GrowthFigure {
        current,
        previous,
        growth: checked.unwrap_or(0.0),
        has_baseline: checked.is_some(),
    }
}
