//! 平台占比

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::{OrderedGroups, saturating_sum};
use crate::model::{Platform, SocialMetric, TS_EXPORT_PATH};

/// 未知平台使用的颜色
pub const DEFAULT_PLATFORM_COLOR: &str = "#8884D8";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct PlatformShare {
    pub platform: String,
    /// 占总量的百分比
    pub value: f64,
    pub color: String,
}

/// 按平台名称查找展示颜色，未知平台返回默认颜色
pub fn platform_color(name: &str) -> &'static str {
    Platform::from_str(name)
        .map(|p| p.color())
        .unwrap_or(DEFAULT_PLATFORM_COLOR)
}

/// 按平台汇总某个度量并换算为百分比
///
/// 总量为 0 时所有百分比均为 0。
pub fn platform_breakdown_by<T, P, M>(records: &[T], platform_of: P, measure_of: M) -> Vec<PlatformShare>
where
    P: Fn(&T) -> String,
    M: Fn(&T) -> Option<i64>,
{
    let mut groups: OrderedGroups<String, i64> = OrderedGroups::new();
    for record in records {
        let sum = groups.entry(platform_of(record));
        *sum = sum.saturating_add(measure_of(record).unwrap_or(0));
    }

    let sums = groups.into_vec();
    let grand_total = saturating_sum(sums.iter().map(|(_, v)| *v));

    sums.into_iter()
        .map(|(platform, sum)| {
            let value = if grand_total == 0 {
                0.0
            } else {
                sum as f64 / grand_total as f64 * 100.0
            };
            let color = platform_color(&platform).to_string();
            PlatformShare {
                platform,
                value,
                color,
            }
        })
        .collect()
}

/// 社交指标按平台的 followers 占比
///
/// 对传入的全部记录求和；只看最新一期时由调用方先过滤。
pub fn platform_breakdown(records: &[SocialMetric]) -> Vec<PlatformShare> {
    platform_breakdown_by(records, |r| r.platform.to_string(), |r| r.followers)
}
