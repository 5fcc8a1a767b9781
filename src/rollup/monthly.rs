//! 按月分桶

use std::collections::BTreeMap;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::model::TS_EXPORT_PATH;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
pub struct MonthBucket {
    /// 形如 "Jan 2024"
    pub month: String,
    pub value: i64,
}

/// 按记录日期所在的自然月求和，按月份升序
///
/// 只输出输入中出现过的月份，稀疏数据得到稀疏序列（不补零），
/// 调用方不能假设序列长度固定。
pub fn monthly_bucket<T, D, M>(records: &[T], date_of: D, measure_of: M) -> Vec<MonthBucket>
where
    D: Fn(&T) -> NaiveDate,
    M: Fn(&T) -> Option<i64>,
{
    let mut buckets: BTreeMap<(i32, u32), (NaiveDate, i64)> = BTreeMap::new();

    for record in records {
        let date = date_of(record);
        let slot = buckets
            .entry((date.year(), date.month()))
            .or_insert((date, 0));
        slot.1 = slot.1.saturating_add(measure_of(record).unwrap_or(0));
    }

    buckets
        .into_values()
        .map(|(date, value)| MonthBucket {
            month: date.format("%b %Y").to_string(),
            value,
        })
        .collect()
}
