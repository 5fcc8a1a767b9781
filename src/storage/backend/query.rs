//! 查询构造辅助
//!
//! 四类指标共享同一套过滤与排序规则，只是维度列不同。

use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Select};

use super::MetricFilter;

/// 某张指标表中参与过滤与排序的列
pub(super) struct KeyColumns<C> {
    pub id: C,
    /// 没有 platform 维度的表为 None
    pub platform: Option<C>,
    pub business_unit: C,
    /// 没有 country 维度的表为 None
    pub country: Option<C>,
    pub date: C,
}

/// 应用维度与日期区间过滤（区间两端均包含）
pub(super) fn filtered<E: EntityTrait>(
    filter: &MetricFilter,
    cols: &KeyColumns<E::Column>,
) -> Select<E> {
    let mut select = E::find();

    if let (Some(col), Some(platform)) = (cols.platform, filter.platform) {
        select = select.filter(col.eq(platform.to_string()));
    }
    if let Some(business_unit) = filter.business_unit {
        select = select.filter(cols.business_unit.eq(business_unit.to_string()));
    }
    if let (Some(col), Some(country)) = (cols.country, filter.country.as_ref()) {
        select = select.filter(col.eq(country.clone()));
    }
    if let Some(start) = filter.start_date {
        select = select.filter(cols.date.gte(start));
    }
    if let Some(end) = filter.end_date {
        select = select.filter(cols.date.lte(end));
    }

    select
}

/// 区间查询：按 date 升序，同日按 id 升序
pub(super) fn chronological<E: EntityTrait>(
    filter: &MetricFilter,
    cols: &KeyColumns<E::Column>,
) -> Select<E> {
    filtered(filter, cols)
        .order_by_asc(cols.date)
        .order_by_asc(cols.id)
}

/// 最新一条：按 date 降序，同日取 id 最大者
pub(super) fn newest_first<E: EntityTrait>(
    filter: &MetricFilter,
    cols: &KeyColumns<E::Column>,
) -> Select<E> {
    filtered(filter, cols)
        .order_by_desc(cols.date)
        .order_by_desc(cols.id)
}
