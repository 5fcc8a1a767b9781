//! 国家分布

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::OrderedGroups;
use super::latest::records_at_latest_date;
use crate::model::{GLOBAL_COUNTRY, NewsletterMetric, SocialMetric, TS_EXPORT_PATH, WebsiteMetric};

/// 汇总行的展示名称
pub const GLOBAL_ROW_LABEL: &str = "Global";

const FOLLOWERS: usize = 0;
const WEBSITE_USERS: usize = 1;
const NEWSLETTER_RECIPIENTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "camelCase")]
pub struct CountryRow {
    pub country: String,
    pub followers: i64,
    pub website_users: i64,
    pub newsletter_recipients: i64,
}

impl CountryRow {
    fn from_slots(country: String, slots: [i64; 3]) -> Self {
        Self {
            country,
            followers: slots[FOLLOWERS],
            website_users: slots[WEBSITE_USERS],
            newsletter_recipients: slots[NEWSLETTER_RECIPIENTS],
        }
    }
}

/// 单类指标在最新周期的累加结果
#[derive(Default)]
struct KindTotals {
    per_country: i64,
    global_pseudo: i64,
    has_country_rows: bool,
}

impl KindTotals {
    /// Global 行取值：有按国家的数据时取各国之和，否则退回 GLOBAL 伪国家记录
    fn global_value(&self) -> i64 {
        if self.has_country_rows {
            self.per_country
        } else {
            self.global_pseudo
        }
    }
}

fn accumulate<T, D, C, M>(
    records: &[T],
    date_of: D,
    country_of: C,
    measure_of: M,
    groups: &mut OrderedGroups<String, [i64; 3]>,
    slot: usize,
) -> KindTotals
where
    D: Fn(&T) -> NaiveDate,
    C: Fn(&T) -> &str,
    M: Fn(&T) -> Option<i64>,
{
    let mut totals = KindTotals::default();

    for record in records_at_latest_date(records, date_of) {
        let value = measure_of(record).unwrap_or(0);
        let country = country_of(record);

        if country.eq_ignore_ascii_case(GLOBAL_COUNTRY) {
            totals.global_pseudo = totals.global_pseudo.saturating_add(value);
            continue;
        }

        totals.per_country = totals.per_country.saturating_add(value);
        totals.has_country_rows = true;
        let slots = groups.entry(country.to_string());
        slots[slot] = slots[slot].saturating_add(value);
    }

    totals
}

/// 计算国家分布
///
/// 每类指标独立确定最新周期；按 country 分组（排除 GLOBAL 伪国家），
/// 并在最前面插入一行 "Global" 汇总。行顺序为国家首次出现的顺序
/// （social → website → newsletter），调用方可自行重新排序。
pub fn country_distribution(
    social: &[SocialMetric],
    website: &[WebsiteMetric],
    newsletter: &[NewsletterMetric],
) -> Vec<CountryRow> {
    let mut groups: OrderedGroups<String, [i64; 3]> = OrderedGroups::new();

    let followers = accumulate(
        social,
        |r| r.date,
        |r| r.country.as_str(),
        |r| r.followers,
        &mut groups,
        FOLLOWERS,
    );
    let users = accumulate(
        website,
        |r| r.date,
        |r| r.country.as_str(),
        |r| r.users,
        &mut groups,
        WEBSITE_USERS,
    );
    let recipients = accumulate(
        newsletter,
        |r| r.date,
        |r| r.country.as_str(),
        |r| r.recipients,
        &mut groups,
        NEWSLETTER_RECIPIENTS,
    );

    let rows = groups.into_vec();
    let mut result = Vec::with_capacity(rows.len() + 1);
    result.push(CountryRow {
        country: GLOBAL_ROW_LABEL.to_string(),
        followers: followers.global_value(),
        website_users: users.global_value(),
        newsletter_recipients: recipients.global_value(),
    });
    result.extend(
        rows.into_iter()
            .map(|(country, slots)| CountryRow::from_slots(country, slots)),
    );
    result
}
