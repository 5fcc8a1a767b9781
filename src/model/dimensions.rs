use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};
use ts_rs::TS;

use super::TS_EXPORT_PATH;
use crate::errors::{DashboardError, Result};

/// 不对应具体国家的汇总行使用的伪国家代码
pub const GLOBAL_COUNTRY: &str = "GLOBAL";

/// 指标来源平台
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum Platform {
    Facebook,
    Instagram,
    Linkedin,
    Tiktok,
    Website,
    Newsletter,
}

impl Platform {
    /// 看板图表中使用的固定颜色
    pub fn color(&self) -> &'static str {
        match self {
            Self::Facebook => "#1877F2",
            Self::Instagram => "#E4405F",
            Self::Linkedin => "#0A66C2",
            Self::Tiktok => "#010101",
            Self::Website => "#10B981",
            Self::Newsletter => "#F59E0B",
        }
    }
}

/// 业务单元
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    TS,
    EnumIter,
    EnumString,
    AsRefStr,
    Display,
)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE", ascii_case_insensitive)]
pub enum BusinessUnit {
    Asm,
    Iacl,
    Em,
}

/// 规范化国家代码
///
/// 接受 ISO 3166 alpha-2/alpha-3 代码或 `GLOBAL`（大小写不敏感），返回大写形式。
pub fn normalize_country(raw: &str) -> Result<String> {
    let code = raw.trim().to_ascii_uppercase();
    if code == GLOBAL_COUNTRY {
        return Ok(code);
    }
    if (2..=3).contains(&code.len()) && code.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(code)
    } else {
        Err(DashboardError::validation(format!(
            "Invalid country code: '{}'. Use an ISO 3166 code or GLOBAL",
            raw
        )))
    }
}
