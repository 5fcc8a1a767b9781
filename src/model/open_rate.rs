//! Newsletter 打开率
//!
//! 统一以 0..=1 的小数表示（0.25 即 25%），仅在展示层转换为百分比。

use serde::{Deserialize, Serialize};

use crate::errors::{DashboardError, Result};

#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(try_from = "f64", into = "f64")]
pub struct OpenRate(f64);

impl OpenRate {
    pub fn from_fraction(value: f64) -> Result<Self> {
        if value.is_finite() && (0.0..=1.0).contains(&value) {
            Ok(Self(value))
        } else {
            Err(DashboardError::validation(format!(
                "Open rate must be a fraction between 0 and 1, got {}",
                value
            )))
        }
    }

    /// 从百分比构造（表单输入 25 表示 25%）
    pub fn from_percent(percent: f64) -> Result<Self> {
        Self::from_fraction(percent / 100.0)
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> f64 {
        self.0 * 100.0
    }
}

impl TryFrom<f64> for OpenRate {
    type Error = DashboardError;

    fn try_from(value: f64) -> Result<Self> {
        Self::from_fraction(value)
    }
}

impl From<OpenRate> for f64 {
    fn from(rate: OpenRate) -> Self {
        rate.0
    }
}
