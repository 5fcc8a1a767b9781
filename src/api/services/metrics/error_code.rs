//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};
use ts_rs::TS;

use crate::errors::DashboardError;
use crate::model::TS_EXPORT_PATH;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字，ts-rs 自动生成 TypeScript 类型。
/// 按千位分域：
/// - 0: 成功
/// - 1000-1099: 通用错误
/// - 3000-3099: 指标错误
/// - 6000-6099: 看板错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr, TS)]
#[ts(export, export_to = TS_EXPORT_PATH)]
#[ts(rename = "ErrorCode")]
#[ts(repr(enum))]
#[repr(i32)]
pub enum ErrorCode {
    // 成功
    Success = 0,

    // 通用错误 1000-1099
    BadRequest = 1000,
    NotFound = 1004,
    InternalServerError = 1005,
    InvalidDateFormat = 1012,
    ServiceUnavailable = 1030,

    // 指标错误 3000-3099
    MetricNotFound = 3000,
    MetricValidationFailed = 3001,
    MetricDatabaseError = 3002,
    UnknownMetricKind = 3003,

    // 看板错误 6000-6099
    DashboardQueryFailed = 6000,
    UnknownMeasure = 6001,
    InvalidDateRange = 6002,
}

impl From<&DashboardError> for ErrorCode {
    fn from(err: &DashboardError) -> Self {
        match err {
            DashboardError::UnknownMetricKind(_) => ErrorCode::UnknownMetricKind,
            DashboardError::UnknownMeasure(_) => ErrorCode::UnknownMeasure,
            DashboardError::InvalidDateRange(_) => ErrorCode::InvalidDateRange,
            DashboardError::Validation(_) => ErrorCode::MetricValidationFailed,
            DashboardError::NotFound(_) => ErrorCode::MetricNotFound,
            DashboardError::DatabaseOperation(_) => ErrorCode::MetricDatabaseError,
            DashboardError::DatabaseConnection(_) => ErrorCode::ServiceUnavailable,
            DashboardError::DateParse(_) => ErrorCode::InvalidDateFormat,
            DashboardError::DatabaseConfig(_)
            | DashboardError::FileOperation(_)
            | DashboardError::Serialization(_) => ErrorCode::InternalServerError,
        }
    }
}
