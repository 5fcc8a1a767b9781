//! 指标与看板 API
//!
//! - `/metrics/{kind}`：四类指标的查询、upsert、按 id 更新与删除
//! - `/dashboard/*`：总览、国家分布、平台占比、按月趋势

mod crud;
mod dashboard;
pub mod error_code;
mod helpers;
pub mod routes;
mod types;

pub use types::*;

pub use helpers::{api_result, error_from_dashboard, error_response, json_response, success_response};

pub use error_code::ErrorCode;

pub use crud::{delete_metric, latest_metric, list_metrics, update_metric, upsert_metric};
pub use dashboard::{countries, overview, platforms, trend};

pub use routes::{api_v1_routes, dashboard_routes, metrics_routes};
