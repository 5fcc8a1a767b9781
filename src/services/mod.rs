//! Service layer for business logic
//!
//! HTTP API 与 CLI 共用的业务逻辑：写入校验、持久化调度、看板汇总。

mod dashboard_service;
mod metric_service;

pub use dashboard_service::*;
pub use metric_service::*;
