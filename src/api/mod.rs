//! HTTP API
//!
//! - `middleware`: 请求 ID
//! - `services`: 指标读写、看板汇总、健康检查

pub mod middleware;
pub mod services;
