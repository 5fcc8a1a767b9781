//! Mode routing
//!
//! 无子命令或 `serve` 时进入 HTTP 服务模式，其余子命令走 CLI。

pub mod server;

pub use server::run_server;
