//! Logging system initialization
//!
//! 根据 `[logging]` 配置初始化 tracing：控制台或文件输出、按天滚动、text/json 格式。

use std::path::Path;

use anyhow::Context;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling;

use crate::config::LoggingConfig;

const DEFAULT_LOG_FILE: &str = "commsboard.log";

/// Initialize logging system based on configuration
///
/// 返回的 `WorkerGuard` 必须存活到进程退出，否则非阻塞写入的日志可能丢失。
/// 只能调用一次；重复初始化全局 subscriber 会返回错误。
pub fn init_logging(config: &LoggingConfig) -> anyhow::Result<WorkerGuard> {
    let writer = build_writer(config)?;

    let (non_blocking_writer, guard) = tracing_appender::non_blocking(writer);
    let filter = tracing_subscriber::EnvFilter::try_new(&config.level)
        .with_context(|| format!("Invalid log level: {}", config.level))?;

    let subscriber_builder = tracing_subscriber::fmt()
        .with_writer(non_blocking_writer)
        .with_env_filter(filter)
        .with_level(true)
        .with_ansi(writes_to_console(config));

    let result = if config.format == "json" {
        subscriber_builder.json().try_init()
    } else {
        subscriber_builder.try_init()
    };
    result.map_err(|e| anyhow::anyhow!("Failed to install tracing subscriber: {}", e))?;

    Ok(guard)
}

fn writes_to_console(config: &LoggingConfig) -> bool {
    config.file.as_ref().is_none_or(|f| f.is_empty())
}

fn build_writer(config: &LoggingConfig) -> anyhow::Result<Box<dyn std::io::Write + Send + Sync>> {
    let log_file = match config.file.as_deref() {
        Some(file) if !file.is_empty() => file,
        // 未配置文件时输出到控制台
        _ => return Ok(Box::new(std::io::stdout())),
    };

    if !config.enable_rotation {
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(log_file)
            .with_context(|| format!("Failed to open log file: {}", log_file))?;
        return Ok(Box::new(file));
    }

    let path = Path::new(log_file);
    let dir = path.parent().unwrap_or(Path::new("."));
    let filename = path
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or(DEFAULT_LOG_FILE);

    let appender = rolling::Builder::new()
        .rotation(rolling::Rotation::DAILY)
        .filename_prefix(filename.trim_end_matches(".log"))
        .filename_suffix("log")
        .max_log_files(config.max_backups as usize)
        .build(dir)
        .context("Failed to create rolling log appender")?;
    Ok(Box::new(appender))
}
