//! 指标写入/查询的瞬时故障重试
//!
//! 看板数据按周批量导入，导入期间 SQLite 写锁竞争和连接池耗尽最常见。
//! 这里只区分两类错误：瞬时的（退避后重试）与确定性的（立即返回）。

use std::future::Future;
use std::ops::Deref;
use std::time::Duration;

use sea_orm::DbErr;
use sea_orm::error::RuntimeErr;
use tracing::{debug, warn};

use crate::config::DatabaseConfig;

/// 各后端表示"稍后再试"的错误码
const TRANSIENT_DB_CODES: &[(&str, &str)] = &[
    ("5", "sqlite busy"),
    ("6", "sqlite locked"),
    ("1205", "mysql lock wait timeout"),
    ("1213", "mysql deadlock"),
    ("40001", "postgres serialization failure"),
    ("40P01", "postgres deadlock"),
];

/// 拿不到错误码时按消息匹配
const TRANSIENT_MESSAGE_HINTS: &[&str] = &[
    "database is locked",
    "deadlock",
    "lock wait timeout",
    "serialization failure",
];

/// 返回瞬时错误的原因；确定性错误返回 `None`
pub fn transient_reason(err: &DbErr) -> Option<&'static str> {
    match err {
        DbErr::ConnectionAcquire(_) => Some("pool exhausted"),
        DbErr::Conn(_) => Some("connection lost"),
        DbErr::Exec(inner) | DbErr::Query(inner) => runtime_transient_reason(inner),
        _ => None,
    }
}

fn runtime_transient_reason(err: &RuntimeErr) -> Option<&'static str> {
    let message = match err {
        RuntimeErr::SqlxError(sqlx_err) => {
            let code = sqlx_err
                .deref()
                .as_database_error()
                .and_then(|db_err| db_err.code().map(|c| c.into_owned()));
            if let Some(code) = code {
                return TRANSIENT_DB_CODES
                    .iter()
                    .find(|(known, _)| *known == code)
                    .map(|(_, reason)| *reason);
            }
            sqlx_err.to_string()
        }
        RuntimeErr::Internal(msg) => msg.clone(),
        #[allow(unreachable_patterns)]
        _ => return None,
    };

    let message = message.to_lowercase();
    TRANSIENT_MESSAGE_HINTS
        .iter()
        .any(|hint| message.contains(hint))
        .then_some("lock contention")
}

/// 退避参数
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryConfig {
    pub max_retries: u32,
    pub base_delay_ms: u64,
    pub max_delay_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 100,
            max_delay_ms: 2000,
        }
    }
}

impl From<&DatabaseConfig> for RetryConfig {
    fn from(db: &DatabaseConfig) -> Self {
        Self {
            max_retries: db.retry_count,
            base_delay_ms: db.retry_base_delay_ms,
            max_delay_ms: db.retry_max_delay_ms,
        }
    }
}

impl RetryConfig {
    /// 第 `attempt` 次重试前的等待时间（从 1 开始），上限后再叠加至多 25% 抖动
    pub fn delay_for(&self, attempt: u32) -> Duration {
        let exponent = attempt.saturating_sub(1).min(31);
        let capped = self
            .base_delay_ms
            .saturating_mul(1u64 << exponent)
            .min(self.max_delay_ms);
        let jitter = rand::random_range(0..=capped / 4);
        Duration::from_millis(capped.saturating_add(jitter))
    }
}

/// 执行 `operation`，遇到瞬时错误按 [`RetryConfig`] 退避重试
pub async fn with_retry<T, F, Fut>(
    operation_name: &str,
    config: RetryConfig,
    mut operation: F,
) -> Result<T, DbErr>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, DbErr>>,
{
    let mut attempt = 0u32;
    loop {
        let err = match operation().await {
            Ok(value) => {
                if attempt > 0 {
                    debug!(op = operation_name, retries = attempt, "storage call recovered");
                }
                return Ok(value);
            }
            Err(err) => err,
        };

        let Some(reason) = transient_reason(&err) else {
            return Err(err);
        };
        if attempt >= config.max_retries {
            warn!(op = operation_name, reason, retries = attempt, error = %err, "giving up");
            return Err(err);
        }

        attempt += 1;
        let delay = config.delay_for(attempt);
        warn!(
            op = operation_name,
            reason,
            attempt,
            delay_ms = delay.as_millis() as u64,
            error = %err,
            "transient storage error, backing off"
        );
        tokio::time::sleep(delay).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::error::ConnAcquireErr;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn fast() -> RetryConfig {
        RetryConfig {
            max_retries: 2,
            base_delay_ms: 5,
            max_delay_ms: 20,
        }
    }

    #[test]
    fn test_pool_and_connection_errors_are_transient() {
        assert_eq!(
            transient_reason(&DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)),
            Some("pool exhausted")
        );
        assert_eq!(
            transient_reason(&DbErr::Conn(RuntimeErr::Internal("reset".into()))),
            Some("connection lost")
        );
    }

    #[test]
    fn test_lock_messages_are_transient() {
        for msg in ["database is locked", "Deadlock found when trying to get lock"] {
            let err = DbErr::Exec(RuntimeErr::Internal(msg.to_string()));
            assert_eq!(transient_reason(&err), Some("lock contention"), "{msg}");
        }
    }

    #[test]
    fn test_logical_key_conflict_is_not_retried() {
        let err = DbErr::Exec(RuntimeErr::Internal(
            "UNIQUE constraint failed: website_metrics.country".to_string(),
        ));
        assert_eq!(transient_reason(&err), None);
        assert_eq!(transient_reason(&DbErr::RecordNotUpdated), None);
    }

    #[test]
    fn test_delay_grows_and_is_capped() {
        let config = RetryConfig::default();
        let first = config.delay_for(1).as_millis();
        let third = config.delay_for(3).as_millis();
        assert!((100..=125).contains(&first));
        assert!((400..=500).contains(&third));
        assert!((2000..=2500).contains(&config.delay_for(40).as_millis()));
    }

    #[test]
    fn test_config_from_database_section() {
        let db = DatabaseConfig {
            retry_count: 7,
            retry_base_delay_ms: 50,
            retry_max_delay_ms: 900,
            ..Default::default()
        };
        let config = RetryConfig::from(&db);
        assert_eq!(config.max_retries, 7);
        assert_eq!(config.base_delay_ms, 50);
        assert_eq!(config.max_delay_ms, 900);
    }

    #[tokio::test]
    async fn test_recovers_after_busy_database() {
        let calls = AtomicU32::new(0);
        let result = with_retry("upsert_website", fast(), || {
            let n = calls.fetch_add(1, Ordering::SeqCst);
            async move {
                if n == 0 {
                    Err(DbErr::Exec(RuntimeErr::Internal("database is locked".into())))
                } else {
                    Ok(n)
                }
            }
        })
        .await;
        assert_eq!(result.unwrap(), 1);
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_stops_after_max_retries() {
        let calls = AtomicU32::new(0);
        let result = with_retry("find_social", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::ConnectionAcquire(ConnAcquireErr::Timeout)) }
        })
        .await;
        assert!(result.is_err());
        assert_eq!(calls.load(Ordering::SeqCst), 3);
    }

    #[tokio::test]
    async fn test_permanent_error_returns_immediately() {
        let calls = AtomicU32::new(0);
        let result = with_retry("delete_newsletter(9)", fast(), || {
            calls.fetch_add(1, Ordering::SeqCst);
            async { Err::<(), _>(DbErr::RecordNotFound("missing".into())) }
        })
        .await;
        assert!(matches!(result, Err(DbErr::RecordNotFound(_))));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}
