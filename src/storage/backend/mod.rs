//! SeaORM storage backend
//!
//! 指标持久化，支持 SQLite、MySQL/MariaDB 和 PostgreSQL。
//! 每类指标提供区间查询、最新周期查询、按逻辑主键 upsert、按 id 更新与删除。

mod connection;
mod converters;
mod engagement;
mod newsletter;
mod query;
pub mod retry;
mod social;
mod website;

use chrono::NaiveDate;
use sea_orm::DatabaseConnection;
use tracing::{info, warn};

use crate::errors::{DashboardError, Result};
use crate::model::{BusinessUnit, Platform};

pub use connection::{
    connect_generic, connect_sqlite, is_sqlite_memory, migrate_sqlite, run_migrations,
};

/// 从数据库 URL 推断数据库类型
pub fn infer_backend_from_url(database_url: &str) -> Result<String> {
    if database_url.starts_with("sqlite://")
        || database_url.ends_with(".db")
        || database_url.ends_with(".sqlite")
        || database_url == ":memory:"
    {
        Ok("sqlite".to_string())
    } else if database_url.starts_with("mysql://") || database_url.starts_with("mariadb://") {
        Ok("mysql".to_string())
    } else if database_url.starts_with("postgres://") || database_url.starts_with("postgresql://") {
        Ok("postgres".to_string())
    } else {
        Err(DashboardError::database_config(format!(
            "无法从 URL 推断数据库类型: {}. 支持的 URL 格式: sqlite://, mysql://, mariadb://, postgres://",
            database_url
        )))
    }
}

/// 规范化 backend 名称
pub fn normalize_backend_name(backend: &str) -> String {
    match backend {
        "mariadb" => "mysql".to_string(),
        other => other.to_string(),
    }
}

/// 指标过滤条件
///
/// 所有字段可选；对没有该维度的指标类型（例如 website 没有 platform）忽略对应字段。
#[derive(Default, Clone, Debug, PartialEq)]
pub struct MetricFilter {
    pub platform: Option<Platform>,
    pub business_unit: Option<BusinessUnit>,
    /// 已规范化的国家代码
    pub country: Option<String>,
    /// date >= start_date
    pub start_date: Option<NaiveDate>,
    /// date <= end_date
    pub end_date: Option<NaiveDate>,
}

impl MetricFilter {
    pub fn for_business_unit(business_unit: Option<BusinessUnit>) -> Self {
        Self {
            business_unit,
            ..Default::default()
        }
    }

    pub fn with_range(mut self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Self {
        self.start_date = start;
        self.end_date = end;
        self
    }
}

/// SeaORM-based storage backend
#[derive(Clone)]
pub struct SeaOrmStorage {
    db: DatabaseConnection,
    backend_name: String,
    retry_config: retry::RetryConfig,
}

impl SeaOrmStorage {
    pub async fn connect(
        database_url: &str,
        backend_name: &str,
        pool_size: u32,
        timeout_secs: u64,
        retry_config: retry::RetryConfig,
    ) -> Result<Self> {
        if database_url.is_empty() {
            return Err(DashboardError::database_config(
                "DATABASE_URL 未设置".to_string(),
            ));
        }

        let backend_name = normalize_backend_name(backend_name);
        let db = if backend_name != "sqlite" {
            let db = connect_generic(database_url, &backend_name, pool_size, timeout_secs).await?;
            run_migrations(&db).await?;
            db
        } else if is_sqlite_memory(database_url) {
            let db = connect_sqlite(database_url, 1).await?;
            run_migrations(&db).await?;
            db
        } else {
            migrate_sqlite(database_url).await?;
            connect_sqlite(database_url, pool_size).await?
        };

        let storage = SeaOrmStorage {
            db,
            backend_name,
            retry_config,
        };

        warn!(
            "{} Storage initialized.",
            storage.backend_name.to_uppercase()
        );
        Ok(storage)
    }

    /// 使用默认重试配置连接（测试与 CLI 一次性任务）
    pub async fn new(database_url: &str, backend_name: &str) -> Result<Self> {
        Self::connect(
            database_url,
            backend_name,
            10,
            8,
            retry::RetryConfig::default(),
        )
        .await
    }

    pub fn backend_name(&self) -> &str {
        &self.backend_name
    }

    /// 获取数据库连接
    pub fn get_db(&self) -> &DatabaseConnection {
        &self.db
    }

    /// 数据库连通性检查
    pub async fn ping(&self) -> Result<()> {
        self.db
            .ping()
            .await
            .map_err(|e| DashboardError::database_connection(format!("数据库不可达: {}", e)))
    }

    pub async fn close(self) -> Result<()> {
        info!("Closing {} storage", self.backend_name.to_uppercase());
        self.db
            .close()
            .await
            .map_err(|e| DashboardError::database_connection(format!("关闭连接池失败: {}", e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_infer_backend_from_url() {
        assert_eq!(infer_backend_from_url("sqlite://data.db").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("metrics.sqlite").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url(":memory:").unwrap(), "sqlite");
        assert_eq!(infer_backend_from_url("mariadb://u@h/db").unwrap(), "mysql");
        assert_eq!(
            infer_backend_from_url("postgresql://u@h/db").unwrap(),
            "postgres"
        );
        assert!(infer_backend_from_url("redis://localhost").is_err());
    }

    #[test]
    fn test_normalize_backend_name() {
        assert_eq!(normalize_backend_name("mariadb"), "mysql");
        assert_eq!(normalize_backend_name("sqlite"), "sqlite");
    }

    #[test]
    fn test_is_sqlite_memory() {
        assert!(is_sqlite_memory("sqlite::memory:"));
        assert!(is_sqlite_memory("sqlite://file:board?mode=memory&cache=shared"));
        assert!(!is_sqlite_memory("sqlite://board.db?mode=rwc"));
    }
}
