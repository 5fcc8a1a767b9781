use std::sync::Arc;

use crate::errors::Result;

pub mod backend;

pub use backend::{MetricFilter, SeaOrmStorage};

pub struct StorageFactory;

impl StorageFactory {
    pub async fn create() -> Result<Arc<SeaOrmStorage>> {
        let config = crate::config::get_config();
        let database_url = &config.database.database_url;

        // 从 URL 自动推断数据库类型
        let backend_type = backend::infer_backend_from_url(database_url)?;

        let retry_config = backend::retry::RetryConfig::from(&config.database);

        let storage = backend::SeaOrmStorage::connect(
            database_url,
            &backend_type,
            config.database.pool_size,
            config.database.timeout,
            retry_config,
        )
        .await?;
        Ok(Arc::new(storage))
    }
}
