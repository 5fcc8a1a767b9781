use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::services::{DashboardService, MetricService};
use crate::storage::{SeaOrmStorage, StorageFactory};

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub metric_service: Arc<MetricService>,
    pub dashboard_service: Arc<DashboardService>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub api_prefix: String,
    pub cors_allowed_origins: Vec<String>,
}

/// 准备服务器启动的上下文
/// 包括存储连接（含迁移）、业务服务和路由配置
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = StorageFactory::create()
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.backend_name());

    let config = crate::config::get_config();

    let metric_service = Arc::new(MetricService::new(storage.clone()));
    let dashboard_service = Arc::new(
        DashboardService::new(storage.clone())
            .with_trend_months(config.dashboard.trend_months),
    );
    debug!(
        "Dashboard services initialized (trend window: {} months)",
        config.dashboard.trend_months
    );

    let route_config = RouteConfig {
        api_prefix: config.api.prefix.clone(),
        cors_allowed_origins: config.api.cors_allowed_origins.clone(),
    };

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        metric_service,
        dashboard_service,
        route_config,
    })
}
