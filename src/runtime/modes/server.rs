//! Server mode
//!
//! This module contains the HTTP server startup logic.
//! It configures and starts the HTTP server with all necessary routes.

use actix_cors::Cors;
use actix_web::{
    App, HttpServer,
    http::{Method, header},
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::api::services::{AppStartTime, api_v1_routes, health_routes};
use crate::runtime::lifetime;

/// CORS 预检缓存时间（秒）
const CORS_MAX_AGE_SECS: usize = 3600;

/// Build CORS middleware from configuration
///
/// 来源列表为空时保持浏览器默认的同源策略；包含 `*` 时允许任意来源。
fn build_cors_middleware(allowed_origins: &[String]) -> Cors {
    if allowed_origins.is_empty() {
        return Cors::default();
    }

    let mut cors = Cors::default()
        .allowed_methods(vec![Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allowed_headers(vec![header::CONTENT_TYPE, header::ACCEPT])
        .expose_headers(vec![header::HeaderName::from_static(
            crate::api::middleware::REQUEST_ID_HEADER,
        )])
        .max_age(CORS_MAX_AGE_SECS);

    if allowed_origins.iter().any(|o| o == "*") {
        cors = cors.allow_any_origin();
    } else {
        for origin in allowed_origins {
            cors = cors.allowed_origin(origin);
        }
    }

    cors
}

/// Run the HTTP server
///
/// This function:
/// 1. Records startup time
/// 2. Prepares server components (storage, services, routes)
/// 3. Configures and starts the HTTP server
/// 4. Listens for graceful shutdown signals
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server() -> Result<()> {
    let app_start_time = AppStartTime {
        start_datetime: chrono::Utc::now(),
    };

    let startup = lifetime::startup::prepare_server_startup()
        .await
        .map_err(|e| {
            tracing::error!("Server startup failed: {}", e);
            e
        })?;

    let storage = startup.storage.clone();
    let metric_service = startup.metric_service.clone();
    let dashboard_service = startup.dashboard_service.clone();
    let route = startup.route_config.clone();

    let config = crate::config::get_config();

    let cpu_count = config.server.cpu_count.clamp(1, 32);
    warn!("Using {} CPU cores for the server", cpu_count);

    if route.cors_allowed_origins.is_empty() {
        info!("CORS disabled (api.cors_allowed_origins is empty)");
    } else {
        info!("CORS allowed origins: {:?}", route.cors_allowed_origins);
    }

    // HttpServer 闭包会拿走 storage，先克隆连接用于关闭
    let db_for_shutdown = storage.get_db().clone();

    let api_prefix = route.api_prefix.clone();
    let allowed_origins = route.cors_allowed_origins.clone();

    let server = HttpServer::new(move || {
        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(build_cors_middleware(&allowed_origins))
            .wrap(Compress::default())
            .app_data(web::Data::new(storage.clone()))
            .app_data(web::Data::new(metric_service.clone()))
            .app_data(web::Data::new(dashboard_service.clone()))
            .app_data(web::Data::new(app_start_time.clone()))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .wrap(
                DefaultHeaders::new()
                    .add(("Connection", "keep-alive"))
                    .add(("Keep-Alive", "timeout=30, max=1000"))
                    .add(("Cache-Control", "no-cache, no-store, must-revalidate")),
            )
            .service(health_routes())
            .service(api_v1_routes(&api_prefix))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .client_disconnect_timeout(std::time::Duration::from_millis(1000))
    .workers(cpu_count);

    let bind_address = format!("{}:{}", config.server.host, config.server.port);
    warn!("Starting server at http://{}", bind_address);
    info!("Dashboard API available at: {}/v1", route.api_prefix);

    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown(&db_for_shutdown) => {
            warn!("Graceful shutdown: database pool released");
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{HttpResponse, test};

    async fn ok() -> HttpResponse {
        HttpResponse::Ok().finish()
    }

    #[actix_rt::test]
    async fn test_cors_allows_configured_origin() {
        let origins = vec!["http://localhost:5173".to_string()];
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&origins))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get()
            .uri("/")
            .insert_header(("Origin", "http://localhost:5173"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .and_then(|v| v.to_str().ok()),
            Some("http://localhost:5173")
        );
    }

    #[actix_rt::test]
    async fn test_cors_without_origins_sends_no_allow_header() {
        let app = test::init_service(
            App::new()
                .wrap(build_cors_middleware(&[]))
                .route("/", web::get().to(ok)),
        )
        .await;

        let req = test::TestRequest::get().uri("/").to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_success());
        assert!(
            resp.headers()
                .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
                .is_none()
        );
    }
}
