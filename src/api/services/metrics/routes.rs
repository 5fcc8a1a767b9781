//! 指标与看板路由配置

use actix_web::http::StatusCode;
use actix_web::{error, web};

use super::crud::{delete_metric, latest_metric, list_metrics, update_metric, upsert_metric};
use super::dashboard::{countries, overview, platforms, trend};
use super::error_code::ErrorCode;
use super::helpers::error_response;

/// 请求体上限
const JSON_LIMIT_BYTES: usize = 256 * 1024;

/// 请求体与查询串解析失败时也返回统一的 JSON 包装
fn json_config() -> web::JsonConfig {
    web::JsonConfig::default()
        .limit(JSON_LIMIT_BYTES)
        .error_handler(|err, _req| {
            let response =
                error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &err.to_string());
            error::InternalError::from_response(err, response).into()
        })
}

fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response =
            error_response(StatusCode::BAD_REQUEST, ErrorCode::BadRequest, &err.to_string());
        error::InternalError::from_response(err, response).into()
    })
}

/// 指标路由 `/metrics`
///
/// - GET /metrics/{kind} - 按维度与日期区间查询
/// - GET /metrics/{kind}/latest - 最新一条
/// - POST /metrics/{kind} - 按逻辑主键 upsert
/// - PUT /metrics/{kind}/{id} - 按 id 更新
/// - DELETE /metrics/{kind}/{id} - 按 id 删除
pub fn metrics_routes() -> actix_web::Scope {
    web::scope("/metrics")
        .app_data(json_config())
        .app_data(query_config())
        .route("/{kind}", web::get().to(list_metrics))
        .route("/{kind}", web::post().to(upsert_metric))
        .route("/{kind}/latest", web::get().to(latest_metric))
        .route("/{kind}/{id}", web::put().to(update_metric))
        .route("/{kind}/{id}", web::delete().to(delete_metric))
}

/// 看板路由 `/dashboard`
pub fn dashboard_routes() -> actix_web::Scope {
    web::scope("/dashboard")
        .app_data(query_config())
        .route("/overview", web::get().to(overview))
        .route("/countries", web::get().to(countries))
        .route("/platforms", web::get().to(platforms))
        .route("/trend", web::get().to(trend))
}

/// `{prefix}/v1` 下的全部路由
pub fn api_v1_routes(prefix: &str) -> actix_web::Scope {
    let prefix = prefix.trim_end_matches('/');
    web::scope(&format!("{}/v1", prefix))
        .service(metrics_routes())
        .service(dashboard_routes())
}
