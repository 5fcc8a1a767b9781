//! 指标 CRUD 端点

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::{info, trace};

use crate::errors::Result;
use crate::services::{MetricInput, MetricRecord, MetricService};

use super::error_code::ErrorCode;
use super::helpers::{api_result, error_from_dashboard, json_response};
use super::types::{DeletedMetric, MetricQuery, parse_kind};

async fn list(
    service: &MetricService,
    kind: &str,
    query: &MetricQuery,
) -> Result<Vec<MetricRecord>> {
    let kind = parse_kind(kind)?;
    let filter = query.to_filter()?;
    service.list(kind, &filter).await
}

async fn latest(
    service: &MetricService,
    kind: &str,
    query: &MetricQuery,
) -> Result<Option<MetricRecord>> {
    let kind = parse_kind(kind)?;
    let filter = query.to_filter()?;
    service.latest(kind, &filter).await
}

async fn upsert(
    service: &MetricService,
    kind: &str,
    body: serde_json::Value,
) -> Result<MetricRecord> {
    let kind = parse_kind(kind)?;
    let input = MetricInput::from_json(kind, body)?;
    service.upsert(input).await
}

async fn update(
    service: &MetricService,
    kind: &str,
    id: i64,
    body: serde_json::Value,
) -> Result<MetricRecord> {
    let kind = parse_kind(kind)?;
    let input = MetricInput::from_json(kind, body)?;
    service.update(id, input).await
}

/// GET /metrics/{kind}
pub async fn list_metrics(
    path: web::Path<String>,
    query: web::Query<MetricQuery>,
    service: web::Data<Arc<MetricService>>,
) -> ActixResult<impl Responder> {
    trace!("Metrics API: list {} with {:?}", path, query);
    Ok(api_result(list(&service, &path, &query).await))
}

/// GET /metrics/{kind}/latest
pub async fn latest_metric(
    path: web::Path<String>,
    query: web::Query<MetricQuery>,
    service: web::Data<Arc<MetricService>>,
) -> ActixResult<impl Responder> {
    trace!("Metrics API: latest {} with {:?}", path, query);
    Ok(api_result(latest(&service, &path, &query).await))
}

/// POST /metrics/{kind}
///
/// 按逻辑主键 upsert，返回落库后的记录。
pub async fn upsert_metric(
    path: web::Path<String>,
    body: web::Json<serde_json::Value>,
    service: web::Data<Arc<MetricService>>,
) -> ActixResult<impl Responder> {
    let result = upsert(&service, &path, body.into_inner()).await;
    if let Ok(record) = &result {
        info!("Metrics API: upserted {} record {}", record.kind(), record.id());
    }
    Ok(api_result(result))
}

/// PUT /metrics/{kind}/{id}
pub async fn update_metric(
    path: web::Path<(String, i64)>,
    body: web::Json<serde_json::Value>,
    service: web::Data<Arc<MetricService>>,
) -> ActixResult<impl Responder> {
    let (kind, id) = path.into_inner();
    let result = update(&service, &kind, id, body.into_inner()).await;
    if result.is_ok() {
        info!("Metrics API: updated {} record {}", kind, id);
    }
    Ok(api_result(result))
}

/// DELETE /metrics/{kind}/{id}
pub async fn delete_metric(
    path: web::Path<(String, i64)>,
    service: web::Data<Arc<MetricService>>,
) -> ActixResult<HttpResponse> {
    let (raw_kind, id) = path.into_inner();
    let kind = match parse_kind(&raw_kind) {
        Ok(kind) => kind,
        Err(e) => return Ok(error_from_dashboard(&e)),
    };

    match service.delete(kind, id).await {
        Ok(()) => {
            info!("Metrics API: deleted {} record {}", kind, id);
            Ok(json_response(
                StatusCode::OK,
                ErrorCode::Success,
                "Deleted",
                Some(DeletedMetric { kind, id }),
            ))
        }
        Err(e) => Ok(error_from_dashboard(&e)),
    }
}
