//! 看板端点

use std::sync::Arc;

use actix_web::{HttpResponse, Responder, Result as ActixResult, web};
use tracing::trace;

use crate::errors::{DashboardError, Result};
use crate::rollup::{CountryRow, MonthBucket, PlatformShare};
use crate::services::{DashboardOverview, DashboardService};

use super::error_code::ErrorCode;
use super::helpers::{error_response, success_response};
use super::types::{DashboardQuery, TrendQuery};

/// 看板查询失败统一使用 6000 段错误码
fn dashboard_result<T: serde::Serialize>(result: Result<T>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(err) => {
            let code = match &err {
                DashboardError::DatabaseOperation(_) => ErrorCode::DashboardQueryFailed,
                other => ErrorCode::from(other),
            };
            error_response(err.http_status(), code, err.message())
        }
    }
}

async fn load_overview(
    service: &DashboardService,
    query: &DashboardQuery,
) -> Result<DashboardOverview> {
    let filter = query.filter.to_filter()?;
    let today = query.today()?;
    service.overview(&filter, today).await
}

async fn load_countries(
    service: &DashboardService,
    query: &DashboardQuery,
) -> Result<Vec<CountryRow>> {
    let filter = query.filter.to_filter()?;
    service.country_distribution(&filter).await
}

async fn load_platforms(
    service: &DashboardService,
    query: &DashboardQuery,
) -> Result<Vec<PlatformShare>> {
    let filter = query.filter.to_filter()?;
    service.platform_breakdown(&filter).await
}

async fn load_trend(service: &DashboardService, query: &TrendQuery) -> Result<Vec<MonthBucket>> {
    let kind = query.metric_kind()?;
    let filter = query.dashboard.filter.to_filter()?;
    let today = query.dashboard.today()?;
    service
        .monthly_trend(kind, &query.measure, &filter, today)
        .await
}

/// GET /dashboard/overview
pub async fn overview(
    query: web::Query<DashboardQuery>,
    service: web::Data<Arc<DashboardService>>,
) -> ActixResult<impl Responder> {
    trace!("Dashboard API: overview with {:?}", query);
    Ok(dashboard_result(load_overview(&service, &query).await))
}

/// GET /dashboard/countries
pub async fn countries(
    query: web::Query<DashboardQuery>,
    service: web::Data<Arc<DashboardService>>,
) -> ActixResult<impl Responder> {
    trace!("Dashboard API: countries with {:?}", query);
    Ok(dashboard_result(load_countries(&service, &query).await))
}

/// GET /dashboard/platforms
pub async fn platforms(
    query: web::Query<DashboardQuery>,
    service: web::Data<Arc<DashboardService>>,
) -> ActixResult<impl Responder> {
    trace!("Dashboard API: platforms with {:?}", query);
    Ok(dashboard_result(load_platforms(&service, &query).await))
}

/// GET /dashboard/trend?kind=&measure=
pub async fn trend(
    query: web::Query<TrendQuery>,
    service: web::Data<Arc<DashboardService>>,
) -> ActixResult<impl Responder> {
    trace!("Dashboard API: trend with {:?}", query);
    Ok(dashboard_result(load_trend(&service, &query).await))
}
