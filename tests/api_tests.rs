//! HTTP API 集成测试
//!
//! 覆盖指标 CRUD、看板查询与健康检查端点。

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use commsboard::api::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware};
use commsboard::api::services::{AppStartTime, api_v1_routes, health_routes};
use commsboard::services::{DashboardService, MetricService};
use commsboard::storage::SeaOrmStorage;

// =============================================================================
// 测试环境初始化
// =============================================================================

struct TestContext {
    storage: Arc<SeaOrmStorage>,
    metrics: Arc<MetricService>,
    dashboard: Arc<DashboardService>,
    _dir: TempDir,
}

async fn context() -> TestContext {
    let dir = TempDir::new().expect("创建临时目录失败");
    let db_path = dir.path().join("api_test.db");
    let db_url = format!("sqlite://{}?mode=rwc", db_path.display());
    let storage = Arc::new(
        SeaOrmStorage::new(&db_url, "sqlite")
            .await
            .expect("创建存储失败"),
    );
    TestContext {
        metrics: Arc::new(MetricService::new(storage.clone())),
        dashboard: Arc::new(DashboardService::new(storage.clone())),
        storage,
        _dir: dir,
    }
}

macro_rules! init_app {
    ($ctx:expr) => {
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .app_data(web::Data::new($ctx.storage.clone()))
                .app_data(web::Data::new($ctx.metrics.clone()))
                .app_data(web::Data::new($ctx.dashboard.clone()))
                .app_data(web::Data::new(AppStartTime {
                    start_datetime: chrono::Utc::now(),
                }))
                .service(health_routes())
                .service(api_v1_routes("/api")),
        )
        .await
    };
}

fn social_body(country: &str, date: &str, followers: i64) -> Value {
    json!({
        "platform": "FACEBOOK",
        "businessUnit": "ASM",
        "country": country,
        "date": date,
        "followers": followers,
    })
}

// =============================================================================
// 指标 CRUD
// =============================================================================

#[actix_rt::test]
async fn test_upsert_then_list_and_latest() {
    let ctx = context().await;
    let app = init_app!(ctx);

    for (country, date, followers) in [("US", "2024-01-01", 100), ("US", "2024-01-08", 110)] {
        let req = TestRequest::post()
            .uri("/api/v1/metrics/social")
            .set_json(social_body(country, date, followers))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["code"], 0);
        assert_eq!(body["data"]["followers"], followers);
    }

    let req = TestRequest::get()
        .uri("/api/v1/metrics/social?businessUnit=ASM&startDate=2024-01-01")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 2);

    let req = TestRequest::get()
        .uri("/api/v1/metrics/social/latest")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["date"], "2024-01-08");
}

#[actix_rt::test]
async fn test_upsert_same_key_keeps_single_row() {
    let ctx = context().await;
    let app = init_app!(ctx);

    let mut ids = Vec::new();
    for followers in [100, 150] {
        let req = TestRequest::post()
            .uri("/api/v1/metrics/social")
            .set_json(social_body("us", "2024-01-01", followers))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        ids.push(body["data"]["id"].as_i64().unwrap());
        assert_eq!(body["data"]["country"], "US");
    }
    assert_eq!(ids[0], ids[1]);

    let req = TestRequest::get().uri("/api/v1/metrics/social").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    assert_eq!(rows.len(), 1);
    assert_eq!(rows[0]["followers"], 150);
}

#[actix_rt::test]
async fn test_update_and_delete_by_id() {
    let ctx = context().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/v1/metrics/website")
        .set_json(json!({"businessUnit": "EM", "country": "UK", "date": "2024-02-05", "users": 10}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let id = body["data"]["id"].as_i64().unwrap();

    let req = TestRequest::put()
        .uri(&format!("/api/v1/metrics/website/{}", id))
        .set_json(json!({"businessUnit": "EM", "country": "UK", "date": "2024-02-05", "users": 25}))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["data"]["users"], 25);

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/metrics/website/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Deleted");
    assert_eq!(body["data"]["kind"], "website");

    let req = TestRequest::delete()
        .uri(&format!("/api/v1/metrics/website/{}", id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3000);
}

#[actix_rt::test]
async fn test_newsletter_response_carries_display_percent() {
    let ctx = context().await;
    let app = init_app!(ctx);

    let req = TestRequest::post()
        .uri("/api/v1/metrics/newsletter")
        .set_json(json!({
            "businessUnit": "EM",
            "country": "UK",
            "date": "2024-02-05",
            "recipients": 400,
            "openRate": 0.35,
            "openRatePercent": 99.0,
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["code"], 0);
    assert_eq!(body["data"]["openRate"], 0.35);
    let percent = body["data"]["openRatePercent"].as_f64().unwrap();
    assert!((percent - 35.0).abs() < 1e-9);
}

#[actix_rt::test]
async fn test_invalid_requests_return_envelope() {
    let ctx = context().await;
    let app = init_app!(ctx);

    // 未知指标类型
    let req = TestRequest::get().uri("/api/v1/metrics/tv").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3003);

    // 百分比形式的打开率
    let req = TestRequest::post()
        .uri("/api/v1/metrics/newsletter")
        .set_json(json!({"businessUnit": "EM", "country": "UK", "date": "2024-02-05", "openRate": 35}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 3001);

    // 日期格式错误
    let req = TestRequest::get()
        .uri("/api/v1/metrics/social?startDate=01-02-2024")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1012);

    // 非 JSON 请求体
    let req = TestRequest::post()
        .uri("/api/v1/metrics/social")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 1000);
}

// =============================================================================
// 看板查询
// =============================================================================

macro_rules! seed_dashboard {
    ($app:expr) => {
        for (country, date, followers) in [
            ("US", "2024-02-26", 80),
            ("US", "2024-03-25", 100),
            ("UK", "2024-03-25", 50),
        ] {
            let req = TestRequest::post()
                .uri("/api/v1/metrics/social")
                .set_json(social_body(country, date, followers))
                .to_request();
            let resp = test::call_service($app, req).await;
            assert!(resp.status().is_success());
        }
    };
}

#[actix_rt::test]
async fn test_dashboard_overview_and_countries() {
    let ctx = context().await;
    let app = init_app!(ctx);
    seed_dashboard!(&app);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/overview?asOf=2024-04-02")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let followers = &body["data"]["followers"];
    assert_eq!(followers["latest"]["total"], 150);
    assert_eq!(followers["growth"]["current"], 150);
    assert_eq!(followers["growth"]["previous"], 80);
    assert_eq!(followers["growth"]["hasBaseline"], true);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/countries")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let rows = body["data"].as_array().unwrap();
    let summary: Vec<(String, i64)> = rows
        .iter()
        .map(|r| {
            (
                r["country"].as_str().unwrap().to_string(),
                r["followers"].as_i64().unwrap(),
            )
        })
        .collect();
    assert_eq!(
        summary,
        vec![
            ("Global".to_string(), 150),
            ("US".to_string(), 100),
            ("UK".to_string(), 50)
        ]
    );
}

#[actix_rt::test]
async fn test_dashboard_trend_and_errors() {
    let ctx = context().await;
    let app = init_app!(ctx);
    seed_dashboard!(&app);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/trend?kind=social&measure=followers&asOf=2024-04-02")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let buckets = body["data"].as_array().unwrap();
    assert_eq!(buckets.len(), 2);
    assert_eq!(buckets[0]["month"], "Feb 2024");
    assert_eq!(buckets[1]["value"], 150);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/trend?kind=social&measure=retweets")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6001);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/countries?startDate=2024-03-01&endDate=2024-02-01")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["code"], 6002);
}

#[actix_rt::test]
async fn test_platforms_share() {
    let ctx = context().await;
    let app = init_app!(ctx);
    seed_dashboard!(&app);

    let req = TestRequest::get()
        .uri("/api/v1/dashboard/platforms")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    let shares = body["data"].as_array().unwrap();
    assert_eq!(shares.len(), 1);
    assert_eq!(shares[0]["platform"], "FACEBOOK");
    assert_eq!(shares[0]["value"], 100.0);
}

// =============================================================================
// 健康检查
// =============================================================================

#[actix_rt::test]
async fn test_health_endpoints() {
    let ctx = context().await;
    let app = init_app!(ctx);

    let req = TestRequest::get().uri("/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["data"]["status"], "healthy");
    assert_eq!(body["data"]["storage"]["backend"], "sqlite");

    let req = TestRequest::get().uri("/health/live").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);
}
