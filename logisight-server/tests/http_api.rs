// Copyright 2025 Logisight Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE. See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program. If not, see <https://www.gnu.org/licenses/>.

//! Router-level tests against a seeded warehouse

use axum::{
    body::{to_bytes, Body},
    http::{Request, StatusCode},
    Router,
};
use logisight_query::testing::TestWarehouse;
use logisight_server::{api::AppState, build_router, config::ServerConfig};
use serde_json::Value;
use tower::ServiceExt;

async fn app() -> (TestWarehouse, AppState, Router) {
    let warehouse = TestWarehouse::seeded().await.unwrap();
    let state = AppState {
        engine: warehouse.engine().await.unwrap(),
    };
    let router = build_router(state.clone(), &ServerConfig::default()).unwrap();
    (warehouse, state, router)
}

async fn get(router: Router, uri: &str) -> (StatusCode, Value) {
    let response = router
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_kpi_envelope() {
    let (_wh, _state, router) = app().await;
    let (status, body) = get(router, "/api/kpi").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["success"], true);
    assert!(body.get("error").is_none());
    assert_eq!(body["data"]["total_deliveries"], 7);
    assert_eq!(body["data"]["on_time_deliveries"], 4);
}

#[tokio::test]
async fn test_camel_case_filters() {
    let (_wh, _state, router) = app().await;
    let (status, body) = get(
        router,
        "/api/partners?startDate=2024-01-01&endDate=2024-12-31&serviceMode=express",
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|row| row["partner_name"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(names, vec!["Bolt Couriers", "Acme Freight"]);
}

#[tokio::test]
async fn test_repeated_filter_uses_first_value() {
    let (_wh, _state, router) = app().await;
    let (status, repeated) = get(router.clone(), "/api/kpi?region=North&region=South").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(repeated["success"], true);

    let (_, north) = get(router, "/api/kpi?region=North").await;
    assert_eq!(repeated, north);
    assert_ne!(repeated["data"]["total_deliveries"], 7);
}

#[tokio::test]
async fn test_trend_weekly_buckets() {
    let (_wh, _state, router) = app().await;
    let (_, body) = get(router, "/api/deliveries?groupBy=week&region=North").await;
    let dates: Vec<_> = body["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|p| p["date"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(dates, vec!["2024-W01", "2024-W07", "2024-W13"]);
}

#[tokio::test]
async fn test_each_route_answers() {
    let (_wh, _state, router) = app().await;
    for uri in [
        "/api/deliveries",
        "/api/kpi",
        "/api/partners",
        "/api/regions",
        "/api/service-modes",
        "/api/weather",
        "/api/filters",
    ] {
        let (status, body) = get(router.clone(), uri).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(body["success"], true, "{uri}");
    }
}

#[tokio::test]
async fn test_filters_payload() {
    let (_wh, _state, router) = app().await;
    let (_, body) = get(router, "/api/filters").await;
    assert_eq!(
        body["data"]["serviceModes"],
        serde_json::json!(["drone", "express", "same day", "standard", "two day"])
    );
    assert_eq!(
        body["data"]["regions"],
        serde_json::json!(["East", "North", "South"])
    );
}

#[tokio::test]
async fn test_named_view_route() {
    let (_wh, _state, router) = app().await;
    let (status, body) = get(router.clone(), "/api/views/service-mode-breakdown").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["data"][0]["service_mode"], "same day");

    let (status, body) = get(router, "/api/views/shipments").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["success"], false);
    assert_eq!(body["error"], "Unknown view: shipments");
    assert!(body.get("data").is_none());
}

#[tokio::test]
async fn test_warehouse_failure_is_failure_envelope() {
    let (_wh, state, router) = app().await;
    state.engine.close().await;

    let (status, body) = get(router.clone(), "/api/regions").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["success"], false);
    assert!(body["error"].as_str().unwrap().starts_with("Database error"));

    let (status, body) = get(router, "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(body["status"], "degraded");
}

#[tokio::test]
async fn test_health_routes() {
    let (_wh, _state, router) = app().await;
    let (status, body) = get(router.clone(), "/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");

    let (status, body) = get(router, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["warehouse"]["reachable"], true);
}
