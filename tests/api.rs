// tests/api.rs
mod common;

use serde_json::{json, Value};
use tempfile::TempDir;
use warp::http::StatusCode;

use common::*;
use vendor_dashboard::routes::routes;

fn body_json(body: &[u8]) -> Value {
    serde_json::from_slice(body).unwrap()
}

#[tokio::test]
async fn health_is_constant() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/health").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp.body()), json!({"ok": true}));
}

#[tokio::test]
async fn overview_returns_raw_payload() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let body = overview_body("TEL", "TE Connectivity", "15800000000");
    let _m = mock_json(&mut server, "OVERVIEW", "TEL", 200, &body, 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/overview/tel").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(body_json(resp.body()), body);
}

#[tokio::test]
async fn rate_limited_overview_maps_to_429() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = mock_json(&mut server, "OVERVIEW", "ST", 200, &rate_limit_note(), 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/overview/ST").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::TOO_MANY_REQUESTS);
    let error = body_json(resp.body())["error"].as_str().unwrap().to_string();
    assert!(error.contains("call frequency"));
}

#[tokio::test]
async fn upstream_failure_on_income_maps_to_502() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = mock_json(&mut server, "INCOME_STATEMENT", "DD", 500, &json!({}), 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/income/DD").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(
        body_json(resp.body()),
        json!({"error": "Upstream request failed: Alpha Vantage HTTP 500"})
    );
}

#[tokio::test]
async fn compare_degrades_per_symbol_and_keeps_order() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = mock_json(&mut server, "OVERVIEW", "TEL", 200, &overview_body("TEL", "TE Connectivity", "15800000000"), 1).await;
    let _m = mock_json(&mut server, "INCOME_STATEMENT", "TEL", 200, &income_body("TEL", "15845000000", "16034000000"), 1).await;
    let _m = mock_json(&mut server, "OVERVIEW", "ST", 502, &json!({}), 1).await;
    let _m = mock_json(&mut server, "OVERVIEW", "DD", 200, &overview_body("DD", "DuPont de Nemours Inc", "12000000000"), 1).await;
    let _m = mock_json(&mut server, "INCOME_STATEMENT", "DD", 200, &income_body("DD", "12390000000", "12070000000"), 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/compare?v=TEL&v=st&v=DD")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let rows = body_json(resp.body());
    let rows = rows.as_array().unwrap();
    assert_eq!(rows.len(), 3);

    assert_eq!(rows[0]["symbol"], "TEL");
    assert_eq!(rows[0]["name"], "TE Connectivity");
    assert_eq!(rows[0]["revenueTTM"], json!(15800000000.0));
    assert_eq!(rows[0]["flags"], json!(["NEG_YOY_REVENUE"]));
    assert!(rows[0].get("error").is_none());

    assert_eq!(rows[1]["symbol"], "ST");
    assert_eq!(rows[1]["name"], "Sensata Technologies");
    assert_eq!(rows[1]["revenue"], Value::Null);
    assert_eq!(rows[1]["marketCap"], Value::Null);
    assert!(rows[1]["error"].as_str().unwrap().contains("HTTP 502"));

    assert_eq!(rows[2]["symbol"], "DD");
    assert_eq!(rows[2]["name"], "DuPont de Nemours Inc");
    assert_eq!(rows[2]["revenueFlag"], "OK");
    assert!(rows[2]["yoyRevenue"].as_f64().unwrap() > 0.0);
}

#[tokio::test]
async fn compare_accepts_comma_separated_symbols() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = mock_json(&mut server, "OVERVIEW", "CE", 200, &overview_body("CE", "Celanese", "None"), 1).await;
    let _m = mock_json(&mut server, "INCOME_STATEMENT", "CE", 200, &income_body("CE", "4000000000", "5000000000"), 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/compare?symbols=ce")
        .reply(&filter)
        .await;
    let rows = body_json(resp.body());
    assert_eq!(rows[0]["symbol"], "CE");
    assert_eq!(rows[0]["revenueTTM"], Value::Null);
    assert_eq!(rows[0]["revenueFlag"], "LOW");
    assert_eq!(rows[0]["flags"], json!(["LOW_REVENUE", "NEG_YOY_REVENUE"]));
}

#[tokio::test]
async fn vendors_wraps_rows() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let _m = mock_json(&mut server, "OVERVIEW", "LYB", 200, &rate_limit_note(), 1).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request()
        .method("GET")
        .path("/api/vendors?symbols=LYB")
        .reply(&filter)
        .await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp.body());
    assert_eq!(body["vendors"][0]["symbol"], "LYB");
    assert_eq!(body["vendors"][0]["name"], "LyondellBasell");
    assert!(body["vendors"][0]["error"].is_string());
}

#[tokio::test]
async fn compare_without_symbols_is_bad_request() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/compare").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    assert!(body_json(resp.body())["error"].is_string());
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/nothing").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(resp.body()), json!({"error": "Not Found"}));
}

#[tokio::test]
async fn prime_stops_at_rate_limit() {
    let dir = TempDir::new().unwrap();
    let mut server = mockito::Server::new_async().await;
    let tel_overview = mock_json(&mut server, "OVERVIEW", "TEL", 200, &overview_body("TEL", "TE Connectivity", "1"), 1).await;
    let tel_income = mock_json(&mut server, "INCOME_STATEMENT", "TEL", 200, &income_body("TEL", "1", "1"), 1).await;
    let st_overview = mock_json(&mut server, "OVERVIEW", "ST", 200, &rate_limit_note(), 1).await;
    let st_income = mock_json(&mut server, "INCOME_STATEMENT", "ST", 200, &json!({}), 0).await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("POST").path("/api/prime").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let report = body_json(resp.body());
    assert_eq!(report["aborted"], true);
    assert_eq!(report["skipped"], json!(["DD", "CE", "LYB"]));
    assert_eq!(report["results"][0], json!({"symbol": "TEL", "ok": true}));
    assert_eq!(report["results"][1]["symbol"], "ST");
    assert_eq!(report["results"][1]["ok"], false);
    assert_eq!(report["results"].as_array().unwrap().len(), 2);

    tel_overview.assert_async().await;
    tel_income.assert_async().await;
    st_overview.assert_async().await;
    st_income.assert_async().await;
}

#[tokio::test]
async fn prime_requires_post() {
    let dir = TempDir::new().unwrap();
    let server = mockito::Server::new_async().await;
    let filter = routes(state_for(&server, open_cache(&dir).await));

    let resp = warp::test::request().method("GET").path("/api/prime").reply(&filter).await;
    assert_eq!(resp.status(), StatusCode::METHOD_NOT_ALLOWED);
}
