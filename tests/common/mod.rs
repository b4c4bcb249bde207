// tests/common/mod.rs
#![allow(dead_code)]

use mockito::{Matcher, Mock, ServerGuard};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;

use vendor_dashboard::services::alpha_vantage::AlphaVantageClient;
use vendor_dashboard::services::cache::CacheStore;
use vendor_dashboard::state::AppState;

pub const API_KEY: &str = "test-key";

pub async fn open_cache(dir: &TempDir) -> Arc<CacheStore> {
    Arc::new(CacheStore::open(dir.path().join("cache.db")).await.unwrap())
}

pub fn client_for(server: &ServerGuard, cache: Arc<CacheStore>, ttl_seconds: i64) -> AlphaVantageClient {
    AlphaVantageClient::new(API_KEY, cache, ttl_seconds)
        .unwrap()
        .with_base_url(server.url())
}

pub fn state_for(server: &ServerGuard, cache: Arc<CacheStore>) -> Arc<AppState> {
    Arc::new(AppState::new(client_for(server, cache, 3600), Duration::ZERO))
}

fn query_for(function: &str, symbol: &str) -> Matcher {
    Matcher::AllOf(vec![
        Matcher::UrlEncoded("function".into(), function.into()),
        Matcher::UrlEncoded("symbol".into(), symbol.into()),
        Matcher::UrlEncoded("apikey".into(), API_KEY.into()),
    ])
}

pub async fn mock_json(
    server: &mut ServerGuard,
    function: &str,
    symbol: &str,
    status: usize,
    body: &Value,
    hits: usize,
) -> Mock {
    server
        .mock("GET", "/query")
        .match_query(query_for(function, symbol))
        .with_status(status)
        .with_header("content-type", "application/json")
        .with_body(body.to_string())
        .expect(hits)
        .create_async()
        .await
}

pub fn overview_body(symbol: &str, name: &str, revenue_ttm: &str) -> Value {
    json!({
        "Symbol": symbol,
        "Name": name,
        "Sector": "MANUFACTURING",
        "Industry": "SPECIALTY CHEMICALS",
        "MarketCapitalization": "12000000000",
        "RevenueTTM": revenue_ttm,
        "GrossProfitTTM": "2000000000",
        "EBITDA": "1500000000"
    })
}

pub fn income_body(symbol: &str, latest: &str, previous: &str) -> Value {
    json!({
        "symbol": symbol,
        "annualReports": [
            {"fiscalDateEnding": "2024-12-31", "totalRevenue": latest, "netIncome": "500000000"},
            {"fiscalDateEnding": "2023-12-31", "totalRevenue": previous, "netIncome": "400000000"}
        ],
        "quarterlyReports": []
    })
}

pub fn rate_limit_note() -> Value {
    json!({
        "Note": "Thank you for using Alpha Vantage! Our standard API call frequency is 5 calls per minute and 500 calls per day."
    })
}
