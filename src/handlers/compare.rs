// src/handlers/compare.rs
use log::info;
use serde_json::json;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::metrics::compare_vendors;
use crate::state::AppState;

/// Collects tickers from repeated `v=` and comma separated `symbols=`
/// parameters, in query-string order. Blank entries are dropped.
pub fn parse_symbols(params: &[(String, String)]) -> Vec<String> {
    params
        .iter()
        .filter(|(k, _)| k == "v" || k == "symbols")
        .flat_map(|(_, v)| v.split(','))
        .map(|s| s.trim().to_uppercase())
        .filter(|s| !s.is_empty())
        .collect()
}

fn requested_symbols(params: &[(String, String)]) -> Result<Vec<String>, Rejection> {
    let symbols = parse_symbols(params);
    if symbols.is_empty() {
        return Err(warp::reject::custom(ApiError::bad_request(
            "Provide at least one symbol (e.g., v=TEL&v=ST or symbols=TEL,ST)",
        )));
    }
    Ok(symbols)
}

pub async fn get_compare(
    params: Vec<(String, String)>,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let symbols = requested_symbols(&params)?;
    info!("Handling compare request for {:?}", symbols);

    let rows = compare_vendors(&state.client, &symbols).await;
    Ok(warp::reply::json(&rows))
}

pub async fn get_vendors(
    params: Vec<(String, String)>,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let symbols = requested_symbols(&params)?;
    info!("Handling vendors request for {:?}", symbols);

    let rows = compare_vendors(&state.client, &symbols).await;
    Ok(warp::reply::json(&json!({ "vendors": rows })))
}
