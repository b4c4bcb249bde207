// src/handlers/fundamentals.rs
use log::{error, info};
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use super::error::ApiError;
use crate::services::alpha_vantage::Function;
use crate::state::AppState;

async fn raw_payload(
    function: Function,
    symbol: String,
    state: Arc<AppState>,
) -> Result<Json, Rejection> {
    let symbol = symbol.to_uppercase();
    info!("Handling request for {}({})", function, symbol);

    match state.client.fetch(function, &symbol).await {
        Ok(data) => Ok(warp::reply::json(&data)),
        Err(e) => {
            error!("{} failed for {}: {}", function, symbol, e);
            Err(warp::reject::custom(ApiError::upstream(&e)))
        }
    }
}

pub async fn get_overview(symbol: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    raw_payload(Function::Overview, symbol, state).await
}

pub async fn get_income(symbol: String, state: Arc<AppState>) -> Result<Json, Rejection> {
    raw_payload(Function::IncomeStatement, symbol, state).await
}
