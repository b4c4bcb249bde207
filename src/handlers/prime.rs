// src/handlers/prime.rs
use log::info;
use std::sync::Arc;
use warp::reply::Json;
use warp::Rejection;

use crate::services::prime::{prime_cache, roster_symbols};
use crate::state::AppState;

pub async fn post_prime(state: Arc<AppState>) -> Result<Json, Rejection> {
    let symbols = roster_symbols();
    info!(
        "Priming cache for {:?} with {}s between calls",
        symbols,
        state.prime_delay.as_secs()
    );

    let report = prime_cache(&state.client, &symbols, state.prime_delay).await;
    Ok(warp::reply::json(&report))
}
