// src/state.rs
use std::time::Duration;

use crate::services::alpha_vantage::AlphaVantageClient;

/// Shared by every route. The client owns the cache handle.
pub struct AppState {
    pub client: AlphaVantageClient,
    pub prime_delay: Duration,
}

impl AppState {
    pub fn new(client: AlphaVantageClient, prime_delay: Duration) -> Self {
        Self { client, prime_delay }
    }
}
