use anyhow::Context;
use dotenv::dotenv;
use log::{info, warn};
use std::net::SocketAddr;
use std::sync::Arc;
use warp::Filter;

use vendor_dashboard::config::Config;
use vendor_dashboard::routes;
use vendor_dashboard::services::alpha_vantage::AlphaVantageClient;
use vendor_dashboard::services::cache::CacheStore;
use vendor_dashboard::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();
    info!("Logger initialized. Starting the application...");

    let config = Config::from_env()?;
    info!(
        "Using PORT: {}, DB_PATH: {}, CACHE_TTL_SECONDS: {}",
        config.port, config.db_path, config.cache_ttl_seconds
    );

    let cache = CacheStore::open(&config.db_path)
        .await
        .with_context(|| format!("opening cache at {}", config.db_path))?;
    let client = AlphaVantageClient::from_config(&config, Arc::new(cache))?;
    let state = Arc::new(AppState::new(client, config.prime_delay));

    let mut cors = warp::cors()
        .allow_header("content-type")
        .allow_methods(vec!["GET", "POST", "OPTIONS"]);
    if config.allows_any_origin() {
        cors = cors.allow_any_origin();
    } else {
        cors = cors.allow_origins(config.allowed_origins.iter().map(String::as_str));
    }

    if !std::path::Path::new(&config.static_dir).is_dir() {
        warn!("Static directory {} not found; only the API will be served", config.static_dir);
    }
    let api = routes::routes_with_static(state, config.static_dir.clone()).with(cors);
    info!("Routes configured successfully with CORS.");

    let addr: SocketAddr = ([0, 0, 0, 0], config.port).into();
    info!("Starting server on {}", addr);
    warp::serve(api).run(addr).await;
    Ok(())
}
