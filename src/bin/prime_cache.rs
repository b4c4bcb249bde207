// src/bin/prime_cache.rs
//! Warms the response cache from the command line.
//!
//! Usage: `prime_cache [SYMBOL...]` (defaults to the vendor roster).

use dotenv::dotenv;
use log::info;
use std::sync::Arc;

use vendor_dashboard::config::Config;
use vendor_dashboard::services::alpha_vantage::AlphaVantageClient;
use vendor_dashboard::services::cache::CacheStore;
use vendor_dashboard::services::prime::{prime_cache, roster_symbols};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    env_logger::init();

    let config = Config::from_env()?;
    let cache = CacheStore::open(&config.db_path).await?;
    let client = AlphaVantageClient::from_config(&config, Arc::new(cache))?;

    let args: Vec<String> = std::env::args().skip(1).map(|s| s.to_uppercase()).collect();
    let symbols = if args.is_empty() { roster_symbols() } else { args };
    info!("Priming {} symbols into {}", symbols.len(), config.db_path);

    let report = prime_cache(&client, &symbols, config.prime_delay).await;
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
