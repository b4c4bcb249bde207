// src/services/prime.rs
use log::{info, warn};
use std::time::Duration;

use crate::models::{PrimeReport, PrimeResult, VENDOR_SYMBOLS};
use super::alpha_vantage::{AlphaVantageClient, Function};

const PRIME_FUNCTIONS: [Function; 2] = [Function::Overview, Function::IncomeStatement];

pub fn roster_symbols() -> Vec<String> {
    VENDOR_SYMBOLS.iter().map(|(s, _)| s.to_string()).collect()
}

/// Warms the cache for `symbols` one call at a time, sleeping `delay`
/// between upstream calls. A rate-limit signal stops the run and the
/// remaining symbols are reported as skipped.
pub async fn prime_cache(
    client: &AlphaVantageClient,
    symbols: &[String],
    delay: Duration,
) -> PrimeReport {
    let mut report = PrimeReport::default();
    let mut calls = 0usize;

    for (idx, symbol) in symbols.iter().enumerate() {
        let mut error = None;
        let mut rate_limited = false;

        for function in PRIME_FUNCTIONS {
            if calls > 0 && !delay.is_zero() {
                tokio::time::sleep(delay).await;
            }
            calls += 1;

            if let Err(e) = client.fetch(function, symbol).await {
                warn!("Priming {}({}) failed: {}", function, symbol, e);
                rate_limited = e.is_rate_limited();
                error = Some(e.to_string());
                break;
            }
        }

        report.results.push(PrimeResult {
            symbol: symbol.to_uppercase(),
            ok: error.is_none(),
            error,
        });

        if rate_limited {
            report.aborted = true;
            report.skipped = symbols[idx + 1..].iter().map(|s| s.to_uppercase()).collect();
            warn!("Rate limited while priming; skipping {:?}", report.skipped);
            break;
        }
    }

    info!(
        "Priming finished: {} ok, {} failed, {} skipped",
        report.results.iter().filter(|r| r.ok).count(),
        report.results.iter().filter(|r| !r.ok).count(),
        report.skipped.len()
    );
    report
}
