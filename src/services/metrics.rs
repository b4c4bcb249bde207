// src/services/metrics.rs
use log::{debug, warn};
use serde_json::Value;

use crate::models::{roster_name, IncomeReport, IncomeStatement, Overview, VendorMetrics};
use super::alpha_vantage::{AlphaVantageClient, UpstreamError};

/// Revenue below this is flagged LOW. Revenue equal to it is OK.
pub const LOW_REVENUE_THRESHOLD: f64 = 5_000_000_000.0;

pub const FLAG_LOW_REVENUE: &str = "LOW_REVENUE";
pub const FLAG_NEG_YOY_REVENUE: &str = "NEG_YOY_REVENUE";

/// Alpha Vantage sends numbers as strings and uses "None" for gaps.
pub fn parse_number(raw: Option<&str>) -> Option<f64> {
    let s = raw?.trim();
    if s.is_empty() || s.eq_ignore_ascii_case("none") {
        return None;
    }
    s.parse::<f64>().ok().filter(|v| v.is_finite())
}

fn non_empty(raw: &Option<String>) -> Option<String> {
    raw.as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty() && !s.eq_ignore_ascii_case("none"))
        .map(str::to_string)
}

/// Sum of the four most recent quarterly revenues, or `None` if any is missing.
pub fn ttm_from_quarters(quarterly: &[IncomeReport]) -> Option<f64> {
    if quarterly.len() < 4 {
        return None;
    }
    quarterly[..4]
        .iter()
        .map(|r| parse_number(r.total_revenue.as_deref()))
        .sum::<Option<f64>>()
}

/// Growth between the two most recent annual reports as a fraction (0.12 = 12%).
pub fn yoy_growth(annual: &[IncomeReport]) -> Option<f64> {
    if annual.len() < 2 {
        return None;
    }
    let latest = parse_number(annual[0].total_revenue.as_deref())?;
    let previous = parse_number(annual[1].total_revenue.as_deref())?;
    if previous == 0.0 {
        return None;
    }
    Some((latest - previous) / previous)
}

pub fn revenue_flag(revenue: Option<f64>) -> Option<&'static str> {
    revenue.map(|r| if r < LOW_REVENUE_THRESHOLD { "LOW" } else { "OK" })
}

pub fn metric_flags(revenue: Option<f64>, yoy: Option<f64>) -> Vec<String> {
    let mut flags = Vec::new();
    if revenue_flag(revenue) == Some("LOW") {
        flags.push(FLAG_LOW_REVENUE.to_string());
    }
    if yoy.map_or(false, |g| g < 0.0) {
        flags.push(FLAG_NEG_YOY_REVENUE.to_string());
    }
    flags
}

/// Overview name, then the roster name, then the ticker itself.
pub fn display_name(symbol: &str, overview_name: Option<String>) -> String {
    overview_name
        .or_else(|| roster_name(symbol).map(str::to_string))
        .unwrap_or_else(|| symbol.to_string())
}

impl VendorMetrics {
    /// Placeholder row for a symbol whose data could not be fetched.
    pub fn degraded(symbol: &str, error: impl Into<String>) -> Self {
        let symbol = symbol.trim().to_uppercase();
        VendorMetrics {
            name: display_name(&symbol, None),
            symbol,
            sector: None,
            industry: None,
            market_cap: None,
            revenue_ttm: None,
            gross_profit_ttm: None,
            ebitda_ttm: None,
            yoy_revenue: None,
            fiscal_year: None,
            revenue: None,
            net_income: None,
            revenue_flag: None,
            flags: Vec::new(),
            error: Some(error.into()),
        }
    }
}

pub fn derive_metrics(symbol: &str, overview: &Value, income: &Value) -> VendorMetrics {
    let symbol = symbol.trim().to_uppercase();

    let ov: Overview = serde_json::from_value(overview.clone()).unwrap_or_else(|e| {
        debug!("Overview for {} has unexpected shape: {}", symbol, e);
        Overview::default()
    });
    let inc: IncomeStatement = serde_json::from_value(income.clone()).unwrap_or_else(|e| {
        debug!("Income statement for {} has unexpected shape: {}", symbol, e);
        IncomeStatement::default()
    });

    let revenue_ttm = parse_number(ov.revenue_ttm.as_deref())
        .or_else(|| ttm_from_quarters(&inc.quarterly_reports));
    let yoy_revenue = yoy_growth(&inc.annual_reports);

    let latest = inc.annual_reports.first();
    let revenue = latest.and_then(|r| parse_number(r.total_revenue.as_deref()));
    let flag_revenue = revenue_ttm.or(revenue);

    let sector = non_empty(&ov.sector);
    let industry = non_empty(&ov.industry).or_else(|| sector.clone());

    VendorMetrics {
        name: display_name(&symbol, non_empty(&ov.name)),
        symbol,
        sector,
        industry,
        market_cap: parse_number(ov.market_capitalization.as_deref()),
        revenue_ttm,
        gross_profit_ttm: parse_number(ov.gross_profit_ttm.as_deref()),
        ebitda_ttm: parse_number(ov.ebitda.as_deref()),
        yoy_revenue,
        fiscal_year: latest.and_then(|r| non_empty(&r.fiscal_date_ending)),
        revenue,
        net_income: latest.and_then(|r| parse_number(r.net_income.as_deref())),
        revenue_flag: revenue_flag(flag_revenue).map(str::to_string),
        flags: metric_flags(flag_revenue, yoy_revenue),
        error: None,
    }
}

pub async fn fetch_vendor_metrics(
    client: &AlphaVantageClient,
    symbol: &str,
) -> Result<VendorMetrics, UpstreamError> {
    let overview = client.overview(symbol).await?;
    let income = client.income_statement(symbol).await?;
    Ok(derive_metrics(symbol, &overview, &income))
}

/// One row per requested symbol, in order. Failed symbols become degraded rows.
pub async fn compare_vendors(client: &AlphaVantageClient, symbols: &[String]) -> Vec<VendorMetrics> {
    let mut rows = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        match fetch_vendor_metrics(client, symbol).await {
            Ok(row) => rows.push(row),
            Err(e) => {
                warn!("compare row degraded for {}: {}", symbol, e);
                rows.push(VendorMetrics::degraded(symbol, e.to_string()));
            }
        }
    }
    rows
}
