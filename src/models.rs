// src/models.rs
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Vendor roster: ticker and display name.
pub const VENDOR_SYMBOLS: [(&str, &str); 5] = [
    ("TEL", "TE Connectivity"),
    ("ST", "Sensata Technologies"),
    ("DD", "DuPont de Nemours"),
    ("CE", "Celanese"),
    ("LYB", "LyondellBasell"),
];

/// Static display name for a roster symbol.
pub fn roster_name(symbol: &str) -> Option<&'static str> {
    VENDOR_SYMBOLS
        .iter()
        .find(|(s, _)| s.eq_ignore_ascii_case(symbol))
        .map(|(_, name)| *name)
}

/// The OVERVIEW fields we read. Everything else passes through untouched.
#[derive(Debug, Default, Deserialize)]
pub struct Overview {
    #[serde(rename = "Name", default, deserialize_with = "lenient_text")]
    pub name: Option<String>,
    #[serde(rename = "Sector", default, deserialize_with = "lenient_text")]
    pub sector: Option<String>,
    #[serde(rename = "Industry", default, deserialize_with = "lenient_text")]
    pub industry: Option<String>,
    #[serde(rename = "MarketCapitalization", default, deserialize_with = "lenient_text")]
    pub market_capitalization: Option<String>,
    #[serde(rename = "RevenueTTM", default, deserialize_with = "lenient_text")]
    pub revenue_ttm: Option<String>,
    #[serde(rename = "GrossProfitTTM", default, deserialize_with = "lenient_text")]
    pub gross_profit_ttm: Option<String>,
    #[serde(rename = "EBITDA", default, deserialize_with = "lenient_text")]
    pub ebitda: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeStatement {
    #[serde(default, deserialize_with = "lenient_reports")]
    pub annual_reports: Vec<IncomeReport>,
    #[serde(default, deserialize_with = "lenient_reports")]
    pub quarterly_reports: Vec<IncomeReport>,
}

#[derive(Debug, Default, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomeReport {
    #[serde(default, deserialize_with = "lenient_text")]
    pub fiscal_date_ending: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub total_revenue: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub net_income: Option<String>,
}

/// Strings pass through, numbers become their decimal text, anything else is `None`.
fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    })
}

/// `null` or a non-array reads as no reports. An entry that is not an object
/// becomes an empty report so the positions of the others are kept.
fn lenient_reports<'de, D>(deserializer: D) -> Result<Vec<IncomeReport>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items
            .into_iter()
            .map(|item| serde_json::from_value(item).unwrap_or_default())
            .collect(),
        _ => Vec::new(),
    })
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorMetrics {
    pub symbol: String,
    pub name: String,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub market_cap: Option<f64>,
    #[serde(rename = "revenueTTM")]
    pub revenue_ttm: Option<f64>,
    #[serde(rename = "grossProfitTTM")]
    pub gross_profit_ttm: Option<f64>,
    #[serde(rename = "ebitdaTTM")]
    pub ebitda_ttm: Option<f64>,
    pub yoy_revenue: Option<f64>,
    pub fiscal_year: Option<String>,
    pub revenue: Option<f64>,
    pub net_income: Option<f64>,
    pub revenue_flag: Option<String>,
    pub flags: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PrimeResult {
    pub symbol: String,
    pub ok: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PrimeReport {
    pub results: Vec<PrimeResult>,
    /// Set when a rate-limit signal stopped the run early.
    pub aborted: bool,
    pub skipped: Vec<String>,
}
