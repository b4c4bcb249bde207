// src/services/alpha_vantage.rs
use log::{debug, info, warn};
use reqwest::Client;
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

use crate::config::{Config, ConfigError};
use super::cache::{cache_key, CacheStore};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Keys Alpha Vantage uses to report a failed query inside a 200 response.
const SOFT_ERROR_KEYS: [&str; 3] = ["Error Message", "Information", "Note"];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Function {
    Overview,
    IncomeStatement,
}

impl Function {
    pub fn as_str(&self) -> &'static str {
        match self {
            Function::Overview => "OVERVIEW",
            Function::IncomeStatement => "INCOME_STATEMENT",
        }
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum UpstreamError {
    /// Network failure, timeout, non-success status or unreadable body.
    #[error("Upstream request failed: {0}")]
    Transport(String),
    /// Success status with an error, information or rate-limit note in the body.
    #[error("Alpha Vantage {function}({symbol}) error: {message}")]
    SoftError {
        function: Function,
        symbol: String,
        message: String,
    },
}

impl UpstreamError {
    /// True when the provider says the quota or call frequency was exceeded.
    pub fn is_rate_limited(&self) -> bool {
        match self {
            UpstreamError::SoftError { message, .. } => {
                let lower = message.to_lowercase();
                ["frequency", "limit", "quota"].iter().any(|w| lower.contains(w))
            }
            UpstreamError::Transport(_) => false,
        }
    }
}

/// Returns the provider message when `body` is a soft-error payload.
/// A key that is present but `null` or blank does not count.
pub fn detect_soft_error(body: &Value) -> Option<String> {
    let object = body.as_object()?;
    SOFT_ERROR_KEYS.iter().find_map(|key| match object.get(*key)? {
        Value::Null => None,
        Value::String(s) if s.trim().is_empty() => None,
        Value::String(s) => Some(s.clone()),
        other => Some(other.to_string()),
    })
}

pub struct AlphaVantageClient {
    http: Client,
    base_url: String,
    api_key: String,
    cache: Arc<CacheStore>,
    ttl_seconds: i64,
}

impl AlphaVantageClient {
    pub fn new(
        api_key: impl Into<String>,
        cache: Arc<CacheStore>,
        ttl_seconds: i64,
    ) -> Result<Self, ConfigError> {
        let api_key = api_key.into();
        if api_key.trim().is_empty() {
            return Err(ConfigError::MissingCredential);
        }

        let http = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());

        Ok(Self {
            http,
            base_url: crate::config::DEFAULT_BASE_URL.to_string(),
            api_key,
            cache,
            ttl_seconds,
        })
    }

    pub fn from_config(config: &Config, cache: Arc<CacheStore>) -> Result<Self, ConfigError> {
        Ok(Self::new(config.api_key.clone(), cache, config.cache_ttl_seconds)?
            .with_base_url(config.base_url.clone()))
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub async fn overview(&self, symbol: &str) -> Result<Value, UpstreamError> {
        self.fetch(Function::Overview, symbol).await
    }

    pub async fn income_statement(&self, symbol: &str) -> Result<Value, UpstreamError> {
        self.fetch(Function::IncomeStatement, symbol).await
    }

    /// Read-through fetch: serves a fresh cache entry when there is one,
    /// otherwise calls Alpha Vantage and caches the payload if it succeeded.
    pub async fn fetch(&self, function: Function, symbol: &str) -> Result<Value, UpstreamError> {
        let symbol = symbol.trim().to_uppercase();
        let key = cache_key([("function", function.as_str()), ("symbol", symbol.as_str())]);

        match self.cache.get(&key, self.ttl_seconds).await {
            Ok(Some(cached)) => {
                debug!("Cache hit for {}", key);
                return Ok(cached);
            }
            Ok(None) => debug!("Cache miss for {}", key),
            Err(e) => warn!("Cache read failed for {}, treating as miss: {}", key, e),
        }

        info!("Fetching {}({}) from Alpha Vantage", function, symbol);
        let url = format!("{}/query", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("function", function.as_str()),
                ("symbol", symbol.as_str()),
                ("apikey", self.api_key.as_str()),
            ])
            .send()
            .await
            .map_err(|e| UpstreamError::Transport(e.without_url().to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Transport(format!(
                "Alpha Vantage HTTP {}",
                status.as_u16()
            )));
        }

        let data: Value = response.json().await.map_err(|e| {
            UpstreamError::Transport(format!("Unreadable Alpha Vantage response: {}", e.without_url()))
        })?;

        if let Some(message) = detect_soft_error(&data) {
            warn!("Alpha Vantage {}({}) returned: {}", function, symbol, message);
            return Err(UpstreamError::SoftError {
                function,
                symbol,
                message,
            });
        }

        if let Err(e) = self.cache.set(&key, &data).await {
            warn!("Failed to cache {}: {}", key, e);
        }
        Ok(data)
    }
}
