// src/config.rs
use log::warn;
use std::env;
use std::time::Duration;
use thiserror::Error;
use warp::http::uri::{Authority, Scheme};

pub const DEFAULT_BASE_URL: &str = "https://www.alphavantage.co";
pub const DEFAULT_TTL_SECONDS: i64 = 86_400;
pub const DEFAULT_PRIME_DELAY_SECONDS: u64 = 15;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("Missing ALPHAVANTAGE_API_KEY. Put it in .env at project root, e.g. ALPHAVANTAGE_API_KEY=<your key>")]
    MissingCredential,
    #[error("Invalid ALLOWED_ORIGINS entry {0:?}, expected scheme://host[:port] or *")]
    InvalidOrigin(String),
}

#[derive(Debug, Clone)]
pub struct Config {
    pub api_key: String,
    pub base_url: String,
    pub cache_ttl_seconds: i64,
    pub db_path: String,
    pub allowed_origins: Vec<String>,
    pub port: u16,
    pub prime_delay: Duration,
    pub static_dir: String,
}

impl Config {
    /// Reads the process environment. Call `dotenv().ok()` first to pick up `.env`.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup("ALPHAVANTAGE_API_KEY")
            .or_else(|| lookup("ALPHA_VANTAGE_KEY"))
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(ConfigError::MissingCredential)?;

        let cache_ttl_seconds = parse_or_default(&lookup, "CACHE_TTL_SECONDS", DEFAULT_TTL_SECONDS);
        let port = parse_or_default(&lookup, "PORT", 3030u16);
        let prime_delay = Duration::from_secs(parse_or_default(
            &lookup,
            "PRIME_DELAY_SECONDS",
            DEFAULT_PRIME_DELAY_SECONDS,
        ));

        let allowed_origins = lookup("ALLOWED_ORIGINS")
            .unwrap_or_else(|| "*".to_string())
            .split(',')
            .map(|o| o.trim().to_string())
            .filter(|o| !o.is_empty())
            .map(validate_origin)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Config {
            api_key,
            base_url: lookup("ALPHAVANTAGE_BASE_URL").unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            cache_ttl_seconds,
            db_path: lookup("DB_PATH").unwrap_or_else(|| "cache.db".to_string()),
            allowed_origins,
            port,
            prime_delay,
            static_dir: lookup("STATIC_DIR").unwrap_or_else(|| "static".to_string()),
        })
    }

    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.is_empty() || self.allowed_origins.iter().any(|o| o == "*")
    }
}

/// CORS origins are matched as `scheme://authority` with no path.
fn validate_origin(origin: String) -> Result<String, ConfigError> {
    if origin == "*" {
        return Ok(origin);
    }
    let valid = match origin.split_once("://") {
        Some((scheme, authority)) => {
            scheme.parse::<Scheme>().is_ok() && authority.parse::<Authority>().is_ok()
        }
        None => false,
    };
    if valid {
        Ok(origin)
    } else {
        Err(ConfigError::InvalidOrigin(origin))
    }
}

fn parse_or_default<F, T>(lookup: &F, name: &str, default: T) -> T
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + std::fmt::Display + Copy,
{
    match lookup(name) {
        Some(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("{} is not a valid value ({:?}), defaulting to {}", name, raw, default);
            default
        }),
        None => default,
    }
}
