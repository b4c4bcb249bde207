// src/services/cache.rs
//! Persistent response cache for upstream payloads.
//!
//! Entries live in a single SQLite table `cache(k, v, ts)`. Expiry is decided
//! at read time from the caller's TTL, so one store can serve several TTLs.
//! On open the table layout is compared against the expected three columns;
//! any drift drops and recreates the table, discarding every cached entry.

use chrono::Utc;
use log::{debug, info, warn};
use serde_json::{Map, Value};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::Row;
use std::collections::{BTreeMap, BTreeSet};
use std::path::Path;
use thiserror::Error;

pub const CACHE_COLUMNS: [&str; 3] = ["k", "v", "ts"];

const CREATE_CACHE_TABLE: &str = r#"
    CREATE TABLE IF NOT EXISTS cache (
        k  TEXT PRIMARY KEY,
        v  TEXT NOT NULL,
        ts INTEGER NOT NULL
    )
"#;

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("cache store error: {0}")]
    Store(#[from] sqlx::Error),
    #[error("cache payload error: {0}")]
    Payload(#[from] serde_json::Error),
}

/// Builds the cache key for a request from its parameters.
///
/// Parameters are sorted by name before encoding, so insertion order never
/// matters. Never pass the API key in here.
pub fn cache_key<'a, I>(params: I) -> String
where
    I: IntoIterator<Item = (&'a str, &'a str)>,
{
    let sorted: BTreeMap<&str, &str> = params.into_iter().collect();
    let map: Map<String, Value> = sorted
        .into_iter()
        .map(|(k, v)| (k.to_string(), Value::from(v)))
        .collect();
    format!("av:{}", Value::Object(map))
}

pub struct CacheStore {
    pool: SqlitePool,
}

impl CacheStore {
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, CacheError> {
        let path = path.as_ref();
        let options = SqliteConnectOptions::new()
            .filename(path)
            .create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.ensure_schema().await?;
        info!("Response cache ready at {}", path.display());
        Ok(store)
    }

    pub async fn close(&self) {
        self.pool.close().await;
    }

    async fn current_columns(&self) -> Result<BTreeSet<String>, CacheError> {
        let names: Vec<String> =
            sqlx::query_scalar::<_, String>("SELECT name FROM pragma_table_info('cache')")
                .fetch_all(&self.pool)
                .await?;
        Ok(names.into_iter().collect())
    }

    /// Recreates the table empty unless its columns are exactly `k, v, ts`.
    /// Returns `true` when the table was (re)built.
    pub async fn ensure_schema(&self) -> Result<bool, CacheError> {
        let current = self.current_columns().await?;
        let expected: BTreeSet<String> = CACHE_COLUMNS.iter().map(|c| c.to_string()).collect();
        if current == expected {
            debug!("Cache schema matches {:?}", CACHE_COLUMNS);
            return Ok(false);
        }

        if !current.is_empty() {
            warn!(
                "Cache schema drift (found {:?}, expected {:?}); dropping all cached entries",
                current, CACHE_COLUMNS
            );
        }

        let mut tx = self.pool.begin().await?;
        sqlx::query("DROP TABLE IF EXISTS cache")
            .execute(&mut *tx)
            .await?;
        sqlx::query(CREATE_CACHE_TABLE).execute(&mut *tx).await?;
        tx.commit().await?;
        Ok(true)
    }

    pub async fn get(&self, key: &str, ttl_seconds: i64) -> Result<Option<Value>, CacheError> {
        self.get_at(key, ttl_seconds, Utc::now().timestamp()).await
    }

    /// Same as [`CacheStore::get`] with an explicit clock (unix seconds).
    /// An entry is fresh while `now - ts <= ttl_seconds`.
    pub async fn get_at(
        &self,
        key: &str,
        ttl_seconds: i64,
        now: i64,
    ) -> Result<Option<Value>, CacheError> {
        let row = sqlx::query("SELECT v, ts FROM cache WHERE k = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;

        let Some(row) = row else {
            return Ok(None);
        };
        let raw: String = row.try_get("v")?;
        let ts: i64 = row.try_get("ts")?;

        if now - ts > ttl_seconds {
            debug!("Cache entry {} is stale ({}s old)", key, now - ts);
            // Only remove the row we judged stale, not a newer concurrent write.
            sqlx::query("DELETE FROM cache WHERE k = ? AND ts = ?")
                .bind(key)
                .bind(ts)
                .execute(&self.pool)
                .await?;
            return Ok(None);
        }

        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                warn!("Unreadable cache entry {}: {}", key, e);
                Ok(None)
            }
        }
    }

    pub async fn set(&self, key: &str, value: &Value) -> Result<(), CacheError> {
        self.set_at(key, value, Utc::now().timestamp()).await
    }

    pub async fn set_at(&self, key: &str, value: &Value, now: i64) -> Result<(), CacheError> {
        let raw = serde_json::to_string(value)?;
        sqlx::query("INSERT OR REPLACE INTO cache (k, v, ts) VALUES (?, ?, ?)")
            .bind(key)
            .bind(raw)
            .bind(now)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
