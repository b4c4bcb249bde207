// src/handlers/mod.rs
pub mod compare;
pub mod error;
pub mod fundamentals;
pub mod prime;

use serde_json::json;
use warp::reply::Json;

pub async fn health() -> Result<Json, warp::Rejection> {
    Ok(warp::reply::json(&json!({ "ok": true })))
}
