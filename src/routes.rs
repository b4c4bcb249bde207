// src/routes.rs
use log::info;
use std::convert::Infallible;
use std::sync::Arc;
use warp::http::StatusCode;
use warp::reject::Rejection;
use warp::{Filter, Reply};

use crate::handlers::compare::{get_compare, get_vendors};
use crate::handlers::error::ApiError;
use crate::handlers::fundamentals::{get_income, get_overview};
use crate::handlers::health;
use crate::handlers::prime::post_prime;
use crate::state::AppState;

async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let code;
    let message;

    if err.is_not_found() {
        code = StatusCode::NOT_FOUND;
        message = "Not Found".to_string();
    } else if let Some(api_error) = err.find::<ApiError>() {
        code = api_error.status;
        message = api_error.message.clone();
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        code = StatusCode::METHOD_NOT_ALLOWED;
        message = "Method Not Allowed".to_string();
    } else if err.find::<warp::reject::InvalidQuery>().is_some() {
        code = StatusCode::BAD_REQUEST;
        message = "Invalid query string".to_string();
    } else {
        code = StatusCode::INTERNAL_SERVER_ERROR;
        message = "Internal Server Error".to_string();
    }

    Ok(warp::reply::with_status(
        warp::reply::json(&serde_json::json!({
            "error": message,
        })),
        code,
    ))
}

/// API routes only. See [`routes_with_static`] for the full server tree.
pub fn api_routes(
    state: Arc<AppState>,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    info!("Configuring routes...");

    let state_filter = warp::any().map(move || state.clone());

    let health_route = warp::path!("api" / "health")
        .and(warp::get())
        .and_then(health);

    let overview_route = warp::path!("api" / "overview" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_overview);

    let income_route = warp::path!("api" / "income" / String)
        .and(warp::get())
        .and(state_filter.clone())
        .and_then(get_income);

    let compare_route = warp::path!("api" / "compare")
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>())
        .and(state_filter.clone())
        .and_then(get_compare);

    let vendors_route = warp::path!("api" / "vendors")
        .and(warp::get())
        .and(warp::query::<Vec<(String, String)>>())
        .and(state_filter.clone())
        .and_then(get_vendors);

    let prime_route = warp::path!("api" / "prime")
        .and(warp::post())
        .and(state_filter.clone())
        .and_then(post_prime);

    info!("All routes configured successfully.");

    health_route
        .or(overview_route)
        .or(income_route)
        .or(compare_route)
        .or(vendors_route)
        .or(prime_route)
}

pub fn routes(state: Arc<AppState>) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    api_routes(state).recover(handle_rejection)
}

/// API routes plus the dashboard front end served from `static_dir`.
pub fn routes_with_static(
    state: Arc<AppState>,
    static_dir: String,
) -> impl Filter<Extract = impl Reply, Error = Infallible> + Clone {
    let index = warp::path::end()
        .and(warp::get())
        .and(warp::fs::file(format!("{}/index.html", static_dir)));
    let assets = warp::path("static").and(warp::fs::dir(static_dir));

    api_routes(state)
        .or(index)
        .or(assets)
        .recover(handle_rejection)
}
