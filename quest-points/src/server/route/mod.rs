use std::sync::Arc;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::{middleware, Json, Router};

use super::middleware::trace_request;
use super::types::ErrorResponse;
use crate::core::config::Config;
use points::points_router;

pub(super) mod points;

/// Fallback for unmatched routes, in the same JSON shape as every other error.
pub async fn handler_404() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(ErrorResponse::new("not found")))
}

async fn health_checker_handler() -> &'static str {
    "UP"
}

pub(crate) fn server_router(config: Arc<Config>) -> Router {
    Router::new()
        .route("/health", get(health_checker_handler))
        .merge(points_router(config))
        .fallback(handler_404)
        .layer(middleware::from_fn(trace_request))
}
