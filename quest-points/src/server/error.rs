use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use quest_points_ledger_client_interface::LedgerClientError;
use tracing::error;

use super::types::ErrorResponse;
use crate::error::intake::IntakeError;

/// Errors raised by the `/points` handlers.
///
/// Claim rejections are the caller's problem and map to 400; a broken store
/// or ledger maps to 5xx with a generic body.
#[derive(Debug, thiserror::Error)]
pub enum PointsRouteError {
    #[error(transparent)]
    Intake(#[from] IntakeError),

    /// Request body or query string does not have the expected shape
    #[error("{0}")]
    BadRequest(String),

    #[error("Ledger read failed: {0}")]
    Ledger(#[from] LedgerClientError),
}

impl IntoResponse for PointsRouteError {
    fn into_response(self) -> Response {
        match self {
            PointsRouteError::Intake(e) if e.is_client_error() => {
                (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(e.public_reason()))).into_response()
            }
            PointsRouteError::Intake(e) => {
                error!(error = %e, "Claim could not be recorded");
                (StatusCode::INTERNAL_SERVER_ERROR, Json(ErrorResponse::new(e.public_reason()))).into_response()
            }
            PointsRouteError::BadRequest(msg) => (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response(),
            PointsRouteError::Ledger(e) => {
                error!(error = %e, "Balance lookup failed");
                (StatusCode::BAD_GATEWAY, Json(ErrorResponse::new("ledger unavailable"))).into_response()
            }
        }
    }
}
