use std::sync::Arc;

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use tracing::instrument;

use super::super::error::PointsRouteError;
use super::super::types::{PointsResponse, QueuedResponse, WalletQuery};
use crate::core::config::Config;
use crate::types::claim::{parse_wallet, SignedClaim};

/// Handles `POST /points`: records a signed quest claim for settlement.
///
/// Replays of an already recorded claim are answered exactly like the first
/// submission.
async fn handle_submit_claim(
    State(config): State<Arc<Config>>,
    body: Result<Json<SignedClaim>, JsonRejection>,
) -> Result<Json<QueuedResponse>, PointsRouteError> {
    let Json(claim) = body.map_err(|rejection| PointsRouteError::BadRequest(rejection.body_text()))?;
    config.intake().accept(&claim).await?;
    Ok(Json(QueuedResponse { queued: true }))
}

/// Handles `GET /points?wallet=<address>`: the ledger's balance for a wallet.
#[instrument(skip(config))]
async fn handle_get_points(
    State(config): State<Arc<Config>>,
    query: Result<Query<WalletQuery>, QueryRejection>,
) -> Result<Json<PointsResponse>, PointsRouteError> {
    let Query(query) = query.map_err(|rejection| PointsRouteError::BadRequest(rejection.body_text()))?;
    let raw = query.wallet.ok_or_else(|| PointsRouteError::BadRequest("wallet query parameter is required".into()))?;
    let wallet = parse_wallet(&raw, "wallet")?;

    let balance = config.ledger().balance_of(wallet).await?;
    Ok(Json(PointsResponse { wallet: wallet.to_checksum(None), points: balance.to_string() }))
}

pub(super) fn points_router(config: Arc<Config>) -> Router {
    Router::new().route("/points", get(handle_get_points).post(handle_submit_claim)).with_state(config)
}
