use std::collections::HashMap;
use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::routing::{delete, get, patch};
use axum::{Json, Router};
use chrono::Utc;
use portfel_core::models::chart::ChartPoint;
use portfel_core::models::position::Position;
use portfel_core::models::valuation::PortfolioValuation;
use portfel_core::models::wallet::{Wallet, WalletOverview};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiResult;
use crate::session::CurrentUser;
use crate::state::AppState;

#[derive(Deserialize)]
struct CreateWalletRequest {
    name: String,
    currency: String,
}

#[derive(Deserialize)]
struct RenameWalletRequest {
    name: String,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct AddPositionRequest {
    company_name: String,
    company_symbol: String,
    shares: f64,
    price: f64,
}

#[derive(Deserialize)]
struct ChartQuery {
    range: Option<String>,
}

// ── Wallets ─────────────────────────────────────────────────────────

async fn list_wallets(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
) -> ApiResult<Json<Vec<WalletOverview>>> {
    Ok(Json(state.wallet_service.list_wallets(user.as_deref())?))
}

async fn create_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Json(body): Json<CreateWalletRequest>,
) -> ApiResult<Json<Wallet>> {
    let wallet =
        state
            .wallet_service
            .create_wallet(user.as_deref(), &body.name, &body.currency)?;
    Ok(Json(wallet))
}

async fn rename_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
    Json(body): Json<RenameWalletRequest>,
) -> ApiResult<Json<Wallet>> {
    let wallet = state
        .wallet_service
        .rename_wallet(user.as_deref(), wallet_id, &body.name)?;
    Ok(Json(wallet))
}

async fn delete_wallet(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
) -> ApiResult<StatusCode> {
    state
        .wallet_service
        .delete_wallet(user.as_deref(), wallet_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Positions ───────────────────────────────────────────────────────

async fn list_positions(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
) -> ApiResult<Json<Vec<Position>>> {
    Ok(Json(
        state
            .wallet_service
            .list_positions(user.as_deref(), wallet_id)?,
    ))
}

async fn add_position(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
    Json(body): Json<AddPositionRequest>,
) -> ApiResult<Json<Position>> {
    let position = state.wallet_service.add_position(
        user.as_deref(),
        wallet_id,
        &body.company_name,
        &body.company_symbol,
        body.shares,
        body.price,
    )?;
    Ok(Json(position))
}

async fn delete_position(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path((wallet_id, position_id)): Path<(Uuid, Uuid)>,
) -> ApiResult<StatusCode> {
    state
        .wallet_service
        .delete_position(user.as_deref(), wallet_id, position_id)?;
    Ok(StatusCode::NO_CONTENT)
}

// ── Valuation & chart ───────────────────────────────────────────────

/// Live valuation of one wallet: positions folded against current quotes
/// from the wallet's venue.
async fn wallet_valuation(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
) -> ApiResult<Json<PortfolioValuation>> {
    let wallet = state.wallet_service.get_wallet(user.as_deref(), wallet_id)?;
    let positions = state
        .wallet_service
        .list_positions(user.as_deref(), wallet_id)?;

    let symbols: Vec<String> = positions.iter().map(|p| p.company_symbol.clone()).collect();
    let data = state
        .price_service
        .fetch_quotes(&symbols, wallet.currency.venue(), Utc::now())
        .await?;
    let prices: HashMap<String, f64> = data
        .prices
        .into_iter()
        .map(|success| (success.symbol, success.price))
        .collect();

    Ok(Json(state.valuation_service.valuate(&positions, &prices)))
}

async fn wallet_chart(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    Path(wallet_id): Path<Uuid>,
    Query(query): Query<ChartQuery>,
) -> ApiResult<Json<Vec<ChartPoint>>> {
    let range = query.range.unwrap_or_default();
    let points = state
        .chart_service
        .read_series(user.as_deref(), wallet_id, &range)?;
    Ok(Json(points))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/wallets", get(list_wallets).post(create_wallet))
        .route("/wallets/{id}", patch(rename_wallet).delete(delete_wallet))
        .route(
            "/wallets/{id}/positions",
            get(list_positions).post(add_position),
        )
        .route(
            "/wallets/{id}/positions/{position_id}",
            delete(delete_position),
        )
        .route("/wallets/{id}/valuation", get(wallet_valuation))
        .route("/wallets/{id}/chart", get(wallet_chart))
}
