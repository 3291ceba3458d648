use std::sync::Arc;

use axum::extract::{Query, State};
use axum::routing::get;
use axum::{Json, Router};
use chrono::Utc;
use portfel_core::models::price::PriceResultData;
use portfel_core::models::wallet::Venue;
use portfel_core::CoreError;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
struct StockQuery {
    symbol: Option<String>,
    exchange: Option<String>,
}

/// Live quote read: `/api/stock?symbol=AAA,BBB&exchange=US`.
///
/// Missing params are a bad request; a venue-level failure (missing API
/// key, malformed feed) maps through the usual error policy.
async fn get_stock(
    State(state): State<Arc<AppState>>,
    Query(query): Query<StockQuery>,
) -> ApiResult<Json<PriceResultData>> {
    let (Some(symbol), Some(exchange)) = (query.symbol, query.exchange) else {
        return Err(CoreError::validation("Missing params").into());
    };

    let venue: Venue = exchange.parse()?;
    let symbols: Vec<String> = symbol
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let data = state
        .price_service
        .fetch_quotes(&symbols, venue, Utc::now())
        .await?;
    Ok(Json(data))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/stock", get(get_stock))
}
