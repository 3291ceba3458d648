use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::header::AUTHORIZATION;
use axum::http::HeaderMap;
use axum::routing::get;
use axum::{Json, Router};
use portfel_core::models::snapshot::SnapshotSummary;
use serde::Deserialize;

use crate::error::ApiResult;
use crate::state::AppState;

#[derive(Deserialize)]
struct SnapshotQuery {
    #[serde(rename = "type")]
    mode: Option<String>,
}

/// Scheduled rollup trigger: `/api/cron/snapshot?type=daily|intraday`,
/// authorized by the scheduler's bearer secret. The service rejects a bad
/// token or mode before touching the store.
async fn run_snapshot(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Query(query): Query<SnapshotQuery>,
) -> ApiResult<Json<SnapshotSummary>> {
    let token = bearer_token(&headers);
    let mode = query.mode.unwrap_or_default();

    let summary = state
        .snapshot_service
        .run(token.as_deref(), &mode)
        .await?;
    Ok(Json(summary))
}

/// `Authorization: Bearer <secret>` → `<secret>`.
fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(AUTHORIZATION)?
        .to_str()
        .ok()?
        .strip_prefix("Bearer ")
        .map(str::to_string)
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/cron/snapshot", get(run_snapshot))
}
