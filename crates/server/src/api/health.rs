use std::sync::Arc;

use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/health", get(health))
}
