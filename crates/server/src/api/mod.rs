use std::sync::Arc;

use axum::Router;
use tower_http::trace::TraceLayer;

use crate::state::AppState;

mod health;
mod snapshot;
mod stock;
mod wallets;

/// Assemble the full application router.
pub fn app_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .merge(health::router())
        .merge(stock::router())
        .merge(snapshot::router())
        .merge(wallets::router());

    Router::new()
        .nest("/api", api)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
