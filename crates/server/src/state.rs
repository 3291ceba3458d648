use std::sync::Arc;

use portfel_core::providers::registry::QuoteProviderRegistry;
use portfel_core::services::chart_service::ChartService;
use portfel_core::services::price_service::PriceService;
use portfel_core::services::snapshot_service::SnapshotService;
use portfel_core::services::valuation_service::ValuationService;
use portfel_core::services::wallet_service::WalletService;
use portfel_core::storage::store::Store;

use crate::config::Config;

/// Everything the request handlers share. Built once at startup; each
/// service gets its dependencies injected here, nothing reads global state
/// mid-request.
pub struct AppState {
    pub wallet_service: WalletService,
    pub price_service: Arc<PriceService>,
    pub valuation_service: ValuationService,
    pub snapshot_service: SnapshotService,
    pub chart_service: ChartService,
}

pub fn build_state(config: &Config) -> anyhow::Result<Arc<AppState>> {
    let store = Arc::new(Store::open(&config.db_path, &config.db_key)?);
    let registry = QuoteProviderRegistry::new_with_defaults(config.finnhub_api_key.clone());
    let price_service = Arc::new(PriceService::new(registry));

    Ok(Arc::new(AppState {
        wallet_service: WalletService::new(store.clone()),
        valuation_service: ValuationService::new(),
        snapshot_service: SnapshotService::new(
            store.clone(),
            price_service.clone(),
            config.cron_secret.clone(),
        ),
        chart_service: ChartService::new(store),
        price_service,
    }))
}
