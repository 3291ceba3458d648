pub mod chart_service;
pub mod price_service;
pub mod snapshot_service;
pub mod valuation_service;
pub mod wallet_service;
