use async_trait::async_trait;

use crate::errors::CoreError;
use crate::models::price::PriceResultData;
use crate::models::wallet::Venue;

/// Trait abstraction for quote venues.
///
/// Each venue backend (Finnhub for US, Stooq for WA) implements this
/// trait. If a venue changes or dies, only that one implementation moves;
/// the aggregator and everything above it stay untouched.
#[async_trait]
pub trait QuoteProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// The venue this provider serves.
    fn venue(&self) -> Venue;

    /// Fetch current prices for a de-duplicated set of symbols.
    ///
    /// Per-symbol problems are data (`failures` inside the `Ok`); an `Err`
    /// means the whole venue call failed (missing credential, malformed
    /// response). An empty symbol set yields an empty result without any
    /// network call.
    async fn fetch_quotes(&self, symbols: &[String]) -> Result<PriceResultData, CoreError>;
}
