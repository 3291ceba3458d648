use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;

use crate::errors::CoreError;
use crate::models::price::{
    AggregatedPrices, PriceFetchFailure, PriceResultData, PriceSuccess, QuoteCache,
};
use crate::models::wallet::Venue;
use crate::providers::registry::QuoteProviderRegistry;

/// How long a fetched quote may be served from cache.
const QUOTE_TTL_SECONDS: i64 = 60;

/// Fetches and merges current quotes across venues.
///
/// Both the interactive dashboard read and the snapshot rollup go through
/// this service; each call is a fresh fan-out of HTTP requests. A small
/// TTL cache sits in front of the providers to protect upstream rate
/// limits; a hit is shape-identical to a fresh fetch, just up to the TTL
/// stale. The cache lock is taken only between awaits, never across one.
///
/// **Note on precision**: prices are `f64` throughout (~15-17 significant
/// decimal digits), sufficient here; repeated arithmetic may accumulate
/// small floating-point errors.
pub struct PriceService {
    registry: QuoteProviderRegistry,
    cache: Mutex<QuoteCache>,
}

impl PriceService {
    pub fn new(registry: QuoteProviderRegistry) -> Self {
        Self::with_ttl(registry, Duration::seconds(QUOTE_TTL_SECONDS))
    }

    /// Override the cache TTL (tests pin the staleness bound with this).
    pub fn with_ttl(registry: QuoteProviderRegistry, ttl: Duration) -> Self {
        Self {
            registry,
            cache: Mutex::new(QuoteCache::new(ttl)),
        }
    }

    fn cache(&self) -> std::sync::MutexGuard<'_, QuoteCache> {
        self.cache.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch current prices for one venue.
    ///
    /// Input symbols are de-duplicated and uppercased; cache hits short-cut
    /// the network. Per-symbol problems come back inside the `Ok`; an `Err`
    /// means the venue call itself failed (missing credential, malformed
    /// response), and the caller decides whether that is fatal.
    pub async fn fetch_quotes(
        &self,
        symbols: &[String],
        venue: Venue,
        now: DateTime<Utc>,
    ) -> Result<PriceResultData, CoreError> {
        let mut unique: BTreeSet<String> = symbols
            .iter()
            .map(|s| s.trim().to_uppercase())
            .filter(|s| !s.is_empty())
            .collect();

        let mut result = PriceResultData::default();

        // Serve what the cache still considers fresh
        {
            let cache = self.cache();
            unique.retain(|symbol| match cache.get(venue, symbol, now) {
                Some(price) => {
                    result.prices.push(PriceSuccess {
                        symbol: symbol.clone(),
                        price,
                    });
                    false
                }
                None => true,
            });
        }

        if unique.is_empty() {
            return Ok(result);
        }

        let provider = self
            .registry
            .get_provider_for(venue)
            .ok_or_else(|| CoreError::Config {
                key: format!("quote provider for venue {venue}"),
            })?;

        let remaining: Vec<String> = unique.into_iter().collect();
        let fetched = provider.fetch_quotes(&remaining).await?;

        {
            let mut cache = self.cache();
            for success in &fetched.prices {
                cache.insert(venue, &success.symbol, success.price, now);
            }
        }

        result.prices.extend(fetched.prices);
        result.failures.extend(fetched.failures);
        Ok(result)
    }

    /// Merge quotes for several venue groups into one symbol → price map.
    ///
    /// Non-empty venue groups fetch concurrently. A venue-level failure
    /// degrades into per-symbol failure records for that venue's symbols,
    /// so callers always receive the other venue's partial results.
    ///
    /// A symbol listed under more than one venue is a misclassification
    /// upstream (a symbol belongs to exactly one venue) and is rejected
    /// outright rather than resolved by overwrite.
    pub async fn aggregate(
        &self,
        groups: &BTreeMap<Venue, BTreeSet<String>>,
        now: DateTime<Utc>,
    ) -> Result<AggregatedPrices, CoreError> {
        let mut seen: HashMap<&str, Venue> = HashMap::new();
        for (venue, symbols) in groups {
            for symbol in symbols {
                if let Some(other) = seen.insert(symbol.as_str(), *venue) {
                    return Err(CoreError::validation_field(
                        "symbols",
                        format!("Symbol {symbol} is grouped under both {other} and {venue}"),
                    ));
                }
            }
        }

        let fetches = groups
            .iter()
            .filter(|(_, symbols)| !symbols.is_empty())
            .map(|(venue, symbols)| {
                let list: Vec<String> = symbols.iter().cloned().collect();
                async move {
                    let outcome = self.fetch_quotes(&list, *venue, now).await;
                    (*venue, list, outcome)
                }
            });

        let mut merged = AggregatedPrices::default();
        for (venue, symbols, outcome) in join_all(fetches).await {
            match outcome {
                Ok(data) => {
                    for success in data.prices {
                        merged.prices.insert(success.symbol, success.price);
                    }
                    merged.failures.extend(data.failures);
                }
                Err(error) => {
                    // The whole venue failed: report every one of its
                    // symbols instead of aborting the other venue.
                    tracing::error!(%venue, %error, "venue quote fetch failed");
                    let reason = error.to_string();
                    merged
                        .failures
                        .extend(symbols.into_iter().map(|symbol| PriceFetchFailure {
                            symbol,
                            reason: reason.clone(),
                        }));
                }
            }
        }

        Ok(merged)
    }
}
