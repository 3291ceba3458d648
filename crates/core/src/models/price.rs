use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::wallet::Venue;

/// A successfully quoted symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceSuccess {
    pub symbol: String,
    pub price: f64,
}

/// A symbol a venue could not quote, with a human-readable reason.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceFetchFailure {
    pub symbol: String,
    pub reason: String,
}

/// Result of one venue fetch: per-symbol successes and failures side by
/// side. Per-symbol failures are data, not an error; the fetch itself
/// succeeded.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceResultData {
    pub prices: Vec<PriceSuccess>,
    pub failures: Vec<PriceFetchFailure>,
}

/// Merged output of a multi-venue aggregation: one symbol → price map plus
/// every failure from every venue.
#[derive(Debug, Clone, Default)]
pub struct AggregatedPrices {
    pub prices: HashMap<String, f64>,
    pub failures: Vec<PriceFetchFailure>,
}

/// Short-lived cache of successful quotes, keyed by (venue, symbol).
///
/// Protects upstream rate limits on the interactive read path. A hit is
/// shape-identical to a fresh fetch, just up to the TTL stale. Failures
/// are never cached; the next call retries them.
///
/// Lookups take the clock explicitly so the staleness bound is a plain
/// function of the inputs (and testable as such).
#[derive(Debug, Clone)]
pub struct QuoteCache {
    entries: HashMap<(Venue, String), CachedQuote>,
    ttl: Duration,
}

#[derive(Debug, Clone)]
struct CachedQuote {
    price: f64,
    fetched_at: DateTime<Utc>,
}

impl QuoteCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: HashMap::new(),
            ttl,
        }
    }

    /// Get a cached price, if one was fetched within the TTL window.
    pub fn get(&self, venue: Venue, symbol: &str, now: DateTime<Utc>) -> Option<f64> {
        let entry = self.entries.get(&(venue, symbol.to_uppercase()))?;
        if now - entry.fetched_at <= self.ttl {
            Some(entry.price)
        } else {
            None
        }
    }

    /// Record a freshly fetched price.
    pub fn insert(&mut self, venue: Venue, symbol: &str, price: f64, now: DateTime<Utc>) {
        self.entries.insert(
            (venue, symbol.to_uppercase()),
            CachedQuote {
                price,
                fetched_at: now,
            },
        );
    }

    /// Drop every entry past its TTL. Returns how many were removed.
    pub fn purge_expired(&mut self, now: DateTime<Utc>) -> usize {
        let before = self.entries.len();
        let ttl = self.ttl;
        self.entries.retain(|_, entry| now - entry.fetched_at <= ttl);
        before - self.entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
