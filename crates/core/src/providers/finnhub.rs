use async_trait::async_trait;
use futures::future::join_all;
use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

use super::sanitize_error;
use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::price::{PriceFetchFailure, PriceResultData, PriceSuccess};
use crate::models::wallet::Venue;

const BASE_URL: &str = "https://finnhub.io/api/v1";

/// Bound on a single quote request; expiry becomes that symbol's failure.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Finnhub quote provider for US-listed equities.
///
/// - **Requires**: API key (`FINNHUB_API_KEY`); absence is a `Config`
///   error for the whole call, distinct from network/API failures.
/// - **Shape**: one `/quote` request per symbol, all in flight at once.
/// - **Failure model**: every symbol settles independently. A timeout,
///   non-2xx status, or bad payload on one symbol becomes that symbol's
///   failure record and never touches its siblings.
pub struct FinnhubProvider {
    client: Client,
    api_key: Option<String>,
    base_url: String,
}

impl FinnhubProvider {
    pub fn new(api_key: Option<String>) -> Self {
        Self::with_base_url(api_key, BASE_URL)
    }

    /// Point the provider at a different endpoint (tests use a mock server).
    pub fn with_base_url(api_key: Option<String>, base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            api_key,
            base_url: base_url.into(),
        }
    }

    async fn fetch_one(&self, key: &str, symbol: &str) -> Result<PriceSuccess, PriceFetchFailure> {
        let fail = |reason: String| PriceFetchFailure {
            symbol: symbol.to_string(),
            reason,
        };

        let response = self
            .client
            .get(format!("{}/quote", self.base_url))
            .query(&[("symbol", symbol), ("token", key)])
            .send()
            .await
            .map_err(|e| fail(sanitize_error(&e)))?;

        if !response.status().is_success() {
            return Err(fail(format!(
                "{symbol}: HTTP {}",
                response.status().as_u16()
            )));
        }

        let quote: QuoteResponse = response
            .json()
            .await
            .map_err(|e| fail(format!("{symbol}: invalid quote payload: {}", sanitize_error(&e))))?;

        Ok(PriceSuccess {
            symbol: symbol.to_string(),
            price: quote.current,
        })
    }
}

// ── Finnhub API response types ──────────────────────────────────────

#[derive(Deserialize)]
struct QuoteResponse {
    /// Current price (Finnhub uses single-letter field names)
    #[serde(rename = "c")]
    current: f64,
}

#[async_trait]
impl QuoteProvider for FinnhubProvider {
    fn name(&self) -> &str {
        "Finnhub"
    }

    fn venue(&self) -> Venue {
        Venue::Us
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> Result<PriceResultData, CoreError> {
        if symbols.is_empty() {
            return Ok(PriceResultData::default());
        }

        let key = self.api_key.as_deref().ok_or_else(|| CoreError::Config {
            key: "FINNHUB_API_KEY".into(),
        })?;

        // Settle-all: every symbol resolves on its own, no early bail-out.
        let settled = join_all(symbols.iter().map(|symbol| self.fetch_one(key, symbol))).await;

        let mut result = PriceResultData::default();
        for outcome in settled {
            match outcome {
                Ok(success) => result.prices.push(success),
                Err(failure) => result.failures.push(failure),
            }
        }
        Ok(result)
    }
}
