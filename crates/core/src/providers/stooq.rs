use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

use super::sanitize_error;
use super::traits::QuoteProvider;
use crate::errors::CoreError;
use crate::models::price::{PriceFetchFailure, PriceResultData, PriceSuccess};
use crate::models::wallet::Venue;

const BASE_URL: &str = "https://stooq.pl";

/// Suffix that venue-qualified Warsaw symbols carry in the portfolio.
/// Stooq wants the bare code; results re-attach the suffix.
const WA_SUFFIX: &str = ".WA";

/// Stooq's "brak danych" sentinel: the symbol exists but has no quote.
const NO_DATA_SENTINEL: &str = "B/D";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Stooq quote provider for Warsaw-listed equities.
///
/// - **Free**: no API key.
/// - **Shape**: one batched CSV request for the whole symbol set
///   (`/q/l/?s=a+b&f=sc&e=csv`), one `code,price` line per symbol.
/// - **Failure model**: a `B/D` or non-numeric price field is a per-line
///   failure; a non-2xx response fails the whole call.
pub struct StooqProvider {
    client: Client,
    base_url: String,
}

impl StooqProvider {
    pub fn new() -> Self {
        Self::with_base_url(BASE_URL)
    }

    /// Point the provider at a different endpoint (tests use a mock server).
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let client = Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.into(),
        }
    }
}

impl Default for StooqProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl QuoteProvider for StooqProvider {
    fn name(&self) -> &str {
        "Stooq"
    }

    fn venue(&self) -> Venue {
        Venue::Wa
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> Result<PriceResultData, CoreError> {
        if symbols.is_empty() {
            return Ok(PriceResultData::default());
        }

        let codes: Vec<&str> = symbols
            .iter()
            .map(|s| s.strip_suffix(WA_SUFFIX).unwrap_or(s))
            .collect();

        let url = format!("{}/q/l/?s={}&f=sc&e=csv", self.base_url, codes.join("+"));

        let response = self
            .client
            .get(&url)
            .send()
            .await
            .map_err(|e| CoreError::Api {
                service: "Stooq".into(),
                status: None,
                message: sanitize_error(&e),
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(CoreError::Api {
                service: "Stooq".into(),
                status: Some(status.as_u16()),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await.map_err(|e| CoreError::Api {
            service: "Stooq".into(),
            status: None,
            message: sanitize_error(&e),
        })?;

        let mut result = PriceResultData::default();
        for line in body.trim().lines() {
            let mut fields = line.trim().split(',');
            let Some(code) = fields.next().filter(|c| !c.is_empty()) else {
                continue;
            };
            let price_field = fields.next().unwrap_or("").trim();
            let symbol = format!("{code}{WA_SUFFIX}");

            if price_field == NO_DATA_SENTINEL {
                result.failures.push(PriceFetchFailure {
                    symbol,
                    reason: "No data available".into(),
                });
                continue;
            }

            match price_field.parse::<f64>() {
                Ok(price) => result.prices.push(PriceSuccess { symbol, price }),
                Err(_) => result.failures.push(PriceFetchFailure {
                    symbol,
                    reason: "No data available".into(),
                }),
            }
        }

        Ok(result)
    }
}
