use super::finnhub::FinnhubProvider;
use super::stooq::StooqProvider;
use super::traits::QuoteProvider;
use crate::models::wallet::Venue;

/// Registry of quote providers, one per venue.
///
/// Routes fetches to the right backend based on [`Venue`]. Adding a venue
/// means writing a provider and registering it here; nothing above this
/// layer changes.
pub struct QuoteProviderRegistry {
    providers: Vec<Box<dyn QuoteProvider>>,
}

impl QuoteProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Registry with both production venues wired up.
    ///
    /// Finnhub is registered even without an API key: the key is checked at
    /// call time, so its absence surfaces as a distinct `Config` error
    /// rather than an unknown-venue miss.
    pub fn new_with_defaults(finnhub_api_key: Option<String>) -> Self {
        let mut registry = Self::new();

        // Finnhub — US equities, requires API key
        registry.register(Box::new(FinnhubProvider::new(finnhub_api_key)));

        // Stooq — Warsaw equities, no key needed
        registry.register(Box::new(StooqProvider::new()));

        registry
    }

    /// Register a quote provider.
    pub fn register(&mut self, provider: Box<dyn QuoteProvider>) {
        self.providers.push(provider);
    }

    /// Find the provider serving the given venue.
    pub fn get_provider_for(&self, venue: Venue) -> Option<&dyn QuoteProvider> {
        self.providers
            .iter()
            .find(|p| p.venue() == venue)
            .map(|p| p.as_ref())
    }
}

impl Default for QuoteProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
