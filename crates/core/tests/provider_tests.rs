// ═══════════════════════════════════════════════════════════════════
// Provider Tests — Finnhub and Stooq against a mock HTTP server
// ═══════════════════════════════════════════════════════════════════

use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use portfel_core::errors::CoreError;
use portfel_core::models::wallet::Venue;
use portfel_core::providers::finnhub::FinnhubProvider;
use portfel_core::providers::registry::QuoteProviderRegistry;
use portfel_core::providers::stooq::StooqProvider;
use portfel_core::providers::traits::QuoteProvider;

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Finnhub (US venue)
// ═══════════════════════════════════════════════════════════════════

async fn mount_quote(server: &MockServer, symbol: &str, price: f64) {
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", symbol))
        .and(query_param("token", "test-key"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "c": price, "d": 0.5, "dp": 0.9, "h": price + 1.0,
            "l": price - 1.0, "o": price, "pc": price, "t": 1_742_040_000
        })))
        .mount(server)
        .await;
}

#[tokio::test]
async fn finnhub_quotes_every_symbol() {
    let server = MockServer::start().await;
    mount_quote(&server, "AAA", 55.0).await;
    mount_quote(&server, "BBB", 12.5).await;

    let provider = FinnhubProvider::with_base_url(Some("test-key".into()), server.uri());
    let result = provider.fetch_quotes(&symbols(&["AAA", "BBB"])).await.unwrap();

    assert_eq!(result.failures.len(), 0);
    let mut prices = result.prices;
    prices.sort_by(|a, b| a.symbol.cmp(&b.symbol));
    assert_eq!(prices[0].symbol, "AAA");
    assert_eq!(prices[0].price, 55.0);
    assert_eq!(prices[1].symbol, "BBB");
    assert_eq!(prices[1].price, 12.5);
}

#[tokio::test]
async fn finnhub_isolates_per_symbol_failures() {
    let server = MockServer::start().await;
    mount_quote(&server, "AAA", 55.0).await;
    mount_quote(&server, "CCC", 7.25).await;
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", "BBB"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = FinnhubProvider::with_base_url(Some("test-key".into()), server.uri());
    let result = provider
        .fetch_quotes(&symbols(&["AAA", "BBB", "CCC"]))
        .await
        .unwrap();

    // One bad symbol never touches its siblings.
    assert_eq!(result.prices.len(), 2);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].symbol, "BBB");
    assert!(result.failures[0].reason.contains("HTTP 500"));
}

#[tokio::test]
async fn finnhub_reports_a_bad_payload_per_symbol() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/quote"))
        .and(query_param("symbol", "AAA"))
        .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
        .mount(&server)
        .await;

    let provider = FinnhubProvider::with_base_url(Some("test-key".into()), server.uri());
    let result = provider.fetch_quotes(&symbols(&["AAA"])).await.unwrap();

    assert_eq!(result.prices.len(), 0);
    assert_eq!(result.failures.len(), 1);
    assert_eq!(result.failures[0].symbol, "AAA");
}

#[tokio::test]
async fn finnhub_without_api_key_is_a_config_error() {
    let provider = FinnhubProvider::with_base_url(None, "http://127.0.0.1:1");
    let err = provider.fetch_quotes(&symbols(&["AAA"])).await.unwrap_err();
    assert!(matches!(err, CoreError::Config { ref key } if key == "FINNHUB_API_KEY"));
}

#[tokio::test]
async fn finnhub_empty_symbol_set_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = FinnhubProvider::with_base_url(Some("test-key".into()), server.uri());
    let result = provider.fetch_quotes(&[]).await.unwrap();
    assert!(result.prices.is_empty());
    assert!(result.failures.is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Stooq (WA venue)
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn stooq_parses_the_csv_and_reattaches_the_suffix() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/q/l/"))
        .respond_with(ResponseTemplate::new(200).set_body_string("XTB,12.50\nBBB,B/D\nCCC,n/a\n"))
        .mount(&server)
        .await;

    let provider = StooqProvider::with_base_url(server.uri());
    let result = provider
        .fetch_quotes(&symbols(&["XTB.WA", "BBB.WA", "CCC.WA"]))
        .await
        .unwrap();

    assert_eq!(result.prices.len(), 1);
    assert_eq!(result.prices[0].symbol, "XTB.WA");
    assert_eq!(result.prices[0].price, 12.5);

    assert_eq!(result.failures.len(), 2);
    for failure in &result.failures {
        assert_eq!(failure.reason, "No data available");
    }
    assert_eq!(result.failures[0].symbol, "BBB.WA");
    assert_eq!(result.failures[1].symbol, "CCC.WA");
}

#[tokio::test]
async fn stooq_non_2xx_fails_the_whole_call() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/q/l/"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let provider = StooqProvider::with_base_url(server.uri());
    let err = provider.fetch_quotes(&symbols(&["XTB.WA"])).await.unwrap_err();

    assert!(matches!(
        err,
        CoreError::Api { ref service, status: Some(503), .. } if service == "Stooq"
    ));
}

#[tokio::test]
async fn stooq_empty_symbol_set_makes_no_request() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = StooqProvider::with_base_url(server.uri());
    let result = provider.fetch_quotes(&[]).await.unwrap();
    assert!(result.prices.is_empty());
    assert!(result.failures.is_empty());
}

// ═══════════════════════════════════════════════════════════════════
// Registry
// ═══════════════════════════════════════════════════════════════════

#[test]
fn registry_routes_by_venue() {
    let registry = QuoteProviderRegistry::new_with_defaults(Some("test-key".into()));
    assert_eq!(registry.get_provider_for(Venue::Us).unwrap().name(), "Finnhub");
    assert_eq!(registry.get_provider_for(Venue::Wa).unwrap().name(), "Stooq");
}

#[test]
fn empty_registry_has_no_providers() {
    let registry = QuoteProviderRegistry::new();
    assert!(registry.get_provider_for(Venue::Us).is_none());
}
