// ═══════════════════════════════════════════════════════════════════
// Service Tests — PriceService aggregation, ValuationService math,
// WalletService gate chains, ChartService range selection
// ═══════════════════════════════════════════════════════════════════

use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use uuid::Uuid;

use portfel_core::errors::CoreError;
use portfel_core::models::position::Position;
use portfel_core::models::price::{PriceFetchFailure, PriceResultData, PriceSuccess};
use portfel_core::models::snapshot::IntradaySnapshot;
use portfel_core::models::valuation::format_pl_percent;
use portfel_core::models::wallet::{Currency, Venue};
use portfel_core::providers::finnhub::FinnhubProvider;
use portfel_core::providers::registry::QuoteProviderRegistry;
use portfel_core::providers::traits::QuoteProvider;
use portfel_core::services::chart_service::ChartService;
use portfel_core::services::price_service::PriceService;
use portfel_core::services::valuation_service::ValuationService;
use portfel_core::services::wallet_service::WalletService;
use portfel_core::storage::store::Store;

// ═══════════════════════════════════════════════════════════════════
// Mock providers
// ═══════════════════════════════════════════════════════════════════

/// Serves a fixed price table for one venue; unknown symbols fail.
/// Records every batch it is asked for.
struct MockProvider {
    venue: Venue,
    prices: HashMap<String, f64>,
    calls: Arc<AtomicUsize>,
    batches: Arc<Mutex<Vec<Vec<String>>>>,
}

impl MockProvider {
    fn new(venue: Venue, table: &[(&str, f64)]) -> Self {
        Self {
            venue,
            prices: table
                .iter()
                .map(|(symbol, price)| (symbol.to_string(), *price))
                .collect(),
            calls: Arc::new(AtomicUsize::new(0)),
            batches: Arc::new(Mutex::new(Vec::new())),
        }
    }

    fn call_counter(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }

    fn batch_log(&self) -> Arc<Mutex<Vec<Vec<String>>>> {
        self.batches.clone()
    }
}

#[async_trait]
impl QuoteProvider for MockProvider {
    fn name(&self) -> &str {
        "Mock"
    }

    fn venue(&self) -> Venue {
        self.venue
    }

    async fn fetch_quotes(&self, symbols: &[String]) -> Result<PriceResultData, CoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.batches.lock().unwrap().push(symbols.to_vec());

        let mut result = PriceResultData::default();
        for symbol in symbols {
            match self.prices.get(symbol) {
                Some(price) => result.prices.push(PriceSuccess {
                    symbol: symbol.clone(),
                    price: *price,
                }),
                None => result.failures.push(PriceFetchFailure {
                    symbol: symbol.clone(),
                    reason: "No data available".into(),
                }),
            }
        }
        Ok(result)
    }
}

/// A venue whose every call fails outright.
struct FailingVenueProvider {
    venue: Venue,
}

#[async_trait]
impl QuoteProvider for FailingVenueProvider {
    fn name(&self) -> &str {
        "FailingVenue"
    }

    fn venue(&self) -> Venue {
        self.venue
    }

    async fn fetch_quotes(&self, _symbols: &[String]) -> Result<PriceResultData, CoreError> {
        Err(CoreError::Api {
            service: "Finnhub".into(),
            status: Some(502),
            message: "upstream unavailable".into(),
        })
    }
}

fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 3, 15, 12, 0, 0).unwrap()
}

fn groups(entries: &[(Venue, &[&str])]) -> BTreeMap<Venue, BTreeSet<String>> {
    entries
        .iter()
        .map(|(venue, symbols)| {
            (
                *venue,
                symbols.iter().map(|s| s.to_string()).collect::<BTreeSet<_>>(),
            )
        })
        .collect()
}

fn symbols(list: &[&str]) -> Vec<String> {
    list.iter().map(|s| s.to_string()).collect()
}

// ═══════════════════════════════════════════════════════════════════
// Price aggregation
// ═══════════════════════════════════════════════════════════════════

#[tokio::test]
async fn aggregate_merges_both_venues() {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(MockProvider::new(Venue::Us, &[("AAA", 55.0)])));
    registry.register(Box::new(MockProvider::new(Venue::Wa, &[("BBB.WA", 20.0)])));
    let service = PriceService::new(registry);

    let merged = service
        .aggregate(
            &groups(&[(Venue::Us, &["AAA"]), (Venue::Wa, &["BBB.WA"])]),
            now(),
        )
        .await
        .unwrap();

    assert_eq!(merged.prices.get("AAA"), Some(&55.0));
    assert_eq!(merged.prices.get("BBB.WA"), Some(&20.0));
    assert!(merged.failures.is_empty());
}

#[tokio::test]
async fn aggregate_degrades_a_failed_venue_into_per_symbol_failures() {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(FailingVenueProvider { venue: Venue::Us }));
    registry.register(Box::new(MockProvider::new(Venue::Wa, &[("BBB.WA", 20.0)])));
    let service = PriceService::new(registry);

    let merged = service
        .aggregate(
            &groups(&[(Venue::Us, &["AAA", "CCC"]), (Venue::Wa, &["BBB.WA"])]),
            now(),
        )
        .await
        .unwrap();

    // The healthy venue still delivered.
    assert_eq!(merged.prices.get("BBB.WA"), Some(&20.0));

    // Every symbol of the failed venue is an explicit failure record.
    let mut failed: Vec<&str> = merged.failures.iter().map(|f| f.symbol.as_str()).collect();
    failed.sort();
    assert_eq!(failed, vec!["AAA", "CCC"]);
    for failure in &merged.failures {
        assert!(failure.reason.contains("Finnhub API error"));
    }
}

#[tokio::test]
async fn aggregate_missing_credential_degrades_the_us_venue() {
    // A keyless Finnhub provider fails its whole call with a Config error,
    // which degrades to failures instead of aborting the WA side.
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(FinnhubProvider::with_base_url(
        None,
        "http://127.0.0.1:1",
    )));
    registry.register(Box::new(MockProvider::new(Venue::Wa, &[("BBB.WA", 20.0)])));
    let service = PriceService::new(registry);

    let merged = service
        .aggregate(
            &groups(&[(Venue::Us, &["AAA"]), (Venue::Wa, &["BBB.WA"])]),
            now(),
        )
        .await
        .unwrap();

    assert_eq!(merged.prices.get("BBB.WA"), Some(&20.0));
    assert_eq!(merged.failures.len(), 1);
    assert_eq!(merged.failures[0].symbol, "AAA");
    assert!(merged.failures[0].reason.contains("FINNHUB_API_KEY"));
}

#[tokio::test]
async fn aggregate_rejects_a_symbol_in_two_venues() {
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(MockProvider::new(Venue::Us, &[("AAA", 55.0)])));
    registry.register(Box::new(MockProvider::new(Venue::Wa, &[("AAA", 54.0)])));
    let service = PriceService::new(registry);

    let err = service
        .aggregate(&groups(&[(Venue::Us, &["AAA"]), (Venue::Wa, &["AAA"])]), now())
        .await
        .unwrap_err();

    assert!(matches!(err, CoreError::Validation { .. }));
    assert!(err.to_string().contains("AAA"));
}

#[tokio::test]
async fn aggregate_skips_empty_venue_groups() {
    let us = MockProvider::new(Venue::Us, &[("AAA", 55.0)]);
    let us_calls = us.call_counter();
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(us));
    registry.register(Box::new(MockProvider::new(Venue::Wa, &[("BBB.WA", 20.0)])));
    let service = PriceService::new(registry);

    let merged = service
        .aggregate(&groups(&[(Venue::Us, &[]), (Venue::Wa, &["BBB.WA"])]), now())
        .await
        .unwrap();

    assert_eq!(us_calls.load(Ordering::SeqCst), 0);
    assert_eq!(merged.prices.len(), 1);
}

#[tokio::test]
async fn fetch_quotes_dedupes_and_uppercases_input() {
    let provider = MockProvider::new(Venue::Us, &[("AAA", 55.0)]);
    let batches = provider.batch_log();
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(provider));
    let service = PriceService::new(registry);

    let result = service
        .fetch_quotes(&symbols(&["aaa", "AAA", " aaa "]), Venue::Us, now())
        .await
        .unwrap();

    assert_eq!(result.prices.len(), 1);
    let batches = batches.lock().unwrap();
    assert_eq!(batches.len(), 1);
    assert_eq!(batches[0], vec!["AAA".to_string()]);
}

#[tokio::test]
async fn cached_quotes_are_served_within_the_ttl() {
    let provider = MockProvider::new(Venue::Us, &[("AAA", 55.0)]);
    let calls = provider.call_counter();
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(provider));
    let service = PriceService::with_ttl(registry, Duration::seconds(60));

    let t0 = now();
    let fresh = service
        .fetch_quotes(&symbols(&["AAA"]), Venue::Us, t0)
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);

    // Inside the TTL: same shape, no extra fetch.
    let cached = service
        .fetch_quotes(&symbols(&["AAA"]), Venue::Us, t0 + Duration::seconds(59))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(cached, fresh);

    // Past the TTL: refetched.
    service
        .fetch_quotes(&symbols(&["AAA"]), Venue::Us, t0 + Duration::seconds(61))
        .await
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn failures_are_never_cached() {
    let provider = MockProvider::new(Venue::Us, &[]);
    let calls = provider.call_counter();
    let mut registry = QuoteProviderRegistry::new();
    registry.register(Box::new(provider));
    let service = PriceService::with_ttl(registry, Duration::seconds(60));

    for _ in 0..2 {
        let result = service
            .fetch_quotes(&symbols(&["AAA"]), Venue::Us, now())
            .await
            .unwrap();
        assert_eq!(result.failures.len(), 1);
    }
    assert_eq!(calls.load(Ordering::SeqCst), 2);
}

// ═══════════════════════════════════════════════════════════════════
// Valuation engine
// ═══════════════════════════════════════════════════════════════════

fn position(wallet_id: Uuid, symbol: &str, quantity: f64, cost: f64) -> Position {
    Position::new(wallet_id, symbol, symbol, quantity, cost)
}

#[test]
fn weighted_average_cost_over_several_lots() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![
        position(wallet_id, "AAA", 10.0, 100.0),
        position(wallet_id, "AAA", 5.0, 130.0),
    ];
    let prices = HashMap::from([("AAA".to_string(), 120.0)]);

    let valuation = ValuationService::new().valuate(&positions, &prices);

    assert_eq!(valuation.symbols.len(), 1);
    let line = &valuation.symbols[0];
    assert_eq!(line.total_quantity, 15.0);
    assert_eq!(line.total_cost_basis, 1650.0);
    assert_eq!(line.weighted_avg_cost, 110.0);
}

#[test]
fn priced_symbol_values_at_the_live_price() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![position(wallet_id, "AAA", 10.0, 50.0)];
    let prices = HashMap::from([("AAA".to_string(), 55.0)]);

    let valuation = ValuationService::new().valuate(&positions, &prices);

    assert_eq!(valuation.total_cost_basis, 500.0);
    assert_eq!(valuation.total_current_value, 550.0);
    assert_eq!(valuation.total_pl, 50.0);
    assert_eq!(valuation.total_pl_percent, 10.0);
    assert!(valuation.has_any_price);

    let line = &valuation.symbols[0];
    assert_eq!(line.unrealized_pl, 50.0);
    assert_eq!(line.unrealized_pl_percent, Some(10.0));
    assert_eq!(format_pl_percent(line.unrealized_pl_percent.unwrap()), "+10.00%");
}

#[test]
fn unpriced_symbol_falls_back_to_cost_basis() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![position(wallet_id, "BBB.WA", 4.0, 20.0)];
    let prices = HashMap::new();

    let valuation = ValuationService::new().valuate(&positions, &prices);

    assert_eq!(valuation.total_cost_basis, 80.0);
    assert_eq!(valuation.total_current_value, 80.0);
    assert_eq!(valuation.total_pl, 0.0);
    assert!(!valuation.has_any_price);

    let line = &valuation.symbols[0];
    assert!(!line.has_live_price);
    assert_eq!(line.current_value, 80.0);
    assert_eq!(line.unrealized_pl_percent, None);
}

#[test]
fn fallback_symbol_does_not_count_towards_has_any_price() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![
        position(wallet_id, "AAA", 10.0, 50.0),
        position(wallet_id, "BBB", 2.0, 30.0),
    ];
    let prices = HashMap::from([("AAA".to_string(), 55.0)]);

    let valuation = ValuationService::new().valuate(&positions, &prices);

    assert!(valuation.has_any_price);
    assert_eq!(valuation.total_current_value, 550.0 + 60.0);
    let bbb = valuation.symbols.iter().find(|s| s.symbol == "BBB").unwrap();
    assert!(!bbb.has_live_price);
}

#[test]
fn zero_cost_basis_omits_the_percent() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![position(wallet_id, "AAA", 5.0, 0.0)];
    let prices = HashMap::from([("AAA".to_string(), 10.0)]);

    let valuation = ValuationService::new().valuate(&positions, &prices);

    let line = &valuation.symbols[0];
    assert_eq!(line.current_value, 50.0);
    assert_eq!(line.unrealized_pl, 50.0);
    assert_eq!(line.unrealized_pl_percent, None);
    assert_eq!(line.weighted_avg_cost, 0.0);
    // Portfolio percent guards the division too.
    assert_eq!(valuation.total_pl_percent, 0.0);
}

#[test]
fn empty_portfolio_valuates_to_zeroes() {
    let valuation = ValuationService::new().valuate(&[], &HashMap::new());
    assert!(valuation.symbols.is_empty());
    assert_eq!(valuation.total_cost_basis, 0.0);
    assert_eq!(valuation.total_current_value, 0.0);
    assert_eq!(valuation.total_pl_percent, 0.0);
    assert!(!valuation.has_any_price);
}

#[test]
fn identical_inputs_produce_identical_output() {
    let wallet_id = Uuid::new_v4();
    let positions = vec![
        position(wallet_id, "AAA", 10.0, 50.0),
        position(wallet_id, "CCC", 1.0, 9.0),
        position(wallet_id, "BBB", 2.0, 30.0),
    ];
    let prices = HashMap::from([("AAA".to_string(), 55.0), ("CCC".to_string(), 8.0)]);

    let service = ValuationService::new();
    let first = service.valuate(&positions, &prices);
    let second = service.valuate(&positions, &prices);
    assert_eq!(first, second);

    // Symbol lines come out sorted regardless of input order.
    let order: Vec<&str> = first.symbols.iter().map(|s| s.symbol.as_str()).collect();
    assert_eq!(order, vec!["AAA", "BBB", "CCC"]);
}

// ═══════════════════════════════════════════════════════════════════
// Wallet service gate chains
// ═══════════════════════════════════════════════════════════════════

fn wallet_service() -> (WalletService, Arc<Store>) {
    let store = Arc::new(Store::in_memory());
    (WalletService::new(store.clone()), store)
}

#[test]
fn every_operation_requires_a_session() {
    let (service, _) = wallet_service();
    let id = Uuid::new_v4();

    assert!(matches!(
        service.list_wallets(None),
        Err(CoreError::Unauthenticated)
    ));
    assert!(matches!(
        service.create_wallet(None, "Main", "USD"),
        Err(CoreError::Unauthenticated)
    ));
    assert!(matches!(
        service.list_positions(None, id),
        Err(CoreError::Unauthenticated)
    ));
    assert!(matches!(
        service.delete_wallet(None, id),
        Err(CoreError::Unauthenticated)
    ));
}

#[test]
fn create_then_list_round_trips() {
    let (service, _) = wallet_service();

    let wallet = service.create_wallet(Some("user-1"), "Main", "USD").unwrap();
    assert_eq!(wallet.currency, Currency::Usd);

    let overviews = service.list_wallets(Some("user-1")).unwrap();
    assert_eq!(overviews.len(), 1);
    assert_eq!(overviews[0].wallet.id, wallet.id);
    assert_eq!(overviews[0].total_cost_basis, 0.0);
}

#[test]
fn wallet_name_rules() {
    let (service, _) = wallet_service();

    let err = service.create_wallet(Some("user-1"), "   ", "USD").unwrap_err();
    assert!(matches!(err, CoreError::Validation { .. }));

    let long = "x".repeat(51);
    let err = service.create_wallet(Some("user-1"), &long, "USD").unwrap_err();
    assert_eq!(err.to_string(), "Wallet name can't be longer than 50 characters!");

    // Exactly 50 is fine.
    let fifty = "x".repeat(50);
    assert!(service.create_wallet(Some("user-1"), &fifty, "PLN").is_ok());
}

#[test]
fn invalid_currency_is_rejected() {
    let (service, _) = wallet_service();
    let err = service.create_wallet(Some("user-1"), "Main", "EUR").unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation { field: Some(ref f), .. } if f == "currency"
    ));
}

#[test]
fn other_users_wallets_are_invisible() {
    let (service, _) = wallet_service();
    let wallet = service.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let err = service.get_wallet(Some("user-2"), wallet.id).unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    let err = service
        .rename_wallet(Some("user-2"), wallet.id, "Stolen")
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { .. }));

    assert!(service.list_wallets(Some("user-2")).unwrap().is_empty());
}

#[test]
fn rename_returns_the_updated_wallet() {
    let (service, _) = wallet_service();
    let wallet = service.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let renamed = service
        .rename_wallet(Some("user-1"), wallet.id, "Retirement")
        .unwrap();
    assert_eq!(renamed.id, wallet.id);
    assert_eq!(renamed.name, "Retirement");
    assert_eq!(renamed.currency, Currency::Usd);
}

#[test]
fn positions_validate_and_feed_the_overview() {
    let (service, _) = wallet_service();
    let wallet = service.create_wallet(Some("user-1"), "Main", "PLN").unwrap();

    let err = service
        .add_position(Some("user-1"), wallet.id, "XTB S.A.", "XTB.WA", -1.0, 20.0)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation { field: Some(ref f), .. } if f == "shares"
    ));

    let err = service
        .add_position(Some("user-1"), wallet.id, "XTB S.A.", "XTB.WA", 4.0, f64::NAN)
        .unwrap_err();
    assert!(matches!(
        err,
        CoreError::Validation { field: Some(ref f), .. } if f == "price"
    ));

    let added = service
        .add_position(Some("user-1"), wallet.id, "XTB S.A.", "xtb.wa", 4.0, 20.0)
        .unwrap();
    assert_eq!(added.company_symbol, "XTB.WA");

    let overviews = service.list_wallets(Some("user-1")).unwrap();
    assert_eq!(overviews[0].total_cost_basis, 80.0);
}

#[test]
fn deleting_a_wallet_takes_its_positions_along() {
    let (service, store) = wallet_service();
    let wallet = service.create_wallet(Some("user-1"), "Main", "USD").unwrap();
    service
        .add_position(Some("user-1"), wallet.id, "Apple Inc.", "AAPL", 2.0, 180.0)
        .unwrap();

    service.delete_wallet(Some("user-1"), wallet.id).unwrap();

    assert!(service.list_wallets(Some("user-1")).unwrap().is_empty());
    assert!(store.positions_for_wallet(wallet.id).is_empty());
}

#[test]
fn deleting_an_unknown_position_is_not_found() {
    let (service, _) = wallet_service();
    let wallet = service.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let err = service
        .delete_position(Some("user-1"), wallet.id, Uuid::new_v4())
        .unwrap_err();
    assert!(matches!(err, CoreError::NotFound { ref resource, .. } if resource == "Position"));
}

// ═══════════════════════════════════════════════════════════════════
// Chart service
// ═══════════════════════════════════════════════════════════════════

fn chart_fixture() -> (ChartService, WalletService, Arc<Store>) {
    let store = Arc::new(Store::in_memory());
    (
        ChartService::new(store.clone()),
        WalletService::new(store.clone()),
        store,
    )
}

#[test]
fn chart_requires_session_ownership_and_a_known_range() {
    let (chart, wallets, _) = chart_fixture();
    let wallet = wallets.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    assert!(matches!(
        chart.read_series(None, wallet.id, "1M"),
        Err(CoreError::Unauthenticated)
    ));
    assert!(matches!(
        chart.read_series(Some("user-2"), wallet.id, "1M"),
        Err(CoreError::NotFound { .. })
    ));
    assert!(matches!(
        chart.read_series(Some("user-1"), wallet.id, "2W"),
        Err(CoreError::Validation { .. })
    ));
}

#[test]
fn a_new_wallet_has_an_empty_series() {
    let (chart, wallets, _) = chart_fixture();
    let wallet = wallets.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let points = chart.read_series(Some("user-1"), wallet.id, "1M").unwrap();
    assert!(points.is_empty());
}

#[test]
fn one_day_reads_only_todays_intraday_rows() {
    let (chart, wallets, store) = chart_fixture();
    let wallet = wallets.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap();
    let yesterday = now - Duration::hours(20); // 2025-03-14 18:00
    let this_morning = now - Duration::hours(4); // 2025-03-15 10:00

    store
        .insert_intraday_snapshots(vec![
            IntradaySnapshot {
                id: Uuid::new_v4(),
                wallet_id: wallet.id,
                snapshot_at: yesterday,
                total_value: 500.0,
                total_cost_basis: 500.0,
            },
            IntradaySnapshot {
                id: Uuid::new_v4(),
                wallet_id: wallet.id,
                snapshot_at: this_morning,
                total_value: 550.0,
                total_cost_basis: 500.0,
            },
        ])
        .unwrap();

    let points = chart
        .read_series_at(Some("user-1"), wallet.id, "1D", now)
        .unwrap();

    assert_eq!(points.len(), 1);
    assert_eq!(points[0].timestamp, this_morning.timestamp_millis());
    assert_eq!(points[0].label, None);
    assert_eq!(points[0].total_value, 550.0);
}

#[test]
fn bounded_ranges_read_daily_rows_ascending() {
    let (chart, wallets, store) = chart_fixture();
    let wallet = wallets.create_wallet(Some("user-1"), "Main", "USD").unwrap();

    let now = Utc.with_ymd_and_hms(2025, 3, 15, 14, 0, 0).unwrap();
    let dates = [
        NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(), // outside 1M
        NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
        NaiveDate::from_ymd_opt(2025, 2, 20).unwrap(),
    ];
    for (i, d) in dates.iter().enumerate() {
        store
            .upsert_daily_snapshots(vec![portfel_core::models::snapshot::DailySnapshot {
                id: Uuid::new_v4(),
                wallet_id: wallet.id,
                snapshot_date: *d,
                total_value: 100.0 + i as f64,
                total_cost_basis: 100.0,
            }])
            .unwrap();
    }

    let points = chart
        .read_series_at(Some("user-1"), wallet.id, "1M", now)
        .unwrap();

    assert_eq!(points.len(), 2);
    assert_eq!(points[0].label.as_deref(), Some("2025-02-20"));
    assert_eq!(points[1].label.as_deref(), Some("2025-03-10"));
    assert!(points[0].timestamp < points[1].timestamp);
}
