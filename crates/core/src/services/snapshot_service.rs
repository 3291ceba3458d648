use std::collections::{BTreeMap, BTreeSet};
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::snapshot::{DailySnapshot, IntradaySnapshot, SnapshotMode, SnapshotSummary};
use crate::models::wallet::{Currency, Venue};
use crate::services::price_service::PriceService;
use crate::storage::store::Store;

/// Intraday snapshots older than this are pruned by every daily run.
const INTRADAY_RETENTION_HOURS: i64 = 48;

/// The scheduled snapshot rollup.
///
/// Walks every wallet that has positions, prices the union of their
/// symbols in one batched aggregation (N wallets sharing M distinct
/// symbols cost O(M) quote calls, not O(N)), and persists one valuation
/// snapshot per fully-priced wallet.
///
/// Wallets with any unpriced symbol are skipped whole: a snapshot
/// represents priced value for 100% of a wallet's holdings, or it does not
/// exist for that run. Skips are reported in the summary, never raised.
pub struct SnapshotService {
    store: Arc<Store>,
    price_service: Arc<PriceService>,
    cron_secret: Option<String>,
}

impl SnapshotService {
    pub fn new(
        store: Arc<Store>,
        price_service: Arc<PriceService>,
        cron_secret: Option<String>,
    ) -> Self {
        Self {
            store,
            price_service,
            cron_secret,
        }
    }

    /// Run a rollup now. See [`Self::run_at`] for the clock-explicit variant.
    pub async fn run(&self, token: Option<&str>, mode: &str) -> Result<SnapshotSummary, CoreError> {
        self.run_at(token, mode, Utc::now()).await
    }

    /// Run a rollup as of `now`.
    ///
    /// The token must match the configured scheduler secret and the mode
    /// must be `daily` or `intraday`; both are checked before the store is
    /// touched. A persistence failure on the batch write aborts the run.
    pub async fn run_at(
        &self,
        token: Option<&str>,
        mode: &str,
        now: DateTime<Utc>,
    ) -> Result<SnapshotSummary, CoreError> {
        match (&self.cron_secret, token) {
            (Some(secret), Some(token)) if token == secret => {}
            _ => return Err(CoreError::Unauthenticated),
        }
        let mode: SnapshotMode = mode.parse()?;

        // One flat pass over wallet ⋈ position rows, grouped by wallet.
        let mut grouped: BTreeMap<Uuid, (Currency, Vec<Position>)> = BTreeMap::new();
        for (wallet, position) in self.store.wallets_with_positions() {
            grouped
                .entry(wallet.id)
                .or_insert_with(|| (wallet.currency, Vec::new()))
                .1
                .push(position);
        }

        // Partition the union of all symbols by venue, so the whole batch
        // costs one aggregation.
        let mut groups: BTreeMap<Venue, BTreeSet<String>> = BTreeMap::new();
        for (currency, positions) in grouped.values() {
            let venue = currency.venue();
            for position in positions {
                groups
                    .entry(venue)
                    .or_default()
                    .insert(position.company_symbol.clone());
            }
        }

        let wallets_total = grouped.len();
        tracing::info!(
            %mode,
            wallets = wallets_total,
            us_symbols = groups.get(&Venue::Us).map_or(0, BTreeSet::len),
            wa_symbols = groups.get(&Venue::Wa).map_or(0, BTreeSet::len),
            "starting snapshot run"
        );

        let aggregated = self.price_service.aggregate(&groups, now).await?;
        if !aggregated.failures.is_empty() {
            tracing::warn!(
                failures = aggregated.failures.len(),
                "price fetch failures during snapshot run"
            );
        }

        let mut daily_rows = Vec::new();
        let mut intraday_rows = Vec::new();

        'wallets: for (&wallet_id, (_currency, positions)) in &grouped {
            let mut total_value = 0.0;
            let mut total_cost_basis = 0.0;

            for position in positions {
                let Some(price) = aggregated.prices.get(&position.company_symbol) else {
                    tracing::warn!(
                        %wallet_id,
                        symbol = %position.company_symbol,
                        "missing price, skipping wallet"
                    );
                    continue 'wallets;
                };
                total_value += position.quantity * price;
                total_cost_basis += position.quantity * position.price_per_share;
            }

            match mode {
                SnapshotMode::Daily => daily_rows.push(DailySnapshot {
                    id: Uuid::new_v4(),
                    wallet_id,
                    snapshot_date: now.date_naive(),
                    total_value,
                    total_cost_basis,
                }),
                SnapshotMode::Intraday => intraday_rows.push(IntradaySnapshot {
                    id: Uuid::new_v4(),
                    wallet_id,
                    snapshot_at: now,
                    total_value,
                    total_cost_basis,
                }),
            }
        }

        let snapshots_inserted = match mode {
            SnapshotMode::Daily => {
                let count = daily_rows.len();
                if count > 0 {
                    self.store.upsert_daily_snapshots(daily_rows)?;
                }
                // Prune regardless of how many wallets survived this run.
                let cutoff = now - Duration::hours(INTRADAY_RETENTION_HOURS);
                let pruned = self.store.prune_intraday_before(cutoff)?;
                if pruned > 0 {
                    tracing::info!(pruned, "pruned expired intraday snapshots");
                }
                count
            }
            SnapshotMode::Intraday => {
                let count = intraday_rows.len();
                if count > 0 {
                    self.store.insert_intraday_snapshots(intraday_rows)?;
                }
                count
            }
        };

        let wallets_skipped = wallets_total - snapshots_inserted;
        tracing::info!(snapshots_inserted, wallets_skipped, "snapshot run completed");

        Ok(SnapshotSummary {
            success: true,
            mode,
            wallets_total,
            snapshots_inserted,
            wallets_skipped,
            price_failures: aggregated.failures,
        })
    }
}
