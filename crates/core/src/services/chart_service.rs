use std::sync::Arc;

use chrono::{DateTime, NaiveTime, Utc};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::chart::{ChartPoint, TimeRange};
use crate::storage::store::Store;

/// Reads a wallet's persisted valuation series for charting.
///
/// `1D` is served from intraday snapshots (today only, UTC); every other
/// range is served from daily snapshots bounded by the range's calendar
/// offset. An empty series is a valid result: a brand-new wallet simply
/// has no rows yet.
pub struct ChartService {
    store: Arc<Store>,
}

impl ChartService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// Read the series now. See [`Self::read_series_at`] for the
    /// clock-explicit variant.
    pub fn read_series(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
        range: &str,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        self.read_series_at(user, wallet_id, range, Utc::now())
    }

    pub fn read_series_at(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
        range: &str,
        now: DateTime<Utc>,
    ) -> Result<Vec<ChartPoint>, CoreError> {
        let user_id = user.ok_or(CoreError::Unauthenticated)?;
        self.store
            .wallet_by_id(wallet_id, user_id)
            .ok_or_else(|| CoreError::not_found("Wallet", wallet_id))?;
        let range: TimeRange = range.parse()?;

        let today = now.date_naive();
        let points = match range {
            TimeRange::OneDay => {
                let start_of_today = today.and_time(NaiveTime::MIN).and_utc();
                self.store
                    .intraday_since(wallet_id, start_of_today)
                    .into_iter()
                    .map(|row| ChartPoint {
                        timestamp: row.snapshot_at.timestamp_millis(),
                        label: None,
                        total_value: row.total_value,
                        total_cost_basis: row.total_cost_basis,
                    })
                    .collect()
            }
            _ => {
                let start_date = range.start_date(today);
                self.store
                    .daily_since(wallet_id, start_date)
                    .into_iter()
                    .map(|row| ChartPoint {
                        timestamp: row
                            .snapshot_date
                            .and_time(NaiveTime::MIN)
                            .and_utc()
                            .timestamp_millis(),
                        label: Some(row.snapshot_date.to_string()),
                        total_value: row.total_value,
                        total_cost_basis: row.total_cost_basis,
                    })
                    .collect()
            }
        };

        Ok(points)
    }
}
