use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

use super::price::PriceFetchFailure;

/// One persisted valuation of a wallet per calendar day.
///
/// Unique per (wallet, date): re-running the daily rollup overwrites the
/// value and cost-basis fields in place, so repeated runs are idempotent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DailySnapshot {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub snapshot_date: NaiveDate,
    pub total_value: f64,
    pub total_cost_basis: f64,
}

/// One persisted valuation of a wallet at an instant.
///
/// Append-only: every intraday run adds rows. Rows older than the
/// retention window are pruned whenever a daily rollup runs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntradaySnapshot {
    pub id: Uuid,
    pub wallet_id: Uuid,
    pub snapshot_at: DateTime<Utc>,
    pub total_value: f64,
    pub total_cost_basis: f64,
}

/// Rollup granularity selector, as carried on the trigger request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SnapshotMode {
    Daily,
    Intraday,
}

impl std::fmt::Display for SnapshotMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SnapshotMode::Daily => write!(f, "daily"),
            SnapshotMode::Intraday => write!(f, "intraday"),
        }
    }
}

impl std::str::FromStr for SnapshotMode {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "daily" => Ok(SnapshotMode::Daily),
            "intraday" => Ok(SnapshotMode::Intraday),
            _ => Err(CoreError::validation_field(
                "type",
                "Invalid param: must be 'daily' or 'intraday'",
            )),
        }
    }
}

/// Outcome of one rollup run.
///
/// `snapshots_inserted + wallets_skipped == wallets_total` always holds;
/// per-symbol fetch failures ride along for observability.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotSummary {
    pub success: bool,
    #[serde(rename = "type")]
    pub mode: SnapshotMode,
    pub wallets_total: usize,
    pub snapshots_inserted: usize,
    pub wallets_skipped: usize,
    pub price_failures: Vec<PriceFetchFailure>,
}
