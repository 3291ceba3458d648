use std::path::PathBuf;
use std::sync::{PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::snapshot::{DailySnapshot, IntradaySnapshot};
use crate::models::wallet::{Wallet, WalletOverview};

use super::{encryption, file};

/// Everything the service persists, as one serializable table set.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Tables {
    wallets: Vec<Wallet>,
    positions: Vec<Position>,
    daily_snapshots: Vec<DailySnapshot>,
    intraday_snapshots: Vec<IntradaySnapshot>,
}

/// The persistent store behind all services.
///
/// Tables live in memory behind an `RwLock` (never held across an await)
/// and are written through to an encrypted container file on every
/// mutation. A mutation whose write-through fails returns a `Database`
/// error and the caller treats the operation as failed.
///
/// Flow on disk: Tables → bincode → AES-256-GCM(Argon2id(passphrase)) →
/// PFDB container bytes.
#[derive(Debug)]
pub struct Store {
    tables: RwLock<Tables>,
    file: Option<StoreFile>,
}

#[derive(Debug)]
struct StoreFile {
    path: PathBuf,
    /// Salt for this file, kept stable across saves so the derived key
    /// can be reused; only the nonce is fresh per write.
    salt: [u8; 16],
    key: [u8; 32],
}

impl Store {
    /// Purely in-memory store (tests, ephemeral runs). Nothing persists.
    pub fn in_memory() -> Self {
        Self {
            tables: RwLock::new(Tables::default()),
            file: None,
        }
    }

    /// Open a store backed by an encrypted file. A missing file starts the
    /// store empty; it is created on the first mutation.
    pub fn open(path: impl Into<PathBuf>, passphrase: &str) -> Result<Self, CoreError> {
        let path = path.into();

        if path.exists() {
            let bytes = std::fs::read(&path).map_err(|e| CoreError::database("store file read", e))?;
            let (salt, nonce, ciphertext) = file::read_container(&bytes)?;
            let key = encryption::derive_key(passphrase, &salt)?;
            let plaintext = encryption::open(ciphertext, &key, &nonce)?;
            let tables: Tables = bincode::deserialize(&plaintext)
                .map_err(|e| CoreError::database("store decode", e))?;
            Ok(Self {
                tables: RwLock::new(tables),
                file: Some(StoreFile { path, salt, key }),
            })
        } else {
            let salt = encryption::generate_salt()?;
            let key = encryption::derive_key(passphrase, &salt)?;
            Ok(Self {
                tables: RwLock::new(Tables::default()),
                file: Some(StoreFile { path, salt, key }),
            })
        }
    }

    fn read(&self) -> RwLockReadGuard<'_, Tables> {
        self.tables.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, Tables> {
        self.tables.write().unwrap_or_else(PoisonError::into_inner)
    }

    /// Write the current tables through to disk (no-op for in-memory).
    fn persist(&self, tables: &Tables) -> Result<(), CoreError> {
        let Some(store_file) = &self.file else {
            return Ok(());
        };
        let plaintext =
            bincode::serialize(tables).map_err(|e| CoreError::database("store encode", e))?;
        let nonce = encryption::generate_nonce()?;
        let ciphertext = encryption::seal(&plaintext, &store_file.key, &nonce)?;
        let bytes = file::write_container(&store_file.salt, &nonce, &ciphertext);
        std::fs::write(&store_file.path, bytes)
            .map_err(|e| CoreError::database("store file write", e))
    }

    // ── Wallets ─────────────────────────────────────────────────────

    pub fn wallets_for_user(&self, user_id: &str) -> Vec<Wallet> {
        self.read()
            .wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .cloned()
            .collect()
    }

    /// Wallets with their summed position cost basis. Left-join semantics:
    /// a wallet without positions reports 0.
    pub fn wallet_overviews(&self, user_id: &str) -> Vec<WalletOverview> {
        let tables = self.read();
        tables
            .wallets
            .iter()
            .filter(|w| w.user_id == user_id)
            .map(|wallet| {
                let total_cost_basis = tables
                    .positions
                    .iter()
                    .filter(|p| p.wallet_id == wallet.id)
                    .map(|p| p.quantity * p.price_per_share)
                    .sum();
                WalletOverview {
                    wallet: wallet.clone(),
                    total_cost_basis,
                }
            })
            .collect()
    }

    /// Owner-scoped wallet lookup.
    pub fn wallet_by_id(&self, wallet_id: Uuid, user_id: &str) -> Option<Wallet> {
        self.read()
            .wallets
            .iter()
            .find(|w| w.id == wallet_id && w.user_id == user_id)
            .cloned()
    }

    pub fn insert_wallet(&self, wallet: Wallet) -> Result<(), CoreError> {
        let mut tables = self.write();
        tables.wallets.push(wallet);
        self.persist(&tables)
    }

    /// Rename an owner-scoped wallet. Returns the updated row, or `None`
    /// when the wallet does not exist for this owner.
    pub fn rename_wallet(
        &self,
        wallet_id: Uuid,
        user_id: &str,
        name: &str,
    ) -> Result<Option<Wallet>, CoreError> {
        let mut tables = self.write();
        let Some(wallet) = tables
            .wallets
            .iter_mut()
            .find(|w| w.id == wallet_id && w.user_id == user_id)
        else {
            return Ok(None);
        };
        wallet.name = name.to_string();
        let updated = wallet.clone();
        self.persist(&tables)?;
        Ok(Some(updated))
    }

    /// Delete a wallet and everything hanging off it: positions, daily and
    /// intraday snapshots. Returns whether the wallet existed.
    pub fn delete_wallet(&self, wallet_id: Uuid, user_id: &str) -> Result<bool, CoreError> {
        let mut tables = self.write();
        let before = tables.wallets.len();
        tables
            .wallets
            .retain(|w| !(w.id == wallet_id && w.user_id == user_id));
        if tables.wallets.len() == before {
            return Ok(false);
        }
        tables.positions.retain(|p| p.wallet_id != wallet_id);
        tables.daily_snapshots.retain(|s| s.wallet_id != wallet_id);
        tables.intraday_snapshots.retain(|s| s.wallet_id != wallet_id);
        self.persist(&tables)?;
        Ok(true)
    }

    // ── Positions ───────────────────────────────────────────────────

    pub fn positions_for_wallet(&self, wallet_id: Uuid) -> Vec<Position> {
        self.read()
            .positions
            .iter()
            .filter(|p| p.wallet_id == wallet_id)
            .cloned()
            .collect()
    }

    pub fn insert_position(&self, position: Position) -> Result<(), CoreError> {
        let mut tables = self.write();
        tables.positions.push(position);
        self.persist(&tables)
    }

    /// Delete a position scoped to its wallet. Returns whether it existed.
    pub fn delete_position(&self, position_id: Uuid, wallet_id: Uuid) -> Result<bool, CoreError> {
        let mut tables = self.write();
        let before = tables.positions.len();
        tables
            .positions
            .retain(|p| !(p.id == position_id && p.wallet_id == wallet_id));
        if tables.positions.len() == before {
            return Ok(false);
        }
        self.persist(&tables)?;
        Ok(true)
    }

    /// Flat wallet ⋈ position rows across all users, the rollup's single
    /// read. Inner-join semantics: wallets without positions yield no rows.
    pub fn wallets_with_positions(&self) -> Vec<(Wallet, Position)> {
        let tables = self.read();
        tables
            .positions
            .iter()
            .filter_map(|position| {
                tables
                    .wallets
                    .iter()
                    .find(|w| w.id == position.wallet_id)
                    .map(|wallet| (wallet.clone(), position.clone()))
            })
            .collect()
    }

    // ── Snapshots ───────────────────────────────────────────────────

    /// Insert or overwrite one row per (wallet, date). Re-running a day
    /// replaces value and cost basis in place, keeping the run idempotent.
    pub fn upsert_daily_snapshots(&self, rows: Vec<DailySnapshot>) -> Result<(), CoreError> {
        let mut tables = self.write();
        for row in rows {
            match tables
                .daily_snapshots
                .iter_mut()
                .find(|s| s.wallet_id == row.wallet_id && s.snapshot_date == row.snapshot_date)
            {
                Some(existing) => {
                    existing.total_value = row.total_value;
                    existing.total_cost_basis = row.total_cost_basis;
                }
                None => tables.daily_snapshots.push(row),
            }
        }
        self.persist(&tables)
    }

    pub fn insert_intraday_snapshots(&self, rows: Vec<IntradaySnapshot>) -> Result<(), CoreError> {
        let mut tables = self.write();
        tables.intraday_snapshots.extend(rows);
        self.persist(&tables)
    }

    /// Delete intraday rows at or before the cutoff. Returns how many went.
    pub fn prune_intraday_before(&self, cutoff: DateTime<Utc>) -> Result<usize, CoreError> {
        let mut tables = self.write();
        let before = tables.intraday_snapshots.len();
        tables.intraday_snapshots.retain(|s| s.snapshot_at > cutoff);
        let removed = before - tables.intraday_snapshots.len();
        if removed > 0 {
            self.persist(&tables)?;
        }
        Ok(removed)
    }

    /// Daily rows for a wallet from `start_date` on, ascending by date.
    pub fn daily_since(&self, wallet_id: Uuid, start_date: NaiveDate) -> Vec<DailySnapshot> {
        let mut rows: Vec<DailySnapshot> = self
            .read()
            .daily_snapshots
            .iter()
            .filter(|s| s.wallet_id == wallet_id && s.snapshot_date >= start_date)
            .cloned()
            .collect();
        rows.sort_by_key(|s| s.snapshot_date);
        rows
    }

    /// Intraday rows for a wallet from `start` on, in insertion order.
    pub fn intraday_since(&self, wallet_id: Uuid, start: DateTime<Utc>) -> Vec<IntradaySnapshot> {
        self.read()
            .intraday_snapshots
            .iter()
            .filter(|s| s.wallet_id == wallet_id && s.snapshot_at >= start)
            .cloned()
            .collect()
    }
}
