use std::sync::Arc;

use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::position::Position;
use crate::models::wallet::{Currency, Wallet, WalletOverview};
use crate::storage::store::Store;

/// Maximum wallet display-name length.
const MAX_WALLET_NAME_LEN: usize = 50;

/// Wallet and position operations, owner-scoped.
///
/// Every operation runs the same gate sequence: resolve the session user,
/// check ownership of the touched wallet, validate input, persist. The
/// first failing gate short-circuits; a missing session is always
/// `Unauthenticated`, a wallet outside the user's scope is `NotFound`.
pub struct WalletService {
    store: Arc<Store>,
}

impl WalletService {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    fn require_user(user: Option<&str>) -> Result<&str, CoreError> {
        user.ok_or(CoreError::Unauthenticated)
    }

    fn require_wallet(&self, user_id: &str, wallet_id: Uuid) -> Result<Wallet, CoreError> {
        self.store
            .wallet_by_id(wallet_id, user_id)
            .ok_or_else(|| CoreError::not_found("Wallet", wallet_id))
    }

    // ── Wallets ─────────────────────────────────────────────────────

    /// List the user's wallets with their summed cost basis.
    pub fn list_wallets(&self, user: Option<&str>) -> Result<Vec<WalletOverview>, CoreError> {
        let user_id = Self::require_user(user)?;
        Ok(self.store.wallet_overviews(user_id))
    }

    pub fn get_wallet(&self, user: Option<&str>, wallet_id: Uuid) -> Result<Wallet, CoreError> {
        let user_id = Self::require_user(user)?;
        self.require_wallet(user_id, wallet_id)
    }

    pub fn create_wallet(
        &self,
        user: Option<&str>,
        name: &str,
        currency: &str,
    ) -> Result<Wallet, CoreError> {
        let user_id = Self::require_user(user)?;
        let name = validate_wallet_name(name)?;
        let currency: Currency = currency.parse()?;

        let wallet = Wallet::new(user_id, name, currency);
        tracing::info!(wallet_id = %wallet.id, %currency, "creating wallet");
        self.store.insert_wallet(wallet.clone())?;
        Ok(wallet)
    }

    pub fn rename_wallet(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
        name: &str,
    ) -> Result<Wallet, CoreError> {
        let user_id = Self::require_user(user)?;
        self.require_wallet(user_id, wallet_id)?;
        let name = validate_wallet_name(name)?;
        self.store
            .rename_wallet(wallet_id, user_id, &name)?
            .ok_or_else(|| CoreError::not_found("Wallet", wallet_id))
    }

    /// Delete a wallet; positions and snapshots go with it.
    pub fn delete_wallet(&self, user: Option<&str>, wallet_id: Uuid) -> Result<(), CoreError> {
        let user_id = Self::require_user(user)?;
        if !self.store.delete_wallet(wallet_id, user_id)? {
            return Err(CoreError::not_found("Wallet", wallet_id));
        }
        tracing::info!(%wallet_id, "deleted wallet");
        Ok(())
    }

    // ── Positions ───────────────────────────────────────────────────

    pub fn list_positions(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
    ) -> Result<Vec<Position>, CoreError> {
        let user_id = Self::require_user(user)?;
        self.require_wallet(user_id, wallet_id)?;
        Ok(self.store.positions_for_wallet(wallet_id))
    }

    pub fn add_position(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
        company_name: &str,
        company_symbol: &str,
        quantity: f64,
        price_per_share: f64,
    ) -> Result<Position, CoreError> {
        let user_id = Self::require_user(user)?;
        self.require_wallet(user_id, wallet_id)?;

        let symbol = company_symbol.trim();
        if symbol.is_empty() {
            return Err(CoreError::validation_field(
                "companySymbol",
                "Company symbol can't be empty",
            ));
        }
        if !quantity.is_finite() || quantity < 0.0 {
            return Err(CoreError::validation_field(
                "shares",
                "Invalid share number, must be nonnegative",
            ));
        }
        if !price_per_share.is_finite() || price_per_share < 0.0 {
            return Err(CoreError::validation_field(
                "price",
                "Invalid price number, must be nonnegative",
            ));
        }

        let position = Position::new(
            wallet_id,
            symbol,
            company_name.trim(),
            quantity,
            price_per_share,
        );
        self.store.insert_position(position.clone())?;
        Ok(position)
    }

    pub fn delete_position(
        &self,
        user: Option<&str>,
        wallet_id: Uuid,
        position_id: Uuid,
    ) -> Result<(), CoreError> {
        let user_id = Self::require_user(user)?;
        self.require_wallet(user_id, wallet_id)?;
        if !self.store.delete_position(position_id, wallet_id)? {
            return Err(CoreError::not_found("Position", position_id));
        }
        Ok(())
    }
}

fn validate_wallet_name(name: &str) -> Result<String, CoreError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(CoreError::validation_field(
            "name",
            "Wallet name can't be empty",
        ));
    }
    if trimmed.chars().count() > MAX_WALLET_NAME_LEN {
        return Err(CoreError::validation_field(
            "name",
            "Wallet name can't be longer than 50 characters!",
        ));
    }
    Ok(trimmed.to_string())
}
