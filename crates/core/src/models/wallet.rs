use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::CoreError;

/// Wallet denomination currency.
///
/// The currency decides which quote venue serves the wallet's positions;
/// see [`Currency::venue`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// US dollar — positions quoted on the US venue (Finnhub)
    #[serde(rename = "USD")]
    Usd,
    /// Polish złoty — positions quoted on the Warsaw venue (Stooq)
    #[serde(rename = "PLN")]
    Pln,
}

impl Currency {
    /// The quote venue for this currency.
    ///
    /// Single source of truth for the currency → venue mapping. Adding a
    /// venue means extending this table, not sprinkling conditionals.
    pub fn venue(self) -> Venue {
        match self {
            Currency::Usd => Venue::Us,
            Currency::Pln => Venue::Wa,
        }
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Currency::Usd => write!(f, "USD"),
            Currency::Pln => write!(f, "PLN"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "USD" => Ok(Currency::Usd),
            "PLN" => Ok(Currency::Pln),
            _ => Err(CoreError::validation_field(
                "currency",
                "Please select a valid currency (USD or PLN)",
            )),
        }
    }
}

/// Quote-source discriminator: which external venue quotes a symbol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Venue {
    /// US equities, served by the Finnhub JSON quote API
    #[serde(rename = "US")]
    Us,
    /// Warsaw equities, served by the Stooq CSV quote feed
    #[serde(rename = "WA")]
    Wa,
}

impl std::fmt::Display for Venue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Venue::Us => write!(f, "US"),
            Venue::Wa => write!(f, "WA"),
        }
    }
}

impl std::str::FromStr for Venue {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "US" => Ok(Venue::Us),
            "WA" => Ok(Venue::Wa),
            _ => Err(CoreError::validation_field(
                "exchange",
                "Unsupported exchange. Must be 'US' or 'WA'.",
            )),
        }
    }
}

/// A named, currency-denominated container of positions owned by one user.
///
/// The currency is fixed at creation; there is no rename-currency path,
/// so a wallet's venue never changes under its positions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    pub id: Uuid,
    pub user_id: String,
    pub name: String,
    pub currency: Currency,
    pub created_at: DateTime<Utc>,
}

impl Wallet {
    pub fn new(user_id: impl Into<String>, name: impl Into<String>, currency: Currency) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id: user_id.into(),
            name: name.into(),
            currency,
            created_at: Utc::now(),
        }
    }
}

/// A wallet together with the summed cost basis of its positions,
/// as listed on the dashboard. Wallets without positions report 0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WalletOverview {
    #[serde(flatten)]
    pub wallet: Wallet,
    pub total_cost_basis: f64,
}
