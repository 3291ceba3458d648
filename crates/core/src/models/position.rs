use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One acquisition lot of a security inside a wallet.
///
/// Every buy is its own row, so a wallet may hold several positions with
/// the same symbol. Valuation groups them by symbol; nothing is merged at
/// write time.
///
/// Symbols are venue-qualified the way the user's wallet currency implies
/// (plain `AAPL` for US, suffixed `XTB.WA` for Warsaw).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub id: Uuid,
    pub wallet_id: Uuid,

    /// Ticker symbol, uppercased (e.g., "AAPL", "XTB.WA")
    pub company_symbol: String,

    /// Human-readable company name (e.g., "Apple Inc.")
    pub company_name: String,

    /// Number of shares acquired (non-negative)
    pub quantity: f64,

    /// Acquisition price per share, i.e. the cost basis per unit (non-negative)
    pub price_per_share: f64,

    pub created_at: DateTime<Utc>,
}

impl Position {
    pub fn new(
        wallet_id: Uuid,
        company_symbol: impl Into<String>,
        company_name: impl Into<String>,
        quantity: f64,
        price_per_share: f64,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            wallet_id,
            company_symbol: company_symbol.into().to_uppercase(),
            company_name: company_name.into(),
            quantity,
            price_per_share,
            created_at: Utc::now(),
        }
    }
}
