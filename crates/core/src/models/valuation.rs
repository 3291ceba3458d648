use serde::{Deserialize, Serialize};

/// Valuation of one symbol's aggregated lots.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SymbolValuation {
    pub symbol: String,

    /// Shares held across every lot of this symbol
    pub total_quantity: f64,

    /// Σ quantity · price_per_share over the lots
    pub total_cost_basis: f64,

    /// total_cost_basis / total_quantity (0 when nothing is held)
    pub weighted_avg_cost: f64,

    /// live_price · total_quantity when a quote resolved; the cost basis
    /// otherwise (an unknown price counts as "no change")
    pub current_value: f64,

    /// current_value − total_cost_basis
    pub unrealized_pl: f64,

    /// Percent P/L; absent when there is no live price or no cost basis
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unrealized_pl_percent: Option<f64>,

    /// Whether a live quote backed this line (false means cost-basis fallback)
    pub has_live_price: bool,
}

/// Whole-portfolio valuation: per-symbol lines plus the totals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortfolioValuation {
    /// Per-symbol breakdown, sorted by symbol
    pub symbols: Vec<SymbolValuation>,

    pub total_cost_basis: f64,
    pub total_current_value: f64,

    /// total_current_value − total_cost_basis
    pub total_pl: f64,

    /// Percent P/L over cost basis (0 when the cost basis is 0)
    pub total_pl_percent: f64,

    /// True iff at least one symbol had a live quote. An all-fallback
    /// portfolio has no real P/L signal, and displays none.
    pub has_any_price: bool,
}

/// Format a monetary delta with the display sign convention:
/// positive prefixed `+`, negative prefixed `−` (U+2212), zero unprefixed.
pub fn format_pl(value: f64) -> String {
    format!("{}{:.2}", sign_prefix(value), value.abs())
}

/// Same sign convention for percent values, with a trailing `%`.
pub fn format_pl_percent(value: f64) -> String {
    format!("{}{:.2}%", sign_prefix(value), value.abs())
}

fn sign_prefix(value: f64) -> &'static str {
    if value > 0.0 {
        "+"
    } else if value < 0.0 {
        "\u{2212}"
    } else {
        ""
    }
}
