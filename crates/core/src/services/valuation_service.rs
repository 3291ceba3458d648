use std::collections::{BTreeMap, HashMap};

use crate::models::position::Position;
use crate::models::valuation::{PortfolioValuation, SymbolValuation};

/// Computes point-in-time portfolio valuations.
///
/// Pure arithmetic, no I/O, no clock. Given the same positions and the
/// same price map, the output is identical down to the bit.
pub struct ValuationService;

impl ValuationService {
    pub fn new() -> Self {
        Self
    }

    /// Fold positions against a symbol → price map.
    ///
    /// Positions sharing a symbol aggregate into one line. A symbol absent
    /// from the price map is valued at its cost basis and does not count
    /// towards `has_any_price`.
    pub fn valuate(
        &self,
        positions: &[Position],
        prices: &HashMap<String, f64>,
    ) -> PortfolioValuation {
        // Group lots by symbol; BTreeMap keeps the output order stable.
        let mut lots: BTreeMap<&str, Vec<&Position>> = BTreeMap::new();
        for position in positions {
            lots.entry(position.company_symbol.as_str())
                .or_default()
                .push(position);
        }

        let mut symbols = Vec::with_capacity(lots.len());
        let mut total_cost_basis = 0.0;
        let mut total_current_value = 0.0;
        let mut has_any_price = false;

        for (symbol, group) in lots {
            let total_quantity: f64 = group.iter().map(|p| p.quantity).sum();
            let cost_basis: f64 = group.iter().map(|p| p.quantity * p.price_per_share).sum();
            let weighted_avg_cost = if total_quantity > 0.0 {
                cost_basis / total_quantity
            } else {
                0.0
            };

            let live_price = prices.get(symbol).copied();
            let current_value = match live_price {
                Some(price) => price * total_quantity,
                None => cost_basis,
            };
            let unrealized_pl = current_value - cost_basis;
            let unrealized_pl_percent = match live_price {
                Some(_) if cost_basis > 0.0 => Some(unrealized_pl / cost_basis * 100.0),
                _ => None,
            };

            if live_price.is_some() {
                has_any_price = true;
            }
            total_cost_basis += cost_basis;
            total_current_value += current_value;

            symbols.push(SymbolValuation {
                symbol: symbol.to_string(),
                total_quantity,
                total_cost_basis: cost_basis,
                weighted_avg_cost,
                current_value,
                unrealized_pl,
                unrealized_pl_percent,
                has_live_price: live_price.is_some(),
            });
        }

        let total_pl = total_current_value - total_cost_basis;
        let total_pl_percent = if total_cost_basis > 0.0 {
            total_pl / total_cost_basis * 100.0
        } else {
            0.0
        };

        PortfolioValuation {
            symbols,
            total_cost_basis,
            total_current_value,
            total_pl,
            total_pl_percent,
            has_any_price,
        }
    }
}

impl Default for ValuationService {
    fn default() -> Self {
        Self::new()
    }
}
