use serde::{Deserialize, Serialize};

/// Derived profit/loss figures for one lot.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LotMetrics {
    /// Price change since entry, in percent
    pub change_pct: f64,

    /// Unrealized profit in the quote asset: (current - entry) × quantity
    pub profit: f64,
}

/// Totals across the whole portfolio at the last known prices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortfolioSummary {
    /// Number of lots in the portfolio
    pub lot_count: usize,

    /// Sum of entry_price × quantity
    pub total_invested: f64,

    /// Sum of current_price × quantity
    pub total_value: f64,

    /// total_value - total_invested
    pub total_profit: f64,

    /// (total_profit / total_invested) × 100, or 0 when nothing is invested
    pub total_change_pct: f64,
}
