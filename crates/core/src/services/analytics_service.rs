use crate::models::analytics::{LotMetrics, PortfolioSummary};
use crate::models::portfolio::Portfolio;

/// Percent change and profit for a lot.
///
/// - `change_pct = (current - entry) / entry × 100`
/// - `profit = (current - entry) × quantity`
///
/// A non-positive or non-finite entry price has no meaningful percent change
/// and yields `change_pct = 0` rather than an infinity that JSON cannot hold.
pub fn lot_metrics(entry_price: f64, quantity: f64, current_price: f64) -> LotMetrics {
    let diff = current_price - entry_price;
    let change_pct = if entry_price.is_finite() && entry_price > 0.0 {
        diff / entry_price * 100.0
    } else {
        0.0
    };
    let profit = diff * quantity;

    LotMetrics {
        change_pct: finite_or_zero(change_pct),
        profit: finite_or_zero(profit),
    }
}

fn finite_or_zero(value: f64) -> f64 {
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// Computes portfolio-level totals from the lots' last known prices.
///
/// Pure arithmetic over the lot list — no I/O, no API calls.
pub struct AnalyticsService;

impl AnalyticsService {
    pub fn new() -> Self {
        Self
    }

    pub fn summarize(&self, portfolio: &Portfolio) -> PortfolioSummary {
        let total_invested: f64 = portfolio.lots.iter().map(|l| l.cost()).sum();
        let total_value: f64 = portfolio.lots.iter().map(|l| l.market_value()).sum();
        let total_profit = total_value - total_invested;
        let total_change_pct = if total_invested > 0.0 {
            finite_or_zero(total_profit / total_invested * 100.0)
        } else {
            0.0
        };

        PortfolioSummary {
            lot_count: portfolio.len(),
            total_invested,
            total_value,
            total_profit,
            total_change_pct,
        }
    }
}

impl Default for AnalyticsService {
    fn default() -> Self {
        Self::new()
    }
}
