use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::services::analytics_service;

/// A single manually entered purchase of a coin.
///
/// `change_pct` and `profit` are derived from `entry_price`, `quantity`
/// and `current_price`. They are stored alongside the inputs so the JSON file
/// reads like the table the user sees, and recomputed whenever the price
/// changes or the file is loaded.
///
/// Field names on disk match the legacy `portfolio.json` layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lot {
    /// Unique identifier. Files written before ids existed get a fresh one on load.
    #[serde(rename = "Id", default = "Uuid::new_v4")]
    pub id: Uuid,

    /// Purchase date (daily granularity)
    #[serde(rename = "Date")]
    pub date: NaiveDate,

    /// Base coin symbol, uppercased (e.g., "BTC")
    #[serde(rename = "Coin")]
    pub symbol: String,

    /// Price paid per coin, in the quote asset
    #[serde(rename = "Entry Price ($)")]
    pub entry_price: f64,

    /// Number of coins bought
    #[serde(rename = "Qty")]
    pub quantity: f64,

    /// Last known market price per coin
    #[serde(rename = "Current Price ($)")]
    pub current_price: f64,

    #[serde(rename = "Current Change (%)", default)]
    pub change_pct: f64,

    #[serde(rename = "Profit ($)", default)]
    pub profit: f64,
}

impl Lot {
    pub fn new(
        date: NaiveDate,
        symbol: impl Into<String>,
        entry_price: f64,
        quantity: f64,
        current_price: f64,
    ) -> Self {
        let mut lot = Self {
            id: Uuid::new_v4(),
            date,
            symbol: normalize_symbol(&symbol.into()),
            entry_price,
            quantity,
            current_price,
            change_pct: 0.0,
            profit: 0.0,
        };
        lot.recompute();
        lot
    }

    /// Record a fresh market price and update the derived metrics.
    pub fn apply_price(&mut self, price: f64) {
        self.current_price = price;
        self.recompute();
    }

    /// Bring `change_pct` and `profit` back in line with the inputs.
    pub fn recompute(&mut self) {
        let metrics =
            analytics_service::lot_metrics(self.entry_price, self.quantity, self.current_price);
        self.change_pct = metrics.change_pct;
        self.profit = metrics.profit;
    }

    /// Amount paid for the whole lot.
    pub fn cost(&self) -> f64 {
        self.entry_price * self.quantity
    }

    /// Value of the whole lot at the last known price.
    pub fn market_value(&self) -> f64 {
        self.current_price * self.quantity
    }
}

/// Trim and uppercase a user-entered coin symbol.
pub fn normalize_symbol(symbol: &str) -> String {
    symbol.trim().to_uppercase()
}

/// Distinct symbols of `lots`, in first-seen order.
pub fn distinct_symbols(lots: &[Lot]) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for lot in lots {
        if !seen.contains(&lot.symbol) {
            seen.push(lot.symbol.clone());
        }
    }
    seen
}
