pub mod registry;
pub mod traits;

// API provider implementations
pub mod tradingview;
pub mod yahoo_finance;
