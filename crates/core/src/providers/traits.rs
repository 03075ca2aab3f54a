use async_trait::async_trait;

use crate::errors::CoreError;

/// Trait abstraction for live quote sources.
///
/// Each market-data API implements this trait. If a feed stops working, only
/// that implementation is replaced; the services never see the wire format.
#[async_trait]
pub trait PriceProvider: Send + Sync {
    /// Human-readable name of this provider (for logs/errors).
    fn name(&self) -> &str;

    /// Get the latest price of `base` (e.g. "BTC") quoted in `quote` (e.g. "USDT").
    async fn get_current_price(&self, base: &str, quote: &str) -> Result<f64, CoreError>;
}
