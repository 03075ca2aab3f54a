use async_trait::async_trait;

use crate::errors::CoreError;
use super::traits::PriceProvider;

const PROVIDER: &str = "Yahoo Finance";

/// Quote assets that track the US dollar. Yahoo lists crypto pairs against
/// fiat only, so these are looked up as `{BASE}-USD`.
const USD_PEGGED: &[&str] = &["USD", "USDT", "USDC", "BUSD", "FDUSD", "TUSD", "DAI"];

/// Yahoo Finance provider, used as a fallback crypto quote source.
///
/// - **Free**: No API key required.
/// - **Tickers**: `{BASE}-{FIAT}`, e.g. `BTC-USD`, `ETH-EUR`.
///
/// Uses the `yahoo_finance_api` crate which wraps Yahoo Finance's public
/// chart endpoint.
pub struct YahooFinanceProvider {
    connector: yahoo_finance_api::YahooConnector,
}

impl YahooFinanceProvider {
    pub fn new() -> Result<Self, CoreError> {
        let connector = yahoo_finance_api::YahooConnector::new().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("Failed to create connector: {e}"),
        })?;
        Ok(Self { connector })
    }

    /// Map a (base, quote) pair to a Yahoo ticker, e.g. ("BTC", "USDT") → "BTC-USD".
    pub fn ticker(base: &str, quote: &str) -> String {
        let base = base.trim().to_uppercase();
        let quote = quote.trim().to_uppercase();
        let fiat = if USD_PEGGED.contains(&quote.as_str()) {
            "USD".to_string()
        } else {
            quote
        };
        format!("{base}-{fiat}")
    }
}

#[async_trait]
impl PriceProvider for YahooFinanceProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, base: &str, quote: &str) -> Result<f64, CoreError> {
        let ticker = Self::ticker(base, quote);
        tracing::debug!(%ticker, "requesting Yahoo Finance quote");

        let resp = self
            .connector
            .get_latest_quotes(&ticker, "1d")
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to fetch latest quote for {ticker}: {e}"),
            })?;

        let quote = resp.last_quote().map_err(|e| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No quote data for {ticker}: {e}"),
        })?;

        Ok(quote.close)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stablecoin_quotes_map_to_usd() {
        assert_eq!(YahooFinanceProvider::ticker("btc", "USDT"), "BTC-USD");
        assert_eq!(YahooFinanceProvider::ticker("ETH", "usdc"), "ETH-USD");
    }

    #[test]
    fn fiat_quotes_pass_through() {
        assert_eq!(YahooFinanceProvider::ticker("SOL", "EUR"), "SOL-EUR");
    }
}
