use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

use crate::errors::CoreError;
use super::traits::PriceProvider;

const BASE_URL: &str = "https://scanner.tradingview.com";
const PROVIDER: &str = "TradingView";

/// TradingView scanner provider for crypto spot prices.
///
/// - **Free**: No API key required.
/// - **Endpoint**: `POST /{screener}/scan` with a ticker list and the `close` column.
/// - **Tickers**: `{EXCHANGE}:{BASE}{QUOTE}`, e.g. `BINANCE:BTCUSDT`.
///
/// The `close` column of the daily candle is the last traded price while the
/// candle is still open, which is what the tracker shows as "current price".
pub struct TradingViewProvider {
    client: Client,
    base_url: String,
    exchange: String,
    screener: String,
}

impl TradingViewProvider {
    pub fn new(exchange: impl Into<String>, screener: impl Into<String>) -> Self {
        Self::with_base_url(BASE_URL, exchange, screener)
    }

    /// Point the provider at a different scanner host.
    pub fn with_base_url(
        base_url: impl Into<String>,
        exchange: impl Into<String>,
        screener: impl Into<String>,
    ) -> Self {
        let base_url: String = base_url.into();
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .unwrap_or_else(|_| Client::new());
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            exchange: exchange.into(),
            screener: screener.into(),
        }
    }

    /// Build the scanner ticker, e.g. ("btc", "usdt") → "BINANCE:BTCUSDT".
    pub fn ticker(&self, base: &str, quote: &str) -> String {
        format!(
            "{}:{}{}",
            self.exchange.trim().to_uppercase(),
            base.trim().to_uppercase(),
            quote.trim().to_uppercase()
        )
    }

    pub fn scan_url(&self) -> String {
        format!("{}/{}/scan", self.base_url, self.screener.trim().to_lowercase())
    }
}

// ── Scanner API response types ──────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct ScanResponse {
    #[serde(default)]
    pub data: Vec<ScanRow>,
}

#[derive(Debug, Deserialize)]
pub struct ScanRow {
    /// Ticker echoed back by the scanner
    pub s: String,
    /// Requested column values, in request order (`null` when unknown)
    pub d: Vec<Option<f64>>,
}

/// Pick the `close` value for `ticker` out of a scanner response.
pub fn extract_close(resp: &ScanResponse, ticker: &str) -> Result<f64, CoreError> {
    let row = resp
        .data
        .iter()
        .find(|row| row.s.eq_ignore_ascii_case(ticker))
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No scanner row for {ticker}"),
        })?;

    row.d
        .first()
        .copied()
        .flatten()
        .ok_or_else(|| CoreError::Api {
            provider: PROVIDER.into(),
            message: format!("No close price for {ticker}"),
        })
}

#[async_trait]
impl PriceProvider for TradingViewProvider {
    fn name(&self) -> &str {
        PROVIDER
    }

    async fn get_current_price(&self, base: &str, quote: &str) -> Result<f64, CoreError> {
        let ticker = self.ticker(base, quote);
        let body = json!({
            "symbols": { "tickers": [ticker], "query": { "types": [] } },
            "columns": ["close"],
        });

        tracing::debug!(%ticker, "requesting TradingView quote");

        let resp: ScanResponse = self
            .client
            .post(self.scan_url())
            .json(&body)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await
            .map_err(|e| CoreError::Api {
                provider: PROVIDER.into(),
                message: format!("Failed to parse scan response for {ticker}: {e}"),
            })?;

        extract_close(&resp, &ticker)
    }
}
