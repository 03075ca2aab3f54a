use std::collections::HashMap;

use crate::errors::CoreError;
use crate::models::lot::{distinct_symbols, Lot};
use crate::providers::registry::PriceProviderRegistry;

/// Outcome of one refresh pass over the lot list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RefreshReport {
    /// Number of lots that received a fresh price
    pub updated: usize,

    /// Symbols for which no provider returned a usable price
    pub failed: Vec<String>,
}

impl RefreshReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_empty()
    }
}

/// Fetches live quotes from the registered providers.
///
/// There is no cache and no retry: each call asks the providers in order and
/// takes the first usable price. A symbol nobody can price is reported and
/// left alone.
pub struct PriceService {
    registry: PriceProviderRegistry,
}

impl PriceService {
    pub fn new(registry: PriceProviderRegistry) -> Self {
        Self { registry }
    }

    /// Names of the configured providers, in fallback order.
    pub fn provider_names(&self) -> Vec<String> {
        self.registry.provider_names()
    }

    /// Fetch the latest price of `symbol` in `quote`, with provider fallback.
    ///
    /// Only finite, strictly positive prices are accepted; a zero quote is
    /// treated as "no price".
    pub async fn fetch_price(&self, symbol: &str, quote: &str) -> Result<f64, CoreError> {
        let providers = self.registry.providers();
        if providers.is_empty() {
            return Err(CoreError::NoProvider);
        }

        let mut last_error = None;
        for provider in &providers {
            match provider.get_current_price(symbol, quote).await {
                Ok(price) if price.is_finite() && price > 0.0 => {
                    tracing::debug!(
                        provider = provider.name(),
                        symbol,
                        quote,
                        price,
                        "quote received"
                    );
                    return Ok(price);
                }
                Ok(price) => {
                    last_error = Some(CoreError::Api {
                        provider: provider.name().to_string(),
                        message: format!(
                            "Invalid price returned for {symbol}: {price} (must be finite and positive)"
                        ),
                    });
                }
                Err(e) => {
                    tracing::debug!(
                        provider = provider.name(),
                        symbol,
                        error = %e,
                        "provider failed"
                    );
                    last_error = Some(e);
                }
            }
        }

        Err(last_error.unwrap_or(CoreError::NoProvider))
    }

    /// Refresh the current price of every lot.
    ///
    /// Each distinct symbol is fetched once. Lots whose symbol could not be
    /// priced keep their previous price and metrics.
    pub async fn refresh_lots(&self, lots: &mut [Lot], quote: &str) -> RefreshReport {
        let symbols = distinct_symbols(lots);
        let mut prices: HashMap<String, f64> = HashMap::new();
        let mut report = RefreshReport::default();

        for symbol in symbols {
            match self.fetch_price(&symbol, quote).await {
                Ok(price) => {
                    prices.insert(symbol, price);
                }
                Err(e) => {
                    tracing::warn!(%symbol, quote, error = %e, "unable to refresh price");
                    report.failed.push(symbol);
                }
            }
        }

        for lot in lots.iter_mut() {
            if let Some(&price) = prices.get(&lot.symbol) {
                lot.apply_price(price);
                report.updated += 1;
            }
        }

        report
    }
}
