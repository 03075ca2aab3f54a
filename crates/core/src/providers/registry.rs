use crate::models::settings::Settings;

use super::tradingview::TradingViewProvider;
use super::yahoo_finance::YahooFinanceProvider;
use super::traits::PriceProvider;

/// Ordered list of quote providers.
///
/// The first provider is the primary feed; the rest are tried in
/// registration order when it fails.
pub struct PriceProviderRegistry {
    providers: Vec<Box<dyn PriceProvider>>,
}

impl PriceProviderRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self {
            providers: Vec::new(),
        }
    }

    /// Create a registry with all default providers pre-configured.
    pub fn new_with_defaults(settings: &Settings) -> Self {
        let mut registry = Self::new();

        // TradingView scanner — primary, exchange-specific spot price
        registry.register(Box::new(TradingViewProvider::new(
            settings.exchange.clone(),
            settings.screener.clone(),
        )));

        // Yahoo Finance — fallback, fiat-quoted pairs
        match YahooFinanceProvider::new() {
            Ok(yahoo) => registry.register(Box::new(yahoo)),
            Err(e) => tracing::warn!(error = %e, "Yahoo Finance fallback unavailable"),
        }

        registry
    }

    /// Register a new price provider.
    pub fn register(&mut self, provider: Box<dyn PriceProvider>) {
        self.providers.push(provider);
    }

    /// All providers, ordered by registration priority.
    pub fn providers(&self) -> Vec<&dyn PriceProvider> {
        self.providers.iter().map(|p| p.as_ref()).collect()
    }

    pub fn provider_names(&self) -> Vec<String> {
        self.providers.iter().map(|p| p.name().to_string()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

impl Default for PriceProviderRegistry {
    fn default() -> Self {
        Self::new()
    }
}
