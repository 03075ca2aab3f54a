use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::errors::CoreError;

/// User-configurable settings, read from an optional TOML file.
///
/// Every field may be omitted; missing fields fall back to the defaults
/// below.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where the lot list is persisted (JSON).
    pub portfolio_file: PathBuf,

    /// Seconds between automatic price refreshes.
    pub refresh_interval_secs: u64,

    /// Exchange prefix for TradingView tickers (e.g., "BINANCE").
    pub exchange: String,

    /// TradingView screener (e.g., "crypto").
    pub screener: String,

    /// Asset every coin is quoted against (e.g., "USDT").
    pub quote_asset: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            portfolio_file: PathBuf::from("portfolio.json"),
            refresh_interval_secs: 10,
            exchange: "BINANCE".to_string(),
            screener: "crypto".to_string(),
            quote_asset: "USDT".to_string(),
        }
    }
}

impl Settings {
    /// Parse settings from TOML text and validate them.
    pub fn from_toml_str(text: &str) -> Result<Self, CoreError> {
        let settings: Settings = toml::from_str(text)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Read settings from a TOML file.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            CoreError::Config(format!("Failed to read {}: {e}", path.display()))
        })?;
        let settings = Self::from_toml_str(&text)?;
        tracing::info!(path = %path.display(), "loaded settings");
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), CoreError> {
        if self.refresh_interval_secs == 0 {
            return Err(CoreError::Config(
                "refresh_interval_secs must be at least 1".into(),
            ));
        }
        for (field, value) in [
            ("exchange", &self.exchange),
            ("screener", &self.screener),
            ("quote_asset", &self.quote_asset),
        ] {
            if value.trim().is_empty() {
                return Err(CoreError::Config(format!("{field} must not be empty")));
            }
        }
        if self.portfolio_file.as_os_str().is_empty() {
            return Err(CoreError::Config("portfolio_file must not be empty".into()));
        }
        Ok(())
    }
}
