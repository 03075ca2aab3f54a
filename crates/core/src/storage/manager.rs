use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::path::Path;

use crate::errors::CoreError;
use crate::models::portfolio::Portfolio;

/// High-level storage operations: save/load the lot list as JSON.
pub struct StorageManager;

impl StorageManager {
    /// Serialize a portfolio to pretty-printed JSON (4-space indent).
    pub fn save_to_string(portfolio: &Portfolio) -> Result<String, CoreError> {
        let mut buf = Vec::new();
        let formatter = PrettyFormatter::with_indent(b"    ");
        let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
        portfolio
            .serialize(&mut ser)
            .map_err(|e| CoreError::Serialization(format!("Failed to serialize portfolio: {e}")))?;
        String::from_utf8(buf).map_err(|e| {
            CoreError::Serialization(format!("Serialized portfolio is not UTF-8: {e}"))
        })
    }

    /// Parse a portfolio from JSON. Derived metrics are recomputed so a
    /// hand-edited file cannot show stale profit figures.
    pub fn load_from_str(json: &str) -> Result<Portfolio, CoreError> {
        if json.trim().is_empty() {
            return Ok(Portfolio::new());
        }
        let mut portfolio: Portfolio = serde_json::from_str(json)
            .map_err(|e| CoreError::Deserialization(format!("Failed to parse portfolio: {e}")))?;
        for lot in &mut portfolio.lots {
            lot.symbol = crate::models::lot::normalize_symbol(&lot.symbol);
            lot.recompute();
        }
        Ok(portfolio)
    }

    /// Save the portfolio to `path`, creating parent directories as needed.
    pub fn save_to_file(portfolio: &Portfolio, path: impl AsRef<Path>) -> Result<(), CoreError> {
        let path = path.as_ref();
        let json = Self::save_to_string(portfolio)?;
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }
        std::fs::write(path, json)?;
        tracing::debug!(path = %path.display(), lots = portfolio.len(), "portfolio saved");
        Ok(())
    }

    /// Load the portfolio from `path`. A missing file is an empty portfolio.
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Portfolio, CoreError> {
        let path = path.as_ref();
        if !path.exists() {
            tracing::info!(path = %path.display(), "no portfolio file yet, starting empty");
            return Ok(Portfolio::new());
        }
        let json = std::fs::read_to_string(path)?;
        let portfolio = Self::load_from_str(&json)?;
        tracing::info!(path = %path.display(), lots = portfolio.len(), "portfolio loaded");
        Ok(portfolio)
    }
}
