use chrono::Utc;
use uuid::Uuid;

use crate::errors::CoreError;
use crate::models::lot::Lot;
use crate::models::portfolio::Portfolio;

/// Manages the lot list: validated insertion and per-row deletion.
///
/// Pure business logic — no I/O, no API calls. Easy to test.
pub struct PortfolioService;

impl PortfolioService {
    pub fn new() -> Self {
        Self
    }

    /// Append a lot to the portfolio after validating it.
    pub fn add_lot(&self, portfolio: &mut Portfolio, lot: Lot) -> Result<(), CoreError> {
        self.validate_lot(&lot)?;
        portfolio.lots.push(lot);
        Ok(())
    }

    /// Remove the lot shown at row `index`.
    pub fn remove_lot(&self, portfolio: &mut Portfolio, index: usize) -> Result<Lot, CoreError> {
        if index >= portfolio.lots.len() {
            return Err(CoreError::LotNotFound(format!(
                "row {index} (portfolio has {} lots)",
                portfolio.lots.len()
            )));
        }
        Ok(portfolio.lots.remove(index))
    }

    /// Remove a lot by its UUID.
    pub fn remove_lot_by_id(
        &self,
        portfolio: &mut Portfolio,
        lot_id: Uuid,
    ) -> Result<Lot, CoreError> {
        let idx = portfolio
            .lots
            .iter()
            .position(|l| l.id == lot_id)
            .ok_or_else(|| CoreError::LotNotFound(lot_id.to_string()))?;
        Ok(portfolio.lots.remove(idx))
    }

    /// Validate user input for a new lot before any price is fetched.
    ///
    /// Rules:
    /// - Symbol must be non-empty after trimming
    /// - Entry price and quantity must be positive and finite
    /// - Date may be at most one day ahead (timezone tolerance)
    pub fn validate_input(
        &self,
        date: chrono::NaiveDate,
        symbol: &str,
        entry_price: f64,
        quantity: f64,
    ) -> Result<(), CoreError> {
        if symbol.trim().is_empty() {
            return Err(CoreError::ValidationError("Coin symbol must not be empty".into()));
        }
        if symbol.trim().chars().any(|c| !c.is_ascii_alphanumeric()) {
            return Err(CoreError::ValidationError(format!(
                "Coin symbol '{}' must be alphanumeric",
                symbol.trim()
            )));
        }
        if !entry_price.is_finite() || entry_price <= 0.0 {
            return Err(CoreError::ValidationError(
                "Entry price must be positive".into(),
            ));
        }
        if !quantity.is_finite() || quantity <= 0.0 {
            return Err(CoreError::ValidationError(
                "Quantity must be positive".into(),
            ));
        }

        let today = Utc::now().date_naive();
        if let Some(tomorrow) = today.succ_opt() {
            if date > tomorrow {
                return Err(CoreError::ValidationError(format!(
                    "Purchase date {date} is in the future"
                )));
            }
        }
        Ok(())
    }

    fn validate_lot(&self, lot: &Lot) -> Result<(), CoreError> {
        self.validate_input(lot.date, &lot.symbol, lot.entry_price, lot.quantity)
    }
}

impl Default for PortfolioService {
    fn default() -> Self {
        Self::new()
    }
}
