pub mod errors;
pub mod models;
pub mod providers;
pub mod services;
pub mod storage;

use chrono::NaiveDate;
use models::{analytics::PortfolioSummary, lot::Lot, portfolio::Portfolio, settings::Settings};
use providers::registry::PriceProviderRegistry;
use services::{
    analytics_service::AnalyticsService,
    portfolio_service::PortfolioService,
    price_service::{PriceService, RefreshReport},
};
use std::path::{Path, PathBuf};
use storage::manager::StorageManager;
use uuid::Uuid;

use errors::CoreError;

/// Main entry point for the portfolio tracker core library.
/// Holds the lot list, the settings and all services needed to operate on it.
///
/// When a storage path is set, every mutation is written to disk right away.
#[must_use]
pub struct PortfolioTracker {
    portfolio: Portfolio,
    settings: Settings,
    portfolio_service: PortfolioService,
    price_service: PriceService,
    analytics_service: AnalyticsService,
    storage_path: Option<PathBuf>,
    /// Tracks whether any mutation has occurred since the last save/load.
    dirty: bool,
}

impl std::fmt::Debug for PortfolioTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PortfolioTracker")
            .field("lots", &self.portfolio.len())
            .field("settings", &self.settings)
            .field("providers", &self.price_service.provider_names())
            .field("storage_path", &self.storage_path)
            .field("dirty", &self.dirty)
            .finish()
    }
}

impl PortfolioTracker {
    /// Assemble a tracker from its parts.
    pub fn new(
        portfolio: Portfolio,
        settings: Settings,
        registry: PriceProviderRegistry,
        storage_path: Option<PathBuf>,
    ) -> Self {
        Self {
            portfolio,
            settings,
            portfolio_service: PortfolioService::new(),
            price_service: PriceService::new(registry),
            analytics_service: AnalyticsService::new(),
            storage_path,
            dirty: false,
        }
    }

    /// Load `settings.portfolio_file` (or start empty) with the default
    /// providers, autosaving back to the same file.
    pub fn open(settings: Settings) -> Result<Self, CoreError> {
        settings.validate()?;
        let portfolio = StorageManager::load_from_file(&settings.portfolio_file)?;
        let registry = PriceProviderRegistry::new_with_defaults(&settings);
        let path = settings.portfolio_file.clone();
        Ok(Self::new(portfolio, settings, registry, Some(path)))
    }

    /// Write the portfolio to the storage path, if one is set.
    /// Clears the unsaved-changes flag on success.
    pub fn save(&mut self) -> Result<(), CoreError> {
        if let Some(path) = &self.storage_path {
            StorageManager::save_to_file(&self.portfolio, path)?;
        }
        self.dirty = false;
        Ok(())
    }

    /// Save to an explicit path regardless of the configured one.
    pub fn save_to_file(&mut self, path: impl AsRef<Path>) -> Result<(), CoreError> {
        StorageManager::save_to_file(&self.portfolio, path)?;
        self.dirty = false;
        Ok(())
    }

    // ── Lot Management ──────────────────────────────────────────────

    /// Record a purchase.
    ///
    /// The input is validated first; then a live price is fetched. A lot is
    /// only added when a price is available, so every stored lot has real
    /// metrics from the start.
    pub async fn add_lot(
        &mut self,
        date: NaiveDate,
        symbol: &str,
        entry_price: f64,
        quantity: f64,
    ) -> Result<Uuid, CoreError> {
        self.portfolio_service
            .validate_input(date, symbol, entry_price, quantity)?;

        let symbol = models::lot::normalize_symbol(symbol);
        let quote = self.settings.quote_asset.clone();
        let price = self
            .price_service
            .fetch_price(&symbol, &quote)
            .await
            .map_err(|e| {
                tracing::warn!(%symbol, error = %e, "no live price, lot rejected");
                CoreError::PriceNotAvailable {
                    symbol: symbol.clone(),
                    quote: quote.clone(),
                }
            })?;

        let lot = Lot::new(date, symbol, entry_price, quantity, price);
        let id = lot.id;
        let was_dirty = self.dirty;
        self.portfolio_service.add_lot(&mut self.portfolio, lot)?;
        self.dirty = true;

        if let Err(e) = self.save() {
            self.portfolio.lots.pop();
            self.dirty = was_dirty;
            tracing::error!(%id, error = %e, "failed to persist new lot, rolled back");
            return Err(e);
        }
        tracing::info!(%id, "lot added");
        Ok(id)
    }

    /// Remove the lot at row `index` (insertion order).
    ///
    /// If the change cannot be written, the lot is put back at `index` and
    /// the error is returned.
    pub fn remove_lot(&mut self, index: usize) -> Result<Lot, CoreError> {
        let removed = self.portfolio_service.remove_lot(&mut self.portfolio, index)?;
        self.persist_removal(index, removed)
    }

    /// Remove a lot by its ID.
    pub fn remove_lot_by_id(&mut self, lot_id: Uuid) -> Result<Lot, CoreError> {
        let index = self.portfolio.lots.iter().position(|l| l.id == lot_id);
        let removed = self
            .portfolio_service
            .remove_lot_by_id(&mut self.portfolio, lot_id)?;
        let index = index.unwrap_or(self.portfolio.lots.len());
        self.persist_removal(index, removed)
    }

    fn persist_removal(&mut self, index: usize, removed: Lot) -> Result<Lot, CoreError> {
        let was_dirty = self.dirty;
        self.dirty = true;
        if let Err(e) = self.save() {
            tracing::error!(id = %removed.id, error = %e, "failed to persist removal, rolled back");
            self.portfolio.lots.insert(index, removed);
            self.dirty = was_dirty;
            return Err(e);
        }
        tracing::info!(id = %removed.id, symbol = %removed.symbol, "lot removed");
        Ok(removed)
    }

    /// Get a single lot by its ID.
    #[must_use]
    pub fn get_lot(&self, lot_id: Uuid) -> Option<&Lot> {
        self.portfolio.lots.iter().find(|l| l.id == lot_id)
    }

    /// All lots, in insertion order.
    #[must_use]
    pub fn lots(&self) -> &[Lot] {
        &self.portfolio.lots
    }

    // ── Prices ──────────────────────────────────────────────────────

    /// Re-fetch the current price of every lot and persist the result.
    ///
    /// Lots that could not be priced keep their previous values; the report
    /// lists their symbols.
    pub async fn refresh_prices(&mut self) -> Result<RefreshReport, CoreError> {
        if self.portfolio.is_empty() {
            return Ok(RefreshReport::default());
        }
        let quote = self.settings.quote_asset.clone();
        let report = self
            .price_service
            .refresh_lots(&mut self.portfolio.lots, &quote)
            .await;
        if report.updated > 0 {
            self.dirty = true;
            self.save()?;
        }
        tracing::debug!(updated = report.updated, failed = ?report.failed, "refresh pass done");
        Ok(report)
    }

    // ── Analytics ───────────────────────────────────────────────────

    #[must_use]
    pub fn summary(&self) -> PortfolioSummary {
        self.analytics_service.summarize(&self.portfolio)
    }

    // ── Accessors ───────────────────────────────────────────────────

    #[must_use]
    pub fn portfolio(&self) -> &Portfolio {
        &self.portfolio
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn storage_path(&self) -> Option<&Path> {
        self.storage_path.as_deref()
    }

    /// Whether there are mutations not yet written to disk.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }
}
