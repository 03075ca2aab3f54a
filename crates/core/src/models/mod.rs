pub mod analytics;
pub mod lot;
pub mod portfolio;
pub mod settings;
