use anyhow::{Context, Result};
use clap::Parser;
use crypto_portfolio_core::models::settings::Settings;
use std::path::PathBuf;

/// Track manually entered crypto purchases against live prices.
#[derive(Debug, Parser)]
#[command(name = "crypto-portfolio", version, about)]
pub struct Cli {
    /// TOML settings file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Portfolio JSON file (overrides the config file)
    #[arg(short, long)]
    pub portfolio: Option<PathBuf>,

    /// Seconds between price refreshes
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Exchange used for quotes, e.g. BINANCE
    #[arg(long)]
    pub exchange: Option<String>,

    /// Quote asset, e.g. USDT
    #[arg(long)]
    pub quote: Option<String>,

    /// Where log output goes; the terminal belongs to the UI
    #[arg(long, default_value = "crypto-portfolio.log")]
    pub log_file: PathBuf,
}

impl Cli {
    /// Defaults, then the config file, then command-line flags.
    pub fn resolve_settings(&self) -> Result<Settings> {
        let mut settings = match &self.config {
            Some(path) => Settings::load_from_file(path)
                .with_context(|| format!("loading settings from {}", path.display()))?,
            None => Settings::default(),
        };

        if let Some(path) = &self.portfolio {
            settings.portfolio_file = path.clone();
        }
        if let Some(secs) = self.interval {
            settings.refresh_interval_secs = secs;
        }
        if let Some(exchange) = &self.exchange {
            settings.exchange = exchange.clone();
        }
        if let Some(quote) = &self.quote {
            settings.quote_asset = quote.clone();
        }

        settings.validate().context("invalid settings")?;
        Ok(settings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_without_flags() {
        let cli = Cli::parse_from(["crypto-portfolio"]);
        let settings = cli.resolve_settings().unwrap();
        assert_eq!(settings, Settings::default());
        assert_eq!(cli.log_file, PathBuf::from("crypto-portfolio.log"));
    }

    #[test]
    fn flags_override_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "refresh_interval_secs = 30\nexchange = \"KRAKEN\"").unwrap();
        let path = file.path().to_str().unwrap().to_string();

        let cli = Cli::parse_from(["crypto-portfolio", "--config", &path, "--interval", "5"]);
        let settings = cli.resolve_settings().unwrap();
        assert_eq!(settings.refresh_interval_secs, 5);
        assert_eq!(settings.exchange, "KRAKEN");
        assert_eq!(settings.quote_asset, "USDT");
    }

    #[test]
    fn zero_interval_is_rejected() {
        let cli = Cli::parse_from(["crypto-portfolio", "-i", "0"]);
        assert!(cli.resolve_settings().is_err());
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["crypto-portfolio", "--config", "/nonexistent/settings.toml"]);
        assert!(cli.resolve_settings().is_err());
    }
}
