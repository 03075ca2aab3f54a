mod app;
mod config;
mod ui;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use crypto_portfolio_core::PortfolioTracker;
use ratatui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};
use std::{
    fs::OpenOptions,
    io,
    path::Path,
    sync::Mutex,
    time::{Duration, Instant},
};
use tracing_subscriber::EnvFilter;

use app::{Action, App, LotInput, StatusKind};
use config::Cli;

/// Upper bound on how long the loop blocks waiting for a key.
const INPUT_POLL: Duration = Duration::from_millis(250);

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_file)?;

    let settings = cli.resolve_settings()?;
    tracing::info!(?settings, "starting");
    let tracker = PortfolioTracker::open(settings).context("opening portfolio")?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, tracker).await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &res {
        tracing::error!(error = ?err, "exited with error");
    }
    res
}

fn init_logging(path: &Path) -> Result<()> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening log file {}", path.display()))?;
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

async fn run_app<B: Backend>(
    terminal: &mut Terminal<B>,
    mut tracker: PortfolioTracker,
) -> Result<()> {
    let mut app = App::new();
    let interval = Duration::from_secs(tracker.settings().refresh_interval_secs);
    let mut last_refresh: Option<Instant> = None;

    loop {
        app.sync_selection(tracker.lots().len());
        let summary = tracker.summary();
        terminal.draw(|f| ui::draw(f, &mut app, tracker.lots(), &summary, interval.as_secs()))?;

        let due = last_refresh.map_or(true, |t| t.elapsed() >= interval);
        if due {
            refresh(&mut app, &mut tracker).await;
            last_refresh = Some(Instant::now());
            continue;
        }

        let until_due =
            last_refresh.map_or(Duration::ZERO, |t| interval.saturating_sub(t.elapsed()));
        if !event::poll(until_due.min(INPUT_POLL))? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }

        let today = Local::now().date_naive();
        match app.handle_key(key, tracker.lots().len(), today) {
            Action::None => {}
            Action::Quit => break,
            Action::Refresh => {
                app.set_status(StatusKind::Info, "Refreshing prices...");
                terminal.draw(|f| {
                    ui::draw(f, &mut app, tracker.lots(), &summary, interval.as_secs())
                })?;
                refresh(&mut app, &mut tracker).await;
                last_refresh = Some(Instant::now());
            }
            Action::Submit(input) => add_lot(&mut app, &mut tracker, input).await,
            Action::Delete(index) => match tracker.remove_lot(index) {
                Ok(lot) => app.set_status(StatusKind::Success, format!("Removed {}", lot.symbol)),
                Err(e) => app.set_status(StatusKind::Error, e.to_string()),
            },
        }

        if app.should_quit {
            break;
        }
    }

    if tracker.is_dirty() {
        tracker.save().context("saving portfolio on exit")?;
    }
    Ok(())
}

async fn refresh(app: &mut App, tracker: &mut PortfolioTracker) {
    match tracker.refresh_prices().await {
        Ok(report) => {
            app.last_refresh = Some(Local::now());
            if report.is_complete() {
                if matches!(app.status.as_ref().map(|s| s.kind), Some(StatusKind::Info)) {
                    app.status = None;
                }
            } else {
                app.set_status(
                    StatusKind::Error,
                    format!("Unable to fetch live price for {}", report.failed.join(", ")),
                );
            }
        }
        Err(e) => {
            tracing::error!(error = %e, "refresh failed");
            app.set_status(StatusKind::Error, e.to_string());
        }
    }
}

async fn add_lot(app: &mut App, tracker: &mut PortfolioTracker, input: LotInput) {
    let result = tracker
        .add_lot(input.date, &input.symbol, input.entry_price, input.quantity)
        .await;
    match result {
        Ok(_) => {
            app.set_status(StatusKind::Success, format!("{} added successfully!", input.symbol));
            let last = tracker.lots().len().saturating_sub(1);
            app.table_state.select(Some(last));
        }
        Err(crypto_portfolio_core::errors::CoreError::PriceNotAvailable { symbol, .. }) => {
            app.set_status(
                StatusKind::Error,
                format!("Unable to fetch live price for {symbol}"),
            );
        }
        Err(e) => app.set_status(StatusKind::Error, e.to_string()),
    }
}
