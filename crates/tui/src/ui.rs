use crypto_portfolio_core::models::analytics::PortfolioSummary;
use crypto_portfolio_core::models::lot::Lot;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table},
    Frame,
};

use crate::app::{App, Field, LotForm, Mode, StatusKind};

const HEADERS: [&str; 7] = [
    "Date",
    "Coin",
    "Entry Price ($)",
    "Qty",
    "Current Price ($)",
    "Change (%)",
    "Profit ($)",
];

pub fn draw(
    f: &mut Frame,
    app: &mut App,
    lots: &[Lot],
    summary: &PortfolioSummary,
    interval_secs: u64,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(4),
        ])
        .split(f.area());

    render_header(f, chunks[0], app, interval_secs);
    render_lots(f, chunks[1], app, lots);
    render_summary(f, chunks[2], summary);
    render_footer(f, chunks[3], app);

    match &app.mode {
        Mode::Adding(form) => render_form(f, form),
        Mode::ConfirmDelete(index) => {
            if let Some(lot) = lots.get(*index) {
                render_confirm(f, lot);
            }
        }
        Mode::Normal => {}
    }
}

fn pl_style(value: f64) -> Style {
    if value >= 0.0 {
        Style::default().fg(Color::Green)
    } else {
        Style::default().fg(Color::Red)
    }
}

fn render_header(f: &mut Frame, area: Rect, app: &App, interval_secs: u64) {
    let refreshed = app
        .last_refresh
        .map(|t| t.format("%H:%M:%S").to_string())
        .unwrap_or_else(|| "never".to_string());

    let line = Line::from(vec![
        Span::styled(
            "Crypto Portfolio Tracker",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!("   last refresh: {refreshed}   every {interval_secs}s")),
    ]);
    let header = Paragraph::new(line).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn render_lots(f: &mut Frame, area: Rect, app: &mut App, lots: &[Lot]) {
    if lots.is_empty() {
        let empty = Paragraph::new("No lots yet. Press 'a' to add a purchase.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Gray))
            .block(Block::default().borders(Borders::ALL).title("Your Portfolio"));
        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(HEADERS.iter().map(|h| Cell::from(*h)))
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = lots
        .iter()
        .map(|lot| {
            Row::new(vec![
                Cell::from(lot.date.format("%Y-%m-%d").to_string()),
                Cell::from(lot.symbol.clone()),
                Cell::from(format!("{:.2}", lot.entry_price)),
                Cell::from(format!("{:.8}", lot.quantity)),
                Cell::from(format!("{:.4}", lot.current_price)),
                Cell::from(format!("{:+.2}", lot.change_pct)).style(pl_style(lot.change_pct)),
                Cell::from(format!("{:+.2}", lot.profit)).style(pl_style(lot.profit)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Length(12),
        Constraint::Length(8),
        Constraint::Length(16),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(12),
        Constraint::Min(12),
    ];

    let table = Table::new(rows, widths)
        .header(header)
        .block(Block::default().borders(Borders::ALL).title("Your Portfolio"))
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    f.render_stateful_widget(table, area, &mut app.table_state);
}

fn render_summary(f: &mut Frame, area: Rect, summary: &PortfolioSummary) {
    let line = Line::from(vec![
        Span::raw(format!("Lots: {}   ", summary.lot_count)),
        Span::raw(format!("Invested: ${:.2}   ", summary.total_invested)),
        Span::raw(format!("Value: ${:.2}   ", summary.total_value)),
        Span::styled(
            format!(
                "P/L: {:+.2} ({:+.2}%)",
                summary.total_profit, summary.total_change_pct
            ),
            pl_style(summary.total_profit),
        ),
    ]);
    let widget = Paragraph::new(line).block(Block::default().borders(Borders::ALL).title("Totals"));
    f.render_widget(widget, area);
}

fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let mut lines = vec![Line::from(Span::styled(
        "a: add | d/Del: delete | ↑↓ j/k: select | r: refresh | q/Esc: quit",
        Style::default().fg(Color::Gray),
    ))];
    if let Some(status) = &app.status {
        let color = match status.kind {
            StatusKind::Info => Color::Gray,
            StatusKind::Success => Color::Green,
            StatusKind::Error => Color::Red,
        };
        lines.push(Line::from(Span::styled(
            status.text.clone(),
            Style::default().fg(color),
        )));
    }
    let footer = Paragraph::new(lines).block(Block::default().borders(Borders::ALL).title("Help"));
    f.render_widget(footer, area);
}

fn render_form(f: &mut Frame, form: &LotForm) {
    let area = centered_rect(60, 14, f.area());
    f.render_widget(Clear, area);

    let mut lines = Vec::new();
    for &field in Field::all() {
        let focused = field == form.focus;
        let label_style = if focused {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::White)
        };
        let cursor = if focused { "_" } else { "" };
        lines.push(Line::from(Span::styled(field.label(), label_style)));
        lines.push(Line::from(format!("  {}{cursor}", form.value(field))));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Tab: next field | Enter: add | Esc: cancel",
        Style::default().fg(Color::Gray),
    )));

    let popup = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Add to Portfolio")
            .style(Style::default().fg(Color::White)),
    );
    f.render_widget(popup, area);
}

fn render_confirm(f: &mut Frame, lot: &Lot) {
    let area = centered_rect(50, 5, f.area());
    f.render_widget(Clear, area);
    let text = format!(
        "Remove {} bought {} ({} @ {:.2})?  y / n",
        lot.symbol, lot.date, lot.quantity, lot.entry_price
    );
    let popup = Paragraph::new(text)
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Red))
        .block(Block::default().borders(Borders::ALL).title("Confirm"));
    f.render_widget(popup, area);
}

/// A rectangle `percent_x` wide and `height` rows tall, centred in `r`.
fn centered_rect(percent_x: u16, height: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(0),
            Constraint::Length(height),
            Constraint::Min(0),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
