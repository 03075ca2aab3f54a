use chrono::{DateTime, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::widgets::TableState;

/// A purchase the user typed into the add form, parsed but not yet priced.
#[derive(Debug, Clone, PartialEq)]
pub struct LotInput {
    pub date: NaiveDate,
    pub symbol: String,
    pub entry_price: f64,
    pub quantity: f64,
}

/// What the event loop should do after a key press.
#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    None,
    Quit,
    Refresh,
    Submit(LotInput),
    Delete(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Date,
    Coin,
    EntryPrice,
    Quantity,
}

impl Field {
    pub fn all() -> &'static [Field] {
        &[Field::Date, Field::Coin, Field::EntryPrice, Field::Quantity]
    }

    pub fn label(self) -> &'static str {
        match self {
            Field::Date => "Date (YYYY-MM-DD)",
            Field::Coin => "Coin (e.g. BTC, ETH)",
            Field::EntryPrice => "Entry Price ($)",
            Field::Quantity => "Quantity",
        }
    }

    fn next(self) -> Field {
        let all = Field::all();
        let idx = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(idx + 1) % all.len()]
    }

    fn previous(self) -> Field {
        let all = Field::all();
        let idx = all.iter().position(|&f| f == self).unwrap_or(0);
        all[(idx + all.len() - 1) % all.len()]
    }
}

/// Text buffers behind the add form.
#[derive(Debug, Clone, PartialEq)]
pub struct LotForm {
    pub date: String,
    pub coin: String,
    pub entry_price: String,
    pub quantity: String,
    pub focus: Field,
}

impl LotForm {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            date: today.format("%Y-%m-%d").to_string(),
            coin: String::new(),
            entry_price: String::new(),
            quantity: String::new(),
            focus: Field::Coin,
        }
    }

    pub fn value(&self, field: Field) -> &str {
        match field {
            Field::Date => &self.date,
            Field::Coin => &self.coin,
            Field::EntryPrice => &self.entry_price,
            Field::Quantity => &self.quantity,
        }
    }

    fn focused_mut(&mut self) -> &mut String {
        match self.focus {
            Field::Date => &mut self.date,
            Field::Coin => &mut self.coin,
            Field::EntryPrice => &mut self.entry_price,
            Field::Quantity => &mut self.quantity,
        }
    }

    fn accepts(&self, c: char) -> bool {
        match self.focus {
            Field::Date => c.is_ascii_digit() || c == '-',
            Field::Coin => c.is_ascii_alphanumeric(),
            Field::EntryPrice | Field::Quantity => c.is_ascii_digit() || c == '.',
        }
    }

    /// Parse the buffers into a lot. Any empty, malformed or non-positive
    /// value rejects the whole form.
    pub fn parse(&self) -> Result<LotInput, String> {
        const INVALID: &str = "Please enter valid values!";

        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date '{}', expected YYYY-MM-DD", self.date.trim()))?;
        let symbol = self.coin.trim().to_uppercase();
        if symbol.is_empty() {
            return Err(INVALID.into());
        }
        let entry_price: f64 = self.entry_price.trim().parse().map_err(|_| INVALID.to_string())?;
        let quantity: f64 = self.quantity.trim().parse().map_err(|_| INVALID.to_string())?;
        let positive = |v: f64| v.is_finite() && v > 0.0;
        if !(positive(entry_price) && positive(quantity)) {
            return Err(INVALID.into());
        }

        Ok(LotInput {
            date,
            symbol,
            entry_price,
            quantity,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Mode {
    Normal,
    Adding(LotForm),
    ConfirmDelete(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusKind {
    Info,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Status {
    pub kind: StatusKind,
    pub text: String,
}

/// UI state. Portfolio data itself lives in the tracker.
pub struct App {
    pub mode: Mode,
    pub table_state: TableState,
    pub status: Option<Status>,
    pub last_refresh: Option<DateTime<Local>>,
    pub should_quit: bool,
}

impl App {
    pub fn new() -> Self {
        Self {
            mode: Mode::Normal,
            table_state: TableState::default(),
            status: None,
            last_refresh: None,
            should_quit: false,
        }
    }

    pub fn set_status(&mut self, kind: StatusKind, text: impl Into<String>) {
        self.status = Some(Status {
            kind,
            text: text.into(),
        });
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    /// Keep the selection inside a table of `len` rows.
    pub fn sync_selection(&mut self, len: usize) {
        match (self.table_state.selected(), len) {
            (_, 0) => self.table_state.select(None),
            (None, _) => self.table_state.select(Some(0)),
            (Some(i), n) if i >= n => self.table_state.select(Some(n - 1)),
            _ => {}
        }
    }

    fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let next = self.selected().map_or(0, |i| (i + 1).min(len - 1));
        self.table_state.select(Some(next));
    }

    fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let prev = self.selected().map_or(0, |i| i.saturating_sub(1));
        self.table_state.select(Some(prev));
    }

    /// Translate a key press into a state change and an action for the loop.
    pub fn handle_key(&mut self, key: KeyEvent, rows: usize, today: NaiveDate) -> Action {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Action::Quit;
        }

        match std::mem::replace(&mut self.mode, Mode::Normal) {
            Mode::Normal => self.handle_normal(key, rows, today),
            Mode::Adding(form) => self.handle_form(key, form),
            Mode::ConfirmDelete(index) => match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => Action::Delete(index),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => Action::None,
                _ => {
                    self.mode = Mode::ConfirmDelete(index);
                    Action::None
                }
            },
        }
    }

    fn handle_normal(&mut self, key: KeyEvent, rows: usize, today: NaiveDate) -> Action {
        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => {
                self.should_quit = true;
                Action::Quit
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.select_next(rows);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.select_previous(rows);
                Action::None
            }
            KeyCode::Char('a') => {
                self.mode = Mode::Adding(LotForm::new(today));
                Action::None
            }
            KeyCode::Char('d') | KeyCode::Delete => {
                if let Some(index) = self.selected().filter(|&i| i < rows) {
                    self.mode = Mode::ConfirmDelete(index);
                }
                Action::None
            }
            KeyCode::Char('r') => Action::Refresh,
            _ => Action::None,
        }
    }

    fn handle_form(&mut self, key: KeyEvent, mut form: LotForm) -> Action {
        match key.code {
            KeyCode::Esc => return Action::None,
            KeyCode::Enter => match form.parse() {
                Ok(input) => return Action::Submit(input),
                Err(msg) => self.set_status(StatusKind::Error, msg),
            },
            KeyCode::Tab | KeyCode::Down => form.focus = form.focus.next(),
            KeyCode::BackTab | KeyCode::Up => form.focus = form.focus.previous(),
            KeyCode::Backspace => {
                form.focused_mut().pop();
            }
            KeyCode::Char(c) if form.accepts(c) => form.focused_mut().push(c),
            _ => {}
        }
        self.mode = Mode::Adding(form);
        Action::None
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn type_str(app: &mut App, text: &str) {
        for c in text.chars() {
            app.handle_key(key(KeyCode::Char(c)), 0, today());
        }
    }

    #[test]
    fn q_quits() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Char('q')), 0, today()), Action::Quit);
        assert!(app.should_quit);
    }

    #[test]
    fn ctrl_c_quits_from_form() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('a')), 0, today());
        let action = app.handle_key(
            KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL),
            0,
            today(),
        );
        assert_eq!(action, Action::Quit);
    }

    #[test]
    fn r_requests_refresh() {
        let mut app = App::new();
        assert_eq!(app.handle_key(key(KeyCode::Char('r')), 3, today()), Action::Refresh);
    }

    #[test]
    fn selection_moves_within_bounds() {
        let mut app = App::new();
        app.sync_selection(2);
        assert_eq!(app.selected(), Some(0));
        app.handle_key(key(KeyCode::Down), 2, today());
        app.handle_key(key(KeyCode::Down), 2, today());
        assert_eq!(app.selected(), Some(1));
        app.handle_key(key(KeyCode::Up), 2, today());
        app.handle_key(key(KeyCode::Up), 2, today());
        assert_eq!(app.selected(), Some(0));
    }

    #[test]
    fn sync_selection_clamps_after_delete() {
        let mut app = App::new();
        app.table_state.select(Some(4));
        app.sync_selection(3);
        assert_eq!(app.selected(), Some(2));
        app.sync_selection(0);
        assert_eq!(app.selected(), None);
    }

    #[test]
    fn delete_requires_confirmation() {
        let mut app = App::new();
        app.sync_selection(3);
        app.handle_key(key(KeyCode::Down), 3, today());
        assert_eq!(app.handle_key(key(KeyCode::Char('d')), 3, today()), Action::None);
        assert_eq!(app.mode, Mode::ConfirmDelete(1));
        assert_eq!(app.handle_key(key(KeyCode::Char('y')), 3, today()), Action::Delete(1));
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn delete_can_be_cancelled() {
        let mut app = App::new();
        app.sync_selection(1);
        app.handle_key(key(KeyCode::Delete), 1, today());
        assert_eq!(app.handle_key(key(KeyCode::Char('n')), 1, today()), Action::None);
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn delete_on_empty_table_does_nothing() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('d')), 0, today());
        assert_eq!(app.mode, Mode::Normal);
    }

    #[test]
    fn form_defaults_date_to_today_and_focuses_coin() {
        let form = LotForm::new(today());
        assert_eq!(form.date, "2025-03-01");
        assert_eq!(form.focus, Field::Coin);
    }

    #[test]
    fn form_submits_parsed_lot() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('a')), 0, today());
        type_str(&mut app, "eth");
        app.handle_key(key(KeyCode::Tab), 0, today());
        type_str(&mut app, "2500.50");
        app.handle_key(key(KeyCode::Tab), 0, today());
        type_str(&mut app, "1.5");

        let action = app.handle_key(key(KeyCode::Enter), 0, today());
        assert_eq!(
            action,
            Action::Submit(LotInput {
                date: today(),
                symbol: "ETH".into(),
                entry_price: 2500.5,
                quantity: 1.5,
            })
        );
    }

    #[test]
    fn form_rejects_letters_in_numeric_fields() {
        let mut form = LotForm::new(today());
        form.focus = Field::EntryPrice;
        assert!(!form.accepts('x'));
        assert!(form.accepts('7'));
        assert!(form.accepts('.'));
    }

    #[test]
    fn form_with_missing_values_stays_open_with_warning() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('a')), 0, today());
        type_str(&mut app, "BTC");
        let action = app.handle_key(key(KeyCode::Enter), 0, today());
        assert_eq!(action, Action::None);
        assert!(matches!(app.mode, Mode::Adding(_)));
        let status = app.status.clone().unwrap();
        assert_eq!(status.kind, StatusKind::Error);
        assert_eq!(status.text, "Please enter valid values!");
    }

    #[test]
    fn form_rejects_zero_quantity() {
        let form = LotForm {
            date: "2025-01-01".into(),
            coin: "btc".into(),
            entry_price: "100".into(),
            quantity: "0".into(),
            focus: Field::Coin,
        };
        assert!(form.parse().is_err());
    }

    #[test]
    fn form_rejects_bad_date() {
        let form = LotForm {
            date: "2025-13-01".into(),
            coin: "btc".into(),
            entry_price: "100".into(),
            quantity: "1".into(),
            focus: Field::Coin,
        };
        assert!(form.parse().unwrap_err().contains("Invalid date"));
    }

    #[test]
    fn esc_closes_form() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('a')), 0, today());
        app.handle_key(key(KeyCode::Esc), 0, today());
        assert_eq!(app.mode, Mode::Normal);
        assert!(!app.should_quit);
    }

    #[test]
    fn backspace_edits_focused_field() {
        let mut app = App::new();
        app.handle_key(key(KeyCode::Char('a')), 0, today());
        type_str(&mut app, "BTCX");
        app.handle_key(key(KeyCode::Backspace), 0, today());
        match &app.mode {
            Mode::Adding(form) => assert_eq!(form.coin, "BTC"),
            other => panic!("expected form, got {other:?}"),
        }
    }
}
