use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::dashboard::{Dashboard, Focus};

/// What the event loop should do after a key press.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    None,
    Analyze,
    Quit,
}

pub fn handle_key(dash: &mut Dashboard, key: KeyEvent) -> Action {
    if key.kind != KeyEventKind::Press {
        return Action::None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return if key.code == KeyCode::Char('c') { Action::Quit } else { Action::None };
    }

    match key.code {
        KeyCode::Esc => Action::Quit,
        KeyCode::Enter => Action::Analyze,
        KeyCode::Tab | KeyCode::BackTab => {
            dash.toggle_focus();
            Action::None
        }
        KeyCode::Up => {
            dash.increment_years();
            Action::None
        }
        KeyCode::Down => {
            dash.decrement_years();
            Action::None
        }
        code => {
            match dash.focus {
                Focus::Ticker => edit_ticker(dash, code),
                Focus::Years => edit_years(dash, code),
            }
            Action::None
        }
    }
}

fn edit_ticker(dash: &mut Dashboard, code: KeyCode) {
    match code {
        KeyCode::Backspace => dash.pop_ticker_char(),
        KeyCode::Char(c) if c.is_ascii_alphanumeric() || c == '.' || c == '-' => {
            dash.push_ticker_char(c)
        }
        _ => {}
    }
}

fn edit_years(dash: &mut Dashboard, code: KeyCode) {
    match code {
        KeyCode::Char('+') | KeyCode::Char('k') => dash.increment_years(),
        KeyCode::Char('-') | KeyCode::Char('j') => dash.decrement_years(),
        // A single digit picks that horizon; "0" means 10.
        KeyCode::Char(c) if c.is_ascii_digit() => {
            let years = c.to_digit(10).map_or(0, |d| if d == 0 { 10 } else { d });
            dash.set_years_forward(years);
        }
        _ => {}
    }
}
