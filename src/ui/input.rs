//! Keyboard input handling for the TUI.
//!
//! This module handles all keyboard events and translates them into
//! application state changes.

use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{App, AppState, Tab};
use crate::forms::FieldInput;
use crate::models::{BusinessUnitSortColumn, CompanySortColumn, MetricSortColumn};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> bool {
    match app.state {
        AppState::EditingForm => {
            handle_form_input(app, key);
            false
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            false
        }
        AppState::ConfirmingQuit => match key.code {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                app.state = AppState::Quitting;
                true
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                app.state = AppState::Normal;
                false
            }
            _ => false,
        },
        AppState::ConfirmingDelete { .. } => {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => app.confirm_delete(),
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
                _ => {}
            }
            false
        }
        AppState::Quitting => true,
        AppState::Normal => {
            handle_normal_input(app, key);
            false
        }
    }
}

fn handle_normal_input(app: &mut App, key: KeyEvent) {
    // Global keys
    match key.code {
        KeyCode::Char('q') => {
            app.state = AppState::ConfirmingQuit;
            return;
        }
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
            return;
        }
        KeyCode::Char(c @ '1'..='6') => {
            let index = c as usize - '1' as usize;
            app.current_tab = Tab::ALL[index];
            return;
        }
        KeyCode::Left | KeyCode::BackTab => {
            app.current_tab = app.current_tab.prev();
            return;
        }
        KeyCode::Right | KeyCode::Tab => {
            app.current_tab = app.current_tab.next();
            return;
        }
        KeyCode::Char('r') => {
            app.refresh_all();
            return;
        }
        _ => {}
    }

    if app.current_tab == Tab::Calendar {
        handle_calendar_input(app, key);
        return;
    }

    // List navigation and table actions
    match key.code {
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::PageUp | KeyCode::Char('[') => app.prev_page(),
        KeyCode::PageDown | KeyCode::Char(']') => app.next_page(),
        KeyCode::Char('+') => {
            if let Some(resource) = app.current_tab.resource() {
                app.open_form(resource);
            }
        }
        KeyCode::Char('x') | KeyCode::Delete => app.request_delete(),
        KeyCode::Char(c) => handle_sort_key(app, c),
        _ => {}
    }
}

/// Sort keys for the current table tab.
fn handle_sort_key(app: &mut App, c: char) {
    match app.current_tab {
        Tab::Companies => {
            let column = match c {
                'n' => CompanySortColumn::Name,
                's' => CompanySortColumn::Sector,
                'l' => CompanySortColumn::Location,
                'b' => CompanySortColumn::Start,
                'e' => CompanySortColumn::End,
                _ => return,
            };
            app.toggle_company_sort(column);
        }
        Tab::BusinessUnits => {
            let column = match c {
                'c' => BusinessUnitSortColumn::Company,
                'n' => BusinessUnitSortColumn::Name,
                't' => BusinessUnitSortColumn::Type,
                'l' => BusinessUnitSortColumn::Location,
                'a' => BusinessUnitSortColumn::Active,
                _ => return,
            };
            app.toggle_business_unit_sort(column);
        }
        Tab::Metrics => {
            let column = match c {
                'b' => MetricSortColumn::BusinessUnit,
                'n' => MetricSortColumn::Name,
                'c' => MetricSortColumn::Category,
                'v' => MetricSortColumn::Value,
                'u' => MetricSortColumn::Unit,
                'y' => MetricSortColumn::Year,
                'f' => MetricSortColumn::Verified,
                _ => return,
            };
            app.toggle_metric_sort(column);
        }
        Tab::Dashboard | Tab::Calendar | Tab::AuditLog => {}
    }
}

fn handle_calendar_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('h') => app.shift_calendar_days(-1),
        KeyCode::Char('l') => app.shift_calendar_days(1),
        KeyCode::Up | KeyCode::Char('k') => app.shift_calendar_days(-7),
        KeyCode::Down | KeyCode::Char('j') => app.shift_calendar_days(7),
        KeyCode::Char('[') | KeyCode::PageUp => app.shift_calendar_months(-1),
        KeyCode::Char(']') | KeyCode::PageDown => app.shift_calendar_months(1),
        KeyCode::Char('t') => app.calendar_today(),
        _ => {}
    }
}

fn handle_form_input(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Esc {
        app.close_form();
        return;
    }
    // Ignore edits while the payload is in flight
    if app.submitting {
        return;
    }

    let Some(active) = app.form.as_mut() else {
        app.state = AppState::Normal;
        return;
    };
    let form = active.form_mut();
    let focused_input = form.focused_field().map(|f| &f.input);
    let on_text = matches!(focused_input, Some(FieldInput::Text(_)));
    let on_choice = matches!(focused_input, Some(FieldInput::Choice { .. }));
    let on_toggle = matches!(focused_input, Some(FieldInput::Toggle(_)));

    match key.code {
        KeyCode::Down | KeyCode::Tab => form.focus_next(),
        KeyCode::Up | KeyCode::BackTab => form.focus_prev(),
        KeyCode::Enter => {
            if form.is_submit_focused() {
                app.submit_form();
            } else {
                form.focus_next();
            }
        }
        KeyCode::Left if on_choice => form.cycle_choice(false),
        KeyCode::Right if on_choice => form.cycle_choice(true),
        KeyCode::Char(' ') if on_choice => form.cycle_choice(true),
        KeyCode::Char(' ') | KeyCode::Left | KeyCode::Right if on_toggle => form.toggle_focused(),
        KeyCode::Backspace if on_text => form.backspace(),
        KeyCode::Char(c) if on_text => form.insert_char(c),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::Resource;
    use crate::config::Config;
    use crossterm::event::KeyModifiers;

    fn press(app: &mut App, code: KeyCode) -> bool {
        handle_input(app, KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn app() -> App {
        App::new(&Config::default()).unwrap()
    }

    #[test]
    fn test_number_keys_switch_tabs() {
        let mut app = app();
        press(&mut app, KeyCode::Char('3'));
        assert_eq!(app.current_tab, Tab::Companies);
        press(&mut app, KeyCode::Char('6'));
        assert_eq!(app.current_tab, Tab::AuditLog);
    }

    #[test]
    fn test_quit_requires_confirmation() {
        let mut app = app();
        assert!(!press(&mut app, KeyCode::Char('q')));
        assert_eq!(app.state, AppState::ConfirmingQuit);
        assert!(!press(&mut app, KeyCode::Char('n')));
        assert_eq!(app.state, AppState::Normal);
        press(&mut app, KeyCode::Char('q'));
        assert!(press(&mut app, KeyCode::Char('y')));
    }

    #[test]
    fn test_sort_key_toggles_direction() {
        let mut app = app();
        app.current_tab = Tab::Metrics;
        press(&mut app, KeyCode::Char('v'));
        assert_eq!(app.metric_view.sort_column, MetricSortColumn::Value);
        assert!(app.metric_view.sort_ascending);
        press(&mut app, KeyCode::Char('v'));
        assert!(!app.metric_view.sort_ascending);
    }

    #[test]
    fn test_typing_into_form() {
        let mut app = app();
        app.current_tab = Tab::Companies;
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.state, AppState::EditingForm);

        // Letters that are global shortcuts elsewhere go into the field
        for c in "qr Co".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        let form = app.form.as_ref().unwrap().form();
        assert_eq!(form.text("name"), "qr Co");

        // Sector choice cycles with arrows
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Right);
        let form = app.form.as_ref().unwrap().form();
        assert_eq!(form.selected("sector"), Some(0));

        press(&mut app, KeyCode::Esc);
        assert!(app.form.is_none());
        assert_eq!(app.state, AppState::Normal);
    }

    #[test]
    fn test_add_key_ignored_outside_tables() {
        let mut app = app();
        app.current_tab = Tab::Dashboard;
        press(&mut app, KeyCode::Char('+'));
        assert_eq!(app.state, AppState::Normal);
        assert!(app.form.is_none());
    }

    #[test]
    fn test_calendar_navigation() {
        let mut app = app();
        app.current_tab = Tab::Calendar;
        app.calendar_date = chrono::NaiveDate::from_ymd_opt(2024, 1, 31).unwrap();
        press(&mut app, KeyCode::Char(']'));
        assert_eq!(app.calendar_date.to_string(), "2024-02-29");
        press(&mut app, KeyCode::Char('l'));
        assert_eq!(app.calendar_date.to_string(), "2024-03-01");
        press(&mut app, KeyCode::Up);
        assert_eq!(app.calendar_date.to_string(), "2024-02-23");
    }

    #[test]
    fn test_delete_cancelled_with_n() {
        let mut app = app();
        app.state = AppState::ConfirmingDelete {
            resource: Resource::Companies,
            id: 3,
        };
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.state, AppState::Normal);
    }
}
