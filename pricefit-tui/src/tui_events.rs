use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

use crate::tui_app::App;

/// Wait up to `timeout` for a key press and apply it to the app.
pub fn handle_events(app: &mut App, timeout: Duration) -> std::io::Result<()> {
    if event::poll(timeout)? {
        if let Event::Key(key) = event::read()? {
            if key.kind == KeyEventKind::Press {
                handle_key(app, key);
            }
        }
    }
    Ok(())
}

pub fn handle_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            if app.show_detail && key.code == KeyCode::Esc {
                app.show_detail = false;
            } else {
                app.should_quit = true;
            }
        }
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Up | KeyCode::Char('k') => app.move_up(),
        KeyCode::Down | KeyCode::Char('j') => app.move_down(),
        KeyCode::PageUp => app.page_up(),
        KeyCode::PageDown => app.page_down(),
        KeyCode::Home | KeyCode::Char('g') => app.home(),
        KeyCode::End | KeyCode::Char('G') => app.end(),
        KeyCode::Char('f') => app.cycle_tier_filter(),
        KeyCode::Enter => app.toggle_detail(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pricefit_core::{EvaluationReport, PredictionRecord};

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, KeyEvent::new(code, KeyModifiers::NONE));
    }

    #[test]
    fn keys_drive_the_app() {
        let records = vec![
            PredictionRecord::score(0, 10.0, 10.0),
            PredictionRecord::score(1, 10.0, 900.0),
        ];
        let report = EvaluationReport::from_records("Keys", &records);
        let mut app = App::new(report, records, vec!["a".into(), "b".into()]);

        press(&mut app, KeyCode::Char('j'));
        assert_eq!(app.selected_row, 1);
        press(&mut app, KeyCode::Enter);
        assert!(app.show_detail);
        press(&mut app, KeyCode::Esc);
        assert!(!app.show_detail);
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Char('q'));
        assert!(app.should_quit);
    }
}
