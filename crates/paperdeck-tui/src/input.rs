use ratatui::crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use paperdeck_core::Direction;

use crate::action::Action;
use crate::app::InputMode;

/// Map a crossterm terminal event to a TUI action, respecting input mode.
pub fn map_event(event: &Event, input_mode: &InputMode) -> Action {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            // Ctrl+C always quits regardless of mode
            if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::Search | InputMode::Note => map_key_text_input(key),
            }
        }
        Event::Resize(w, h) => Action::Resize(*w, *h),
        _ => Action::None,
    }
}

fn map_key_normal(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Left | KeyCode::Char('h') => Action::Navigate(Direction::Prev),
        KeyCode::Right | KeyCode::Char('l') => Action::Navigate(Direction::Next),
        KeyCode::Down | KeyCode::Char('j') => Action::MoveDown,
        KeyCode::Up | KeyCode::Char('k') => Action::MoveUp,
        KeyCode::PageDown => Action::PageDown,
        KeyCode::PageUp => Action::PageUp,
        KeyCode::Home | KeyCode::Char('g') => Action::GoTop,
        KeyCode::End | KeyCode::Char('G') => Action::GoBottom,
        KeyCode::Char('/') => Action::StartSearch,
        KeyCode::Char('c') => Action::ClearSearch,
        KeyCode::Char('b') => Action::ToggleBookmarksView,
        KeyCode::Char('s') => Action::ToggleBookmark,
        KeyCode::Char('n') => Action::StartNote,
        KeyCode::Char('r') => Action::Redisplay,
        KeyCode::Char('?') => Action::ToggleHelp,
        _ => Action::None,
    }
}

/// While an input has focus, navigation keys are swallowed.
fn map_key_text_input(key: &KeyEvent) -> Action {
    match key.code {
        KeyCode::Esc => Action::SearchCancel,
        KeyCode::Enter => Action::SearchConfirm,
        KeyCode::Char(c) => Action::SearchInput(c),
        KeyCode::Backspace => Action::SearchInput('\x08'), // sentinel for backspace
        _ => Action::None,
    }
}
