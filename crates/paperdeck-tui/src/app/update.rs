use paperdeck_core::Display;

use super::{App, InputMode};
use crate::action::Action;
use crate::tui_event::{BackendCommand, BackendEvent};

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        match action {
            Action::Quit => {
                self.should_quit = true;
                return true;
            }
            Action::Tick => {
                self.tick = self.tick.wrapping_add(1);
                return false;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        // Help overlay swallows everything but its own toggles
        if self.show_help {
            if matches!(action, Action::ToggleHelp | Action::NavigateBack) {
                self.show_help = false;
            }
            return false;
        }

        match self.input_mode {
            InputMode::Search => self.update_search(action),
            InputMode::Note => self.update_note(action),
            InputMode::Normal => self.update_normal(action),
        }
        self.should_quit
    }

    fn update_normal(&mut self, action: Action) {
        match action {
            Action::NavigateBack => {
                self.should_quit = true;
            }
            Action::Navigate(direction) => {
                self.send(BackendCommand::Navigate(direction));
            }
            Action::StartSearch => {
                self.input_mode = InputMode::Search;
            }
            Action::ClearSearch => {
                self.search_input.clear();
                self.send(BackendCommand::ClearSearch);
            }
            Action::ToggleBookmarksView => {
                self.send(BackendCommand::ToggleBookmarksView);
            }
            Action::ToggleBookmark => {
                if self.bookmark().is_some() {
                    self.send(BackendCommand::ToggleBookmark { notes: None });
                }
            }
            Action::StartNote => {
                // Notes only accompany a new bookmark
                if self.bookmark().is_some_and(|b| !b.is_bookmarked()) {
                    self.note_input.clear();
                    self.input_mode = InputMode::Note;
                }
            }
            Action::Redisplay => {
                self.send(BackendCommand::Redisplay);
            }
            Action::ToggleHelp => {
                self.show_help = true;
            }
            Action::MoveDown => {
                self.detail_scroll = self.detail_scroll.saturating_add(1);
            }
            Action::MoveUp => {
                self.detail_scroll = self.detail_scroll.saturating_sub(1);
            }
            Action::PageDown => {
                let page = self.visible_rows.max(1) as u16;
                self.detail_scroll = self.detail_scroll.saturating_add(page);
            }
            Action::PageUp => {
                let page = self.visible_rows.max(1) as u16;
                self.detail_scroll = self.detail_scroll.saturating_sub(page);
            }
            Action::GoTop => self.detail_scroll = 0,
            // Clamped to the last page on the next draw
            Action::GoBottom => self.detail_scroll = u16::MAX,
            _ => {}
        }
    }

    fn update_search(&mut self, action: Action) {
        match action {
            Action::SearchInput(ch) => edit(&mut self.search_input, ch),
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                self.send(BackendCommand::Search(self.search_input.clone()));
            }
            Action::SearchCancel | Action::NavigateBack => {
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    fn update_note(&mut self, action: Action) {
        match action {
            Action::SearchInput(ch) => edit(&mut self.note_input, ch),
            Action::SearchConfirm => {
                self.input_mode = InputMode::Normal;
                let note = std::mem::take(&mut self.note_input);
                let notes = Some(note.trim().to_string()).filter(|n| !n.is_empty());
                self.send(BackendCommand::ToggleBookmark { notes });
            }
            Action::SearchCancel | Action::NavigateBack => {
                self.note_input.clear();
                self.input_mode = InputMode::Normal;
            }
            _ => {}
        }
    }

    /// Apply an event from the backend task.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Updated { header, display } => {
                if let Display::Error(message) = &display {
                    tracing::debug!(%message, "showing error");
                }
                if paper_id(&display) != paper_id(&self.display) {
                    self.detail_scroll = 0;
                }
                self.header = header;
                self.display = display;
            }
        }
    }

    fn send(&self, cmd: BackendCommand) {
        if let Some(tx) = &self.backend_cmd_tx {
            if tx.send(cmd).is_err() {
                tracing::warn!("backend task is gone; command dropped");
            }
        }
    }
}

fn paper_id(display: &Display) -> Option<i64> {
    match display {
        Display::Paper(view) => Some(view.id),
        _ => None,
    }
}

/// Apply one typed character to an input buffer; `'\x08'` deletes.
fn edit(buffer: &mut String, ch: char) {
    if ch == '\x08' {
        buffer.pop();
    } else {
        buffer.push(ch);
    }
}
