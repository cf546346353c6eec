use paperdeck_core::{Direction, Display, Header};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Fetch the unfiltered list at startup.
    LoadInitial,
    /// Run a keyword search with the raw input text.
    Search(String),
    ClearSearch,
    ToggleBookmarksView,
    Navigate(Direction),
    /// Bookmark or unbookmark the paper in view. `notes` only applies when adding.
    ToggleBookmark { notes: Option<String> },
    /// Re-fetch the paper in view, or retry the list when nothing is loaded.
    Redisplay,
}

impl BackendCommand {
    /// Whether the command waits on the backend before it can show anything.
    pub fn is_blocking(&self) -> bool {
        !matches!(self, BackendCommand::Navigate(_))
    }
}

/// Events flowing from the backend task to the TUI.
#[derive(Debug, Clone, PartialEq)]
pub enum BackendEvent {
    /// New chrome and main-area content.
    Updated { header: Header, display: Display },
}
