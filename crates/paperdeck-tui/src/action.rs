use paperdeck_core::Direction;

/// User intents produced by the input layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Quit,
    /// Esc in normal mode: close the help overlay, or quit.
    NavigateBack,
    Navigate(Direction),
    /// Scroll the paper columns.
    MoveDown,
    MoveUp,
    PageDown,
    PageUp,
    GoTop,
    GoBottom,
    /// Focus the search input.
    StartSearch,
    ClearSearch,
    ToggleBookmarksView,
    ToggleBookmark,
    /// Prompt for a note, then bookmark.
    StartNote,
    Redisplay,
    ToggleHelp,
    /// Typed character in an input; `'\x08'` is backspace.
    SearchInput(char),
    SearchConfirm,
    SearchCancel,
    Tick,
    Resize(u16, u16),
    None,
}
