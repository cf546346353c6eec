mod update;

use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;

use paperdeck_core::{BookmarkState, Display, Header, PageIndicator};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    /// Typing a search query.
    Search,
    /// Typing a note for a new bookmark.
    Note,
}

/// UI-side state: the last projection received from the backend plus the
/// local input buffers. Everything here is owned by the render loop.
pub struct App {
    pub theme: Theme,
    pub input_mode: InputMode,
    pub header: Header,
    pub display: Display,
    pub search_input: String,
    pub note_input: String,
    pub show_help: bool,
    /// Vertical offset shared by the paper columns; reset on a new paper.
    pub detail_scroll: u16,
    /// Rows inside a paper column, used as the page-scroll step.
    pub visible_rows: usize,
    pub should_quit: bool,
    pub tick: usize,
    /// Backend origin, shown in the header.
    pub base_url: String,
    /// Channel for sending commands to the backend task.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(base_url: impl Into<String>, theme: Theme) -> Self {
        Self {
            theme,
            input_mode: InputMode::Normal,
            header: Header::default(),
            display: Display::Loading,
            search_input: String::new(),
            note_input: String::new(),
            show_help: false,
            detail_scroll: 0,
            visible_rows: 20,
            should_quit: false,
            tick: 0,
            base_url: base_url.into(),
            backend_cmd_tx: None,
        }
    }

    /// Page indicator of the paper on screen, if any.
    pub fn page(&self) -> Option<PageIndicator> {
        match &self.display {
            Display::Paper(view) => Some(view.page),
            _ => None,
        }
    }

    /// Bookmark state of the paper on screen, if any.
    pub fn bookmark(&self) -> Option<BookmarkState> {
        match &self.display {
            Display::Paper(view) => Some(view.bookmark),
            _ => None,
        }
    }

    /// Whether an input line is shown under the header.
    fn input_visible(&self) -> bool {
        self.input_mode != InputMode::Normal || !self.search_input.is_empty()
    }

    /// Render the current screen.
    pub fn view(&mut self, f: &mut ratatui::Frame) {
        let area = f.area();

        let mut constraints = vec![Constraint::Length(1)]; // header
        if self.input_visible() {
            constraints.push(Constraint::Length(1)); // input line
        }
        constraints.push(Constraint::Min(3)); // body
        constraints.push(Constraint::Length(1)); // footer
        let chunks = Layout::vertical(constraints).split(area);

        let mut ci = 0;
        crate::view::chrome::render_header(f, chunks[ci], self);
        ci += 1;
        if self.input_visible() {
            crate::view::chrome::render_input(f, chunks[ci], self);
            ci += 1;
        }
        let body: Rect = chunks[ci];
        ci += 1;

        match &self.display {
            Display::Paper(view) => {
                let max = crate::view::paper::render_in(
                    f,
                    body,
                    view,
                    self.detail_scroll,
                    &self.theme,
                );
                self.detail_scroll = self.detail_scroll.min(max);
                self.visible_rows = (body.height as usize).saturating_sub(2).max(1);
            }
            Display::Loading => crate::view::status::render_loading(f, body, &self.theme, self.tick),
            Display::Empty => crate::view::status::render_empty(f, body, &self.theme),
            Display::Error(message) => {
                crate::view::status::render_error(f, body, message, &self.theme)
            }
        }

        crate::view::chrome::render_footer(f, chunks[ci], self);

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }
    }
}
