use ratatui::style::{Color, Modifier, Style};

use paperdeck_core::BookmarkState;

/// Color theme for the TUI.
pub struct Theme {
    pub bookmarked: Color,
    pub error: Color,
    pub key_point: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Hacker-green terminal theme.
    pub fn hacker() -> Self {
        Self {
            bookmarked: Color::Yellow,
            error: Color::Red,
            key_point: Color::Rgb(0, 210, 0),

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Modern theme: white text, electric blue accents, dark blue header.
    pub fn modern() -> Self {
        Self {
            bookmarked: Color::Rgb(255, 200, 0),
            error: Color::Rgb(255, 80, 80),
            key_point: Color::Rgb(0, 200, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    /// Look up a theme by its config name; unknown names fall back to hacker.
    pub fn from_name(name: &str) -> Self {
        match name.trim().to_ascii_lowercase().as_str() {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn bookmark_style(&self, state: BookmarkState) -> Style {
        match state {
            BookmarkState::Bookmarked => Style::default()
                .fg(self.bookmarked)
                .add_modifier(Modifier::BOLD),
            BookmarkState::NotBookmarked => Style::default().fg(self.dim),
        }
    }

    /// Style for a prev/next hint that may be unavailable.
    pub fn control_style(&self, enabled: bool) -> Style {
        if enabled {
            Style::default().fg(self.active).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.dim).add_modifier(Modifier::DIM)
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
