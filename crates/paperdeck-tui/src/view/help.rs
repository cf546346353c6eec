use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::Frame;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::theme::Theme;
use crate::view::centered_rect;

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let area = f.area();
    let popup = centered_rect(60, 30, area);

    let lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            Style::default()
                .fg(theme.header_fg)
                .bg(theme.header_bg)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        section_header("Browsing", theme),
        key_line("\u{2190} / h", "Previous paper", theme),
        key_line("\u{2192} / l", "Next paper", theme),
        key_line("\u{2193} / j", "Scroll down", theme),
        key_line("\u{2191} / k", "Scroll up", theme),
        key_line("PgDn / PgUp", "Scroll a page", theme),
        key_line("g / G", "Top / bottom", theme),
        key_line("r", "Reload paper / retry", theme),
        Line::from(""),
        section_header("Search & Bookmarks", theme),
        key_line("/", "Search (at least 2 characters)", theme),
        key_line("c", "Clear search, show all papers", theme),
        key_line("b", "Toggle bookmarks view", theme),
        key_line("s", "Bookmark / unbookmark paper", theme),
        key_line("n", "Bookmark with a note", theme),
        Line::from(""),
        section_header("Input", theme),
        key_line("Enter", "Submit", theme),
        key_line("Esc", "Cancel", theme),
        key_line("Backspace", "Delete character", theme),
        Line::from(""),
        section_header("Global", theme),
        key_line("?", "Toggle this help", theme),
        key_line("q / Esc", "Quit", theme),
        key_line("Ctrl+c", "Force quit", theme),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(" Help "),
        )
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, popup);
    f.render_widget(paragraph, popup);
}

fn section_header<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(Span::styled(
        format!("  {title}"),
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    ))
}

fn key_line<'a>(key: &'a str, desc: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
        Span::styled(desc, Style::default().fg(theme.dim)),
    ])
}
