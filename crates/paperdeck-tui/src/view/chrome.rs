//! Header, input line and footer around the main area.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::app::{App, InputMode};
use crate::view::truncate;

pub fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let line = Line::from(vec![
        Span::styled(" PAPERDECK ", theme.header_style()),
        Span::styled(" > ", Style::default().fg(theme.dim)),
        Span::styled(
            app.header.mode_label(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("  {} papers", app.header.total),
            Style::default().fg(theme.dim),
        ),
    ]);
    f.render_widget(Paragraph::new(line), area);

    let origin = truncate(&app.base_url, (area.width / 3) as usize);
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("{origin} "),
            Style::default().fg(theme.dim),
        )))
        .alignment(Alignment::Right),
        area,
    );
}

/// Search or note prompt. The search query stays visible after submit.
pub fn render_input(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let (prompt, text, focused) = match app.input_mode {
        InputMode::Note => (" note: ", app.note_input.as_str(), true),
        InputMode::Search => (" /", app.search_input.as_str(), true),
        InputMode::Normal => (" /", app.search_input.as_str(), false),
    };
    let cursor = if focused { "\u{2588}" } else { "" };
    let text_style = if focused {
        Style::default().fg(theme.text)
    } else {
        Style::default().fg(theme.dim)
    };

    let line = Line::from(vec![
        Span::styled(
            prompt,
            Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
        ),
        Span::styled(text, text_style),
        Span::styled(cursor, Style::default().fg(theme.active)),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

/// Page indicator with prev/next hints, followed by the key hints for the
/// current mode.
pub fn render_footer(f: &mut Frame, area: Rect, app: &App) {
    let theme = &app.theme;
    let mut spans = Vec::new();

    match app.page() {
        Some(page) => {
            spans.push(Span::styled(" \u{2190} PREV ", theme.control_style(page.prev_enabled)));
            spans.push(Span::styled(
                format!(" {} ", page.label()),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(" NEXT \u{2192} ", theme.control_style(page.next_enabled)));
        }
        None => {
            spans.push(Span::styled(" \u{2190} PREV ", theme.control_style(false)));
            spans.push(Span::styled(" - / - ", Style::default().fg(theme.dim)));
            spans.push(Span::styled(" NEXT \u{2192} ", theme.control_style(false)));
        }
    }

    let hints = match app.input_mode {
        InputMode::Normal => "  j/k scroll  / search  c clear  b bookmarks  s bookmark  n note  r retry  ? help  q quit",
        InputMode::Search => "  Enter search  Esc cancel",
        InputMode::Note => "  Enter bookmark  Esc cancel",
    };
    spans.push(Span::styled(hints, theme.footer_style()));

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
