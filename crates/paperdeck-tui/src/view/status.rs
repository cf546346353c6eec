use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use paperdeck_core::view::NO_RESULTS;

use crate::theme::Theme;
use crate::view::{centered_rect, spinner_char};

pub fn render_loading(f: &mut Frame, area: Rect, theme: &Theme, tick: usize) {
    let line = Line::from(vec![
        Span::styled(
            format!("{} ", spinner_char(tick)),
            Style::default().fg(theme.spinner),
        ),
        Span::styled("Loading\u{2026}", Style::default().fg(theme.dim)),
    ]);
    render_centered(f, area, line, theme);
}

pub fn render_empty(f: &mut Frame, area: Rect, theme: &Theme) {
    let line = Line::from(Span::styled(
        NO_RESULTS,
        Style::default().fg(theme.dim).add_modifier(Modifier::BOLD),
    ));
    render_centered(f, area, line, theme);
}

/// Framed error panel. The controller stays usable, so the panel also
/// points at the retry key.
pub fn render_error(f: &mut Frame, area: Rect, message: &str, theme: &Theme) {
    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(theme.error).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "press r to retry",
            Style::default().fg(theme.dim),
        )),
    ];

    let width = (message.chars().count() as u16 + 8).max(30).min(area.width);
    let popup = centered_rect(width, 6, area);
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.error))
                .title(" ERROR "),
        );
    f.render_widget(paragraph, popup);
}

fn render_centered(f: &mut Frame, area: Rect, line: Line<'_>, theme: &Theme) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style());
    let inner = block.inner(area);
    f.render_widget(block, area);

    let row = Layout::vertical([Constraint::Length(1)])
        .flex(Flex::Center)
        .split(inner)[0];
    f.render_widget(Paragraph::new(line).alignment(Alignment::Center), row);
}
