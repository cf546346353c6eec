use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use paperdeck_core::view::NO_ANALYSIS;
use paperdeck_core::{AnalysisView, PaperView};

use crate::theme::Theme;

/// Render one paper as three columns: metadata, abstract, analysis.
///
/// Every column scrolls by the same `scroll` offset, each clamped so its last
/// line stays on screen. Returns the largest offset any column can use.
pub fn render_in(
    f: &mut Frame,
    area: Rect,
    paper: &PaperView,
    scroll: u16,
    theme: &Theme,
) -> u16 {
    let columns = Layout::horizontal([
        Constraint::Percentage(30),
        Constraint::Percentage(40),
        Constraint::Percentage(30),
    ])
    .split(area);

    let columns = [
        (" Paper ", metadata(paper, theme), columns[0]),
        (" Abstract ", abstract_text(paper, theme), columns[1]),
        (" Analysis ", analysis(paper, theme), columns[2]),
    ];
    columns
        .into_iter()
        .map(|(title, content, rect)| render_column(f, rect, title, content, scroll, theme))
        .max()
        .unwrap_or(0)
}

/// Draw one bordered, wrapped column. Returns its maximum scroll offset.
fn render_column(
    f: &mut Frame,
    area: Rect,
    title: &str,
    content: Paragraph,
    scroll: u16,
    theme: &Theme,
) -> u16 {
    let block = panel(title, theme);
    let inner = block.inner(area);
    let content = content.wrap(Wrap { trim: false });
    let max = content
        .line_count(inner.width)
        .saturating_sub(inner.height as usize);
    let max = u16::try_from(max).unwrap_or(u16::MAX);
    f.render_widget(content.block(block).scroll((scroll.min(max), 0)), area);
    max
}

fn panel<'a>(title: &'a str, theme: &Theme) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(title)
}

fn field<'a>(label: &'a str, value: &'a str, theme: &Theme) -> Line<'a> {
    Line::from(vec![
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(value, Style::default().fg(theme.text)),
    ])
}

fn metadata<'a>(paper: &'a PaperView, theme: &Theme) -> Paragraph<'a> {
    let mut lines = vec![
        Line::from(Span::styled(
            paper.title.as_str(),
            Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        field("arXiv", &paper.arxiv_id, theme),
        field("Published", &paper.published, theme),
        field("Category", &paper.category, theme),
    ];
    if !paper.categories.is_empty() {
        lines.push(Line::from(vec![
            Span::styled(format!("{:<10}", "Also"), Style::default().fg(theme.dim)),
            Span::styled(paper.categories.join(", "), Style::default().fg(theme.dim)),
        ]));
    }
    if !paper.pdf_url.is_empty() {
        lines.push(field("PDF", &paper.pdf_url, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        paper.bookmark.label(),
        theme.bookmark_style(paper.bookmark),
    )));
    if let Some(date) = &paper.bookmarked_on {
        lines.push(field("Saved", date, theme));
    }
    if let Some(note) = &paper.note {
        lines.push(field("Note", note, theme));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Authors",
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
    )));
    // One line per author, in source order
    for author in &paper.authors {
        lines.push(Line::from(Span::styled(
            format!("  {author}"),
            Style::default().fg(theme.text),
        )));
    }

    Paragraph::new(lines)
}

fn abstract_text<'a>(paper: &'a PaperView, theme: &Theme) -> Paragraph<'a> {
    Paragraph::new(paper.abstract_text.as_str()).style(Style::default().fg(theme.text))
}

fn analysis<'a>(paper: &'a PaperView, theme: &Theme) -> Paragraph<'a> {
    let lines = match &paper.analysis {
        AnalysisView::KeyPoints {
            points,
            summary,
            model,
        } => {
            let mut lines: Vec<Line> = points
                .iter()
                .enumerate()
                .map(|(i, point)| {
                    Line::from(vec![
                        Span::styled(
                            format!("{:>2}. ", i + 1),
                            Style::default().fg(theme.key_point).add_modifier(Modifier::BOLD),
                        ),
                        Span::styled(point.as_str(), Style::default().fg(theme.text)),
                    ])
                })
                .collect();
            if let Some(summary) = summary {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    summary.as_str(),
                    Style::default().fg(theme.dim),
                )));
            }
            if let Some(model) = model {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    format!("model: {model}"),
                    Style::default().fg(theme.dim).add_modifier(Modifier::ITALIC),
                )));
            }
            lines
        }
        AnalysisView::Unavailable => vec![Line::from(Span::styled(
            NO_ANALYSIS,
            Style::default().fg(theme.dim),
        ))],
    };

    Paragraph::new(lines)
}
