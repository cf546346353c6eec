//! Pure projection from paper records and controller state to what the
//! screen shows. Nothing here touches a terminal; the TUI only paints these
//! values.

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::model::PaperDetail;
use crate::nav::Mode;

pub const NO_ANALYSIS: &str = "[ NO ANALYSIS AVAILABLE ]";
pub const NO_RESULTS: &str = "[ NO RESULTS FOUND ]";

/// The four mutually exclusive things the main area can show.
#[derive(Clone, Debug, PartialEq)]
pub enum Display {
    Loading,
    Paper(Box<PaperView>),
    Empty,
    Error(String),
}

impl Display {
    pub fn error(message: impl Into<String>) -> Self {
        Display::Error(message.into())
    }
}

/// 1-based position within the loaded list, plus prev/next availability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PageIndicator {
    pub current: usize,
    pub total: usize,
    pub prev_enabled: bool,
    pub next_enabled: bool,
}

impl PageIndicator {
    pub fn new(current: usize, total: usize) -> Self {
        Self {
            current,
            total,
            prev_enabled: current > 1,
            next_enabled: current < total,
        }
    }

    pub fn label(&self) -> String {
        format!("{} / {}", self.current, self.total)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BookmarkState {
    Bookmarked,
    NotBookmarked,
}

impl BookmarkState {
    pub fn from_flag(is_bookmarked: bool) -> Self {
        if is_bookmarked {
            BookmarkState::Bookmarked
        } else {
            BookmarkState::NotBookmarked
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            BookmarkState::Bookmarked => "★ BOOKMARKED",
            BookmarkState::NotBookmarked => "☆ BOOKMARK",
        }
    }

    pub fn is_bookmarked(&self) -> bool {
        matches!(self, BookmarkState::Bookmarked)
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AnalysisView {
    KeyPoints {
        points: Vec<String>,
        summary: Option<String>,
        model: Option<String>,
    },
    Unavailable,
}

/// Everything the paper screen renders, already formatted.
#[derive(Clone, Debug, PartialEq)]
pub struct PaperView {
    pub id: i64,
    pub title: String,
    pub arxiv_id: String,
    pub published: String,
    pub category: String,
    /// Secondary categories, without the primary one.
    pub categories: Vec<String>,
    pub authors: Vec<String>,
    pub pdf_url: String,
    pub bookmark: BookmarkState,
    /// Note saved with the bookmark, if any.
    pub note: Option<String>,
    /// When the bookmark was made, as `YYYY-MM-DD`.
    pub bookmarked_on: Option<String>,
    pub abstract_text: String,
    pub analysis: AnalysisView,
    pub page: PageIndicator,
}

impl PaperView {
    pub fn project(detail: &PaperDetail, page: PageIndicator) -> Self {
        let analysis = match &detail.analysis {
            Some(a) if !a.key_points.is_empty() => AnalysisView::KeyPoints {
                points: a.key_points.clone(),
                summary: a.summary.clone().filter(|s| !s.trim().is_empty()),
                model: a.model_version.clone(),
            },
            _ => AnalysisView::Unavailable,
        };
        let saved = detail.bookmark.as_ref().filter(|_| detail.is_bookmarked);

        Self {
            id: detail.id,
            title: detail.title.clone(),
            arxiv_id: detail.arxiv_id.clone(),
            published: format_date(&detail.published_date),
            category: detail.primary_category.clone(),
            categories: detail
                .categories
                .iter()
                .filter(|c| **c != detail.primary_category)
                .cloned()
                .collect(),
            authors: detail.authors.clone(),
            pdf_url: detail.pdf_url.clone(),
            bookmark: BookmarkState::from_flag(detail.is_bookmarked),
            note: saved
                .and_then(|b| b.notes.as_deref())
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(String::from),
            bookmarked_on: saved
                .and_then(|b| b.bookmarked_at.as_deref())
                .map(format_date),
            abstract_text: detail.abstract_text.clone(),
            analysis,
            page,
        }
    }
}

/// Chrome line: where the list came from and how long it is.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Header {
    pub mode: Mode,
    pub query: Option<String>,
    pub total: usize,
}

impl Header {
    pub fn mode_label(&self) -> String {
        match (self.mode, &self.query) {
            (Mode::All, _) => "ALL PAPERS".to_string(),
            (Mode::Search, Some(q)) => format!("SEARCH: {q}"),
            (Mode::Search, None) => "SEARCH".to_string(),
            (Mode::Bookmarks, _) => "BOOKMARKS".to_string(),
        }
    }
}

/// Render a backend timestamp as `YYYY-MM-DD`.
///
/// Accepts RFC 3339, naive ISO datetimes and plain dates. Anything else is
/// returned unchanged.
pub fn format_date(raw: &str) -> String {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return dt.date_naive().format("%Y-%m-%d").to_string();
    }
    if let Ok(dt) = raw.parse::<NaiveDateTime>() {
        return dt.date().format("%Y-%m-%d").to_string();
    }
    if let Ok(date) = raw.parse::<NaiveDate>() {
        return date.format("%Y-%m-%d").to_string();
    }
    raw.to_string()
}
