//! Wire types exchanged with the paper backend.

use serde::{Deserialize, Serialize};

/// Minimal listing record returned by list, search and bookmark endpoints.
///
/// Only `id` and `title` are required; listing endpoints send more fields
/// than the navigator needs and unknown ones are ignored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperSummary {
    pub id: i64,
    pub title: String,
    #[serde(default)]
    pub arxiv_id: Option<String>,
    #[serde(default)]
    pub is_bookmarked: bool,
    #[serde(default)]
    pub authors: Vec<String>,
    #[serde(default)]
    pub primary_category: Option<String>,
    #[serde(default)]
    pub published_date: Option<String>,
}

impl PaperSummary {
    pub fn new(id: i64, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            arxiv_id: None,
            is_bookmarked: false,
            authors: Vec::new(),
            primary_category: None,
            published_date: None,
        }
    }

    pub fn bookmarked(mut self, is_bookmarked: bool) -> Self {
        self.is_bookmarked = is_bookmarked;
        self
    }
}

/// Full record for the paper in view, including the third-party analysis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaperDetail {
    pub id: i64,
    pub title: String,
    pub arxiv_id: String,
    pub published_date: String,
    #[serde(default)]
    pub updated_date: Option<String>,
    pub primary_category: String,
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default)]
    pub authors: Vec<String>,
    pub pdf_url: String,
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    #[serde(default)]
    pub is_bookmarked: bool,
    /// Present when the paper is bookmarked.
    #[serde(default)]
    pub bookmark: Option<BookmarkInfo>,
    /// Sent by the backend as `grok_analysis`.
    #[serde(default, rename = "grok_analysis", alias = "analysis")]
    pub analysis: Option<Analysis>,
}

/// The bookmark attached to a paper detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkInfo {
    pub id: i64,
    #[serde(default)]
    pub bookmarked_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl From<BookmarkRecord> for BookmarkInfo {
    fn from(record: BookmarkRecord) -> Self {
        Self {
            id: record.id,
            bookmarked_at: record.bookmarked_at,
            notes: record.notes,
        }
    }
}

/// Precomputed key points attached to a paper by an external analysis job.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Analysis {
    #[serde(default)]
    pub key_points: Vec<String>,
    #[serde(default)]
    pub summary: Option<String>,
    #[serde(default)]
    pub model_version: Option<String>,
    #[serde(default)]
    pub analyzed_at: Option<String>,
}

/// Response of `GET /papers`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaperListResponse {
    pub papers: Vec<PaperSummary>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u32>,
    #[serde(default)]
    pub offset: Option<u32>,
}

/// Body of `POST /bookmarks/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkCreate {
    pub paper_id: i64,
    pub notes: Option<String>,
}

/// Bookmark record echoed back on creation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookmarkRecord {
    pub id: i64,
    pub paper_id: i64,
    #[serde(default)]
    pub bookmarked_at: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}
