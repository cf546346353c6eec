//! Backend API access.
//!
//! [`PaperApi`] is the seam between the navigation controller and the
//! backend: [`ApiClient`] talks HTTP, [`MockApi`] replays scripted responses
//! in tests.

mod client;
pub mod mock;

use std::future::Future;
use std::pin::Pin;

pub use client::ApiClient;
pub use mock::{MockApi, MockReply};

use crate::model::{BookmarkRecord, PaperDetail, PaperListResponse, PaperSummary};

/// Failure of any backend request.
///
/// Transport, decode and server-declared errors all collapse into this one
/// kind; callers only get a message suitable for display or logging.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct RequestError {
    message: String,
}

impl RequestError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    pub fn message(&self) -> &str {
        &self.message
    }
}

impl From<reqwest::Error> for RequestError {
    fn from(err: reqwest::Error) -> Self {
        Self::new(err.to_string())
    }
}

/// Boxed future returned by every [`PaperApi`] operation.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, RequestError>> + Send + 'a>>;

/// Operations offered by the paper backend.
pub trait PaperApi: Send + Sync {
    /// `GET /papers?limit&offset&bookmarked`.
    fn list_papers(
        &self,
        limit: u32,
        offset: u32,
        bookmarked_only: bool,
    ) -> ApiFuture<'_, PaperListResponse>;

    /// `GET /papers/{id}`, including the analysis when one exists.
    fn get_paper(&self, id: i64) -> ApiFuture<'_, PaperDetail>;

    /// `GET /papers/search?q&limit`. The caller ensures `query` is non-empty.
    fn search_papers<'a>(&'a self, query: &'a str, limit: u32)
    -> ApiFuture<'a, Vec<PaperSummary>>;

    /// `POST /bookmarks/`. Returns the created record, or `None` if the
    /// server answered with an empty body.
    fn add_bookmark<'a>(
        &'a self,
        id: i64,
        notes: Option<&'a str>,
    ) -> ApiFuture<'a, Option<BookmarkRecord>>;

    /// `DELETE /bookmarks/{id}`.
    fn remove_bookmark(&self, id: i64) -> ApiFuture<'_, ()>;

    /// `GET /bookmarks/`.
    fn list_bookmarks(&self) -> ApiFuture<'_, Vec<PaperSummary>>;
}
