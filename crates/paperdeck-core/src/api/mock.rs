//! In-memory backend for testing.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};
use std::time::Duration;

use chrono::Utc;

use super::{ApiFuture, PaperApi, RequestError};
use crate::model::{BookmarkRecord, PaperDetail, PaperListResponse, PaperSummary};

/// Operation selector for scripted replies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Op {
    ListPapers,
    GetPaper,
    Search,
    AddBookmark,
    RemoveBookmark,
    ListBookmarks,
}

/// A recorded call against [`MockApi`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Call {
    ListPapers {
        limit: u32,
        offset: u32,
        bookmarked_only: bool,
    },
    GetPaper(i64),
    Search {
        query: String,
        limit: u32,
    },
    AddBookmark {
        id: i64,
        notes: Option<String>,
    },
    RemoveBookmark(i64),
    ListBookmarks,
}

impl Call {
    pub fn op(&self) -> Op {
        match self {
            Call::ListPapers { .. } => Op::ListPapers,
            Call::GetPaper(_) => Op::GetPaper,
            Call::Search { .. } => Op::Search,
            Call::AddBookmark { .. } => Op::AddBookmark,
            Call::RemoveBookmark(_) => Op::RemoveBookmark,
            Call::ListBookmarks => Op::ListBookmarks,
        }
    }
}

/// A scripted reply, consumed by the next call of the matching [`Op`].
#[derive(Clone, Debug)]
pub enum MockReply {
    /// Result list for list, search and bookmark listing.
    Papers(Vec<PaperSummary>),
    Detail(PaperDetail),
    Bookmark(Option<BookmarkRecord>),
    /// Empty success, for bookmark removal.
    Done,
    Error(String),
}

/// A hand-rolled fake implementing [`PaperApi`].
///
/// Without scripting it behaves like a tiny backend over a list of
/// summaries: listing, substring search, bookmark add/remove with the
/// backend's own error messages, and details synthesized by [`detail_for`].
/// Replies queued with [`push`](MockApi::push) take precedence, one per call.
pub struct MockApi {
    papers: Mutex<Vec<PaperSummary>>,
    /// Per-operation stacks, reversed so `pop()` yields the oldest reply.
    scripted: Mutex<HashMap<Op, Vec<MockReply>>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
    next_bookmark_id: Mutex<i64>,
    /// Bookmarks made through this fake, by paper id.
    bookmarks: Mutex<HashMap<i64, BookmarkRecord>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new(Vec::new())
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MockApi {
    /// Create a fake backend holding `papers`.
    pub fn new(papers: Vec<PaperSummary>) -> Self {
        Self {
            papers: Mutex::new(papers),
            scripted: Mutex::new(HashMap::new()),
            delay: None,
            calls: Mutex::new(Vec::new()),
            next_bookmark_id: Mutex::new(1),
            bookmarks: Mutex::new(HashMap::new()),
        }
    }

    /// Queue a reply for the next call of `op`.
    pub fn push(self, op: Op, reply: MockReply) -> Self {
        lock(&self.scripted).entry(op).or_default().insert(0, reply);
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    /// Every call made so far, in order.
    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    /// Number of calls made for one operation.
    pub fn count(&self, op: Op) -> usize {
        lock(&self.calls).iter().filter(|c| c.op() == op).count()
    }

    /// Current bookmark flag of a stored paper.
    pub fn is_bookmarked(&self, id: i64) -> Option<bool> {
        lock(&self.papers)
            .iter()
            .find(|p| p.id == id)
            .map(|p| p.is_bookmarked)
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    fn scripted(&self, op: Op) -> Option<MockReply> {
        lock(&self.scripted).get_mut(&op).and_then(|stack| stack.pop())
    }

    fn finish<'a, T: Send + 'a>(&self, result: Result<T, RequestError>) -> ApiFuture<'a, T> {
        let delay = self.delay;
        Box::pin(async move {
            if let Some(d) = delay {
                tokio::time::sleep(d).await;
            }
            result
        })
    }

    fn add(&self, id: i64, notes: Option<&str>) -> Result<Option<BookmarkRecord>, RequestError> {
        let mut papers = lock(&self.papers);
        let paper = papers
            .iter_mut()
            .find(|p| p.id == id)
            .ok_or_else(|| RequestError::new("Paper not found"))?;
        if paper.is_bookmarked {
            return Err(RequestError::new("Paper already bookmarked"));
        }
        paper.is_bookmarked = true;

        let mut next = lock(&self.next_bookmark_id);
        let record = BookmarkRecord {
            id: *next,
            paper_id: id,
            bookmarked_at: Some(Utc::now().format("%Y-%m-%dT%H:%M:%S").to_string()),
            notes: notes.map(String::from),
        };
        *next += 1;
        lock(&self.bookmarks).insert(id, record.clone());
        Ok(Some(record))
    }

    fn remove(&self, id: i64) -> Result<(), RequestError> {
        let mut papers = lock(&self.papers);
        match papers.iter_mut().find(|p| p.id == id && p.is_bookmarked) {
            Some(paper) => {
                paper.is_bookmarked = false;
                lock(&self.bookmarks).remove(&id);
                Ok(())
            }
            None => Err(RequestError::new("Bookmark not found")),
        }
    }
}

/// Synthesize a full record for a stored summary.
pub fn detail_for(summary: &PaperSummary) -> PaperDetail {
    let arxiv_id = summary
        .arxiv_id
        .clone()
        .unwrap_or_else(|| format!("2401.{:05}", summary.id));
    PaperDetail {
        id: summary.id,
        title: summary.title.clone(),
        pdf_url: format!("https://arxiv.org/pdf/{arxiv_id}"),
        arxiv_id,
        published_date: summary
            .published_date
            .clone()
            .unwrap_or_else(|| "2024-01-15T00:00:00".to_string()),
        updated_date: None,
        primary_category: summary
            .primary_category
            .clone()
            .unwrap_or_else(|| "cs.LG".to_string()),
        categories: Vec::new(),
        authors: summary.authors.clone(),
        abstract_text: format!("Abstract of {}.", summary.title),
        is_bookmarked: summary.is_bookmarked,
        bookmark: None,
        analysis: None,
    }
}

fn papers_reply(reply: MockReply) -> Result<Vec<PaperSummary>, RequestError> {
    match reply {
        MockReply::Papers(papers) => Ok(papers),
        MockReply::Error(msg) => Err(RequestError::new(msg)),
        other => Err(RequestError::new(format!("mock: unexpected reply {other:?}"))),
    }
}

impl PaperApi for MockApi {
    fn list_papers(
        &self,
        limit: u32,
        offset: u32,
        bookmarked_only: bool,
    ) -> ApiFuture<'_, PaperListResponse> {
        self.record(Call::ListPapers {
            limit,
            offset,
            bookmarked_only,
        });
        let result = match self.scripted(Op::ListPapers) {
            Some(reply) => papers_reply(reply).map(|papers| PaperListResponse {
                total: Some(papers.len() as u64),
                papers,
                limit: Some(limit),
                offset: Some(offset),
            }),
            None => {
                let stored = lock(&self.papers);
                let matching: Vec<&PaperSummary> = stored
                    .iter()
                    .filter(|p| !bookmarked_only || p.is_bookmarked)
                    .collect();
                Ok(PaperListResponse {
                    total: Some(matching.len() as u64),
                    papers: matching
                        .into_iter()
                        .skip(offset as usize)
                        .take(limit as usize)
                        .cloned()
                        .collect(),
                    limit: Some(limit),
                    offset: Some(offset),
                })
            }
        };
        self.finish(result)
    }

    fn get_paper(&self, id: i64) -> ApiFuture<'_, PaperDetail> {
        self.record(Call::GetPaper(id));
        let result = match self.scripted(Op::GetPaper) {
            Some(MockReply::Detail(detail)) => Ok(detail),
            Some(MockReply::Error(msg)) => Err(RequestError::new(msg)),
            Some(other) => Err(RequestError::new(format!("mock: unexpected reply {other:?}"))),
            None => lock(&self.papers)
                .iter()
                .find(|p| p.id == id)
                .map(|p| {
                    let mut detail = detail_for(p);
                    detail.bookmark = lock(&self.bookmarks).get(&id).cloned().map(Into::into);
                    detail
                })
                .ok_or_else(|| RequestError::new("Paper not found")),
        };
        self.finish(result)
    }

    fn search_papers<'a>(
        &'a self,
        query: &'a str,
        limit: u32,
    ) -> ApiFuture<'a, Vec<PaperSummary>> {
        self.record(Call::Search {
            query: query.to_string(),
            limit,
        });
        let result = match self.scripted(Op::Search) {
            Some(reply) => papers_reply(reply),
            None => {
                let needle = query.to_lowercase();
                Ok(lock(&self.papers)
                    .iter()
                    .filter(|p| p.title.to_lowercase().contains(&needle))
                    .take(limit as usize)
                    .cloned()
                    .collect())
            }
        };
        self.finish(result)
    }

    fn add_bookmark<'a>(
        &'a self,
        id: i64,
        notes: Option<&'a str>,
    ) -> ApiFuture<'a, Option<BookmarkRecord>> {
        self.record(Call::AddBookmark {
            id,
            notes: notes.map(String::from),
        });
        let result = match self.scripted(Op::AddBookmark) {
            Some(MockReply::Bookmark(record)) => Ok(record),
            Some(MockReply::Error(msg)) => Err(RequestError::new(msg)),
            Some(other) => Err(RequestError::new(format!("mock: unexpected reply {other:?}"))),
            None => self.add(id, notes),
        };
        self.finish(result)
    }

    fn remove_bookmark(&self, id: i64) -> ApiFuture<'_, ()> {
        self.record(Call::RemoveBookmark(id));
        let result = match self.scripted(Op::RemoveBookmark) {
            Some(MockReply::Done) => Ok(()),
            Some(MockReply::Error(msg)) => Err(RequestError::new(msg)),
            Some(other) => Err(RequestError::new(format!("mock: unexpected reply {other:?}"))),
            None => self.remove(id),
        };
        self.finish(result)
    }

    fn list_bookmarks(&self) -> ApiFuture<'_, Vec<PaperSummary>> {
        self.record(Call::ListBookmarks);
        let result = match self.scripted(Op::ListBookmarks) {
            Some(reply) => papers_reply(reply),
            None => Ok(lock(&self.papers)
                .iter()
                .filter(|p| p.is_bookmarked)
                .cloned()
                .collect()),
        };
        self.finish(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn library() -> Vec<PaperSummary> {
        vec![
            PaperSummary::new(1, "Neural Machine Translation"),
            PaperSummary::new(2, "Graph Neural Networks").bookmarked(true),
            PaperSummary::new(3, "Protein Folding"),
        ]
    }

    #[tokio::test]
    async fn scripted_reply_is_used_once() {
        let mock = MockApi::new(library())
            .push(Op::Search, MockReply::Error("boom".into()));

        let err = mock.search_papers("neural", 10).await.unwrap_err();
        assert_eq!(err.message(), "boom");

        let hits = mock.search_papers("neural", 10).await.unwrap();
        assert_eq!(hits.len(), 2);
        assert_eq!(mock.call_count(), 2);
    }

    #[tokio::test]
    async fn list_filters_bookmarked_and_pages() {
        let mock = MockApi::new(library());

        let all = mock.list_papers(2, 1, false).await.unwrap();
        assert_eq!(all.total, Some(3));
        assert_eq!(
            all.papers.iter().map(|p| p.id).collect::<Vec<_>>(),
            vec![2, 3]
        );

        let marked = mock.list_papers(100, 0, true).await.unwrap();
        assert_eq!(marked.papers.len(), 1);
        assert_eq!(marked.papers[0].id, 2);
    }

    #[tokio::test]
    async fn bookmark_lifecycle_mirrors_backend_errors() {
        let mock = MockApi::new(library());

        let record = mock.add_bookmark(1, Some("read later")).await.unwrap().unwrap();
        assert_eq!(record.paper_id, 1);
        assert_eq!(record.notes.as_deref(), Some("read later"));
        assert_eq!(mock.is_bookmarked(1), Some(true));

        let dup = mock.add_bookmark(1, None).await.unwrap_err();
        assert_eq!(dup.message(), "Paper already bookmarked");

        mock.remove_bookmark(1).await.unwrap();
        let missing = mock.remove_bookmark(1).await.unwrap_err();
        assert_eq!(missing.message(), "Bookmark not found");

        let unknown = mock.add_bookmark(99, None).await.unwrap_err();
        assert_eq!(unknown.message(), "Paper not found");
    }

    #[tokio::test]
    async fn get_paper_synthesizes_detail() {
        let mock = MockApi::new(library());
        let detail = mock.get_paper(2).await.unwrap();
        assert_eq!(detail.title, "Graph Neural Networks");
        assert!(detail.is_bookmarked);
        assert_eq!(detail.pdf_url, "https://arxiv.org/pdf/2401.00002");

        assert!(mock.get_paper(42).await.is_err());
        assert_eq!(
            mock.calls(),
            vec![Call::GetPaper(2), Call::GetPaper(42)]
        );
    }

    #[tokio::test]
    async fn saved_note_is_returned_with_detail() {
        let mock = MockApi::new(library());
        mock.add_bookmark(3, Some("fold proteins")).await.unwrap();

        let bookmark = mock.get_paper(3).await.unwrap().bookmark.unwrap();
        assert_eq!(bookmark.notes.as_deref(), Some("fold proteins"));
        assert!(bookmark.bookmarked_at.is_some());

        mock.remove_bookmark(3).await.unwrap();
        assert!(mock.get_paper(3).await.unwrap().bookmark.is_none());
    }
}
