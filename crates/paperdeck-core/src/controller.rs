//! Navigation controller: turns user intents into backend calls and state
//! changes, and tells the caller what to display next.
//!
//! Showing a paper is always two-step. A transition commits the new list or
//! cursor and hands back a [`DetailTicket`]; the caller fetches the detail
//! (possibly concurrently with later transitions) and passes the outcome to
//! [`Controller::resolve_detail`]. Every committed transition bumps a
//! generation counter, so a detail response that was overtaken by a newer
//! transition is dropped instead of rendered.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::api::{PaperApi, RequestError};
use crate::model::{PaperDetail, PaperSummary};
use crate::nav::{Direction, Mode, NavigationState};
use crate::view::{Display, Header, PageIndicator, PaperView};

pub const LOAD_PAPERS_FAILED: &str = "Failed to load papers";
pub const SEARCH_FAILED: &str = "Search failed";
pub const LOAD_BOOKMARKS_FAILED: &str = "Failed to load bookmarks";
pub const LOAD_DETAIL_FAILED: &str = "Failed to load paper details";
pub const BOOKMARK_FAILED: &str = "Failed to update bookmark";
pub const QUERY_TOO_SHORT: &str = "Enter at least 2 characters to search";

/// Shortest accepted search query, in characters, after trimming.
pub const MIN_QUERY_CHARS: usize = 2;

/// Backend request sizes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BrowseSettings {
    /// `limit` for the unfiltered list.
    pub page_size: u32,
    /// `limit` for search requests.
    pub search_limit: u32,
}

impl Default for BrowseSettings {
    fn default() -> Self {
        Self {
            page_size: 100,
            search_limit: 100,
        }
    }
}

#[derive(Clone, Debug)]
struct Rollback {
    state: NavigationState,
    query: Option<String>,
}

/// A pending detail fetch for the paper under the cursor.
#[derive(Clone, Debug)]
pub struct DetailTicket {
    generation: u64,
    paper_id: i64,
    page: PageIndicator,
    rollback: Option<Rollback>,
}

impl DetailTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn paper_id(&self) -> i64 {
        self.paper_id
    }
}

/// A finished detail fetch, ready for [`Controller::resolve_detail`].
#[derive(Debug)]
pub struct DetailOutcome {
    pub ticket: DetailTicket,
    pub result: Result<PaperDetail, RequestError>,
}

/// What the caller should do after a transition.
#[derive(Debug)]
pub enum Step {
    /// Nothing changed; keep the current display.
    Unchanged,
    /// Show this and stop.
    Show(Display),
    /// State changed; fetch the current paper's detail.
    Load(DetailTicket),
}

pub type DetailFuture = Pin<Box<dyn Future<Output = DetailOutcome> + Send + 'static>>;

pub struct Controller<A> {
    api: Arc<A>,
    state: NavigationState,
    query: Option<String>,
    settings: BrowseSettings,
    generation: u64,
}

impl<A: PaperApi + 'static> Controller<A> {
    pub fn new(api: A, settings: BrowseSettings) -> Self {
        Self {
            api: Arc::new(api),
            state: NavigationState::default(),
            query: None,
            settings,
            generation: 0,
        }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    pub fn state(&self) -> &NavigationState {
        &self.state
    }

    /// The query behind the current search results, if any.
    pub fn query(&self) -> Option<&str> {
        self.query.as_deref()
    }

    pub fn header(&self) -> Header {
        Header {
            mode: self.state.mode(),
            query: self.query.clone(),
            total: self.state.items().len(),
        }
    }

    /// First fetch after startup.
    pub async fn load_initial(&mut self) -> Step {
        self.reload_all().await
    }

    /// Fetch the unfiltered list and switch to [`Mode::All`].
    pub async fn reload_all(&mut self) -> Step {
        let result = self
            .api
            .list_papers(self.settings.page_size, 0, false)
            .await;
        match result {
            Ok(resp) => {
                tracing::info!(
                    loaded = resp.papers.len(),
                    total = ?resp.total,
                    "loaded papers"
                );
                self.commit(resp.papers, Mode::All, None)
            }
            Err(err) => self.fail(LOAD_PAPERS_FAILED, Some(&err)),
        }
    }

    /// Run a keyword search. Queries shorter than [`MIN_QUERY_CHARS`] are
    /// rejected without a request.
    pub async fn submit_search(&mut self, query: &str) -> Step {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_CHARS {
            return self.fail(QUERY_TOO_SHORT, None);
        }

        let result = self
            .api
            .search_papers(query, self.settings.search_limit)
            .await;
        match result {
            Ok(papers) => {
                tracing::info!(query, hits = papers.len(), "search complete");
                self.commit(papers, Mode::Search, Some(query.to_string()))
            }
            Err(err) => self.fail(SEARCH_FAILED, Some(&err)),
        }
    }

    /// Drop the search and go back to the unfiltered list.
    pub async fn clear_search(&mut self) -> Step {
        self.reload_all().await
    }

    /// Switch to bookmarks, or back to the unfiltered list when already there.
    pub async fn toggle_bookmarks_view(&mut self) -> Step {
        if self.state.mode() == Mode::Bookmarks {
            return self.clear_search().await;
        }
        self.load_bookmarks().await
    }

    async fn load_bookmarks(&mut self) -> Step {
        let result = self.api.list_bookmarks().await;
        match result {
            Ok(papers) => {
                tracing::info!(loaded = papers.len(), "loaded bookmarks");
                self.commit(papers, Mode::Bookmarks, None)
            }
            Err(err) => self.fail(LOAD_BOOKMARKS_FAILED, Some(&err)),
        }
    }

    /// Move the cursor one paper. A no-op at either end of the list.
    pub fn navigate(&mut self, direction: Direction) -> Step {
        let rollback = self.snapshot();
        if !self.state.step(direction) {
            return Step::Unchanged;
        }
        self.generation += 1;
        self.load_current(Some(rollback))
    }

    /// Add or remove the bookmark on the paper under the cursor. `notes` is
    /// only sent when adding.
    pub async fn toggle_bookmark(&mut self, notes: Option<&str>) -> Step {
        let Some(paper) = self.state.current() else {
            return Step::Unchanged;
        };
        let (id, was_bookmarked) = (paper.id, paper.is_bookmarked);

        let result = if was_bookmarked {
            self.api.remove_bookmark(id).await
        } else {
            self.api.add_bookmark(id, notes).await.map(|record| {
                tracing::debug!(paper_id = id, bookmark = ?record.map(|r| r.id), "bookmark added");
            })
        };

        match result {
            Ok(()) => {
                if let Some(paper) = self.state.current_mut() {
                    paper.is_bookmarked = !was_bookmarked;
                }
                // The server already changed; a failed re-fetch must not undo the flag.
                self.generation += 1;
                self.load_current(None)
            }
            Err(err) => self.fail(BOOKMARK_FAILED, Some(&err)),
        }
    }

    /// Re-fetch the current paper, or retry the list for the current mode
    /// when nothing is loaded.
    pub async fn redisplay(&mut self) -> Step {
        if !self.state.is_empty() {
            self.generation += 1;
            return self.load_current(None);
        }
        match (self.state.mode(), self.query.clone()) {
            (Mode::Search, Some(query)) => self.submit_search(&query).await,
            (Mode::Bookmarks, _) => self.load_bookmarks().await,
            _ => self.reload_all().await,
        }
    }

    /// Fetch the detail named by `ticket`. The future owns everything it
    /// needs, so it can be spawned.
    pub fn fetch_detail(&self, ticket: DetailTicket) -> DetailFuture {
        let api = Arc::clone(&self.api);
        Box::pin(async move {
            let result = api.get_paper(ticket.paper_id).await;
            DetailOutcome { ticket, result }
        })
    }

    /// Turn a finished fetch into a display, or `None` if a newer transition
    /// has superseded it.
    pub fn resolve_detail(&mut self, outcome: DetailOutcome) -> Option<Display> {
        let DetailOutcome { ticket, result } = outcome;
        if ticket.generation != self.generation {
            tracing::debug!(
                paper_id = ticket.paper_id,
                generation = ticket.generation,
                latest = self.generation,
                "discarding stale detail"
            );
            return None;
        }

        match result {
            Ok(detail) => {
                if let Some(summary) = self.state.current_mut() {
                    if summary.id == detail.id {
                        summary.is_bookmarked = detail.is_bookmarked;
                    }
                }
                Some(Display::Paper(Box::new(PaperView::project(
                    &detail,
                    ticket.page,
                ))))
            }
            Err(err) => {
                tracing::warn!(paper_id = ticket.paper_id, error = %err, "{LOAD_DETAIL_FAILED}");
                if let Some(rollback) = ticket.rollback {
                    self.state = rollback.state;
                    self.query = rollback.query;
                }
                Some(Display::error(LOAD_DETAIL_FAILED))
            }
        }
    }

    /// Drive a step to its final display inline.
    pub async fn settle(&mut self, step: Step) -> Option<Display> {
        match step {
            Step::Unchanged => None,
            Step::Show(display) => Some(display),
            Step::Load(ticket) => {
                let outcome = self.fetch_detail(ticket).await;
                self.resolve_detail(outcome)
            }
        }
    }

    fn snapshot(&self) -> Rollback {
        Rollback {
            state: self.state.clone(),
            query: self.query.clone(),
        }
    }

    fn commit(&mut self, items: Vec<PaperSummary>, mode: Mode, query: Option<String>) -> Step {
        let rollback = self.snapshot();
        self.state.replace(items, mode);
        self.query = query;
        self.generation += 1;
        self.load_current(Some(rollback))
    }

    fn load_current(&self, rollback: Option<Rollback>) -> Step {
        match (self.state.current(), self.state.position()) {
            (Some(paper), Some(page)) => Step::Load(DetailTicket {
                generation: self.generation,
                paper_id: paper.id,
                page,
                rollback,
            }),
            _ => Step::Show(Display::Empty),
        }
    }

    /// Report a failure without touching navigation state. In-flight detail
    /// fetches are invalidated so they cannot replace the error.
    fn fail(&mut self, message: &'static str, err: Option<&RequestError>) -> Step {
        match err {
            Some(err) => tracing::warn!(error = %err, "{message}"),
            None => tracing::debug!("{message}"),
        }
        self.generation += 1;
        Step::Show(Display::error(message))
    }
}
