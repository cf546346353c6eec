use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use paperdeck_core::{Controller, DetailOutcome, Display, PaperApi, Step};

use crate::tui_event::{BackendCommand, BackendEvent};

/// Own the controller and serve UI commands until the command channel
/// closes or `cancel` fires.
///
/// Commands are applied one at a time. Detail fetches are spawned so the
/// user can keep navigating; their outcomes come back through an internal
/// channel and the controller drops any that a newer transition superseded.
pub async fn run<A: PaperApi + 'static>(
    mut controller: Controller<A>,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    let (detail_tx, mut detail_rx) = mpsc::unbounded_channel::<DetailOutcome>();
    let mut out = Outbox::new(tx);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            maybe_cmd = cmd_rx.recv() => {
                let Some(cmd) = maybe_cmd else { break };
                tracing::debug!(?cmd, "backend command");
                let blocking = cmd.is_blocking();
                let previous = out.shown.clone();
                if blocking {
                    out.emit(&controller, Display::Loading);
                }
                let step = apply(&mut controller, cmd).await;
                match step {
                    // Take the spinner back down
                    Step::Unchanged if blocking => out.emit(&controller, previous),
                    step => dispatch(&controller, step, &mut out, &detail_tx),
                }
            }
            Some(outcome) = detail_rx.recv() => {
                if let Some(display) = controller.resolve_detail(outcome) {
                    out.emit(&controller, display);
                }
            }
        }
    }
    tracing::debug!("backend task stopped");
}

async fn apply<A: PaperApi + 'static>(controller: &mut Controller<A>, cmd: BackendCommand) -> Step {
    match cmd {
        BackendCommand::LoadInitial => controller.load_initial().await,
        BackendCommand::Search(query) => controller.submit_search(&query).await,
        BackendCommand::ClearSearch => controller.clear_search().await,
        BackendCommand::ToggleBookmarksView => controller.toggle_bookmarks_view().await,
        BackendCommand::Navigate(direction) => controller.navigate(direction),
        BackendCommand::ToggleBookmark { notes } => {
            controller.toggle_bookmark(notes.as_deref()).await
        }
        BackendCommand::Redisplay => controller.redisplay().await,
    }
}

fn dispatch<A: PaperApi + 'static>(
    controller: &Controller<A>,
    step: Step,
    out: &mut Outbox,
    detail_tx: &mpsc::UnboundedSender<DetailOutcome>,
) {
    match step {
        Step::Unchanged => {}
        Step::Show(display) => out.emit(controller, display),
        Step::Load(ticket) => {
            out.emit(controller, Display::Loading);
            let fetch = controller.fetch_detail(ticket);
            let detail_tx = detail_tx.clone();
            tokio::spawn(async move {
                let _ = detail_tx.send(fetch.await);
            });
        }
    }
}

/// Event sender that remembers the last display it put on screen.
struct Outbox {
    tx: mpsc::UnboundedSender<BackendEvent>,
    shown: Display,
}

impl Outbox {
    fn new(tx: mpsc::UnboundedSender<BackendEvent>) -> Self {
        Self {
            tx,
            shown: Display::Loading,
        }
    }

    fn emit<A: PaperApi + 'static>(&mut self, controller: &Controller<A>, display: Display) {
        self.shown = display.clone();
        let _ = self.tx.send(BackendEvent::Updated {
            header: controller.header(),
            display,
        });
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use paperdeck_core::api::mock::{MockReply, Op};
    use paperdeck_core::{BrowseSettings, Direction, Header, Mode, MockApi, PaperSummary};

    use super::*;

    struct Harness {
        cmd_tx: mpsc::UnboundedSender<BackendCommand>,
        event_rx: mpsc::UnboundedReceiver<BackendEvent>,
        cancel: CancellationToken,
    }

    impl Harness {
        fn start(api: MockApi) -> Self {
            let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
            let (event_tx, event_rx) = mpsc::unbounded_channel();
            let cancel = CancellationToken::new();
            let controller = Controller::new(api, BrowseSettings::default());
            tokio::spawn(run(controller, cmd_rx, event_tx, cancel.clone()));
            Self {
                cmd_tx,
                event_rx,
                cancel,
            }
        }

        fn send(&self, cmd: BackendCommand) {
            self.cmd_tx.send(cmd).unwrap();
        }

        /// Next event that is not a loading placeholder.
        async fn settled(&mut self) -> (Header, Display) {
            loop {
                let event = tokio::time::timeout(Duration::from_secs(5), self.event_rx.recv())
                    .await
                    .expect("backend event")
                    .expect("channel open");
                let BackendEvent::Updated { header, display } = event;
                if display != Display::Loading {
                    return (header, display);
                }
            }
        }
    }

    fn library(n: i64) -> Vec<PaperSummary> {
        (1..=n)
            .map(|id| PaperSummary::new(id, format!("Paper {id}")))
            .collect()
    }

    fn page_of(display: &Display) -> String {
        match display {
            Display::Paper(view) => view.page.label(),
            other => panic!("expected a paper, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn initial_load_emits_loading_then_paper() {
        let mut h = Harness::start(MockApi::new(library(3)));
        h.send(BackendCommand::LoadInitial);

        let BackendEvent::Updated { display, .. } = h.event_rx.recv().await.unwrap();
        assert_eq!(display, Display::Loading);

        let (header, display) = h.settled().await;
        assert_eq!(page_of(&display), "1 / 3");
        assert_eq!(header.mode, Mode::All);
        assert_eq!(header.total, 3);
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn navigation_renders_newest_position() {
        let mut h = Harness::start(MockApi::new(library(3)));
        h.send(BackendCommand::LoadInitial);
        h.settled().await;

        h.send(BackendCommand::Navigate(Direction::Next));
        assert_eq!(page_of(&h.settled().await.1), "2 / 3");
        h.send(BackendCommand::Navigate(Direction::Next));
        assert_eq!(page_of(&h.settled().await.1), "3 / 3");
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn rapid_navigation_only_renders_latest() {
        let api = MockApi::new(library(4)).with_delay(Duration::from_millis(20));
        let mut h = Harness::start(api);
        h.send(BackendCommand::LoadInitial);
        h.settled().await;

        h.send(BackendCommand::Navigate(Direction::Next));
        h.send(BackendCommand::Navigate(Direction::Next));
        h.send(BackendCommand::Navigate(Direction::Next));
        assert_eq!(page_of(&h.settled().await.1), "4 / 4");
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn short_search_reports_error_in_page() {
        let mut h = Harness::start(MockApi::new(library(2)));
        h.send(BackendCommand::LoadInitial);
        h.settled().await;

        h.send(BackendCommand::Search("x".into()));
        let (header, display) = h.settled().await;
        assert_eq!(
            display,
            Display::error(paperdeck_core::controller::QUERY_TOO_SHORT)
        );
        assert_eq!(header.mode, Mode::All);
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn failed_bookmarks_view_reports_fixed_message() {
        let api = MockApi::new(library(2)).push(Op::ListBookmarks, MockReply::Error("HTTP 500".into()));
        let mut h = Harness::start(api);
        h.send(BackendCommand::LoadInitial);
        h.settled().await;

        h.send(BackendCommand::ToggleBookmarksView);
        let (_, display) = h.settled().await;
        assert_eq!(display, Display::error("Failed to load bookmarks"));
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn ignored_bookmark_toggle_restores_previous_display() {
        let mut h = Harness::start(MockApi::default());
        h.send(BackendCommand::LoadInitial);
        assert_eq!(h.settled().await.1, Display::Empty);

        // Nothing to bookmark: the spinner goes up and comes straight back down
        h.send(BackendCommand::ToggleBookmark { notes: None });
        let BackendEvent::Updated { display, .. } = h.event_rx.recv().await.unwrap();
        assert_eq!(display, Display::Loading);
        let BackendEvent::Updated { display, .. } = h.event_rx.recv().await.unwrap();
        assert_eq!(display, Display::Empty);
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn navigation_past_end_emits_nothing() {
        let mut h = Harness::start(MockApi::new(library(1)));
        h.send(BackendCommand::LoadInitial);
        h.settled().await;

        h.send(BackendCommand::Navigate(Direction::Next));
        h.send(BackendCommand::Redisplay);
        // The first event after the no-op belongs to the redisplay
        let BackendEvent::Updated { display, .. } = h.event_rx.recv().await.unwrap();
        assert_eq!(display, Display::Loading);
        assert_eq!(page_of(&h.settled().await.1), "1 / 1");
        h.cancel.cancel();
    }

    #[tokio::test]
    async fn closing_command_channel_stops_task() {
        let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
        let (event_tx, _event_rx) = mpsc::unbounded_channel();
        let controller = Controller::new(MockApi::default(), BrowseSettings::default());
        let handle = tokio::spawn(run(controller, cmd_rx, event_tx, CancellationToken::new()));
        drop(cmd_tx);
        tokio::time::timeout(Duration::from_secs(5), handle)
            .await
            .expect("task finished")
            .unwrap();
    }
}
