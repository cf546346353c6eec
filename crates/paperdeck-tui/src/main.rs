use std::io;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use paperdeck_core::config_file::{load_config, read_config};
use paperdeck_core::{ApiClient, Controller, Overrides, Settings};

mod action;
mod app;
mod backend;
mod input;
mod logging;
mod theme;
mod tui_event;
mod view;

use app::App;

/// Paperdeck: browse, search and bookmark research papers from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Backend origin, e.g. http://127.0.0.1:8000 (env: PAPERDECK_URL)
    #[arg(long)]
    url: Option<String>,

    /// Config file to use instead of the default locations
    #[arg(long)]
    config: Option<PathBuf>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Papers fetched per list (1-100)
    #[arg(long)]
    page_size: Option<u32>,

    /// Maximum search results (1-100)
    #[arg(long)]
    search_limit: Option<u32>,

    /// Log file path
    #[arg(long)]
    log_file: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Resolve config from CLI flags > env vars > config file > defaults
    let file = match &args.config {
        Some(path) => read_config(path)
            .with_context(|| format!("loading config {}", path.display()))?,
        None => load_config(),
    };
    let cli = Overrides {
        base_url: args.url.clone(),
        page_size: args.page_size,
        search_limit: args.search_limit,
        theme: args.theme.clone(),
        ..Default::default()
    };
    let settings = Settings::resolve(&file, &Overrides::from_env(), &cli);

    let log_path = args.log_file.clone().unwrap_or_else(logging::default_log_path);
    let _log_guard = logging::init(&log_path, &settings.log_level)?;
    tracing::info!(
        base_url = %settings.base_url,
        page_size = settings.browse.page_size,
        search_limit = settings.browse.search_limit,
        "starting"
    );

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(
        settings.base_url.clone(),
        theme::Theme::from_name(&settings.theme),
    );

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel::<tui_event::BackendCommand>();
    let cancel = CancellationToken::new();

    let api = ApiClient::new(&settings.base_url, settings.timeout);
    let controller = Controller::new(api, settings.browse);
    tokio::spawn(backend::run(controller, cmd_rx, event_tx, cancel.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let cancel_for_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            cancel_for_signal.cancel();
        }
    });

    let _ = cmd_tx.send(tui_event::BackendCommand::LoadInitial);
    app.backend_cmd_tx = Some(cmd_tx);

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(backend_event) = maybe_event {
                    app.handle_backend_event(backend_event);
                    // Drain any additional queued backend events
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_backend_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false) {
                    if let Ok(evt) = event::read() {
                        let action = input::map_event(&evt, &app.input_mode);
                        app.update(action);
                    }
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || cancel.is_cancelled() {
            cancel.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    tracing::info!("stopped");

    Ok(())
}
