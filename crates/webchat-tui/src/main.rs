use std::fs::OpenOptions;
use std::sync::Mutex;
use anyhow::{Result, anyhow};
use tracing_subscriber::EnvFilter;
use webchat_core::Config;

mod app;
mod handler;
mod markdown;
mod tui;
mod ui;

use app::App;
use tui::{EventHandler, Tui};

const DEFAULT_LOG_FILTER: &str = "webchat_core=info,webchat_tui=info";

#[tokio::main]
async fn main() -> Result<()> {
    // The TUI owns the terminal, so logs go to a file
    if let Err(e) = init_logging() {
        eprintln!("Logging disabled: {e}");
    }

    tracing::info!("webchat v{} starting", env!("CARGO_PKG_VERSION"));

    let config = Config::load().unwrap_or_else(|e| {
        tracing::warn!("Config load failed, using defaults: {e}");
        Config::new()
    });

    tui::install_panic_hook();
    let mut terminal = tui::init()?;
    let mut app = App::new(&config);
    let mut events = EventHandler::new();

    let result = run(&mut terminal, &mut app, &mut events).await;

    tui::restore()?;
    tracing::info!(messages = app.conversation.messages().len(), "webchat exiting");
    result
}

async fn run(terminal: &mut Tui, app: &mut App, events: &mut EventHandler) -> Result<()> {
    while !app.should_quit {
        terminal.draw(|frame| ui::render(app, frame))?;

        match events.next().await {
            Some(event) => handler::handle_event(app, event),
            None => break,
        }

        app.poll_pending().await;
    }

    Ok(())
}

fn init_logging() -> Result<()> {
    let log_dir = dirs::data_local_dir()
        .ok_or_else(|| anyhow!("Could not determine data directory"))?
        .join("webchat");
    std::fs::create_dir_all(&log_dir)?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(log_dir.join("webchat.log"))?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(log_file))
        .with_ansi(false)
        .try_init()
        .map_err(|e| anyhow!("Failed to install logger: {e}"))?;

    Ok(())
}
