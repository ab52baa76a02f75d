#![deny(dead_code)]
use anyhow::{Context, Result};
use clap::Parser;
use crossterm::event::{self, Event, KeyEventKind};
use log::{error, info, LevelFilter};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

mod ui;
mod utils;

use crate::ui::ChatUI;
use mockchat::config::{self, AppConfig, LOG_FILE, STORAGE_FILE};
use mockchat::controller::ChatController;
use mockchat::simulator::{ReplyRouting, SimulatorEvent};
use mockchat::storage::{ChatStore, FileStorage, KeyValueStore, MemoryStorage};

/// Seconds a status notice stays on screen
const NOTICE_TIMEOUT_SECS: i64 = 3;

/// Command line arguments for mockchat
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "mockchat: a local-only chat mockup with simulated replies.",
    long_about = "mockchat keeps a contact list and per-contact message history on disk \
    and answers every message you send with a canned reply after a short, random delay.\n\n\
    Nothing leaves this machine."
)]
struct Args {
    /// Directory holding storage.json and the log file
    #[arg(long, value_name = "PATH")]
    data_dir: Option<PathBuf>,

    /// Config file (defaults to <config dir>/mockchat/config.json)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Log file (defaults to <data dir>/mockchat.log)
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level: error, warn, info, debug or trace
    #[arg(long, default_value = "info")]
    log_level: LevelFilter,

    /// Keep everything in memory; nothing is written to disk
    #[arg(long)]
    memory: bool,

    /// Start fresh: drop contacts, history and the open conversation
    #[arg(long)]
    fresh: bool,

    /// File replies under whichever contact is open when they arrive
    #[arg(long)]
    legacy_replies: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = match &args.config {
        Some(path) => path.clone(),
        None => config::default_config_path()?,
    };
    let mut app_config: AppConfig = config::load_config(&config_path)?;
    if args.legacy_replies {
        app_config.simulator.routing = ReplyRouting::FollowSelection;
    }

    let data_dir = app_config.resolve_data_dir(args.data_dir.as_deref())?;
    std::fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    let log_file_path = args.log_file.clone().unwrap_or_else(|| data_dir.join(LOG_FILE));
    utils::setup_logging(Some(&log_file_path), args.log_level)?;

    info!("mockchat starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", log_file_path.display());

    let backend: Arc<dyn KeyValueStore> = if args.memory {
        info!("Using in-memory storage");
        Arc::new(MemoryStorage::new())
    } else {
        let storage_path = data_dir.join(STORAGE_FILE);
        Arc::new(
            FileStorage::open(&storage_path)
                .with_context(|| format!("Failed to open storage {}", storage_path.display()))?,
        )
    };
    let store = ChatStore::new(backend, app_config.storage_keys.clone());
    let (controller, mut events_rx) = ChatController::new(store, app_config.page_config());
    info!("Reply routing: {:?}", app_config.simulator.routing);

    if args.fresh {
        controller.reset_for_fresh_start()?;
    }
    let contacts = controller.load().context("Failed to load stored conversations")?;
    info!("Loaded {} conversations", contacts.len());

    let mut terminal = ui::setup_terminal()?;
    let mut chat_ui = ChatUI::new();
    if let Err(e) = chat_ui.refresh(&controller) {
        error!("Failed to read settings: {}", e);
        chat_ui.show_notice(&format!("Storage error: {}", e));
    }

    let result = run_main_loop(&mut chat_ui, &mut terminal, &controller, &mut events_rx).await;

    controller.shutdown();
    ui::restore_terminal(terminal)?;

    if let Err(e) = &result {
        error!("Main loop ended with error: {}", e);
    }
    println!("Chat session ended.");
    result
}

async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ratatui::Terminal<ratatui::backend::CrosstermBackend<std::io::Stdout>>,
    controller: &ChatController,
    events_rx: &mut mpsc::UnboundedReceiver<SimulatorEvent>,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f))?;

        // Typing indicators and replies from the simulator
        while let Ok(sim_event) = events_rx.try_recv() {
            if let Err(e) = chat_ui.apply_simulator_event(controller, sim_event) {
                error!("Failed to apply simulator event: {}", e);
                chat_ui.show_notice(&format!("Storage error: {}", e));
            }
        }

        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    if let Err(e) = chat_ui.handle_key(controller, key) {
                        error!("Action failed: {}", e);
                        chat_ui.show_notice(&format!("Storage error: {}", e));
                    }
                }
            }
        }

        chat_ui.clean_notice(NOTICE_TIMEOUT_SECS);

        if chat_ui.should_quit() {
            info!("Quit requested");
            return Ok(());
        }

        // Let spawned reply tasks make progress between frames
        tokio::task::yield_now().await;
    }
}
