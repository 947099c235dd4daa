#![deny(dead_code)]
use anyhow::{Context, Result};
use clap::Parser;
use log::info;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

mod config;
mod ui;
mod utils;

use crate::{
    config::Settings,
    ui::{ChatUI, UiAction},
};
use murmur::shell::TOAST_TIMEOUT_SECS;
use murmur::sim::EventReceiver;
use murmur::{MockData, Shell};

const DEFAULT_CHAT: &str = "1";
const DEFAULT_LOG_FILE: &str = "murmur.log";
const DEFAULT_LOG_LEVEL: &str = "debug";
const INPUT_POLL: Duration = Duration::from_millis(10);

/// Command line arguments for murmur
#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "murmur: a terminal messenger front end running on mock data.",
    long_about = "murmur shows chats, call history and status updates from a mock data set.\n\n\
    Calls, replies and notification permission are simulated with timers.\n\
    Settings saved with --save-config are used as defaults on the next start."
)]
struct Args {
    /// JSON file replacing the built-in mock data
    #[arg(long, value_name = "PATH")]
    data: Option<PathBuf>,

    /// Chat opened at start-up
    #[arg(long, value_name = "ID")]
    chat: Option<String>,

    /// Log file path
    #[arg(long, value_name = "PATH")]
    log_file: Option<PathBuf>,

    /// Log level (error, warn, info, debug, trace, off)
    #[arg(long, value_name = "LEVEL")]
    log_level: Option<String>,

    /// Settings file to read and write instead of the default location
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Store the effective settings for later runs
    #[arg(long)]
    save_config: bool,
}

impl Args {
    fn as_settings(&self) -> Settings {
        Settings {
            data_file: self.data.clone(),
            initial_chat: self.chat.clone(),
            log_file: self.log_file.clone(),
            log_level: self.log_level.clone(),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(path) = &args.config {
        config::set_config_path_override(path.clone());
    }
    let settings = args.as_settings().or(config::load_settings()?);

    let log_file_path = settings
        .log_file
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_LOG_FILE));
    let level = utils::parse_level(settings.log_level.as_deref().unwrap_or(DEFAULT_LOG_LEVEL))?;
    utils::setup_logging(Some(&log_file_path), level)?;

    info!("murmur starting up");
    info!("System information: {} {}", std::env::consts::OS, std::env::consts::ARCH);
    info!("Logging to file: {}", log_file_path.display());

    if args.save_config {
        config::save_settings(&settings)?;
    }

    let data = match &settings.data_file {
        Some(path) => MockData::from_path(path)
            .with_context(|| format!("Failed to load mock data from {}", path.display()))?,
        None => MockData::builtin()?,
    };
    info!(
        "Loaded {} contacts, {} calls, {} statuses",
        data.contacts.len(),
        data.calls.len(),
        data.statuses.len()
    );

    let initial_chat = settings.initial_chat.as_deref().unwrap_or(DEFAULT_CHAT);
    let (shell, mut events_rx) = Shell::new(data, Some(initial_chat));

    let mut terminal = ui::setup_terminal()?;
    let mut chat_ui = ChatUI::new(shell, INPUT_POLL);

    let result = run_main_loop(&mut chat_ui, &mut terminal, &mut events_rx).await;

    ui::restore_terminal(terminal)?;
    info!("murmur shutting down");
    result
}

/// Run the main event loop
async fn run_main_loop(
    chat_ui: &mut ChatUI,
    terminal: &mut ui::Terminal<ui::CrosstermBackend<io::Stdout>>,
    events_rx: &mut EventReceiver,
) -> Result<()> {
    loop {
        terminal.draw(|f| chat_ui.draw(f))?;

        chat_ui.shell.clean_toasts(TOAST_TIMEOUT_SECS);

        if chat_ui.handle_input()? == UiAction::Quit {
            break;
        }

        // Apply whatever the timers produced since the last frame
        chat_ui.shell.pump(events_rx);
        tokio::task::yield_now().await;
    }
    Ok(())
}
