#![forbid(unsafe_code)]

mod clipboard;
mod color_rules;
mod config;
mod constants;
mod dispatch;
mod error;
mod gui;
mod hotkeys;
mod record;
mod resolver;
mod sequence;
mod view;

use std::path::{Path, PathBuf};
use std::sync::mpsc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};
use tracing::{error, info, Level as TraceLevel};
use tracing_subscriber::FmtSubscriber;

use hotkeys::spawn_listener;
use resolver::Resolution;

/// Step through JSON records and copy their fields to the clipboard
#[derive(Debug, Parser)]
#[command(name = "copyloto", version, about, args_conflicts_with_subcommands = true)]
struct Cli {
    /// JSON file to load on startup
    file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Resolve a JSON file and print what would be loaded, without opening the panel
    Inspect {
        file: PathBuf,
    },
}

/// Summary printed by `inspect`
fn inspect_report(resolution: &Resolution) -> Value {
    let needs_user_input = resolution.needs_user_input();
    match resolution {
        Resolution::Ready { config, records } => json!({
            "status": "ready",
            "needs_user_input": needs_user_input,
            "config": config,
            "record_count": records.len(),
            "first_record": records.first(),
        }),
        Resolution::NeedsSelection { candidates } => json!({
            "status": "needs_selection",
            "needs_user_input": needs_user_input,
            "candidates": candidates,
        }),
    }
}

fn inspect(path: &Path) -> anyhow::Result<()> {
    let document = resolver::load_path(path).with_context(|| format!("Failed to load {}", path.display()))?;
    let resolution = resolver::resolve(&document).with_context(|| format!("Failed to resolve {}", path.display()))?;
    let report = serde_json::to_string_pretty(&inspect_report(&resolution)).context("Failed to serialize report")?;
    println!("{report}");
    Ok(())
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse log level from environment variable
    let log_level = match std::env::var("LOG_LEVEL")
        .unwrap_or_else(|_| "info".to_string())
        .to_lowercase()
        .as_str()
    {
        "trace" => TraceLevel::TRACE,
        "debug" => TraceLevel::DEBUG,
        "warn" => TraceLevel::WARN,
        "error" => TraceLevel::ERROR,
        _ => TraceLevel::INFO,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    if let Some(Command::Inspect { file }) = cli.command {
        inspect(&file)?;
        return Ok(());
    }

    // Channel for hotkey threads -> panel
    let (hotkey_tx, hotkey_rx) = mpsc::channel();

    // Hotkey listener is optional - the panel falls back to in-window shortcuts
    let hotkey_rx = if hotkeys::check_permissions() {
        match spawn_listener(hotkey_tx) {
            Ok(handles) => {
                info!(threads = handles.len(), "Global hotkeys enabled (Ctrl+Arrows, F9, Ctrl+Space)");
                Some(hotkey_rx)
            }
            Err(e) => {
                error!(error = %e, "Failed to start hotkey listener");
                hotkeys::print_permission_error();
                None
            }
        }
    } else {
        hotkeys::print_permission_error();
        None
    };

    gui::run_panel(hotkey_rx, cli.file)?;
    Ok(())
}
