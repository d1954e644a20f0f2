//! # Dan - a chatty command-line task tracker
//!
//! Dan keeps a list of to-dos, deadlines and events and talks to you one line
//! at a time:
//!
//! ```text
//! todo read book
//! deadline return book /by 2/12/2019 1800
//! event project meeting /at 6/8/2021 1400
//! list
//! mark 2
//! unmark 2
//! find book
//! delete 1
//! bye
//! ```
//!
//! ## Front-ends
//!
//! - `dan` - line-by-line console session on stdin/stdout
//! - `dan ui` - full-screen terminal conversation view
//! - `dan export` - dump the task list as JSON
//! - `dan completions <shell>` - shell completion scripts
//!
//! Tasks are saved to `~/.dan/tasks.txt` (or `--data <path>`) after every change,
//! one ` | `-separated record per line. Set `DAN_DEBUG=1` to write a debug log
//! next to the save file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use clap_complete::{generate, Shell};
use tracing::warn;

pub mod cli;
pub mod console;
pub mod datetime;
pub mod error;
pub mod processor;
pub mod storage;
pub mod task;
pub mod task_list;
pub mod tui {
    pub mod app;
    pub mod colors;
    pub mod input;
    pub mod run;
}

use cli::{Cli, Commands};
use processor::CommandProcessor;
use storage::Storage;
use task::Task;

/// Route `tracing` output to `<data dir>/dan.log` when `DAN_DEBUG` is set.
fn setup_logging(data_dir: &Path) -> Result<()> {
    if std::env::var("DAN_DEBUG").is_err() {
        return Ok(());
    }
    let log_file = fs::File::create(data_dir.join("dan.log")).context("Failed to create log file")?;
    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("dan=debug")),
        )
        .init();
    Ok(())
}

/// Save file from `--data`, else `$HOME/.dan/tasks.txt`.
fn resolve_data_path(data: Option<PathBuf>) -> PathBuf {
    data.unwrap_or_else(|| {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
        PathBuf::from(home).join(".dan").join("tasks.txt")
    })
}

/// Load the save file once, before any command runs.
fn load_tasks(storage: &Storage) -> Result<task_list::TaskList> {
    let report = storage
        .load()
        .with_context(|| format!("Failed to read {}", storage.path().display()))?;
    for e in &report.skipped {
        warn!(error = %e, "record skipped");
        eprintln!("Skipping {e}");
    }
    Ok(report.tasks)
}

/// Create the data directory, start logging and point storage at the save file.
fn open_storage(data: Option<PathBuf>) -> Result<Storage> {
    let data_path = resolve_data_path(data);
    let data_dir = data_path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."))
        .to_path_buf();
    fs::create_dir_all(&data_dir)
        .with_context(|| format!("Failed to create data directory {}", data_dir.display()))?;
    setup_logging(&data_dir)?;
    Ok(Storage::new(data_path))
}

/// Generate shell completion scripts.
fn cmd_completions(shell: Shell) {
    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}

fn cmd_export(storage: &Storage, output: Option<PathBuf>) -> Result<()> {
    let tasks = load_tasks(storage)?;
    let tasks: Vec<&Task> = tasks.iter().collect();
    let json = serde_json::to_string_pretty(&tasks).context("Failed to serialise tasks")?;
    match output {
        Some(path) => {
            fs::write(&path, json).with_context(|| format!("Failed to write {}", path.display()))?;
            println!("Exported {} tasks to {}", tasks.len(), path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Completions { shell }) => {
            cmd_completions(shell);
            Ok(())
        }
        Some(Commands::Export { output }) => cmd_export(&open_storage(cli.data)?, output),
        Some(Commands::Ui) => {
            let storage = open_storage(cli.data)?;
            let processor = CommandProcessor::new(load_tasks(&storage)?);
            tui::run::run_tui(processor, storage).context("UI error")
        }
        None => {
            let storage = open_storage(cli.data)?;
            let mut processor = CommandProcessor::new(load_tasks(&storage)?);
            console::run_stdio(&mut processor, &storage)
        }
    }
}
