use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

/// Chatty task tracker for to-dos, deadlines and events.
/// Storage defaults to ~/.dan/tasks.txt or a path passed via --data.
#[derive(Parser)]
#[command(name = "dan", version, about = "Chatty command-line task tracker")]
pub struct Cli {
    /// Path to the save file.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Without a subcommand, starts a line-by-line console session.
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start a session in the full-screen terminal UI.
    Ui,

    /// Export all tasks as JSON.
    Export {
        /// Output file path (defaults to stdout).
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Generate shell completion scripts.
    Completions {
        /// Target shell.
        #[arg(value_enum)]
        shell: Shell,
    },
}
