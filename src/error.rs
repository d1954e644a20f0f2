//! Error types for command handling and record decoding.
//!
//! The `Display` text of every variant is what the user sees: the command
//! processor turns any `DanError` into its reply string verbatim.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum DanError {
    /// Required free text (a description or a search keyword) is missing.
    #[error("Please provide me a {0}")]
    Validation(String),

    /// The command remainder does not have the expected shape.
    #[error("Please follow the following format:\n  {usage}")]
    Format { usage: &'static str },

    #[error("Please use the format d/M/yyyy HHmm for dates, e.g. 2/12/2019 1800 (got \"{0}\")")]
    DateFormat(String),

    #[error("Task number {index} doesn't exist! You have {size} tasks")]
    InvalidIndex { index: i64, size: usize },

    #[error("Please use a task number instead of \"{0}\"")]
    NotANumber(String),

    #[error("Sorry, I don't know what \"{0}\" means")]
    UnknownCommand(String),

    #[error("Your list is empty!")]
    EmptyList,

    #[error("Corrupt record on line {line}: {reason}")]
    CorruptRecord { line: usize, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, DanError>;
