//! Task data structure and related functionality.
//!
//! A `Task` is a description plus a completion flag, and a `TaskKind` carrying
//! whatever extra data the variant needs. This module also owns the flat
//! record form used by the save file.

use std::fmt;

use chrono::NaiveDateTime;
use serde::Serialize;

use crate::datetime::{format_display, format_storage, parse_date_time};
use crate::error::{DanError, Result};

/// Field separator of the record form.
pub const RECORD_SEPARATOR: &str = " | ";

/// The three task variants.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum TaskKind {
    Todo,
    Deadline { by: NaiveDateTime },
    Event { at: NaiveDateTime },
}

impl TaskKind {
    /// Single-letter marker written at the front of a record.
    pub fn marker(&self) -> &'static str {
        match self {
            TaskKind::Todo => "T",
            TaskKind::Deadline { .. } => "D",
            TaskKind::Event { .. } => "E",
        }
    }

    /// Name used in user-facing messages.
    pub fn name(&self) -> &'static str {
        match self {
            TaskKind::Todo => "todo",
            TaskKind::Deadline { .. } => "deadline",
            TaskKind::Event { .. } => "event",
        }
    }
}

/// A single tracked item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Task {
    description: String,
    pub done: bool,
    #[serde(flatten)]
    pub kind: TaskKind,
}

impl Task {
    /// Create a not-done task. The description is trimmed and must not be empty.
    pub fn new(kind: TaskKind, description: &str) -> Result<Self> {
        let description = description.trim();
        if description.is_empty() {
            return Err(DanError::Validation(format!("description for your {}", kind.name())));
        }
        Ok(Task {
            description: description.to_string(),
            done: false,
            kind,
        })
    }

    pub fn todo(description: &str) -> Result<Self> {
        Task::new(TaskKind::Todo, description)
    }

    /// Create a deadline; `by` must match the `d/M/yyyy HHmm` grammar.
    pub fn deadline(description: &str, by: &str) -> Result<Self> {
        let by = parse_date_time(by)?;
        Task::new(TaskKind::Deadline { by }, description)
    }

    /// Create an event; `at` must match the `d/M/yyyy HHmm` grammar.
    pub fn event(description: &str, at: &str) -> Result<Self> {
        let at = parse_date_time(at)?;
        Task::new(TaskKind::Event { at }, description)
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn set_done(&mut self, done: bool) {
        self.done = done;
    }

    pub fn status_icon(&self) -> &'static str {
        if self.done { "X" } else { " " }
    }

    /// Display form, e.g. `[X] return book (by: Dec 2 2019, 6:00pm)`.
    pub fn render(&self) -> String {
        let mut out = format!("[{}] {}", self.status_icon(), self.description);
        match &self.kind {
            TaskKind::Todo => {}
            TaskKind::Deadline { by } => out.push_str(&format!(" (by: {})", format_display(by))),
            TaskKind::Event { at } => out.push_str(&format!(" (at: {})", format_display(at))),
        }
        out
    }

    /// Flat record form: `kind | done | description [| date]`.
    pub fn to_record(&self) -> String {
        let flag = if self.done { "1" } else { "0" };
        let date = match &self.kind {
            TaskKind::Todo => None,
            TaskKind::Deadline { by } => Some(format_storage(by)),
            TaskKind::Event { at } => Some(format_storage(at)),
        };
        let mut fields = vec![self.kind.marker(), flag, self.description.as_str()];
        if let Some(date) = date.as_deref() {
            fields.push(date);
        }
        fields.join(RECORD_SEPARATOR)
    }

    /// Decode a record produced by `to_record`. `line` is only used for error reporting.
    ///
    /// Kind and flag are read from the front and the date from the back, so a
    /// description may itself contain the separator.
    pub fn from_record(record: &str, line: usize) -> Result<Self> {
        let corrupt = |reason: String| DanError::CorruptRecord { line, reason };

        let mut parts = record.splitn(3, RECORD_SEPARATOR);
        let marker = parts.next().unwrap_or_default();
        let flag = parts.next().ok_or_else(|| corrupt("missing completion flag".into()))?;
        let rest = parts.next().ok_or_else(|| corrupt("missing description".into()))?;

        let done = match flag {
            "0" => false,
            "1" => true,
            other => return Err(corrupt(format!("invalid completion flag '{other}'"))),
        };

        let split_date = |rest: &str| -> Result<(String, NaiveDateTime)> {
            let (description, date) = rest
                .rsplit_once(RECORD_SEPARATOR)
                .ok_or_else(|| corrupt("missing date field".into()))?;
            let date = parse_date_time(date).map_err(|_| corrupt(format!("invalid date '{date}'")))?;
            Ok((description.to_string(), date))
        };

        let (description, kind) = match marker {
            "T" => (rest.to_string(), TaskKind::Todo),
            "D" => {
                let (description, by) = split_date(rest)?;
                (description, TaskKind::Deadline { by })
            }
            "E" => {
                let (description, at) = split_date(rest)?;
                (description, TaskKind::Event { at })
            }
            other => return Err(corrupt(format!("unknown task kind '{other}'"))),
        };

        let mut task = Task::new(kind, &description).map_err(|_| corrupt("empty description".into()))?;
        task.done = done;
        Ok(task)
    }
}

impl fmt::Display for Task {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}
