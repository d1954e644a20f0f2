//! Save-file handling.
//!
//! The save file holds one task record per line (see [`Task::to_record`]).
//! Loading is lenient: corrupt lines are reported and skipped so one bad line
//! never costs the user the rest of their list.

use std::fs::{self, File};
use std::io::{self, BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{DanError, Result};
use crate::task::Task;
use crate::task_list::TaskList;

/// Outcome of loading a save file.
#[derive(Debug, Default)]
pub struct LoadReport {
    pub tasks: TaskList,
    /// Records that failed to decode, in file order.
    pub skipped: Vec<DanError>,
}

/// File-backed persistence for a task list.
#[derive(Debug, Clone)]
pub struct Storage {
    path: PathBuf,
}

impl Storage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Storage { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load all tasks, starting empty when the file doesn't exist yet.
    pub fn load(&self) -> Result<LoadReport> {
        if !self.path.exists() {
            info!(path = %self.path.display(), "no save file, starting fresh");
            return Ok(LoadReport::default());
        }

        let reader = BufReader::new(File::open(&self.path)?);
        let mut tasks = Vec::new();
        let mut skipped = Vec::new();
        for (i, raw) in reader.split(b'\n').enumerate() {
            let mut raw = raw?;
            if raw.last() == Some(&b'\r') {
                raw.pop();
            }
            let decoded = String::from_utf8(raw).map_err(|e| DanError::CorruptRecord {
                line: i + 1,
                reason: format!("not valid UTF-8 ({e})"),
            });
            let record = decoded.and_then(|line| {
                if line.trim().is_empty() {
                    Ok(None)
                } else {
                    Task::from_record(&line, i + 1).map(Some)
                }
            });
            match record {
                Ok(None) => {}
                Ok(Some(task)) => tasks.push(task),
                Err(e) => {
                    warn!(error = %e, "skipping record");
                    skipped.push(e);
                }
            }
        }

        info!(path = %self.path.display(), loaded = tasks.len(), skipped = skipped.len(), "save file loaded");
        Ok(LoadReport {
            tasks: TaskList::from(tasks),
            skipped,
        })
    }

    /// Write every task using an atomic write (temp file + rename).
    pub fn save(&self, tasks: &TaskList) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("tmp");
        let mut f = File::create(&tmp)?;
        for task in tasks.iter() {
            writeln!(f, "{}", task.to_record())?;
        }
        f.flush()?;
        fs::rename(&tmp, &self.path)?;
        debug!(path = %self.path.display(), count = tasks.len(), "save file written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        let report = storage.load().unwrap();
        assert!(report.tasks.is_empty());
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("nested").join("tasks.txt"));

        let mut done = Task::deadline("return book", "2/12/2019 1800").unwrap();
        done.set_done(true);
        let tasks = TaskList::from(vec![
            Task::todo("read book").unwrap(),
            done,
            Task::event("project meeting", "6/8/2021 1400").unwrap(),
        ]);
        storage.save(&tasks).unwrap();

        let written = fs::read_to_string(storage.path()).unwrap();
        assert_eq!(
            written,
            "T | 0 | read book\nD | 1 | return book | 2/12/2019 1800\nE | 0 | project meeting | 6/8/2021 1400\n"
        );
        assert_eq!(storage.load().unwrap().tasks, tasks);
    }

    #[test]
    fn test_save_after_delete_renumbers() {
        let dir = tempdir().unwrap();
        let storage = Storage::new(dir.path().join("tasks.txt"));
        let mut tasks = TaskList::from(vec![
            Task::todo("a").unwrap(),
            Task::todo("b").unwrap(),
            Task::todo("c").unwrap(),
        ]);
        storage.save(&tasks).unwrap();
        tasks.remove(1).unwrap();
        storage.save(&tasks).unwrap();

        let loaded = storage.load().unwrap().tasks;
        assert_eq!(loaded.len(), 2);
        assert_eq!(loaded.get(1).unwrap().description(), "b");
    }

    #[test]
    fn test_invalid_utf8_line_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        let mut bytes = b"T | 0 | read book\r\nT | 0 | bad ".to_vec();
        bytes.extend_from_slice(&[0xff, 0xfe]);
        bytes.extend_from_slice(b"\nT | 1 | buy milk\n");
        fs::write(&path, bytes).unwrap();

        let report = Storage::new(&path).load().unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert_eq!(report.tasks.get(1).unwrap().description(), "read book");
        assert_eq!(report.tasks.get(2).unwrap().description(), "buy milk");
        assert_eq!(report.skipped.len(), 1);
        assert!(matches!(report.skipped[0], DanError::CorruptRecord { line: 2, .. }));
    }

    #[test]
    fn test_corrupt_lines_are_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("tasks.txt");
        fs::write(&path, "T | 0 | read book\nQ | 0 | what\n\nD | 1 | return book | soon\nT | 1 | buy milk\n").unwrap();

        let report = Storage::new(&path).load().unwrap();
        assert_eq!(report.tasks.len(), 2);
        assert!(report.tasks.get(2).unwrap().done);
        let lines: Vec<usize> = report
            .skipped
            .iter()
            .map(|e| match e {
                DanError::CorruptRecord { line, .. } => *line,
                other => panic!("unexpected error {other:?}"),
            })
            .collect();
        assert_eq!(lines, vec![2, 4]);
    }
}
