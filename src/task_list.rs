//! Ordered, 1-indexed collection of tasks.
//!
//! Position is the only identity a task has: removing task `n` shifts every
//! later task down by one.

use crate::error::{DanError, Result};
use crate::task::Task;

#[derive(Debug, Default, Clone, PartialEq)]
pub struct TaskList {
    tasks: Vec<Task>,
}

impl TaskList {
    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Task> {
        self.tasks.iter()
    }

    /// Append a task; returns the new count.
    pub fn add(&mut self, task: Task) -> usize {
        self.tasks.push(task);
        self.tasks.len()
    }

    /// Convert a user-facing 1-based index into a vector position.
    fn position(&self, index: i64) -> Result<usize> {
        if index < 1 || index > self.tasks.len() as i64 {
            return Err(DanError::InvalidIndex { index, size: self.tasks.len() });
        }
        Ok(index as usize - 1)
    }

    pub fn get(&self, index: i64) -> Result<&Task> {
        let pos = self.position(index)?;
        Ok(&self.tasks[pos])
    }

    /// Set the completion flag of task `index`; returns the updated task.
    pub fn set_done(&mut self, index: i64, done: bool) -> Result<&Task> {
        let pos = self.position(index)?;
        let task = &mut self.tasks[pos];
        task.set_done(done);
        Ok(task)
    }

    /// Remove task `index` and hand it back.
    pub fn remove(&mut self, index: i64) -> Result<Task> {
        let pos = self.position(index)?;
        Ok(self.tasks.remove(pos))
    }

    /// Tasks whose description contains `keyword` (case-sensitive), paired
    /// with their 1-based position in the full list.
    pub fn find(&self, keyword: &str) -> Vec<(usize, &Task)> {
        self.tasks
            .iter()
            .enumerate()
            .filter(|(_, t)| t.description().contains(keyword))
            .map(|(i, t)| (i + 1, t))
            .collect()
    }

    /// Numbered listing, one `n.[ ] description` line per task.
    pub fn render(&self) -> String {
        render_numbered(self.tasks.iter().enumerate().map(|(i, t)| (i + 1, t)))
    }
}

impl From<Vec<Task>> for TaskList {
    fn from(tasks: Vec<Task>) -> Self {
        TaskList { tasks }
    }
}

/// Render `(number, task)` pairs as `n.[ ] description` lines.
pub fn render_numbered<'a>(items: impl IntoIterator<Item = (usize, &'a Task)>) -> String {
    items
        .into_iter()
        .map(|(n, t)| format!("{}.{}", n, t.render()))
        .collect::<Vec<_>>()
        .join("\n")
}
