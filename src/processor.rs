//! Command parsing and dispatch.
//!
//! `CommandProcessor` owns the task list for the whole session. Each call to
//! [`CommandProcessor::process`] handles one raw input line and always returns
//! a [`Reply`]: every `DanError` raised while parsing or applying a command is
//! turned into the reply text here and goes no further.

use tracing::{debug, info, warn};

use crate::error::{DanError, Result};
use crate::task::Task;
use crate::task_list::{render_numbered, TaskList};

pub const GREETING: &str = "Hello! I'm Dan\nWhat can I do for you?";
pub const FAREWELL: &str = "Bye. Hope to see you again soon!";

const DEADLINE_USAGE: &str = "deadline <description> /by <d/M/yyyy HHmm>";
const EVENT_USAGE: &str = "event <description> /at <d/M/yyyy HHmm>";
const MARK_USAGE: &str = "mark <task number>";
const UNMARK_USAGE: &str = "unmark <task number>";
const DELETE_USAGE: &str = "delete <task number>";

/// One parsed line of input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Bye,
    List,
    Mark(i64),
    Unmark(i64),
    Delete(i64),
    Find(String),
    Todo(String),
    Deadline { description: String, by: String },
    Event { description: String, at: String },
}

impl Command {
    /// Parse a raw input line. The command word is case-sensitive.
    pub fn parse(input: &str) -> Result<Command> {
        let input = input.trim();
        let (word, rest) = match input.split_once(char::is_whitespace) {
            Some((word, rest)) => (word, rest.trim()),
            None => (input, ""),
        };

        match word {
            "bye" => Ok(Command::Bye),
            "list" => Ok(Command::List),
            "mark" => Ok(Command::Mark(parse_index(rest, MARK_USAGE)?)),
            "unmark" => Ok(Command::Unmark(parse_index(rest, UNMARK_USAGE)?)),
            "delete" => Ok(Command::Delete(parse_index(rest, DELETE_USAGE)?)),
            "find" => {
                if rest.is_empty() {
                    return Err(DanError::Validation("keyword to search for".into()));
                }
                Ok(Command::Find(rest.to_string()))
            }
            "todo" => {
                if rest.is_empty() {
                    return Err(DanError::Validation("description for your todo".into()));
                }
                Ok(Command::Todo(rest.to_string()))
            }
            "deadline" => {
                let (description, by) = split_on_marker(rest, "/by", DEADLINE_USAGE)?;
                Ok(Command::Deadline { description, by })
            }
            "event" => {
                let (description, at) = split_on_marker(rest, "/at", EVENT_USAGE)?;
                Ok(Command::Event { description, at })
            }
            other => Err(DanError::UnknownCommand(other.to_string())),
        }
    }
}

/// Parse the single task-number argument of mark/unmark/delete.
fn parse_index(rest: &str, usage: &'static str) -> Result<i64> {
    let mut tokens = rest.split_whitespace();
    let (Some(token), None) = (tokens.next(), tokens.next()) else {
        return Err(DanError::Format { usage });
    };
    token
        .parse::<i64>()
        .map_err(|_| DanError::NotANumber(token.to_string()))
}

/// Split `description <marker> date` into exactly two non-empty parts.
fn split_on_marker(rest: &str, marker: &str, usage: &'static str) -> Result<(String, String)> {
    let parts: Vec<&str> = rest.split(marker).map(str::trim).collect();
    match parts.as_slice() {
        [description, date] if !description.is_empty() && !date.is_empty() => {
            Ok((description.to_string(), date.to_string()))
        }
        _ => Err(DanError::Format { usage }),
    }
}

/// What a front-end should do after one line of input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Reply {
    /// Text to show the user; may span several lines.
    pub text: String,
    /// The session is over.
    pub exit: bool,
    /// The task list was modified and should be persisted.
    pub changed: bool,
}

impl Reply {
    fn message(text: impl Into<String>) -> Self {
        Reply { text: text.into(), ..Reply::default() }
    }

    fn changed(text: impl Into<String>) -> Self {
        Reply { text: text.into(), changed: true, ..Reply::default() }
    }
}

/// Interprets input lines against an exclusively owned task list.
#[derive(Debug, Default)]
pub struct CommandProcessor {
    tasks: TaskList,
    exited: bool,
}

impl CommandProcessor {
    pub fn new(tasks: TaskList) -> Self {
        CommandProcessor { tasks, exited: false }
    }

    pub fn tasks(&self) -> &TaskList {
        &self.tasks
    }

    pub fn is_exited(&self) -> bool {
        self.exited
    }

    /// Handle one line of input. Never fails: errors become the reply text.
    ///
    /// Once `bye` has been processed, further input is ignored and an empty
    /// reply with `exit` set is returned.
    pub fn process(&mut self, input: &str) -> Reply {
        if self.exited {
            warn!(input, "input received after exit, ignoring");
            return Reply { exit: true, ..Reply::default() };
        }

        let result = Command::parse(input).and_then(|command| {
            debug!(?command, "dispatching");
            self.execute(command)
        });

        match result {
            Ok(reply) => reply,
            Err(e) => {
                debug!(error = ?e, input, "command failed");
                Reply::message(e.to_string())
            }
        }
    }

    /// Apply an already-parsed command.
    pub fn execute(&mut self, command: Command) -> Result<Reply> {
        match command {
            Command::Bye => {
                self.exited = true;
                info!("session ended");
                Ok(Reply { text: FAREWELL.to_string(), exit: true, changed: false })
            }
            Command::List => self.list(),
            Command::Mark(index) => {
                let task = self.tasks.set_done(index, true)?;
                Ok(Reply::changed(format!("Hehe okay guess this is now done:\n  {task}")))
            }
            Command::Unmark(index) => {
                let task = self.tasks.set_done(index, false)?;
                Ok(Reply::changed(format!("Ooops, you haven't done this yet? Here ya go:\n  {task}")))
            }
            Command::Delete(index) => {
                let task = self.tasks.remove(index)?;
                info!(index, remaining = self.tasks.len(), "task deleted");
                Ok(Reply::changed(format!(
                    "Alright then, I'll remove this task from your list:\n  {}\nYou now have {} tasks in your list",
                    task,
                    self.tasks.len()
                )))
            }
            Command::Find(keyword) => Ok(self.find(&keyword)),
            Command::Todo(description) => self.add(Task::todo(&description)?),
            Command::Deadline { description, by } => self.add(Task::deadline(&description, &by)?),
            Command::Event { description, at } => self.add(Task::event(&description, &at)?),
        }
    }

    fn add(&mut self, task: Task) -> Result<Reply> {
        let text = format!("Okay okay, I'll add this task then:\n  {}", task);
        let count = self.tasks.add(task);
        info!(count, "task added");
        Ok(Reply::changed(format!("{text}\nYou now have {count} tasks in your list")))
    }

    fn list(&self) -> Result<Reply> {
        if self.tasks.is_empty() {
            return Err(DanError::EmptyList);
        }
        Ok(Reply::message(format!("Here are the tasks in your list:\n{}", self.tasks.render())))
    }

    fn find(&self, keyword: &str) -> Reply {
        let matches = self.tasks.find(keyword);
        if matches.is_empty() {
            return Reply::message(format!("I couldn't find any task that matches \"{keyword}\""));
        }
        Reply::message(format!(
            "Alright! Here are the matching tasks in your list:\n{}",
            render_numbered(matches)
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor_with(lines: &[&str]) -> CommandProcessor {
        let mut p = CommandProcessor::default();
        for line in lines {
            let reply = p.process(line);
            assert!(reply.changed, "setup line {line:?} failed: {}", reply.text);
        }
        p
    }

    #[test]
    fn test_todo_adds_task() {
        let mut p = CommandProcessor::default();
        let reply = p.process("todo read book");
        assert!(reply.changed);
        assert!(!reply.exit);
        assert!(reply.text.contains("[ ] read book"));
        assert!(reply.text.contains("You now have 1 tasks"));
        assert_eq!(p.tasks().len(), 1);
        assert!(!p.tasks().get(1).unwrap().done);
    }

    #[test]
    fn test_todo_without_description() {
        let mut p = CommandProcessor::default();
        for line in ["todo", "todo    "] {
            let reply = p.process(line);
            assert!(!reply.changed);
            assert_eq!(reply.text, "Please provide me a description for your todo");
        }
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn test_todo_only_strips_leading_word() {
        let mut p = CommandProcessor::default();
        p.process("todo write todo list");
        assert_eq!(p.tasks().get(1).unwrap().description(), "write todo list");
    }

    #[test]
    fn test_deadline_renders_date() {
        let mut p = CommandProcessor::default();
        let reply = p.process("deadline return book /by 2/12/2019 1800");
        assert!(reply.changed);
        assert!(reply.text.contains("[ ] return book (by: Dec 2 2019, 6:00pm)"));
    }

    #[test]
    fn test_deadline_format_errors() {
        let mut p = CommandProcessor::default();
        for line in [
            "deadline return book",
            "deadline /by 2/12/2019 1800",
            "deadline return book /by",
            "deadline a /by 2/12/2019 1800 /by 3/12/2019 1800",
        ] {
            assert_eq!(
                Command::parse(line).unwrap_err().to_string(),
                format!("Please follow the following format:\n  {DEADLINE_USAGE}")
            );
            assert!(!p.process(line).changed);
        }
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn test_deadline_bad_date() {
        let mut p = CommandProcessor::default();
        let reply = p.process("deadline return book /by Sunday");
        assert!(!reply.changed);
        assert!(reply.text.starts_with("Please use the format d/M/yyyy HHmm"));
        assert!(p.tasks().is_empty());
    }

    #[test]
    fn test_event() {
        let mut p = CommandProcessor::default();
        let reply = p.process("event project meeting /at 6/8/2021 1400");
        assert!(reply.text.contains("[ ] project meeting (at: Aug 6 2021, 2:00pm)"));
        assert!(matches!(
            Command::parse("event project meeting /by 6/8/2021 1400"),
            Err(DanError::Format { usage: EVENT_USAGE })
        ));
    }

    #[test]
    fn test_mark_and_unmark() {
        let mut p = processor_with(&["todo read book", "todo return book"]);
        let reply = p.process("mark 2");
        assert!(reply.text.ends_with("  [X] return book"));
        assert!(p.tasks().get(2).unwrap().done);
        assert!(!p.tasks().get(1).unwrap().done);

        let again = p.process("mark 2");
        assert!(again.changed);
        assert!(p.tasks().get(2).unwrap().done);

        let reply = p.process("unmark 2");
        assert!(reply.text.ends_with("  [ ] return book"));
        assert!(!p.tasks().get(2).unwrap().done);
    }

    #[test]
    fn test_index_bounds() {
        let mut p = processor_with(&["todo read book", "todo return book"]);
        let before = p.tasks().clone();
        for line in ["mark 0", "mark -1", "mark 3", "unmark 0", "unmark 3", "delete 0", "delete 3"] {
            let reply = p.process(line);
            assert!(!reply.changed, "{line}");
            assert!(reply.text.contains("doesn't exist"), "{line}: {}", reply.text);
        }
        assert_eq!(p.tasks(), &before);
    }

    #[test]
    fn test_index_not_a_number() {
        assert!(matches!(Command::parse("mark two"), Err(DanError::NotANumber(t)) if t == "two"));
        assert!(matches!(Command::parse("delete 1.5"), Err(DanError::NotANumber(_))));
        assert!(matches!(Command::parse("mark"), Err(DanError::Format { usage: MARK_USAGE })));
        assert!(matches!(Command::parse("unmark 1 2"), Err(DanError::Format { usage: UNMARK_USAGE })));
    }

    #[test]
    fn test_delete_shifts_indices() {
        let mut p = processor_with(&["todo a", "todo b", "todo c"]);
        let reply = p.process("delete 2");
        assert!(reply.changed);
        assert!(reply.text.contains("  [ ] b"));
        assert!(reply.text.ends_with("You now have 2 tasks in your list"));
        assert_eq!(p.tasks().get(2).unwrap().description(), "c");
    }

    #[test]
    fn test_list() {
        let mut p = CommandProcessor::default();
        let reply = p.process("list");
        assert_eq!(reply.text, "Your list is empty!");
        assert!(!reply.exit);

        p.process("todo read book");
        p.process("mark 1");
        p.process("todo return book");
        assert_eq!(
            p.process("list").text,
            "Here are the tasks in your list:\n1.[X] read book\n2.[ ] return book"
        );
    }

    #[test]
    fn test_find() {
        let mut p = processor_with(&["todo read book", "todo buy milk", "todo return book"]);
        let reply = p.process("find book");
        assert!(!reply.changed);
        assert_eq!(
            reply.text,
            "Alright! Here are the matching tasks in your list:\n1.[ ] read book\n3.[ ] return book"
        );

        let none = p.process("find Book");
        assert_eq!(none.text, "I couldn't find any task that matches \"Book\"");

        assert!(matches!(Command::parse("find"), Err(DanError::Validation(_))));
    }

    #[test]
    fn test_unknown_command() {
        let mut p = CommandProcessor::default();
        assert_eq!(p.process("blah").text, "Sorry, I don't know what \"blah\" means");
        assert_eq!(p.process("Todo read").text, "Sorry, I don't know what \"Todo\" means");
        assert!(p.process("").text.contains("don't know"));
    }

    #[test]
    fn test_bye_ends_session() {
        let mut p = processor_with(&["todo read book"]);
        let reply = p.process("bye");
        assert_eq!(reply.text, FAREWELL);
        assert!(reply.exit);
        assert!(p.is_exited());

        let after = p.process("todo another");
        assert!(after.exit);
        assert!(!after.changed);
        assert!(after.text.is_empty());
        assert_eq!(p.tasks().len(), 1);
    }
}
