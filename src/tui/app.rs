//! Main application logic for the terminal user interface.
//!
//! The UI is a conversation: every submitted line is shown, handed to the
//! `CommandProcessor`, and its reply appended below. The save file is
//! rewritten after every reply that changed the task list.

use std::io;
use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame, Terminal,
};
use tracing::warn;

use crate::processor::{CommandProcessor, GREETING};
use crate::storage::Storage;
use crate::tui::{
    colors::{DAN_GREEN, DARK_PURPLE, USER_BLUE},
    input::InputField,
};

/// Who said a line of the conversation.
#[derive(Clone, Copy, PartialEq, Debug)]
pub enum Speaker {
    User,
    Dan,
}

#[derive(Clone, Debug)]
struct Entry {
    speaker: Speaker,
    text: String,
}

/// Display column of the input cursor; wide characters take two cells.
fn cursor_column(input: &InputField) -> usize {
    Span::raw(input.before_cursor()).width()
}

/// Application state for the conversation view.
pub struct App {
    processor: CommandProcessor,
    storage: Storage,
    conversation: Vec<Entry>,
    input: InputField,
    /// Lines scrolled up from the bottom of the conversation.
    scroll_back: usize,
    status_message: String,
}

impl App {
    pub fn new(processor: CommandProcessor, storage: Storage) -> Self {
        App {
            processor,
            storage,
            conversation: vec![Entry {
                speaker: Speaker::Dan,
                text: GREETING.to_string(),
            }],
            input: InputField::new(),
            scroll_back: 0,
            status_message: String::new(),
        }
    }

    fn push(&mut self, speaker: Speaker, text: String) {
        self.conversation.push(Entry { speaker, text });
        self.scroll_back = 0;
    }

    /// Send the input line to the processor and record the exchange.
    fn submit(&mut self) {
        let line = self.input.take();
        if line.trim().is_empty() {
            return;
        }
        self.push(Speaker::User, line.clone());

        let reply = self.processor.process(&line);
        if reply.changed {
            if let Err(e) = self.storage.save(self.processor.tasks()) {
                warn!(error = %e, "save failed");
                self.status_message = format!("Couldn't save to {}: {e}", self.storage.path().display());
            }
        }
        if !reply.text.is_empty() {
            self.push(Speaker::Dan, reply.text);
        }
        if reply.exit {
            self.status_message = "Press any key to close".to_string();
        }
    }

    /// Handle a key press; returns true when the UI should close.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> io::Result<bool> {
        if self.processor.is_exited() {
            return Ok(true);
        }
        if !matches!(key, KeyCode::Enter) {
            self.status_message.clear();
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return Ok(true),
            KeyCode::Esc => return Ok(true),
            KeyCode::Enter => self.submit(),
            KeyCode::Char(c) => self.input.handle_char(c),
            KeyCode::Backspace => self.input.handle_backspace(),
            KeyCode::Delete => self.input.handle_delete(),
            KeyCode::Left => self.input.move_cursor_left(),
            KeyCode::Right => self.input.move_cursor_right(),
            KeyCode::Home => self.input.move_home(),
            KeyCode::End => self.input.move_end(),
            KeyCode::Up => self.scroll_back += 1,
            KeyCode::Down => self.scroll_back = self.scroll_back.saturating_sub(1),
            KeyCode::PageUp => self.scroll_back += 10,
            KeyCode::PageDown => self.scroll_back = self.scroll_back.saturating_sub(10),
            _ => {}
        }
        Ok(false)
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return self.handle_key(key.code, key.modifiers);
                }
            }
        }
        Ok(false)
    }

    fn conversation_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        for entry in &self.conversation {
            match entry.speaker {
                Speaker::User => lines.push(Line::from(vec![
                    Span::styled("> ", Style::default().fg(USER_BLUE).add_modifier(Modifier::BOLD)),
                    Span::styled(entry.text.clone(), Style::default().fg(USER_BLUE)),
                ])),
                Speaker::Dan => {
                    for text in entry.text.lines() {
                        lines.push(Line::from(Span::styled(
                            text.to_string(),
                            Style::default().fg(DAN_GREEN),
                        )));
                    }
                    lines.push(Line::from(""));
                }
            }
        }
        lines
    }

    /// Render the conversation, pinned to the bottom unless scrolled back.
    fn render_conversation(&mut self, f: &mut Frame, area: Rect) {
        let lines = self.conversation_lines();
        let inner_width = area.width.saturating_sub(2).max(1) as usize;
        let inner_height = area.height.saturating_sub(2) as usize;

        // Approximate wrapped height; one row per `inner_width` characters.
        let total: usize = lines
            .iter()
            .map(|l| l.width().max(1).div_ceil(inner_width))
            .sum();
        let max_offset = total.saturating_sub(inner_height);
        self.scroll_back = self.scroll_back.min(max_offset);
        let offset = (max_offset - self.scroll_back).min(u16::MAX as usize) as u16;

        let paragraph = Paragraph::new(lines)
            .block(Block::default().borders(Borders::ALL).title("Dan"))
            .wrap(Wrap { trim: false })
            .scroll((offset, 0));
        f.render_widget(paragraph, area);
    }

    fn render_input(&mut self, f: &mut Frame, area: Rect) {
        let paragraph = Paragraph::new(self.input.value.as_str())
            .block(Block::default().borders(Borders::ALL).title("Command"));
        f.render_widget(paragraph, area);

        let max_x = area.width.saturating_sub(2) as usize;
        let x = cursor_column(&self.input).min(max_x) as u16;
        f.set_cursor_position((area.x + 1 + x, area.y + 1));
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if !self.status_message.is_empty() {
            self.status_message.clone()
        } else {
            format!(
                "Tasks: {} | {} | Enter send, Up/Down scroll, Esc quit",
                self.processor.tasks().len(),
                self.storage.path().display()
            )
        };
        let status = Paragraph::new(status_text)
            .style(Style::default().bg(DARK_PURPLE).fg(Color::White))
            .alignment(Alignment::Left);
        f.render_widget(status, area);
    }

    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3), Constraint::Length(1)].as_ref())
            .split(f.area());

        self.render_conversation(f, chunks[0]);
        self.render_input(f, chunks[1]);
        self.render_status_bar(f, chunks[2]);
    }

    /// Main event loop for the TUI application.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}
