//! Color constants for the terminal user interface.

use ratatui::style::Color;

/// Lines typed by the user
pub const USER_BLUE: Color = Color::Rgb(90, 160, 255);
/// Replies from Dan
pub const DAN_GREEN: Color = Color::Rgb(120, 200, 120);
/// Status bar background
pub const DARK_PURPLE: Color = Color::Rgb(86, 60, 92);
