//! Theme and styling constants for the TUI.

use crewboard_proto::task::TaskStatus;
use ratatui::style::{Color, Modifier, Style};

/// Primary foreground color.
pub const FG_PRIMARY: Color = Color::White;

/// Secondary foreground color (dimmed text).
pub const FG_SECONDARY: Color = Color::Gray;

/// Highlight color for focused elements.
pub const HIGHLIGHT: Color = Color::Cyan;

/// Success indicator color.
pub const SUCCESS: Color = Color::Green;

/// Error indicator color.
pub const ERROR: Color = Color::Red;

/// Panel title color for the search bar.
pub const SEARCH_TITLE: Color = Color::Cyan;

/// Panel title color for the sidebar.
pub const SIDEBAR_TITLE: Color = Color::Blue;

/// Accent color for command text in suggestions.
pub const COMMAND: Color = Color::LightBlue;

/// Column accent color for a lifecycle stage.
///
/// Matches the board palette: new is neutral, current is amber,
/// in-progress is blue, completed is green.
#[must_use]
pub const fn status_color(status: TaskStatus) -> Color {
    match status {
        TaskStatus::New => Color::Gray,
        TaskStatus::Current => Color::Yellow,
        TaskStatus::InProgress => Color::Blue,
        TaskStatus::Completed => Color::Green,
    }
}

/// Normal text style.
#[must_use]
pub fn normal() -> Style {
    Style::default().fg(FG_PRIMARY)
}

/// Dimmed text style (timestamps, metadata).
#[must_use]
pub fn dimmed() -> Style {
    Style::default().fg(FG_SECONDARY)
}

/// Bold text style.
#[must_use]
pub fn bold() -> Style {
    Style::default().fg(FG_PRIMARY).add_modifier(Modifier::BOLD)
}

/// Highlighted text style (focused panel borders).
#[must_use]
pub fn highlighted() -> Style {
    Style::default().fg(HIGHLIGHT).add_modifier(Modifier::BOLD)
}

/// Selected item style (in lists).
#[must_use]
pub fn selected() -> Style {
    Style::default()
        .fg(Color::Black)
        .bg(HIGHLIGHT)
        .add_modifier(Modifier::BOLD)
}

/// Style for error text.
#[must_use]
pub fn error() -> Style {
    Style::default().fg(ERROR)
}

/// Style for command text in the suggestion dropdown.
#[must_use]
pub fn command() -> Style {
    Style::default().fg(COMMAND)
}

/// Style for the status bar background.
#[must_use]
pub fn status_bar_bg() -> Style {
    Style::default().fg(Color::White).bg(Color::Rgb(30, 30, 50))
}

/// Style for panel titles with a given color (bold).
#[must_use]
pub fn panel_title(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}
