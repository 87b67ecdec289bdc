//! Terminal UI rendering.

pub mod board_view;
pub mod input_modal;
pub mod search_bar;
pub mod sidebar;
pub mod status_bar;
pub mod theme;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
};

use crate::app::App;

/// Main draw function for the entire UI.
pub fn draw(frame: &mut Frame, app: &App) {
    // Search bar on top, board content in the middle, status line at the
    // bottom.
    let main_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let search_area = main_chunks[0];
    let content_area = main_chunks[1];
    let status_area = main_chunks[2];

    let content_chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(22), Constraint::Percentage(78)])
        .split(content_area);

    search_bar::render(frame, search_area, app);
    sidebar::render(frame, content_chunks[0], app);
    board_view::render(frame, content_chunks[1], app);
    status_bar::render(frame, status_area, app);

    // Overlays render last so they sit on top of the panels.
    if app.search.is_open() {
        search_bar::render_dropdown(frame, search_area, content_area, app);
    }
    if let Some(modal) = &app.modal {
        input_modal::render(frame, frame.area(), modal);
    }
}

/// Format an epoch-millisecond timestamp with a chrono format string.
#[must_use]
pub fn format_date_ms(ms: u64, format: &str) -> String {
    use chrono::{Local, TimeZone};
    let secs = (ms / 1000).cast_signed();
    let nsecs = u32::try_from((ms % 1000) * 1_000_000).unwrap_or(0);
    match Local.timestamp_opt(secs, nsecs) {
        chrono::LocalResult::Single(dt) => dt.format(format).to_string(),
        _ => "?".to_string(),
    }
}
