//! Board column rendering.

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crewboard_proto::task::TaskStatus;

use crate::app::{App, PanelFocus};

use super::theme;

/// Render the four board columns.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(25); 4])
        .split(area);

    for (col_idx, status) in TaskStatus::ALL.into_iter().enumerate() {
        render_column(frame, chunks[col_idx], app, status, col_idx);
    }
}

fn render_column(frame: &mut Frame, area: Rect, app: &App, status: TaskStatus, col_idx: usize) {
    let focused = app.focus == PanelFocus::Board && app.board_col == col_idx;
    let accent = theme::status_color(status);

    let tasks = app.board.column(status).map(|c| c.tasks.as_slice()).unwrap_or_default();

    let title = format!("{} ({})", status.label(), tasks.len());
    let block = Block::default()
        .title(Span::styled(title, theme::panel_title(accent)))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::highlighted()
        } else {
            ratatui::style::Style::default().fg(accent)
        });

    let items: Vec<ListItem> = tasks
        .iter()
        .map(|task| {
            let mut lines = vec![Line::from(Span::styled(task.title.clone(), theme::normal()))];
            if !task.description.is_empty() {
                lines.push(Line::from(Span::styled(
                    task.description.clone(),
                    theme::dimmed(),
                )));
            }
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(theme::selected());

    let mut state = ListState::default();
    if focused && !tasks.is_empty() {
        state.select(Some(app.board_row.min(tasks.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
