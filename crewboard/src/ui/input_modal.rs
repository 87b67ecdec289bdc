//! Modal prompts over the board: add-member input and remove confirmation.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
};

use crate::app::Modal;

use super::theme;

/// Render the active modal centered in `area`.
pub fn render(frame: &mut Frame, area: Rect, modal: &Modal) {
    let popup = centered_rect(area, 44, 5);
    frame.render_widget(Clear, popup);

    match modal {
        Modal::AddMember { input } => {
            let block = Block::default()
                .title(Span::styled("Add member", theme::highlighted()))
                .borders(Borders::ALL)
                .border_style(theme::highlighted());
            let lines = vec![
                Line::from(vec![
                    Span::styled("> ", theme::highlighted()),
                    Span::styled(input.clone(), theme::normal()),
                ]),
                Line::from(Span::styled(
                    "Enter to add \u{2022} Esc to cancel",
                    theme::dimmed(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), popup);
        }
        Modal::ConfirmRemove { user } => {
            let block = Block::default()
                .title(Span::styled("Remove member", theme::error()))
                .borders(Borders::ALL)
                .border_style(theme::error());
            let lines = vec![
                Line::from(Span::styled(
                    format!("Remove @{} and all their tasks?", user.name),
                    theme::normal(),
                )),
                Line::from(Span::styled(
                    "y/Enter to confirm \u{2022} n/Esc to cancel",
                    theme::dimmed(),
                )),
            ];
            frame.render_widget(Paragraph::new(lines).block(block), popup);
        }
    }
}

/// A centered rect of the given width/height, clamped to `area`.
fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width.saturating_sub(width)) / 2,
        y: area.y + (area.height.saturating_sub(height)) / 2,
        width,
        height,
    }
}
