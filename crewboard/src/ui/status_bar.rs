//! Status bar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
};

use crate::app::{App, NotificationLevel};

use super::theme;

const KEY_HINTS: &str = "Tab panels \u{2022} / search \u{2022} :help commands \u{2022} Ctrl-C quit";

/// Render the status line: identity on the left, notification or key
/// hints on the right.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let team = app
        .session
        .as_ref()
        .map_or_else(|| "no team".to_string(), |s| s.team.name.clone());
    let member = app
        .active_member()
        .map_or_else(|| "no member".to_string(), |u| format!("@{}", u.name));

    let mut spans = vec![
        Span::styled(format!(" {team} "), theme::bold()),
        Span::raw("\u{2502} "),
        Span::styled(format!("{member} "), theme::normal()),
        Span::raw("\u{2502} "),
    ];

    match &app.notification {
        Some((message, NotificationLevel::Error)) => {
            spans.push(Span::styled(message.clone(), theme::error()));
        }
        Some((message, NotificationLevel::Info)) => {
            spans.push(Span::styled(message.clone(), theme::normal()));
        }
        None => {
            spans.push(Span::styled(KEY_HINTS, theme::dimmed()));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans)).style(theme::status_bar_bg());
    frame.render_widget(paragraph, area);
}
