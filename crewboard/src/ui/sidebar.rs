//! Roster sidebar rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState},
};

use crate::app::{App, PanelFocus};

use super::{format_date_ms, theme};

/// Render the team roster.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == PanelFocus::Sidebar;
    let team_name = app
        .session
        .as_ref()
        .map_or_else(|| "Team".to_string(), |s| s.team.name.clone());
    let active_id = app.active_member().map(|u| u.id);

    let block = Block::default()
        .title(Span::styled(
            team_name,
            theme::panel_title(theme::SIDEBAR_TITLE),
        ))
        .borders(Borders::ALL)
        .border_style(if focused {
            theme::highlighted()
        } else {
            theme::normal()
        });

    let items: Vec<ListItem> = app
        .roster
        .iter()
        .map(|member| {
            let marker = if Some(member.id) == active_id {
                "\u{25cf} "
            } else {
                "  "
            };
            let name_style = if Some(member.id) == active_id {
                theme::bold()
            } else {
                theme::normal()
            };
            let lines = vec![
                Line::from(vec![
                    Span::styled(marker, theme::highlighted()),
                    Span::styled(member.name.clone(), name_style),
                ]),
                Line::from(Span::styled(
                    format!(
                        "  Joined {}",
                        format_date_ms(member.created_at, &app.timestamp_format)
                    ),
                    theme::dimmed(),
                )),
            ];
            ListItem::new(lines)
        })
        .collect();

    let list = List::new(items).block(block).highlight_style(theme::selected());

    let mut state = ListState::default();
    if focused && !app.roster.is_empty() {
        state.select(Some(app.selected_member.min(app.roster.len() - 1)));
    }
    frame.render_stateful_widget(list, area, &mut state);
}
