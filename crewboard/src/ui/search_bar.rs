//! Search bar input and dropdown rendering.

use ratatui::{
    Frame,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::app::{App, PanelFocus};
use crate::command::{BarState, help_text};

use super::theme;

const PLACEHOLDER: &str = "Search tasks or use commands like :add @user - task";

/// Render the search input box.
pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == PanelFocus::SearchBar;
    let border_style = if focused {
        theme::highlighted()
    } else {
        theme::normal()
    };

    let block = Block::default()
        .title(Span::styled("Search", theme::panel_title(theme::SEARCH_TITLE)))
        .borders(Borders::ALL)
        .border_style(border_style);

    let input = app.search.input();
    let content = if input.is_empty() && !focused {
        Line::from(Span::styled(PLACEHOLDER, theme::dimmed()))
    } else {
        Line::from(Span::styled(input, theme::normal()))
    };

    frame.render_widget(Paragraph::new(content).block(block), area);

    if focused {
        let cursor_x = area.x + 1 + clamped_u16(app.search.cursor());
        frame.set_cursor_position((cursor_x.min(area.right().saturating_sub(2)), area.y + 1));
    }
}

/// Render the dropdown under the search bar: suggestions, results, help,
/// or an error, depending on the controller state.
pub fn render_dropdown(frame: &mut Frame, search_area: Rect, content_area: Rect, app: &App) {
    let (lines, height) = dropdown_content(app);
    if lines.is_empty() {
        return;
    }

    let area = Rect {
        x: search_area.x + 2,
        y: content_area.y,
        width: search_area.width.saturating_sub(4),
        height: height.min(content_area.height),
    };
    frame.render_widget(Clear, area);

    match app.search.state() {
        BarState::Suggesting | BarState::Searching => {
            let title = dropdown_title(app);
            let items: Vec<ListItem> = lines.into_iter().map(ListItem::new).collect();
            let list = List::new(items)
                .block(
                    Block::default()
                        .title(Span::styled(title, theme::dimmed()))
                        .borders(Borders::ALL)
                        .border_style(theme::normal()),
                )
                .highlight_style(theme::selected());
            let mut state = ListState::default();
            state.select(app.search.selected());
            frame.render_stateful_widget(list, area, &mut state);
        }
        _ => {
            let paragraph = Paragraph::new(lines)
                .wrap(Wrap { trim: false })
                .block(Block::default().borders(Borders::ALL).border_style(theme::normal()));
            frame.render_widget(paragraph, area);
        }
    }
}

fn dropdown_title(app: &App) -> String {
    match app.search.state() {
        BarState::Suggesting => "Command Suggestions".to_string(),
        BarState::Searching => format!("Search Results ({})", app.search.results().len()),
        _ => String::new(),
    }
}

/// Builds the dropdown body and its desired height (including borders).
fn dropdown_content(app: &App) -> (Vec<Line<'static>>, u16) {
    match app.search.state() {
        BarState::ErrorShown => {
            let message = app.search.error_message().unwrap_or_default().to_string();
            (vec![Line::from(Span::styled(message, theme::error()))], 3)
        }
        BarState::HelpShown => {
            let lines: Vec<Line<'static>> = help_text()
                .lines()
                .map(|l| Line::from(Span::styled(l.to_string(), theme::normal())))
                .collect();
            let height = clamped_u16(lines.len() + 2);
            (lines, height)
        }
        BarState::Suggesting => {
            let lines: Vec<Line<'static>> = app
                .search
                .suggestions()
                .iter()
                .map(|s| Line::from(Span::styled(s.clone(), theme::command())))
                .collect();
            let height = clamped_u16(lines.len() + 2);
            (lines, height)
        }
        BarState::Searching => {
            if app.search.results().is_empty() {
                let lines = vec![
                    Line::from(Span::styled("No results found".to_string(), theme::dimmed())),
                    Line::from(Span::styled(
                        "Try commands like :add @user - task or :help".to_string(),
                        theme::dimmed(),
                    )),
                ];
                return (lines, 4);
            }
            let lines: Vec<Line<'static>> = app
                .search
                .results()
                .iter()
                .map(|task| {
                    Line::from(vec![
                        Span::styled(task.title.clone(), theme::normal()),
                        Span::raw("  "),
                        Span::styled(
                            format!("{} \u{2022} {}", task.owner_name, task.status),
                            theme::dimmed(),
                        ),
                    ])
                })
                .collect();
            let height = clamped_u16(lines.len() + 2);
            (lines, height)
        }
        BarState::Idle | BarState::Typing => (Vec::new(), 0),
    }
}

fn clamped_u16(value: usize) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
