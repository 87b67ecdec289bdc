//! Application state and event handling.
//!
//! [`App`] owns the TUI state: panel focus, the search bar controller, the
//! active member's board, the roster sidebar, and modal prompts. Key
//! handling returns [`AppCommand`] values for the host to dispatch onto
//! async tasks; completed work comes back as [`AppEvent`]s and is applied
//! between frames.

use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crewboard_proto::session::Session;
use crewboard_proto::task::{Task, TaskId, TaskStatus};
use crewboard_proto::team::{User, UserId};

use crate::backend::BackendError;
use crate::board::Board;
use crate::command::{BarEffect, BarEvent, Intent, Resolution, SearchBar};

/// Which panel is currently focused.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PanelFocus {
    /// The unified search bar.
    SearchBar,
    /// The roster sidebar.
    Sidebar,
    /// The board columns (default).
    Board,
}

/// Notification severity for the status line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationLevel {
    /// Informational.
    Info,
    /// Something went wrong.
    Error,
}

/// Modal prompt rendered over the board.
#[derive(Debug, Clone)]
pub enum Modal {
    /// Text prompt for a new member name.
    AddMember {
        /// Name typed so far.
        input: String,
    },
    /// Confirmation before removing a member and their tasks.
    ConfirmRemove {
        /// The member to remove.
        user: User,
    },
}

/// Async work the app asks its host to run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppCommand {
    /// Live search from the search bar.
    Search {
        /// Generation echoed back with the response.
        generation: u64,
        /// Query text.
        query: String,
    },
    /// Resolve a submitted command intent.
    Resolve {
        /// Generation echoed back with the response.
        generation: u64,
        /// The intent to resolve.
        intent: Intent,
    },
    /// Load a member's board.
    LoadBoard {
        /// Whose board to load.
        user_id: UserId,
    },
    /// Reload the team roster.
    LoadRoster,
    /// Persist a task's stage change.
    MoveTask {
        /// The task to move.
        task_id: TaskId,
        /// Target stage.
        status: TaskStatus,
    },
    /// Delete a task.
    DeleteTask {
        /// The task to delete.
        task_id: TaskId,
    },
    /// Add a member to the roster.
    AddMember {
        /// New member name.
        name: String,
    },
    /// Remove a member (and their tasks).
    RemoveMember {
        /// The member to remove.
        user_id: UserId,
    },
    /// Switch the active member.
    SwitchMember {
        /// The member to switch to.
        user_id: UserId,
    },
}

/// Completed async work delivered back to the app.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// A live search finished.
    SearchDone {
        /// Generation of the originating request.
        generation: u64,
        /// The search outcome.
        outcome: Result<Vec<Task>, BackendError>,
    },
    /// An intent resolution finished.
    Resolved {
        /// Generation of the originating request.
        generation: u64,
        /// The resolution outcome.
        resolution: Resolution,
    },
    /// A board load finished.
    BoardLoaded {
        /// Whose board was loaded.
        user_id: UserId,
        /// The loaded tasks or an error message.
        outcome: Result<Vec<Task>, String>,
    },
    /// A roster load finished.
    RosterLoaded {
        /// The roster or an error message.
        outcome: Result<Vec<User>, String>,
    },
    /// A task stage change finished.
    TaskMoved {
        /// The updated task or an error message.
        outcome: Result<Task, String>,
    },
    /// A task deletion finished.
    TaskDeleted {
        /// The deleted task.
        task_id: TaskId,
        /// Success or an error message.
        outcome: Result<(), String>,
    },
    /// A member addition finished.
    MemberAdded {
        /// The new member or an error message.
        outcome: Result<User, String>,
    },
    /// A member removal finished.
    MemberRemoved {
        /// The removed member or an error message.
        outcome: Result<User, String>,
    },
    /// A member switch finished (session already updated).
    MemberSwitched {
        /// The now-active member or an error message.
        outcome: Result<User, String>,
    },
}

/// Main application state.
pub struct App {
    /// Which panel is focused.
    pub focus: PanelFocus,
    /// The unified search bar.
    pub search: SearchBar,
    /// The active member's board.
    pub board: Board,
    /// Team roster in join order.
    pub roster: Vec<User>,
    /// Snapshot of the active session for rendering.
    pub session: Option<Session>,
    /// Sidebar selection index.
    pub selected_member: usize,
    /// Focused board column (index into [`TaskStatus::ALL`]).
    pub board_col: usize,
    /// Selected card within the focused column.
    pub board_row: usize,
    /// Active modal prompt, if any.
    pub modal: Option<Modal>,
    /// Status-line notification.
    pub notification: Option<(String, NotificationLevel)>,
    /// Whether the app should quit.
    pub should_quit: bool,
    /// Timestamp display format (chrono).
    pub timestamp_format: String,
    /// Last search-bar edit, for the live-search debounce window.
    last_edit: Option<Instant>,
}

impl App {
    /// Creates the app around an initial session snapshot.
    #[must_use]
    pub fn new(session: Option<Session>) -> Self {
        Self {
            focus: PanelFocus::Board,
            search: SearchBar::new(),
            board: Board::new(),
            roster: Vec::new(),
            session,
            selected_member: 0,
            board_col: 0,
            board_row: 0,
            modal: None,
            notification: None,
            should_quit: false,
            timestamp_format: "%b %e".to_string(),
            last_edit: None,
        }
    }

    /// Sets the timestamp display format.
    #[must_use]
    pub fn with_timestamp_format(mut self, format: impl Into<String>) -> Self {
        self.timestamp_format = format.into();
        self
    }

    /// The currently active member, if the session has one.
    #[must_use]
    pub fn active_member(&self) -> Option<&User> {
        self.session.as_ref().and_then(|s| s.user.as_ref())
    }

    /// Sets an informational notification.
    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some((message.into(), NotificationLevel::Info));
    }

    /// Sets an error notification.
    pub fn notify_error(&mut self, message: impl Into<String>) {
        self.notification = Some((message.into(), NotificationLevel::Error));
    }

    // -- Key handling -------------------------------------------------------

    /// Handles a key event, returning async work for the host to dispatch.
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<AppCommand> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return None;
        }

        if self.modal.is_some() {
            return self.handle_modal_key(key);
        }

        match (key.code, key.modifiers) {
            (KeyCode::Tab, KeyModifiers::SHIFT) | (KeyCode::BackTab, _) => {
                self.cycle_focus_backward();
                return None;
            }
            (KeyCode::Tab, _) => {
                self.cycle_focus_forward();
                return None;
            }
            _ => {}
        }

        match self.focus {
            PanelFocus::SearchBar => self.handle_search_key(key),
            PanelFocus::Sidebar => self.handle_sidebar_key(key),
            PanelFocus::Board => self.handle_board_key(key),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Enter => {
                let effect = if self.search.selected().is_some() {
                    let roster = self.roster.clone();
                    self.search.activate_selected(&roster)
                } else {
                    self.search.on_enter()
                };
                self.apply_bar_effect(effect)
            }
            KeyCode::Esc => {
                let effect = self.search.on_escape();
                self.apply_bar_effect(Some(effect))
            }
            KeyCode::Up => {
                self.search.select_prev();
                None
            }
            KeyCode::Down => {
                self.search.select_next();
                None
            }
            KeyCode::Left => {
                self.search.move_cursor_left();
                None
            }
            KeyCode::Right => {
                self.search.move_cursor_right();
                None
            }
            KeyCode::Home => {
                self.search.move_cursor_home();
                None
            }
            KeyCode::End => {
                self.search.move_cursor_end();
                None
            }
            KeyCode::Backspace => {
                let roster = self.roster.clone();
                self.search.backspace(&roster);
                self.last_edit = Some(Instant::now());
                None
            }
            KeyCode::Char(c) => {
                let roster = self.roster.clone();
                self.search.insert_char(c, &roster);
                self.last_edit = Some(Instant::now());
                None
            }
            _ => None,
        }
    }

    fn handle_sidebar_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_member = self.selected_member.saturating_sub(1);
                None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_member + 1 < self.roster.len() {
                    self.selected_member += 1;
                }
                None
            }
            KeyCode::Enter => {
                let user_id = self.roster.get(self.selected_member)?.id;
                Some(AppCommand::SwitchMember { user_id })
            }
            KeyCode::Char('a') => {
                self.modal = Some(Modal::AddMember {
                    input: String::new(),
                });
                None
            }
            KeyCode::Char('d') => {
                let user = self.roster.get(self.selected_member)?.clone();
                self.modal = Some(Modal::ConfirmRemove { user });
                None
            }
            KeyCode::Char('/') => {
                self.focus = PanelFocus::SearchBar;
                None
            }
            _ => None,
        }
    }

    fn handle_board_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        match (key.code, key.modifiers) {
            (KeyCode::Left | KeyCode::Char('h'), KeyModifiers::NONE) => {
                self.board_col = self.board_col.saturating_sub(1);
                self.clamp_board_selection();
                None
            }
            (KeyCode::Right | KeyCode::Char('l'), KeyModifiers::NONE) => {
                if self.board_col + 1 < TaskStatus::ALL.len() {
                    self.board_col += 1;
                }
                self.clamp_board_selection();
                None
            }
            (KeyCode::Up | KeyCode::Char('k'), KeyModifiers::NONE) => {
                self.board_row = self.board_row.saturating_sub(1);
                None
            }
            (KeyCode::Down | KeyCode::Char('j'), KeyModifiers::NONE) => {
                let len = self.focused_column_len();
                if self.board_row + 1 < len {
                    self.board_row += 1;
                }
                None
            }
            (KeyCode::Left | KeyCode::Char('H' | 'h'), KeyModifiers::SHIFT) => {
                self.move_selected_task(false)
            }
            (KeyCode::Right | KeyCode::Char('L' | 'l'), KeyModifiers::SHIFT) => {
                self.move_selected_task(true)
            }
            (KeyCode::Up | KeyCode::Char('K' | 'k'), KeyModifiers::SHIFT) => {
                self.reorder_selected_task(false);
                None
            }
            (KeyCode::Down | KeyCode::Char('J' | 'j'), KeyModifiers::SHIFT) => {
                self.reorder_selected_task(true);
                None
            }
            (KeyCode::Char('d'), KeyModifiers::NONE) => {
                let status = TaskStatus::ALL.get(self.board_col).copied()?;
                let task_id = self.board.task(status, self.board_row)?.id;
                Some(AppCommand::DeleteTask { task_id })
            }
            (KeyCode::Char('r'), KeyModifiers::NONE) => {
                let user_id = self.active_member()?.id;
                Some(AppCommand::LoadBoard { user_id })
            }
            (KeyCode::Char('/'), KeyModifiers::NONE) => {
                self.focus = PanelFocus::SearchBar;
                None
            }
            _ => None,
        }
    }

    fn handle_modal_key(&mut self, key: KeyEvent) -> Option<AppCommand> {
        let modal = self.modal.take()?;
        match modal {
            Modal::AddMember { mut input } => match key.code {
                KeyCode::Enter => {
                    let name = input.trim().to_string();
                    if name.is_empty() {
                        self.modal = Some(Modal::AddMember { input });
                        return None;
                    }
                    Some(AppCommand::AddMember { name })
                }
                KeyCode::Esc => None,
                KeyCode::Backspace => {
                    input.pop();
                    self.modal = Some(Modal::AddMember { input });
                    None
                }
                KeyCode::Char(c) => {
                    input.push(c);
                    self.modal = Some(Modal::AddMember { input });
                    None
                }
                _ => {
                    self.modal = Some(Modal::AddMember { input });
                    None
                }
            },
            Modal::ConfirmRemove { user } => match key.code {
                KeyCode::Enter | KeyCode::Char('y') => Some(AppCommand::RemoveMember {
                    user_id: user.id,
                }),
                KeyCode::Esc | KeyCode::Char('n') => None,
                _ => {
                    self.modal = Some(Modal::ConfirmRemove { user });
                    None
                }
            },
        }
    }

    // -- Focus --------------------------------------------------------------

    /// Cycle focus forward: search bar -> sidebar -> board -> search bar.
    fn cycle_focus_forward(&mut self) {
        self.leave_search_bar();
        self.focus = match self.focus {
            PanelFocus::SearchBar => PanelFocus::Sidebar,
            PanelFocus::Sidebar => PanelFocus::Board,
            PanelFocus::Board => PanelFocus::SearchBar,
        };
    }

    /// Cycle focus backward: search bar -> board -> sidebar -> search bar.
    fn cycle_focus_backward(&mut self) {
        self.leave_search_bar();
        self.focus = match self.focus {
            PanelFocus::SearchBar => PanelFocus::Board,
            PanelFocus::Board => PanelFocus::Sidebar,
            PanelFocus::Sidebar => PanelFocus::SearchBar,
        };
    }

    /// Focus leaving the search control region dismisses its dropdown.
    fn leave_search_bar(&mut self) {
        if self.focus == PanelFocus::SearchBar {
            self.search.dismiss();
        }
    }

    // -- Board helpers ------------------------------------------------------

    fn focused_column_len(&self) -> usize {
        TaskStatus::ALL
            .get(self.board_col)
            .and_then(|s| self.board.column(*s))
            .map_or(0, |c| c.tasks.len())
    }

    /// Clamps the board selection after the board or column changed.
    pub fn clamp_board_selection(&mut self) {
        let len = self.focused_column_len();
        if self.board_row >= len {
            self.board_row = len.saturating_sub(1);
        }
    }

    fn move_selected_task(&mut self, forward: bool) -> Option<AppCommand> {
        let status = TaskStatus::ALL.get(self.board_col).copied()?;
        let task = self.board.task(status, self.board_row)?;
        let target_col = if forward {
            self.board_col + 1
        } else {
            self.board_col.checked_sub(1)?
        };
        let target = TaskStatus::ALL.get(target_col).copied()?;
        Some(AppCommand::MoveTask {
            task_id: task.id,
            status: target,
        })
    }

    fn reorder_selected_task(&mut self, down: bool) {
        let Some(status) = TaskStatus::ALL.get(self.board_col).copied() else {
            return;
        };
        let from = self.board_row;
        let to = if down {
            from + 1
        } else {
            let Some(to) = from.checked_sub(1) else {
                return;
            };
            to
        };
        if self.board.reorder(status, from, to) {
            self.board_row = to;
        }
    }

    // -- Debounced live search ----------------------------------------------

    /// Returns the pending live search once the debounce window elapsed.
    pub fn take_due_search(&mut self, debounce: Duration) -> Option<AppCommand> {
        if !self.search.has_pending_search() {
            return None;
        }
        let due = self
            .last_edit
            .is_none_or(|at| at.elapsed() >= debounce);
        if !due {
            return None;
        }
        let effect = self.search.take_search_request();
        self.apply_bar_effect(effect)
    }

    // -- Effects & events ---------------------------------------------------

    /// Translates a search-bar effect into app state changes and commands.
    fn apply_bar_effect(&mut self, effect: Option<BarEffect>) -> Option<AppCommand> {
        match effect? {
            BarEffect::Search { generation, query } => {
                Some(AppCommand::Search { generation, query })
            }
            BarEffect::Resolve { generation, intent } => {
                Some(AppCommand::Resolve { generation, intent })
            }
            BarEffect::SwitchUser { user } => Some(AppCommand::SwitchMember { user_id: user.id }),
            BarEffect::ReleaseFocus => {
                self.focus = PanelFocus::Board;
                None
            }
        }
    }

    /// Applies a completed piece of async work, possibly producing a
    /// follow-up command.
    pub fn apply_event(&mut self, event: AppEvent) -> Option<AppCommand> {
        match event {
            AppEvent::SearchDone {
                generation,
                outcome,
            } => {
                self.search.apply(BarEvent::SearchDone {
                    generation,
                    outcome,
                });
                None
            }

            AppEvent::Resolved {
                generation,
                resolution,
            } => {
                if let Resolution::TaskCreated { task } = &resolution {
                    self.notify(format!(
                        "Task \"{}\" added to @{}",
                        task.title, task.owner_name
                    ));
                    if self.active_member().map(|u| u.id) == Some(task.owner) {
                        self.board.upsert(task.clone());
                    }
                }
                self.search.apply(BarEvent::Resolved {
                    generation,
                    resolution,
                });
                None
            }

            AppEvent::BoardLoaded { user_id, outcome } => {
                // A board that finished loading for a previously active
                // member must not overwrite the current one.
                if self.active_member().map(|u| u.id) != Some(user_id) {
                    return None;
                }
                match outcome {
                    Ok(tasks) => {
                        self.board = Board::from_tasks(tasks);
                        self.clamp_board_selection();
                    }
                    Err(message) => self.notify_error(format!("Failed to load tasks: {message}")),
                }
                None
            }

            AppEvent::RosterLoaded { outcome } => {
                match outcome {
                    Ok(roster) => {
                        self.roster = roster;
                        if self.selected_member >= self.roster.len() {
                            self.selected_member = self.roster.len().saturating_sub(1);
                        }
                    }
                    Err(message) => self.notify_error(format!("Failed to load roster: {message}")),
                }
                None
            }

            AppEvent::TaskMoved { outcome } => match outcome {
                Ok(task) => {
                    self.notify(format!("Moved to {}", task.status.label()));
                    self.board.upsert(task);
                    self.clamp_board_selection();
                    None
                }
                Err(message) => {
                    self.notify_error(format!("Failed to update task status: {message}"));
                    // Reload to undo the optimistic UI state.
                    self.active_member()
                        .map(|u| AppCommand::LoadBoard { user_id: u.id })
                }
            },

            AppEvent::TaskDeleted { task_id, outcome } => {
                match outcome {
                    Ok(()) => {
                        self.board.remove(task_id);
                        self.clamp_board_selection();
                        self.notify("Task deleted");
                    }
                    Err(message) => self.notify_error(format!("Failed to delete task: {message}")),
                }
                None
            }

            AppEvent::MemberAdded { outcome } => {
                match outcome {
                    Ok(user) => {
                        self.notify(format!("Added @{}", user.name));
                        // Join order: new members always append.
                        self.roster.push(user);
                    }
                    Err(message) => self.notify_error(message),
                }
                None
            }

            AppEvent::MemberRemoved { outcome } => match outcome {
                Ok(user) => {
                    self.roster.retain(|m| m.id != user.id);
                    if self.selected_member >= self.roster.len() {
                        self.selected_member = self.roster.len().saturating_sub(1);
                    }
                    self.notify(format!("Removed @{}", user.name));
                    if self.active_member().map(|u| u.id) == Some(user.id) {
                        self.board = Board::new();
                        if let Some(session) = &mut self.session {
                            session.user = None;
                        }
                        return self
                            .roster
                            .first()
                            .map(|next| AppCommand::SwitchMember { user_id: next.id });
                    }
                    None
                }
                Err(message) => {
                    self.notify_error(message);
                    None
                }
            },

            AppEvent::MemberSwitched { outcome } => match outcome {
                Ok(user) => {
                    if let Some(session) = &mut self.session {
                        session.user = Some(user.clone());
                    }
                    if let Some(idx) = self.roster.iter().position(|m| m.id == user.id) {
                        self.selected_member = idx;
                    }
                    self.board = Board::new();
                    self.board_col = 0;
                    self.board_row = 0;
                    self.notify(format!("Viewing @{}'s board", user.name));
                    Some(AppCommand::LoadBoard { user_id: user.id })
                }
                Err(message) => {
                    self.notify_error(message);
                    None
                }
            },
        }
    }
}
