//! Input controller for the unified search bar.
//!
//! A keyboard-driven state machine binding the grammar, suggestion engine,
//! and resolver together. The controller itself is pure — backend work is
//! requested through [`BarEffect`] values and delivered back as
//! [`BarEvent`]s. Every request carries a generation number; a response
//! whose generation no longer matches was superseded by newer input and is
//! silently discarded, so an in-flight call never overwrites fresher
//! state. In-flight work is not aborted, only ignored on arrival.

use crewboard_proto::task::Task;
use crewboard_proto::team::User;

use crate::backend::BackendError;

use super::{Intent, Resolution, classify, suggest};

/// Where the search bar currently is in its interaction cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarState {
    /// Empty input, nothing shown.
    Idle,
    /// Input present, no dropdown content (e.g. right after accepting a
    /// suggestion).
    Typing,
    /// Command-prefixed input with completion candidates shown.
    Suggesting,
    /// A search is pending or its results are shown.
    Searching,
    /// The help view is shown.
    HelpShown,
    /// An error message is shown; input is preserved for correction.
    ErrorShown,
}

/// Work the controller asks its host to perform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BarEffect {
    /// Run a search for the given query.
    Search {
        /// Generation the response must echo back.
        generation: u64,
        /// Trimmed query text.
        query: String,
    },
    /// Resolve a classified intent.
    Resolve {
        /// Generation the response must echo back.
        generation: u64,
        /// The authoritative intent from re-classifying the full input.
        intent: Intent,
    },
    /// Switch the active member to this roster user.
    SwitchUser {
        /// The selected member.
        user: User,
    },
    /// Move keyboard focus away from the input.
    ReleaseFocus,
}

/// Completed async work delivered back to the controller.
#[derive(Debug, Clone)]
pub enum BarEvent {
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
}

/// The search bar state machine.
pub struct SearchBar {
    input: String,
    /// Cursor position as a character index.
    cursor: usize,
    state: BarState,
    suggestions: Vec<String>,
    results: Vec<Task>,
    error: Option<String>,
    /// Highlighted dropdown entry, if any.
    selected: Option<usize>,
    generation: u64,
    /// Live search waiting for the debounce window to elapse.
    pending_search: Option<String>,
}

impl Default for SearchBar {
    fn default() -> Self {
        Self::new()
    }
}

impl SearchBar {
    /// Creates an idle, empty search bar.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            input: String::new(),
            cursor: 0,
            state: BarState::Idle,
            suggestions: Vec::new(),
            results: Vec::new(),
            error: None,
            selected: None,
            generation: 0,
            pending_search: None,
        }
    }

    // -- Accessors ----------------------------------------------------------

    /// Current input text.
    #[must_use]
    pub fn input(&self) -> &str {
        &self.input
    }

    /// Cursor position as a character index.
    #[must_use]
    pub const fn cursor(&self) -> usize {
        self.cursor
    }

    /// Current controller state.
    #[must_use]
    pub const fn state(&self) -> BarState {
        self.state
    }

    /// Live classification of the current input.
    #[must_use]
    pub fn current_intent(&self) -> Intent {
        classify(&self.input)
    }

    /// Whether the dropdown should be rendered.
    #[must_use]
    pub fn is_open(&self) -> bool {
        match self.state {
            BarState::Idle | BarState::Typing => false,
            BarState::Suggesting => !self.suggestions.is_empty(),
            BarState::Searching => !self.input.trim().is_empty(),
            BarState::HelpShown | BarState::ErrorShown => true,
        }
    }

    /// Current completion candidates.
    #[must_use]
    pub fn suggestions(&self) -> &[String] {
        &self.suggestions
    }

    /// Current search results.
    #[must_use]
    pub fn results(&self) -> &[Task] {
        &self.results
    }

    /// Current error message, if one is shown.
    #[must_use]
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Highlighted dropdown index, if any.
    #[must_use]
    pub const fn selected(&self) -> Option<usize> {
        self.selected
    }

    // -- Editing ------------------------------------------------------------

    /// Inserts a character at the cursor and re-routes the input.
    pub fn insert_char(&mut self, c: char, roster: &[User]) {
        let byte_idx = byte_index(&self.input, self.cursor);
        self.input.insert(byte_idx, c);
        self.cursor += 1;
        self.route(roster);
    }

    /// Deletes the character before the cursor and re-routes the input.
    pub fn backspace(&mut self, roster: &[User]) {
        if self.cursor == 0 {
            return;
        }
        let byte_idx = byte_index(&self.input, self.cursor - 1);
        self.input.remove(byte_idx);
        self.cursor -= 1;
        self.route(roster);
    }

    /// Replaces the whole input (used by tests and paste) and re-routes.
    pub fn set_input(&mut self, value: &str, roster: &[User]) {
        self.input = value.to_string();
        self.cursor = self.input.chars().count();
        self.route(roster);
    }

    /// Moves the cursor one character left.
    pub const fn move_cursor_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    /// Moves the cursor one character right.
    pub fn move_cursor_right(&mut self) {
        if self.cursor < self.input.chars().count() {
            self.cursor += 1;
        }
    }

    /// Moves the cursor to the start of the input.
    pub const fn move_cursor_home(&mut self) {
        self.cursor = 0;
    }

    /// Moves the cursor to the end of the input.
    pub fn move_cursor_end(&mut self) {
        self.cursor = self.input.chars().count();
    }

    // -- Input-change routing -----------------------------------------------

    /// Re-routes after an input change: empty input returns to Idle,
    /// command-prefixed input shows suggestions, anything else records a
    /// live search request. Every change supersedes in-flight work.
    fn route(&mut self, roster: &[User]) {
        self.generation += 1;
        self.pending_search = None;
        self.selected = None;
        self.error = None;

        let trimmed = self.input.trim();
        if trimmed.is_empty() {
            self.suggestions.clear();
            self.results.clear();
            self.state = BarState::Idle;
        } else if trimmed.starts_with(':') {
            self.suggestions = suggest(&self.input, roster);
            self.results.clear();
            self.state = BarState::Suggesting;
        } else {
            self.suggestions.clear();
            self.pending_search = Some(trimmed.to_string());
            self.state = BarState::Searching;
        }
    }

    /// Whether a live search is waiting for the debounce window.
    #[must_use]
    pub const fn has_pending_search(&self) -> bool {
        self.pending_search.is_some()
    }

    /// Takes the pending live search, if any. The host calls this once the
    /// debounce window has elapsed and dispatches the returned effect.
    pub fn take_search_request(&mut self) -> Option<BarEffect> {
        self.pending_search.take().map(|query| BarEffect::Search {
            generation: self.generation,
            query,
        })
    }

    // -- Submission ---------------------------------------------------------

    /// Handles Enter: re-classifies the full input into an authoritative
    /// intent and asks the host to resolve it. Empty input is a no-op.
    pub fn on_enter(&mut self) -> Option<BarEffect> {
        if self.input.trim().is_empty() {
            return None;
        }

        self.generation += 1;
        self.pending_search = None;
        self.selected = None;
        self.suggestions.clear();

        let intent = classify(&self.input);
        if matches!(intent, Intent::Search { .. }) {
            self.results.clear();
            self.state = BarState::Searching;
        }

        Some(BarEffect::Resolve {
            generation: self.generation,
            intent,
        })
    }

    /// Handles Escape: clears input and all transient state, returns to
    /// Idle, and releases input focus.
    pub fn on_escape(&mut self) -> BarEffect {
        self.reset();
        BarEffect::ReleaseFocus
    }

    /// Click-outside / focus-loss: closes the dropdown but preserves the
    /// typed input.
    pub fn dismiss(&mut self) {
        self.generation += 1;
        self.pending_search = None;
        self.clear_transient();
        self.state = BarState::Idle;
    }

    // -- Dropdown selection -------------------------------------------------

    /// Moves the dropdown highlight down, wrapping.
    pub fn select_next(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(0, |i| (i + 1) % len));
    }

    /// Moves the dropdown highlight up, wrapping.
    pub fn select_prev(&mut self) {
        let len = self.active_list_len();
        if len == 0 {
            return;
        }
        self.selected = Some(self.selected.map_or(len - 1, |i| (i + len - 1) % len));
    }

    /// Activates the highlighted dropdown entry.
    ///
    /// A suggestion replaces the input text and waits for further edits
    /// (no auto-submit). A search result switches the active member when
    /// its owner is on the roster, and is a no-op otherwise.
    pub fn activate_selected(&mut self, roster: &[User]) -> Option<BarEffect> {
        let selected = self.selected?;
        match self.state {
            BarState::Suggesting => {
                let suggestion = self.suggestions.get(selected)?.clone();
                self.input = suggestion;
                self.cursor = self.input.chars().count();
                self.generation += 1;
                self.pending_search = None;
                self.clear_transient();
                self.state = BarState::Typing;
                None
            }
            BarState::Searching => {
                let task = self.results.get(selected)?;
                let user = roster.iter().find(|m| m.id == task.owner)?.clone();
                self.reset();
                Some(BarEffect::SwitchUser { user })
            }
            _ => None,
        }
    }

    // -- Async completions --------------------------------------------------

    /// Applies a completed piece of async work. Responses from a stale
    /// generation were superseded by newer input and are dropped.
    pub fn apply(&mut self, event: BarEvent) {
        match event {
            BarEvent::SearchDone {
                generation,
                outcome,
            } => {
                if generation != self.generation {
                    tracing::debug!(generation, current = self.generation, "stale search dropped");
                    return;
                }
                match outcome {
                    Ok(results) => {
                        self.results = results;
                        self.selected = None;
                        self.state = BarState::Searching;
                    }
                    Err(e) => {
                        self.error = Some(e.to_string());
                        self.state = BarState::ErrorShown;
                    }
                }
            }
            BarEvent::Resolved {
                generation,
                resolution,
            } => {
                if generation != self.generation {
                    tracing::debug!(
                        generation,
                        current = self.generation,
                        "stale resolution dropped"
                    );
                    return;
                }
                match resolution {
                    Resolution::HelpShown => {
                        self.clear_transient();
                        self.state = BarState::HelpShown;
                    }
                    Resolution::TaskCreated { .. } => {
                        self.reset();
                    }
                    Resolution::Searched { results } => {
                        self.results = results;
                        self.selected = None;
                        self.state = BarState::Searching;
                    }
                    Resolution::Error { message } => {
                        self.error = Some(message);
                        self.state = BarState::ErrorShown;
                    }
                }
            }
        }
    }

    // -- Internal -----------------------------------------------------------

    fn active_list_len(&self) -> usize {
        match self.state {
            BarState::Suggesting => self.suggestions.len(),
            BarState::Searching => self.results.len(),
            _ => 0,
        }
    }

    fn clear_transient(&mut self) {
        self.suggestions.clear();
        self.results.clear();
        self.error = None;
        self.selected = None;
    }

    fn reset(&mut self) {
        self.input.clear();
        self.cursor = 0;
        self.generation += 1;
        self.pending_search = None;
        self.clear_transient();
        self.state = BarState::Idle;
    }
}

/// Converts a character index to a byte index within `s`.
fn byte_index(s: &str, char_idx: usize) -> usize {
    s.char_indices()
        .nth(char_idx)
        .map_or(s.len(), |(idx, _)| idx)
}
