//! The unified search bar's command subsystem.
//!
//! One input box accepts both plain search text and `:`-prefixed commands.
//! [`grammar::classify`] turns raw input into an [`Intent`],
//! [`suggest::suggest`] offers completions while typing, and
//! [`resolver::resolve`] executes a classified intent against the backend.
//! [`controller::SearchBar`] is the interactive state machine binding the
//! three together.

pub mod controller;
pub mod grammar;
pub mod resolver;
pub mod suggest;

pub use controller::{BarEffect, BarEvent, BarState, SearchBar};
pub use grammar::classify;
pub use resolver::{Resolution, resolve};
pub use suggest::suggest;

/// The structured result of classifying raw input text.
///
/// Exactly one case is active; an intent is built fresh per classification
/// and never mutated. A validation failure keeps the parsed fields out and
/// carries only the user-facing reason — callers must not act on a
/// partially-valid add command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Intent {
    /// Search team tasks — both `:search <query>` and plain text.
    Search {
        /// Trimmed query text (may be empty).
        query: String,
    },
    /// Create a task, optionally assigned to a named member.
    AddTask {
        /// Trimmed task title, 1–255 characters.
        title: String,
        /// Assignee name from the `@<user>` form, if present.
        assignee: Option<String>,
    },
    /// Show the command help.
    Help,
    /// Input started with `:` but did not form a valid command.
    Invalid {
        /// User-facing reason.
        reason: String,
    },
}

/// Help text for the dropdown's help view.
#[must_use]
pub const fn help_text() -> &'static str {
    "Available commands:

:add @username - task title
  Create a new task and assign it to a team member
  Example: :add @john - Fix the header bug

:add task title
  Create a new task for yourself
  Example: :add Update documentation

:search query
  Search for tasks containing the query
  Example: :search bug fix

:help
  Show this help message

You can also just type to search without using :search"
}
