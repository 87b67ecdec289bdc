//! Task types for the Kanban board.
//!
//! A task lives on exactly one member's board and moves through four fixed
//! lifecycle stages. Title and description limits match what the data store
//! enforces; [`validate_title`] and [`validate_description`] are shared so
//! the command grammar and the store reject the same inputs.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::team::{TeamId, UserId};

/// Maximum allowed task title length in characters (after trimming).
pub const MAX_TASK_TITLE_LENGTH: usize = 255;

/// Maximum allowed task description length in characters.
pub const MAX_TASK_DESCRIPTION_LENGTH: usize = 1000;

/// Unique identifier for a task, based on UUID v7 for time-ordering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TaskId(Uuid);

impl TaskId {
    /// Creates a new time-ordered task identifier (UUID v7).
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    /// Creates a `TaskId` from an existing UUID.
    #[must_use]
    pub const fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Returns the inner UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TaskId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for TaskId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Lifecycle stage of a task — one board column per stage.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TaskStatus {
    /// Newly created, not yet picked up.
    New,
    /// Selected as the current focus.
    Current,
    /// Actively being worked on.
    InProgress,
    /// Finished.
    Completed,
}

impl TaskStatus {
    /// All statuses in board column order.
    pub const ALL: [Self; 4] = [Self::New, Self::Current, Self::InProgress, Self::Completed];

    /// Column title shown on the board.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::New => "New Task",
            Self::Current => "Current Task",
            Self::InProgress => "In Progress",
            Self::Completed => "Completed",
        }
    }
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::New => write!(f, "new"),
            Self::Current => write!(f, "current"),
            Self::InProgress => write!(f, "in_progress"),
            Self::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for TaskStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "new" => Ok(Self::New),
            "current" => Ok(Self::Current),
            "in_progress" => Ok(Self::InProgress),
            "completed" => Ok(Self::Completed),
            other => Err(format!("Invalid status: {other}")),
        }
    }
}

/// A task on a member's board.
///
/// `owner_name` is denormalized alongside `owner` so search results and
/// board cards can be rendered without a roster lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier (UUID v7, time-ordered).
    pub id: TaskId,
    /// Team this task belongs to.
    pub team_id: TeamId,
    /// Member whose board this task lives on.
    pub owner: UserId,
    /// Display name of the owning member at creation/update time.
    pub owner_name: String,
    /// Task title (trimmed, 1–255 characters).
    pub title: String,
    /// Free-form description (trimmed, up to 1000 characters).
    pub description: String,
    /// Current lifecycle stage.
    pub status: TaskStatus,
    /// When this task was created (milliseconds since epoch).
    pub created_at: u64,
    /// When this task was last modified (milliseconds since epoch).
    pub updated_at: u64,
}

/// Checks a task title against the shared length rules.
///
/// The title is trimmed before checking; an empty or overlong title is
/// rejected with the same boundary the store applies (255 characters).
#[must_use]
pub fn validate_title(title: &str) -> bool {
    let trimmed = title.trim();
    !trimmed.is_empty() && trimmed.chars().count() <= MAX_TASK_TITLE_LENGTH
}

/// Checks a task description against the shared length rule.
#[must_use]
pub fn validate_description(description: &str) -> bool {
    description.chars().count() <= MAX_TASK_DESCRIPTION_LENGTH
}
