//! Backend seam for the command resolver.
//!
//! Defines the [`Backend`] trait the resolver executes intents against.
//! The concrete implementation is [`local::LocalBackend`] over the
//! in-process store; tests substitute their own implementations. The
//! resolver surfaces [`BackendError`] display texts to the user verbatim,
//! so the messages here are user-facing.

pub mod local;

pub use local::LocalBackend;

use crewboard_proto::session::SessionContext;
use crewboard_proto::task::Task;
use crewboard_proto::team::{User, UserId};

/// Errors a backend operation can surface.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BackendError {
    /// No active session.
    #[error("Not authenticated")]
    Auth,

    /// The data store rejected the request; the message is user-facing.
    #[error("{0}")]
    Validation(String),

    /// The search backend failed. The detail string is for logs only.
    #[error("Search failed")]
    Search(String),
}

/// Async collaborator contract consumed by the command resolver.
///
/// All task and member operations are scoped to the active session's team.
/// Implementations fail with [`BackendError::Auth`] when no session is
/// active.
pub trait Backend: Send + Sync {
    /// Searches the team's tasks by title/description substring.
    fn search_tasks(
        &self,
        query: &str,
    ) -> impl std::future::Future<Output = Result<Vec<Task>, BackendError>> + Send;

    /// Looks up a team member by name — case-insensitive exact match.
    fn lookup_user(
        &self,
        name: &str,
    ) -> impl std::future::Future<Output = Result<Option<User>, BackendError>> + Send;

    /// Creates a task. A `None` owner means the session's active member.
    fn create_task(
        &self,
        title: &str,
        description: &str,
        owner: Option<UserId>,
    ) -> impl std::future::Future<Output = Result<Task, BackendError>> + Send;

    /// Returns the active session context, if any.
    fn active_session(&self) -> Option<SessionContext>;
}
