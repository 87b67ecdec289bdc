//! In-memory multi-tenant data store for `Crewboard`.
//!
//! Stands in for the hosted database the board talks to: team
//! registration and login, member rosters, and task CRUD/search, all
//! scoped per team. State lives behind an async [`tokio::sync::RwLock`];
//! an optional JSON snapshot file keeps data across runs.

pub mod auth;
pub mod store;

pub use store::{TaskChanges, TeamStore};

use thiserror::Error;

/// Errors that can occur during store operations.
///
/// Display texts are the user-facing messages — callers surface them
/// verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StoreError {
    /// A team with the requested name is already registered.
    #[error("Team name already exists")]
    TeamNameTaken,
    /// No team matches the given name or id.
    #[error("Team not found")]
    TeamNotFound,
    /// The team password did not match.
    #[error("Invalid team password")]
    InvalidPassword,
    /// A member with the requested name already exists in the team.
    #[error("User with this name already exists in the team")]
    MemberExists,
    /// No member matches the given name or id within the team.
    #[error("User not found")]
    MemberNotFound,
    /// No task matches the given id within the team.
    #[error("Task not found")]
    TaskNotFound,
    /// Task title missing or blank.
    #[error("Task title is required and cannot be empty")]
    TitleEmpty,
    /// Task title over the 255-character limit.
    #[error("Task title cannot exceed 255 characters")]
    TitleTooLong,
    /// Task description over the 1000-character limit.
    #[error("Task description cannot exceed 1000 characters")]
    DescriptionTooLong,
    /// A partial update carried no recognized fields.
    #[error("No valid updates provided")]
    NoUpdates,
}
