//! Command resolver: execute a classified [`Intent`] against the backend.
//!
//! Resolution of a single intent performs at most one member lookup
//! followed by at most one task creation — never concurrent, never
//! retried. Collaborator failures are mapped to user-facing messages;
//! nothing here is fatal.

use crewboard_proto::task::Task;

use crate::backend::{Backend, BackendError};

use super::Intent;

/// The structured outcome of executing an [`Intent`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// A task was created.
    TaskCreated {
        /// The freshly created task.
        task: Task,
    },
    /// A search ran (possibly short-circuited on an empty query).
    Searched {
        /// Matching tasks, newest first.
        results: Vec<Task>,
    },
    /// The help view should be shown.
    HelpShown,
    /// The intent could not be carried out; `message` is user-facing.
    Error {
        /// User-facing failure text.
        message: String,
    },
}

/// Resolves an intent into an effect against the backend.
///
/// - `Help` yields immediately with no backend call.
/// - `Search` with an empty query yields empty results without calling the
///   backend; otherwise the backend's result list is wrapped.
/// - `AddTask` with an assignee resolves the name first and fails fast
///   (`"User @<name> not found"`) without creating anything when the name
///   is unknown.
/// - `AddTask` without an assignee requires an active session
///   (`"Not authenticated"` otherwise) and lands on the session's member.
/// - `Invalid` passes its reason through as the error message.
pub async fn resolve<B: Backend>(intent: Intent, backend: &B) -> Resolution {
    match intent {
        Intent::Help => Resolution::HelpShown,

        Intent::Invalid { reason } => Resolution::Error { message: reason },

        Intent::Search { query } => {
            if query.trim().is_empty() {
                return Resolution::Searched {
                    results: Vec::new(),
                };
            }
            match backend.search_tasks(&query).await {
                Ok(results) => Resolution::Searched { results },
                Err(e) => Resolution::Error {
                    message: e.to_string(),
                },
            }
        }

        Intent::AddTask { title, assignee } => {
            let owner = match assignee {
                Some(name) => match backend.lookup_user(&name).await {
                    Ok(Some(user)) => Some(user.id),
                    Ok(None) => {
                        return Resolution::Error {
                            message: format!("User @{name} not found"),
                        };
                    }
                    Err(e) => {
                        return Resolution::Error {
                            message: e.to_string(),
                        };
                    }
                },
                None => {
                    if backend.active_session().is_none() {
                        return Resolution::Error {
                            message: BackendError::Auth.to_string(),
                        };
                    }
                    None
                }
            };

            match backend.create_task(&title, "", owner).await {
                Ok(task) => Resolution::TaskCreated { task },
                Err(e) => Resolution::Error {
                    message: e.to_string(),
                },
            }
        }
    }
}
