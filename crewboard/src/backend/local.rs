//! In-process backend over [`crewboard_store::TeamStore`].

use std::sync::Arc;

use crewboard_proto::session::SessionContext;
use crewboard_proto::task::{Task, TaskStatus};
use crewboard_proto::team::{User, UserId};
use crewboard_store::{StoreError, TeamStore};

use crate::session::SessionHandle;

use super::{Backend, BackendError};

/// Message shown when a self-add has no member to land on.
const NO_MEMBER_SELECTED: &str = "No user selected and no current user available";

/// Backend implementation over the in-process store, scoped by the
/// session handle's current team.
#[derive(Clone)]
pub struct LocalBackend {
    store: Arc<TeamStore>,
    session: SessionHandle,
    search_limit: usize,
}

impl LocalBackend {
    /// Creates a backend over the given store and session.
    #[must_use]
    pub const fn new(store: Arc<TeamStore>, session: SessionHandle, search_limit: usize) -> Self {
        Self {
            store,
            session,
            search_limit,
        }
    }

    fn context(&self) -> Result<SessionContext, BackendError> {
        self.active_session().ok_or(BackendError::Auth)
    }
}

impl Backend for LocalBackend {
    async fn search_tasks(&self, query: &str) -> Result<Vec<Task>, BackendError> {
        let ctx = self.context()?;
        self.store
            .search_tasks(ctx.team_id, query, self.search_limit)
            .await
            .map_err(|e| {
                tracing::warn!("task search failed: {e}");
                BackendError::Search(e.to_string())
            })
    }

    async fn lookup_user(&self, name: &str) -> Result<Option<User>, BackendError> {
        let ctx = self.context()?;
        self.store
            .user_by_name(ctx.team_id, name)
            .await
            .map_err(store_error)
    }

    async fn create_task(
        &self,
        title: &str,
        description: &str,
        owner: Option<UserId>,
    ) -> Result<Task, BackendError> {
        let ctx = self.context()?;
        let owner = match owner {
            Some(id) => id,
            None => ctx
                .user_id
                .ok_or_else(|| BackendError::Validation(NO_MEMBER_SELECTED.to_string()))?,
        };
        self.store
            .create_task(ctx.team_id, title, description, owner, TaskStatus::New)
            .await
            .map_err(store_error)
    }

    fn active_session(&self) -> Option<SessionContext> {
        self.session.current().map(|s| s.context())
    }
}

fn store_error(e: StoreError) -> BackendError {
    BackendError::Validation(e.to_string())
}
