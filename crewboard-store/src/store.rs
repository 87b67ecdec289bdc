//! Multi-tenant team store: auth, rosters, and task CRUD/search.
//!
//! [`TeamStore`] is the application-layer interface the client's backend
//! seam talks to. Every operation is scoped to one team; rosters keep join
//! order; task queries return newest-first. Mutations write the JSON
//! snapshot through when one is configured — a failed snapshot write is
//! logged and the in-memory state stays authoritative.

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

use crewboard_proto::session::Session;
use crewboard_proto::task::{Task, TaskId, TaskStatus, validate_description, validate_title};
use crewboard_proto::team::{Team, TeamId, User, UserId};

use crate::StoreError;
use crate::auth::{hash_password, verify_password};

/// Default cap on search results.
pub const DEFAULT_SEARCH_LIMIT: usize = 50;

/// A partial task update; `None` fields are left untouched.
#[derive(Debug, Clone, Default)]
pub struct TaskChanges {
    /// New title, if changing.
    pub title: Option<String>,
    /// New description, if changing.
    pub description: Option<String>,
    /// New status, if changing.
    pub status: Option<TaskStatus>,
}

impl TaskChanges {
    const fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.status.is_none()
    }
}

/// Serializable store state — one record per registered team.
#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreState {
    teams: Vec<TeamRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct TeamRecord {
    team: Team,
    password_hash: String,
    /// Members in join order.
    members: Vec<User>,
    /// Tasks in creation order.
    tasks: Vec<Task>,
}

/// The multi-tenant data store.
pub struct TeamStore {
    state: RwLock<StoreState>,
    snapshot_path: Option<PathBuf>,
}

impl Default for TeamStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TeamStore {
    /// Creates an empty store with no snapshot file.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: RwLock::new(StoreState::default()),
            snapshot_path: None,
        }
    }

    /// Creates a store backed by a JSON snapshot file.
    ///
    /// An existing snapshot is loaded; a missing or unreadable one starts
    /// the store empty (a corrupt snapshot is logged, not fatal).
    #[must_use]
    pub fn with_snapshot(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        let state = match std::fs::read_to_string(&path) {
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(state) => state,
                Err(e) => {
                    tracing::warn!("ignoring corrupt store snapshot {}: {e}", path.display());
                    StoreState::default()
                }
            },
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreState::default(),
            Err(e) => {
                tracing::warn!("could not read store snapshot {}: {e}", path.display());
                StoreState::default()
            }
        };
        Self {
            state: RwLock::new(state),
            snapshot_path: Some(path),
        }
    }

    /// Returns the current timestamp in milliseconds since epoch.
    fn now_ms() -> u64 {
        u64::try_from(
            SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_millis(),
        )
        .unwrap_or(u64::MAX)
    }

    /// Writes the snapshot file, if one is configured.
    fn persist(&self, state: &StoreState) {
        let Some(path) = &self.snapshot_path else {
            return;
        };
        let json = match serde_json::to_string_pretty(state) {
            Ok(json) => json,
            Err(e) => {
                tracing::warn!("could not serialize store snapshot: {e}");
                return;
            }
        };
        if let Some(parent) = path.parent()
            && let Err(e) = std::fs::create_dir_all(parent)
        {
            tracing::warn!("could not create snapshot directory: {e}");
            return;
        }
        if let Err(e) = std::fs::write(path, json) {
            tracing::warn!("could not write store snapshot {}: {e}", path.display());
        }
    }

    // -- Teams & auth -------------------------------------------------------

    /// Registers a new team and returns a session with no selected member.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNameTaken`] if the name is registered.
    pub async fn register_team(&self, name: &str, password: &str) -> Result<Session, StoreError> {
        let mut state = self.state.write().await;
        if state.teams.iter().any(|r| r.team.name == name) {
            return Err(StoreError::TeamNameTaken);
        }

        let now = Self::now_ms();
        let team = Team {
            id: TeamId::new(),
            name: name.to_string(),
            created_at: now,
        };
        state.teams.push(TeamRecord {
            team: team.clone(),
            password_hash: hash_password(password),
            members: Vec::new(),
            tasks: Vec::new(),
        });
        self.persist(&state);
        tracing::info!(team = %team.name, "team registered");

        Ok(Session {
            team,
            user: None,
            login_time: now,
        })
    }

    /// Logs a team in, auto-selecting the earliest-joined member.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown name and
    /// [`StoreError::InvalidPassword`] for a wrong password.
    pub async fn login_team(&self, name: &str, password: &str) -> Result<Session, StoreError> {
        let state = self.state.read().await;
        let record = state
            .teams
            .iter()
            .find(|r| r.team.name == name)
            .ok_or(StoreError::TeamNotFound)?;
        if !verify_password(password, &record.password_hash) {
            return Err(StoreError::InvalidPassword);
        }

        tracing::info!(team = %record.team.name, "team login");
        Ok(Session {
            team: record.team.clone(),
            user: record.members.first().cloned(),
            login_time: Self::now_ms(),
        })
    }

    /// Returns whether a team with this id exists.
    pub async fn has_team(&self, team_id: TeamId) -> bool {
        let state = self.state.read().await;
        state.teams.iter().any(|r| r.team.id == team_id)
    }

    // -- Roster -------------------------------------------------------------

    /// Returns the team roster in join order.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn members(&self, team_id: TeamId) -> Result<Vec<User>, StoreError> {
        let state = self.state.read().await;
        Ok(team_ref(&state, team_id)?.members.clone())
    }

    /// Looks up a member by id.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn member(&self, team_id: TeamId, user_id: UserId) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        Ok(team_ref(&state, team_id)?
            .members
            .iter()
            .find(|m| m.id == user_id)
            .cloned())
    }

    /// Looks up a member by name — case-insensitive exact match.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn user_by_name(
        &self,
        team_id: TeamId,
        name: &str,
    ) -> Result<Option<User>, StoreError> {
        let state = self.state.read().await;
        let wanted = name.to_lowercase();
        Ok(team_ref(&state, team_id)?
            .members
            .iter()
            .find(|m| m.name.to_lowercase() == wanted)
            .cloned())
    }

    /// Adds a member to the team.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team and
    /// [`StoreError::MemberExists`] if the name is already on the roster.
    pub async fn add_member(&self, team_id: TeamId, name: &str) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        let record = team_mut(&mut state, team_id)?;
        if record.members.iter().any(|m| m.name == name) {
            return Err(StoreError::MemberExists);
        }

        let user = User {
            id: UserId::new(),
            name: name.to_string(),
            created_at: Self::now_ms(),
        };
        record.members.push(user.clone());
        self.persist(&state);
        Ok(user)
    }

    /// Removes a member and all of their tasks (cascade).
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team and
    /// [`StoreError::MemberNotFound`] if no member has this id.
    pub async fn remove_member(&self, team_id: TeamId, user_id: UserId) -> Result<User, StoreError> {
        let mut state = self.state.write().await;
        let record = team_mut(&mut state, team_id)?;
        let idx = record
            .members
            .iter()
            .position(|m| m.id == user_id)
            .ok_or(StoreError::MemberNotFound)?;

        record.tasks.retain(|t| t.owner != user_id);
        let removed = record.members.remove(idx);
        self.persist(&state);
        tracing::info!(member = %removed.name, "member removed");
        Ok(removed)
    }

    // -- Tasks --------------------------------------------------------------

    /// Creates a task on a member's board.
    ///
    /// Title and description are trimmed before validation and storage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TitleEmpty`] / [`StoreError::TitleTooLong`] /
    /// [`StoreError::DescriptionTooLong`] on validation failure,
    /// [`StoreError::TeamNotFound`] for an unknown team, and
    /// [`StoreError::MemberNotFound`] if the owner is not on the roster.
    pub async fn create_task(
        &self,
        team_id: TeamId,
        title: &str,
        description: &str,
        owner: UserId,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        let title = title.trim();
        let description = description.trim();
        if title.is_empty() {
            return Err(StoreError::TitleEmpty);
        }
        if !validate_title(title) {
            return Err(StoreError::TitleTooLong);
        }
        if !validate_description(description) {
            return Err(StoreError::DescriptionTooLong);
        }

        let mut state = self.state.write().await;
        let record = team_mut(&mut state, team_id)?;
        let owner_name = record
            .members
            .iter()
            .find(|m| m.id == owner)
            .map(|m| m.name.clone())
            .ok_or(StoreError::MemberNotFound)?;

        let now = Self::now_ms();
        let task = Task {
            id: TaskId::new(),
            team_id,
            owner,
            owner_name,
            title: title.to_string(),
            description: description.to_string(),
            status,
            created_at: now,
            updated_at: now,
        };
        record.tasks.push(task.clone());
        self.persist(&state);
        Ok(task)
    }

    /// Applies a partial update to a task and bumps `updated_at`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NoUpdates`] if `changes` is empty, the title/
    /// description validation errors, [`StoreError::TeamNotFound`], and
    /// [`StoreError::TaskNotFound`].
    pub async fn update_task(
        &self,
        team_id: TeamId,
        task_id: TaskId,
        changes: TaskChanges,
    ) -> Result<Task, StoreError> {
        if changes.is_empty() {
            return Err(StoreError::NoUpdates);
        }
        if let Some(title) = &changes.title {
            if title.trim().is_empty() {
                return Err(StoreError::TitleEmpty);
            }
            if !validate_title(title) {
                return Err(StoreError::TitleTooLong);
            }
        }
        if let Some(description) = &changes.description
            && !validate_description(description.trim())
        {
            return Err(StoreError::DescriptionTooLong);
        }

        let mut state = self.state.write().await;
        let record = team_mut(&mut state, team_id)?;
        let task = record
            .tasks
            .iter_mut()
            .find(|t| t.id == task_id)
            .ok_or(StoreError::TaskNotFound)?;

        if let Some(title) = changes.title {
            task.title = title.trim().to_string();
        }
        if let Some(description) = changes.description {
            task.description = description.trim().to_string();
        }
        if let Some(status) = changes.status {
            task.status = status;
        }
        task.updated_at = Self::now_ms();

        let updated = task.clone();
        self.persist(&state);
        Ok(updated)
    }

    /// Moves a task to a new lifecycle stage.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] or [`StoreError::TaskNotFound`].
    pub async fn update_task_status(
        &self,
        team_id: TeamId,
        task_id: TaskId,
        status: TaskStatus,
    ) -> Result<Task, StoreError> {
        self.update_task(
            team_id,
            task_id,
            TaskChanges {
                status: Some(status),
                ..TaskChanges::default()
            },
        )
        .await
    }

    /// Deletes a task.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] or [`StoreError::TaskNotFound`].
    pub async fn delete_task(&self, team_id: TeamId, task_id: TaskId) -> Result<(), StoreError> {
        let mut state = self.state.write().await;
        let record = team_mut(&mut state, team_id)?;
        let before = record.tasks.len();
        record.tasks.retain(|t| t.id != task_id);
        if record.tasks.len() == before {
            return Err(StoreError::TaskNotFound);
        }
        self.persist(&state);
        Ok(())
    }

    /// Returns one member's tasks, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn user_tasks(&self, team_id: TeamId, user_id: UserId) -> Result<Vec<Task>, StoreError> {
        let state = self.state.read().await;
        let mut tasks: Vec<Task> = team_ref(&state, team_id)?
            .tasks
            .iter()
            .filter(|t| t.owner == user_id)
            .cloned()
            .collect();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    /// Returns every task in the team, newest first.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn team_tasks(&self, team_id: TeamId) -> Result<Vec<Task>, StoreError> {
        let state = self.state.read().await;
        let mut tasks = team_ref(&state, team_id)?.tasks.clone();
        tasks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(tasks)
    }

    /// Searches team tasks by title or description substring.
    ///
    /// The match is case-insensitive. An empty or whitespace-only query
    /// returns no results without scanning. Results are ordered by
    /// `updated_at` descending and capped at `limit`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::TeamNotFound`] for an unknown team.
    pub async fn search_tasks(
        &self,
        team_id: TeamId,
        query: &str,
        limit: usize,
    ) -> Result<Vec<Task>, StoreError> {
        let query = query.trim().to_lowercase();
        let state = self.state.read().await;
        let record = team_ref(&state, team_id)?;
        if query.is_empty() {
            return Ok(Vec::new());
        }

        let mut hits: Vec<Task> = record
            .tasks
            .iter()
            .filter(|t| {
                t.title.to_lowercase().contains(&query)
                    || t.description.to_lowercase().contains(&query)
            })
            .cloned()
            .collect();
        hits.sort_by(|a, b| b.updated_at.cmp(&a.updated_at));
        hits.truncate(limit);
        Ok(hits)
    }
}

fn team_ref(state: &StoreState, team_id: TeamId) -> Result<&TeamRecord, StoreError> {
    state
        .teams
        .iter()
        .find(|r| r.team.id == team_id)
        .ok_or(StoreError::TeamNotFound)
}

fn team_mut(state: &mut StoreState, team_id: TeamId) -> Result<&mut TeamRecord, StoreError> {
    state
        .teams
        .iter_mut()
        .find(|r| r.team.id == team_id)
        .ok_or(StoreError::TeamNotFound)
}
