//! Session types.
//!
//! A session is a successful team login plus an optionally-selected member.
//! Registration yields a session with no member; login auto-selects the
//! earliest-joined member when the team has one. Switching the active
//! member replaces the `user` field — the session itself is never mutated
//! in place by consumers.

use serde::{Deserialize, Serialize};

use crate::team::{Team, TeamId, User, UserId};

/// An authenticated team session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// The authenticated team.
    pub team: Team,
    /// Currently selected member, if any.
    pub user: Option<User>,
    /// When the login happened (milliseconds since epoch).
    pub login_time: u64,
}

impl Session {
    /// Returns the narrow context the command resolver works against.
    #[must_use]
    pub fn context(&self) -> SessionContext {
        SessionContext {
            team_id: self.team.id,
            user_id: self.user.as_ref().map(|u| u.id),
        }
    }

    /// Returns a copy of this session with a different active member.
    #[must_use]
    pub fn with_user(&self, user: User) -> Self {
        Self {
            team: self.team.clone(),
            user: Some(user),
            login_time: self.login_time,
        }
    }
}

/// The identity pair the resolver needs: which team, and which member (if
/// one is selected) owns self-assigned tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionContext {
    /// The authenticated team.
    pub team_id: TeamId,
    /// The selected member, if any.
    pub user_id: Option<UserId>,
}
