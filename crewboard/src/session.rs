//! Session handling: an explicit context object with change notification.
//!
//! The active session lives in a [`tokio::sync::watch`] channel — readers
//! take a snapshot with [`SessionHandle::current`] and interested parties
//! subscribe for changes. Updates (login, member switch, logout) are
//! delivered as explicit notifications; nothing polls.
//!
//! A JSON cache file keeps the session across runs. The cache is loaded at
//! startup and validated against the store before use — a cache entry
//! pointing at a team the store no longer knows is ignored.

use std::path::Path;
use std::sync::Arc;

use tokio::sync::watch;

use crewboard_proto::session::Session;
use crewboard_proto::team::User;

/// Errors that can occur while reading or writing the session cache.
#[derive(Debug, thiserror::Error)]
pub enum SessionCacheError {
    /// Failed to read or write the cache file.
    #[error("session cache I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to serialize the session.
    #[error("session cache encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Shared handle to the active session.
///
/// Cheap to clone; all clones observe the same session and all receive
/// change notifications through [`SessionHandle::subscribe`].
#[derive(Clone)]
pub struct SessionHandle {
    tx: Arc<watch::Sender<Option<Session>>>,
}

impl SessionHandle {
    /// Creates a handle holding the given initial session.
    #[must_use]
    pub fn new(initial: Option<Session>) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// Returns a snapshot of the current session.
    #[must_use]
    pub fn current(&self) -> Option<Session> {
        self.tx.borrow().clone()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Option<Session>> {
        self.tx.subscribe()
    }

    /// Replaces the session, notifying subscribers.
    pub fn set(&self, session: Option<Session>) {
        self.tx.send_replace(session);
    }

    /// Switches the active member within the current session.
    ///
    /// A no-op when no session is active.
    pub fn set_user(&self, user: User) {
        self.tx.send_if_modified(|current| {
            if let Some(session) = current {
                session.user = Some(user);
                true
            } else {
                false
            }
        });
    }

    /// Clears the session (logout), notifying subscribers.
    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

/// Writes the session to the cache file, creating parent directories.
///
/// # Errors
///
/// Returns [`SessionCacheError`] on I/O or serialization failure.
pub fn save_cache(path: &Path, session: &Session) -> Result<(), SessionCacheError> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    let json = serde_json::to_string_pretty(session)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Loads a cached session, if one exists and parses.
///
/// A missing or corrupt cache yields `None` — the caller falls back to a
/// fresh login.
#[must_use]
pub fn load_cache(path: &Path) -> Option<Session> {
    let contents = std::fs::read_to_string(path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("ignoring corrupt session cache {}: {e}", path.display());
            None
        }
    }
}

/// Removes the session cache file (logout).
pub fn clear_cache(path: &Path) {
    if let Err(e) = std::fs::remove_file(path)
        && e.kind() != std::io::ErrorKind::NotFound
    {
        tracing::warn!("could not remove session cache {}: {e}", path.display());
    }
}
