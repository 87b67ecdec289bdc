//! Integration tests for team auth, roster management, and the session
//! handle's change notifications and disk cache.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crewboard::session::{self, SessionHandle};
use crewboard_proto::task::TaskStatus;
use crewboard_store::{StoreError, TeamStore};

// ---------------------------------------------------------------------------
// Registration & login
// ---------------------------------------------------------------------------

#[tokio::test]
async fn register_login_switch_flow() {
    let store = TeamStore::new();
    let registered = store.register_team("acme", "secret").await.unwrap();
    assert!(registered.user.is_none());

    let alice = store.add_member(registered.team.id, "alice").await.unwrap();
    let bob = store.add_member(registered.team.id, "bob").await.unwrap();

    // Login auto-selects the earliest-joined member.
    let session = store.login_team("acme", "secret").await.unwrap();
    assert_eq!(session.user.as_ref().map(|u| u.id), Some(alice.id));

    // Switching replaces the member through the session handle and
    // notifies subscribers — no polling involved.
    let handle = SessionHandle::new(Some(session));
    let mut rx = handle.subscribe();
    handle.set_user(bob.clone());
    rx.changed().await.unwrap();
    assert_eq!(
        rx.borrow().as_ref().and_then(|s| s.user.as_ref().map(|u| u.id)),
        Some(bob.id)
    );
}

#[tokio::test]
async fn login_rejects_bad_credentials() {
    let store = TeamStore::new();
    store.register_team("acme", "secret").await.unwrap();

    assert_eq!(
        store.login_team("ghost", "secret").await.unwrap_err(),
        StoreError::TeamNotFound
    );
    assert_eq!(
        store.login_team("acme", "wrong").await.unwrap_err(),
        StoreError::InvalidPassword
    );
}

#[tokio::test]
async fn duplicate_team_registration_rejected() {
    let store = TeamStore::new();
    store.register_team("acme", "secret").await.unwrap();
    assert_eq!(
        store.register_team("acme", "other").await.unwrap_err(),
        StoreError::TeamNameTaken
    );
}

// ---------------------------------------------------------------------------
// Roster management
// ---------------------------------------------------------------------------

#[tokio::test]
async fn roster_keeps_join_order_for_suggestions() {
    let store = TeamStore::new();
    let session = store.register_team("acme", "secret").await.unwrap();
    for name in ["zoe", "adam", "mike"] {
        store.add_member(session.team.id, name).await.unwrap();
    }
    let names: Vec<String> = store
        .members(session.team.id)
        .await
        .unwrap()
        .into_iter()
        .map(|m| m.name)
        .collect();
    // Join order, not alphabetical.
    assert_eq!(names, ["zoe", "adam", "mike"]);
}

#[tokio::test]
async fn removing_member_cascades_their_tasks() {
    let store = TeamStore::new();
    let session = store.register_team("acme", "secret").await.unwrap();
    let alice = store.add_member(session.team.id, "alice").await.unwrap();
    let bob = store.add_member(session.team.id, "bob").await.unwrap();

    store
        .create_task(session.team.id, "Alice's", "", alice.id, TaskStatus::New)
        .await
        .unwrap();
    store
        .create_task(session.team.id, "Bob's", "", bob.id, TaskStatus::Current)
        .await
        .unwrap();

    store.remove_member(session.team.id, alice.id).await.unwrap();

    let remaining = store.team_tasks(session.team.id).await.unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].owner, bob.id);

    let roster = store.members(session.team.id).await.unwrap();
    assert_eq!(roster.len(), 1);

    // Next login falls back to the earliest remaining member.
    let session = store.login_team("acme", "secret").await.unwrap();
    assert_eq!(session.user.map(|u| u.id), Some(bob.id));
}

// ---------------------------------------------------------------------------
// Session cache
// ---------------------------------------------------------------------------

fn temp_path(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("crewboard-{name}-{}.json", uuid::Uuid::now_v7()))
}

#[tokio::test]
async fn cached_session_survives_restart_with_snapshot() {
    let snapshot = temp_path("store");
    let cache = temp_path("session");

    let team_id = {
        let store = TeamStore::with_snapshot(&snapshot);
        let session = store.register_team("acme", "secret").await.unwrap();
        store.add_member(session.team.id, "alice").await.unwrap();
        let session = store.login_team("acme", "secret").await.unwrap();
        session::save_cache(&cache, &session).unwrap();
        session.team.id
    };

    // "Restart": reload both the store snapshot and the session cache.
    let store = TeamStore::with_snapshot(&snapshot);
    let cached = session::load_cache(&cache).unwrap();
    assert_eq!(cached.team.id, team_id);
    assert!(store.has_team(cached.team.id).await);
    assert_eq!(cached.user.map(|u| u.name), Some("alice".to_string()));

    let _ = std::fs::remove_file(&snapshot);
    let _ = std::fs::remove_file(&cache);
}

#[tokio::test]
async fn cached_session_for_unknown_team_is_rejected() {
    let cache = temp_path("session");

    // Cache a session against one store, then start a fresh store.
    let store = TeamStore::new();
    let session = store.register_team("acme", "secret").await.unwrap();
    session::save_cache(&cache, &session).unwrap();

    let fresh = TeamStore::new();
    let cached = session::load_cache(&cache).unwrap();
    // Startup validation: the team does not exist here, so the cache
    // must not be used.
    assert!(!fresh.has_team(cached.team.id).await);

    let _ = std::fs::remove_file(&cache);
}
