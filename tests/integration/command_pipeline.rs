//! Integration tests for the command pipeline: raw input through the
//! grammar and resolver against a live store.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use crewboard::backend::{Backend, LocalBackend};
use crewboard::command::{Resolution, classify, resolve};
use crewboard::session::SessionHandle;
use crewboard_proto::task::TaskStatus;
use crewboard_proto::team::{TeamId, User};
use crewboard_store::TeamStore;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

struct Fixture {
    store: Arc<TeamStore>,
    handle: SessionHandle,
    backend: LocalBackend,
    team_id: TeamId,
    alice: User,
    bob: User,
}

/// Builds a store with one team ("acme"), members alice and bob, and a
/// session with alice active.
async fn make_fixture() -> Fixture {
    let store = Arc::new(TeamStore::new());
    let mut session = store.register_team("acme", "secret").await.unwrap();
    let alice = store.add_member(session.team.id, "alice").await.unwrap();
    let bob = store.add_member(session.team.id, "bob").await.unwrap();
    session.user = Some(alice.clone());

    let team_id = session.team.id;
    let handle = SessionHandle::new(Some(session));
    let backend = LocalBackend::new(Arc::clone(&store), handle.clone(), 50);
    Fixture {
        store,
        handle,
        backend,
        team_id,
        alice,
        bob,
    }
}

/// Classifies and resolves one input string.
async fn run(fixture: &Fixture, input: &str) -> Resolution {
    resolve(classify(input), &fixture.backend).await
}

// ---------------------------------------------------------------------------
// Add-task pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn add_with_assignee_creates_task_for_that_member() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, ":add @bob - Fix the header bug").await;

    match resolution {
        Resolution::TaskCreated { task } => {
            assert_eq!(task.owner, fixture.bob.id);
            assert_eq!(task.owner_name, "bob");
            assert_eq!(task.title, "Fix the header bug");
            assert_eq!(task.status, TaskStatus::New);
        }
        other => panic!("expected TaskCreated, got {other:?}"),
    }

    let tasks = fixture
        .store
        .user_tasks(fixture.team_id, fixture.bob.id)
        .await
        .unwrap();
    assert_eq!(tasks.len(), 1);
}

#[tokio::test]
async fn add_without_assignee_lands_on_active_member() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, ":add Update documentation").await;

    match resolution {
        Resolution::TaskCreated { task } => assert_eq!(task.owner, fixture.alice.id),
        other => panic!("expected TaskCreated, got {other:?}"),
    }
}

#[tokio::test]
async fn assignee_lookup_is_case_insensitive() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, ":ADD @BOB - Case insensitive").await;
    match resolution {
        Resolution::TaskCreated { task } => assert_eq!(task.owner, fixture.bob.id),
        other => panic!("expected TaskCreated, got {other:?}"),
    }
}

#[tokio::test]
async fn unknown_assignee_fails_without_side_effects() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, ":add @ghost - Never created").await;
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "User @ghost not found".to_string()
        }
    );
    assert!(
        fixture
            .store
            .team_tasks(fixture.team_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn add_without_session_is_not_authenticated() {
    let fixture = make_fixture().await;
    fixture.handle.clear();
    let resolution = run(&fixture, ":add Orphan task").await;
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "Not authenticated".to_string()
        }
    );
}

#[tokio::test]
async fn grammar_validation_errors_never_reach_the_store() {
    let fixture = make_fixture().await;

    let too_long = format!(":add {}", "x".repeat(256));
    let resolution = run(&fixture, &too_long).await;
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "Task title must be between 1 and 255 characters".to_string()
        }
    );

    let resolution = run(&fixture, ":add @bad!name - title").await;
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "Username can only contain letters, numbers, and underscores".to_string()
        }
    );

    assert!(
        fixture
            .store
            .team_tasks(fixture.team_id)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn max_length_title_is_accepted_end_to_end() {
    let fixture = make_fixture().await;
    let input = format!(":add {}", "x".repeat(255));
    let resolution = run(&fixture, &input).await;
    assert!(matches!(resolution, Resolution::TaskCreated { .. }));
}

// ---------------------------------------------------------------------------
// Search pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn implicit_search_spans_all_members() {
    let fixture = make_fixture().await;
    fixture
        .store
        .create_task(
            fixture.team_id,
            "Fix login bug",
            "",
            fixture.alice.id,
            TaskStatus::New,
        )
        .await
        .unwrap();
    fixture
        .store
        .create_task(
            fixture.team_id,
            "Audit logging",
            "covers the login path",
            fixture.bob.id,
            TaskStatus::InProgress,
        )
        .await
        .unwrap();

    let resolution = run(&fixture, "login").await;
    match resolution {
        Resolution::Searched { results } => assert_eq!(results.len(), 2),
        other => panic!("expected Searched, got {other:?}"),
    }
}

#[tokio::test]
async fn search_command_and_implicit_search_agree() {
    let fixture = make_fixture().await;
    fixture
        .store
        .create_task(
            fixture.team_id,
            "Fix login bug",
            "",
            fixture.alice.id,
            TaskStatus::New,
        )
        .await
        .unwrap();

    let explicit = run(&fixture, ":search login").await;
    let implicit = run(&fixture, "login").await;
    assert_eq!(explicit, implicit);
}

#[tokio::test]
async fn empty_search_never_touches_the_store() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, "   ").await;
    assert_eq!(
        resolution,
        Resolution::Searched {
            results: Vec::new()
        }
    );
}

// ---------------------------------------------------------------------------
// Help & invalid pipeline
// ---------------------------------------------------------------------------

#[tokio::test]
async fn help_resolves_to_help_shown() {
    let fixture = make_fixture().await;
    assert_eq!(run(&fixture, ":help").await, Resolution::HelpShown);
    assert_eq!(run(&fixture, ":HELP").await, Resolution::HelpShown);
}

#[tokio::test]
async fn colon_typo_resolves_to_unknown_command_error() {
    let fixture = make_fixture().await;
    let resolution = run(&fixture, ":serach bug").await;
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "Unknown command. Type :help for available commands.".to_string()
        }
    );
}

// ---------------------------------------------------------------------------
// Store error passthrough
// ---------------------------------------------------------------------------

#[tokio::test]
async fn store_validation_message_surfaces_verbatim() {
    let fixture = make_fixture().await;
    // The assignee exists but was removed between lookup and creation —
    // the store's own message must surface unchanged.
    let resolution = {
        let backend = &fixture.backend;
        // Remove bob, then create directly for bob through the backend.
        fixture
            .store
            .remove_member(fixture.team_id, fixture.bob.id)
            .await
            .unwrap();
        match backend.create_task("Task", "", Some(fixture.bob.id)).await {
            Err(e) => Resolution::Error {
                message: e.to_string(),
            },
            Ok(_) => panic!("expected an error"),
        }
    };
    assert_eq!(
        resolution,
        Resolution::Error {
            message: "User not found".to_string()
        }
    );
}
