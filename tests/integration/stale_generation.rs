//! Integration tests for stale-response discard: an async completion that
//! was superseded by newer input must never overwrite current state.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::sync::Arc;

use crewboard::backend::{Backend, LocalBackend};
use crewboard::command::{BarEffect, BarEvent, BarState, SearchBar, resolve};
use crewboard::session::SessionHandle;
use crewboard_proto::task::TaskStatus;
use crewboard_proto::team::User;
use crewboard_store::TeamStore;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

async fn make_backend() -> (LocalBackend, Arc<TeamStore>, User) {
    let store = Arc::new(TeamStore::new());
    let mut session = store.register_team("acme", "secret").await.unwrap();
    let alice = store.add_member(session.team.id, "alice").await.unwrap();
    store
        .create_task(
            session.team.id,
            "Fix login bug",
            "",
            alice.id,
            TaskStatus::New,
        )
        .await
        .unwrap();
    session.user = Some(alice.clone());
    let handle = SessionHandle::new(Some(session));
    let backend = LocalBackend::new(Arc::clone(&store), handle, 50);
    (backend, store, alice)
}

fn type_text(bar: &mut SearchBar, text: &str) {
    for c in text.chars() {
        bar.insert_char(c, &[]);
    }
}

fn take_search(bar: &mut SearchBar) -> (u64, String) {
    match bar.take_search_request() {
        Some(BarEffect::Search { generation, query }) => (generation, query),
        other => panic!("expected search effect, got {other:?}"),
    }
}

// ---------------------------------------------------------------------------
// Stale search responses
// ---------------------------------------------------------------------------

#[tokio::test]
async fn late_search_response_does_not_overwrite_newer_input() {
    let (backend, _store, _alice) = make_backend().await;
    let mut bar = SearchBar::new();

    // First request goes out for "login"...
    type_text(&mut bar, "login");
    let (old_generation, old_query) = take_search(&mut bar);
    let slow_outcome = backend.search_tasks(&old_query).await;
    assert_eq!(slow_outcome.as_ref().map(Vec::len), Ok(1));

    // ...but the user keeps typing before it lands.
    type_text(&mut bar, " nothing-matches-this");
    let (new_generation, new_query) = take_search(&mut bar);
    assert!(new_generation > old_generation);

    // The slow response arrives after the fast one.
    let fast_outcome = backend.search_tasks(&new_query).await;
    bar.apply(BarEvent::SearchDone {
        generation: new_generation,
        outcome: fast_outcome,
    });
    bar.apply(BarEvent::SearchDone {
        generation: old_generation,
        outcome: slow_outcome,
    });

    // The stale single-hit result must not resurface.
    assert!(bar.results().is_empty());
    assert_eq!(bar.state(), BarState::Searching);
}

#[tokio::test]
async fn enter_supersedes_in_flight_live_search() {
    let (backend, _store, _alice) = make_backend().await;
    let mut bar = SearchBar::new();

    type_text(&mut bar, "login");
    let (live_generation, live_query) = take_search(&mut bar);
    let live_outcome = backend.search_tasks(&live_query).await;

    // Enter re-classifies and issues an authoritative resolution.
    let (submit_generation, intent) = match bar.on_enter() {
        Some(BarEffect::Resolve { generation, intent }) => (generation, intent),
        other => panic!("expected resolve effect, got {other:?}"),
    };
    let resolution = resolve(intent, &backend).await;

    // The live search result arrives late and is dropped.
    bar.apply(BarEvent::SearchDone {
        generation: live_generation,
        outcome: live_outcome,
    });
    assert!(bar.results().is_empty());

    bar.apply(BarEvent::Resolved {
        generation: submit_generation,
        resolution,
    });
    assert_eq!(bar.results().len(), 1);
}

// ---------------------------------------------------------------------------
// Escape while work is in flight
// ---------------------------------------------------------------------------

#[tokio::test]
async fn escape_discards_in_flight_results_on_arrival() {
    let (backend, _store, _alice) = make_backend().await;
    let mut bar = SearchBar::new();

    type_text(&mut bar, "login");
    let (generation, query) = take_search(&mut bar);
    let outcome = backend.search_tasks(&query).await;

    // Escape clears everything; the in-flight call is not aborted, its
    // result is simply ignored when it lands.
    bar.on_escape();
    bar.apply(BarEvent::SearchDone {
        generation,
        outcome,
    });

    assert_eq!(bar.state(), BarState::Idle);
    assert!(bar.results().is_empty());
    assert!(bar.input().is_empty());
}

#[tokio::test]
async fn stale_resolution_after_new_submission_is_dropped() {
    let (backend, store, alice) = make_backend().await;
    let mut bar = SearchBar::new();
    store
        .create_task(
            backend.active_session().unwrap().team_id,
            "Audit everything",
            "",
            alice.id,
            TaskStatus::Current,
        )
        .await
        .unwrap();

    // Submit a search for "login"...
    type_text(&mut bar, "login");
    let (old_generation, old_intent) = match bar.on_enter() {
        Some(BarEffect::Resolve { generation, intent }) => (generation, intent),
        other => panic!("expected resolve effect, got {other:?}"),
    };
    let old_resolution = resolve(old_intent, &backend).await;

    // ...then change the query and submit again before the first lands.
    bar.set_input("audit", &[]);
    let (new_generation, new_intent) = match bar.on_enter() {
        Some(BarEffect::Resolve { generation, intent }) => (generation, intent),
        other => panic!("expected resolve effect, got {other:?}"),
    };
    let new_resolution = resolve(new_intent, &backend).await;

    bar.apply(BarEvent::Resolved {
        generation: new_generation,
        resolution: new_resolution,
    });
    bar.apply(BarEvent::Resolved {
        generation: old_generation,
        resolution: old_resolution,
    });

    // Only the newer submission's results are visible.
    assert_eq!(bar.results().len(), 1);
    assert_eq!(bar.results()[0].title, "Audit everything");
}
