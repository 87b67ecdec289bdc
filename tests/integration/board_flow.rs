//! Integration tests for the board model against the store: loading,
//! stage moves with write-back, reordering, and deletion.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use crewboard::board::Board;
use crewboard_proto::task::TaskStatus;
use crewboard_proto::team::{TeamId, User};
use crewboard_store::TeamStore;

// ---------------------------------------------------------------------------
// Helper functions
// ---------------------------------------------------------------------------

async fn make_team(store: &TeamStore) -> (TeamId, User) {
    let session = store.register_team("acme", "secret").await.unwrap();
    let alice = store.add_member(session.team.id, "alice").await.unwrap();
    (session.team.id, alice)
}

fn column_titles(board: &Board, status: TaskStatus) -> Vec<String> {
    board
        .column(status)
        .map(|c| c.tasks.iter().map(|t| t.title.clone()).collect())
        .unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Loading & grouping
// ---------------------------------------------------------------------------

#[tokio::test]
async fn board_groups_loaded_tasks_by_stage() {
    let store = TeamStore::new();
    let (team_id, alice) = make_team(&store).await;
    for (title, status) in [
        ("one", TaskStatus::New),
        ("two", TaskStatus::Current),
        ("three", TaskStatus::New),
        ("four", TaskStatus::Completed),
    ] {
        store
            .create_task(team_id, title, "", alice.id, status)
            .await
            .unwrap();
    }

    let board = Board::from_tasks(store.user_tasks(team_id, alice.id).await.unwrap());
    assert_eq!(board.len(), 4);
    // user_tasks returns newest first; grouping preserves that order.
    assert_eq!(column_titles(&board, TaskStatus::New), ["three", "one"]);
    assert_eq!(column_titles(&board, TaskStatus::Current), ["two"]);
    assert_eq!(column_titles(&board, TaskStatus::Completed), ["four"]);
    assert!(
        column_titles(&board, TaskStatus::InProgress).is_empty()
    );
}

// ---------------------------------------------------------------------------
// Stage moves with write-back
// ---------------------------------------------------------------------------

#[tokio::test]
async fn stage_move_updates_store_and_board() {
    let store = TeamStore::new();
    let (team_id, alice) = make_team(&store).await;
    let task = store
        .create_task(team_id, "Drag me", "", alice.id, TaskStatus::New)
        .await
        .unwrap();

    let mut board = Board::from_tasks(store.user_tasks(team_id, alice.id).await.unwrap());

    // The UI persists the stage change, then applies the updated task.
    let updated = store
        .update_task_status(team_id, task.id, TaskStatus::InProgress)
        .await
        .unwrap();
    board.upsert(updated);

    assert!(column_titles(&board, TaskStatus::New).is_empty());
    assert_eq!(column_titles(&board, TaskStatus::InProgress), ["Drag me"]);

    // A reload agrees with the incrementally updated board.
    let reloaded = Board::from_tasks(store.user_tasks(team_id, alice.id).await.unwrap());
    assert_eq!(
        column_titles(&reloaded, TaskStatus::InProgress),
        ["Drag me"]
    );
}

#[tokio::test]
async fn board_move_is_remove_then_insert_at_index() {
    let store = TeamStore::new();
    let (team_id, alice) = make_team(&store).await;
    let mover = store
        .create_task(team_id, "mover", "", alice.id, TaskStatus::New)
        .await
        .unwrap();
    for title in ["a", "b"] {
        store
            .create_task(team_id, title, "", alice.id, TaskStatus::Current)
            .await
            .unwrap();
    }

    let mut board = Board::from_tasks(store.user_tasks(team_id, alice.id).await.unwrap());
    assert!(board.move_task(mover.id, TaskStatus::Current, Some(1)));

    let current = column_titles(&board, TaskStatus::Current);
    assert_eq!(current.len(), 3);
    assert_eq!(current[1], "mover");
    assert_eq!(
        board.find_task(mover.id).map(|(status, _)| status),
        Some(TaskStatus::Current)
    );
}

// ---------------------------------------------------------------------------
// Same-column reorder stays local
// ---------------------------------------------------------------------------

#[tokio::test]
async fn reorder_does_not_touch_the_store() {
    let store = TeamStore::new();
    let (team_id, alice) = make_team(&store).await;
    for title in ["first", "second"] {
        store
            .create_task(team_id, title, "", alice.id, TaskStatus::New)
            .await
            .unwrap();
    }

    let before = store.user_tasks(team_id, alice.id).await.unwrap();
    let mut board = Board::from_tasks(before.clone());
    assert!(board.reorder(TaskStatus::New, 0, 1));

    // The store's ordering is untouched by a visual reorder.
    let after = store.user_tasks(team_id, alice.id).await.unwrap();
    assert_eq!(before, after);
}

// ---------------------------------------------------------------------------
// Deletion
// ---------------------------------------------------------------------------

#[tokio::test]
async fn deletion_removes_from_store_and_board() {
    let store = TeamStore::new();
    let (team_id, alice) = make_team(&store).await;
    let task = store
        .create_task(team_id, "Doomed", "", alice.id, TaskStatus::Current)
        .await
        .unwrap();

    let mut board = Board::from_tasks(store.user_tasks(team_id, alice.id).await.unwrap());
    store.delete_task(team_id, task.id).await.unwrap();
    board.remove(task.id);

    assert!(board.is_empty());
    assert!(store.user_tasks(team_id, alice.id).await.unwrap().is_empty());
}
