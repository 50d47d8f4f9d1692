//! Tests for the SQLite room store.

use reversi_online::{
    Color, GameClient, PlaceResult, Position, RoomDocument, RoomFilter, RoomId, RoomPatch,
    RoomStatus, RoomStore, SharedStore, SqliteStore, StoreErrorKind,
};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use tokio::time::timeout;

fn open(dir: &TempDir, collection: &str) -> SqliteStore {
    let path = dir.path().join("rooms.db");
    SqliteStore::open(path.to_string_lossy(), collection).expect("open store")
}

#[tokio::test]
async fn test_create_and_get() {
    let dir = TempDir::new().expect("temp dir");
    let store = open(&dir, "random_rooms");

    let id = store
        .create(RoomDocument::new_matching())
        .await
        .expect("create");
    let doc = store.get(&id).await.expect("get").expect("room exists");
    assert_eq!(doc, RoomDocument::new_matching());
    assert_eq!(store.collection(), "random_rooms");
}

#[tokio::test]
async fn test_unknown_ids() {
    let dir = TempDir::new().expect("temp dir");
    let store = open(&dir, "random_rooms");

    assert_eq!(store.get(&RoomId::from("42")).await.expect("get"), None);
    assert_eq!(store.get(&RoomId::from("not-a-key")).await.expect("get"), None);

    let err = store
        .update(&RoomId::from("42"), &RoomPatch::new().with_turn(Color::Black))
        .await
        .expect_err("unknown room");
    assert_eq!(err.kind, StoreErrorKind::NotFound);

    let err = store
        .subscribe(&RoomId::from("42"))
        .await
        .expect_err("unknown room");
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_update_merges_only_patched_fields() {
    let dir = TempDir::new().expect("temp dir");
    let store = open(&dir, "random_rooms");
    let id = store
        .create(RoomDocument::new_matching())
        .await
        .expect("create");

    let updated = store
        .update(
            &id,
            &RoomPatch::new()
                .with_num_people(2)
                .with_status(RoomStatus::Playing),
        )
        .await
        .expect("update");

    assert_eq!(updated.num_people, 2);
    assert_eq!(updated.status, RoomStatus::Playing);
    assert_eq!(updated.turn, Color::White);
    assert_eq!(updated.board, RoomDocument::new_matching().board);
    assert_eq!(store.get(&id).await.expect("get"), Some(updated));
}

#[tokio::test]
async fn test_query_filters_by_status_oldest_first() {
    let dir = TempDir::new().expect("temp dir");
    let store = open(&dir, "random_rooms");

    let a = store.create(RoomDocument::new_matching()).await.expect("a");
    let b = store.create(RoomDocument::new_matching()).await.expect("b");
    let c = store.create(RoomDocument::new_matching()).await.expect("c");
    store
        .update(&b, &RoomPatch::new().with_status(RoomStatus::Playing))
        .await
        .expect("update");

    let matching: Vec<RoomId> = store
        .query(&RoomFilter::Status(RoomStatus::Matching))
        .await
        .expect("query")
        .into_iter()
        .map(|(id, _)| id)
        .collect();
    assert_eq!(matching, vec![a, c]);

    let all = store.query(&RoomFilter::All).await.expect("query");
    assert_eq!(all.len(), 3);
    assert_eq!(all[1].0, b);
}

#[tokio::test]
async fn test_collections_are_isolated() {
    let dir = TempDir::new().expect("temp dir");
    let lobby = open(&dir, "lobby");
    let ranked = open(&dir, "ranked");

    let id = lobby
        .create(RoomDocument::new_matching())
        .await
        .expect("create");
    assert_eq!(ranked.get(&id).await.expect("get"), None);
    assert!(ranked.query(&RoomFilter::All).await.expect("query").is_empty());
    assert_eq!(lobby.query(&RoomFilter::All).await.expect("query").len(), 1);
}

#[tokio::test]
async fn test_rooms_survive_reopen() {
    let dir = TempDir::new().expect("temp dir");
    let id = {
        let store = open(&dir, "random_rooms");
        store
            .create(RoomDocument::new_matching())
            .await
            .expect("create")
    };

    let store = open(&dir, "random_rooms");
    assert_eq!(
        store.get(&id).await.expect("get"),
        Some(RoomDocument::new_matching())
    );
}

#[tokio::test]
async fn test_subscription_follows_commits() {
    let dir = TempDir::new().expect("temp dir");
    let store = open(&dir, "random_rooms");
    let id = store
        .create(RoomDocument::new_matching())
        .await
        .expect("create");

    let mut subscription = store.subscribe(&id).await.expect("subscribe");
    assert_eq!(subscription.room_id(), &id);
    let first = subscription.next().await.expect("current snapshot");
    assert_eq!(first.document.status, RoomStatus::Matching);

    store
        .update(&id, &RoomPatch::new().with_turn(Color::Black))
        .await
        .expect("update");
    let next = timeout(Duration::from_secs(5), subscription.next())
        .await
        .expect("within timeout")
        .expect("snapshot");
    assert_eq!(next.document.turn, Color::Black);
    assert!(next.seq > first.seq);
}

#[tokio::test]
async fn test_clients_play_over_sqlite() {
    let dir = TempDir::new().expect("temp dir");
    let store: SharedStore = Arc::new(open(&dir, "random_rooms"));

    let white = GameClient::connect(store.clone()).await.expect("white");
    let black = GameClient::connect(store.clone()).await.expect("black");
    assert_eq!(white.room_id(), black.room_id());

    timeout(
        Duration::from_secs(5),
        white.wait_until(|view| view.is_turn_of(Color::White)),
    )
    .await
    .expect("within timeout")
    .expect("synced");

    let at = Position::new(2, 4).expect("on board");
    let result = white.place(at).await.expect("white places");
    assert!(matches!(result, PlaceResult::Placed { .. }));

    let view = timeout(
        Duration::from_secs(5),
        black.wait_until(|view| view.is_turn_of(Color::Black)),
    )
    .await
    .expect("within timeout")
    .expect("synced");
    assert_eq!(view.room().board().count(Color::White), 4);
}
