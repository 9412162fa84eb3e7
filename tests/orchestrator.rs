mod common;

use std::sync::Arc;
use std::time::Duration;

use common::{live_row, scratch_db, Behavior, StubObjects, StubRemote};
use parvis::model::{Collection, Origin};
use parvis::orchestrator::Orchestrator;
use parvis::remote::RemoteSource;
use serde_json::json;

const TTL: i64 = 24 * 3600;
const LIMIT: i64 = 10;

fn orchestrator(db: parvis::db::Database, remote: RemoteSource) -> Orchestrator {
    Orchestrator::new(db, remote, None, TTL, LIMIT, Duration::from_secs(10))
}

#[tokio::test]
async fn failing_remote_yields_seed_not_error() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set_all(Behavior::Fail);
    let orch = orchestrator(db, RemoteSource::Configured(stub));

    for c in Collection::ALL {
        let result = orch.sync_collection(c, true).await;
        assert_eq!(result.origin, Origin::Seed);
        assert!(!result.records.is_empty(), "{c} seed fallback must not be empty");
    }
}

#[tokio::test]
async fn empty_remote_yields_seed() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set_all(Behavior::Empty);
    let orch = orchestrator(db, RemoteSource::Configured(stub));

    let result = orch.sync_collection(Collection::Audio, true).await;
    assert_eq!(result.origin, Origin::Seed);
    assert!(!result.records.is_empty());
}

#[tokio::test]
async fn unconfigured_remote_yields_seed() {
    let (_dir, db) = scratch_db().await;
    let orch = orchestrator(db, RemoteSource::Unconfigured);

    let result = orch.sync_collection(Collection::News, true).await;
    assert_eq!(result.origin, Origin::Seed);
    assert!(!result.records.is_empty());
}

#[tokio::test]
async fn collections_fall_back_independently() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(
        Collection::News,
        Behavior::Rows(vec![
            live_row(Collection::News, "n1", "One", 3),
            live_row(Collection::News, "n2", "Two", 2),
            live_row(Collection::News, "n3", "Three", 1),
        ]),
    );
    stub.set(Collection::Audio, Behavior::Empty);
    stub.set(Collection::Video, Behavior::Fail);
    let orch = orchestrator(db, RemoteSource::Configured(stub));

    let results = orch.sync_all(true).await;
    let news = results.iter().find(|r| r.collection == Collection::News).unwrap();
    let audio = results.iter().find(|r| r.collection == Collection::Audio).unwrap();
    let video = results.iter().find(|r| r.collection == Collection::Video).unwrap();

    assert_eq!(news.origin, Origin::Remote);
    assert_eq!(news.records.len(), 3);
    assert_eq!(audio.origin, Origin::Seed);
    assert!(!audio.records.is_empty());
    assert_eq!(video.origin, Origin::Seed);
}

#[tokio::test]
async fn fresh_cache_short_circuits_the_network() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(Collection::News, Behavior::Rows(vec![live_row(Collection::News, "n1", "One", 2)]));
    let orch = orchestrator(db, RemoteSource::Configured(stub.clone()));

    let first = orch.sync_collection(Collection::News, false).await;
    assert_eq!(first.origin, Origin::Remote);
    assert_eq!(stub.fetches(Collection::News), 1);

    let second = orch.sync_collection(Collection::News, false).await;
    assert_eq!(second.origin, Origin::Cache);
    assert_eq!(second.records.len(), first.records.len());
    assert_eq!(stub.fetches(Collection::News), 1, "cache hit must not refetch");
}

#[tokio::test]
async fn force_bypasses_a_fresh_cache() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(Collection::News, Behavior::Rows(vec![live_row(Collection::News, "n1", "One", 2)]));
    let orch = orchestrator(db, RemoteSource::Configured(stub.clone()));

    orch.sync_collection(Collection::News, false).await;
    let forced = orch.sync_collection(Collection::News, true).await;
    assert_eq!(forced.origin, Origin::Remote);
    assert_eq!(stub.fetches(Collection::News), 2);
}

#[tokio::test]
async fn schedule_filter_applies_to_live_rows() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    let mut unpublished = live_row(Collection::Video, "v-unpub", "Hidden", 5);
    unpublished["is_published"] = serde_json::Value::Bool(false);
    stub.set(
        Collection::Video,
        Behavior::Rows(vec![
            live_row(Collection::Video, "v-past", "Past", 24),
            live_row(Collection::Video, "v-future", "Future", -24),
            unpublished,
        ]),
    );
    let orch = orchestrator(db, RemoteSource::Configured(stub));

    let result = orch.sync_collection(Collection::Video, true).await;
    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["v-past"]);
}

#[tokio::test]
async fn malformed_row_is_quarantined_not_fatal() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(
        Collection::News,
        Behavior::Rows(vec![
            live_row(Collection::News, "n1", "Good", 2),
            json!({ "id": "n2", "scheduled_at": "not a timestamp" }),
            live_row(Collection::News, "n3", "Also good", 1),
        ]),
    );
    let orch = orchestrator(db, RemoteSource::Configured(stub));

    let result = orch.sync_collection(Collection::News, true).await;
    assert_eq!(result.origin, Origin::Remote);
    let ids: Vec<&str> = result.records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["n1", "n3"]);
}

#[tokio::test]
async fn storage_keys_are_resolved_and_urls_pass_through() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    let mut keyed = live_row(Collection::Audio, "a1", "Keyed", 2);
    keyed["audio_url"] = serde_json::Value::String("sermons/keyed.mp3".into());
    stub.set(
        Collection::Audio,
        Behavior::Rows(vec![keyed, live_row(Collection::Audio, "a2", "Absolute", 1)]),
    );
    let orch = Orchestrator::new(
        db,
        RemoteSource::Configured(stub),
        Some(Arc::new(StubObjects)),
        TTL,
        LIMIT,
        Duration::from_secs(10),
    );

    let result = orch.sync_collection(Collection::Audio, true).await;
    assert_eq!(result.records[0].media_ref.as_deref(), Some("https://cdn.test/sermons/keyed.mp3"));
    assert_eq!(result.records[1].media_ref.as_deref(), Some("https://media.test/a2"));
}

#[tokio::test]
async fn slow_remote_times_out_to_seed() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(Collection::News, Behavior::Rows(vec![live_row(Collection::News, "n1", "Slow", 2)]));
    stub.set_delay(Duration::from_millis(250));
    let orch = Orchestrator::new(
        db,
        RemoteSource::Configured(stub),
        None,
        TTL,
        LIMIT,
        Duration::from_millis(50),
    );

    let result = orch.sync_collection(Collection::News, true).await;
    assert_eq!(result.origin, Origin::Seed);
    assert!(!result.records.is_empty());
}

#[tokio::test]
async fn writes_invalidate_the_collection_cache() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    stub.set(Collection::News, Behavior::Rows(vec![live_row(Collection::News, "n1", "One", 2)]));
    let orch = orchestrator(db, RemoteSource::Configured(stub.clone()));

    orch.sync_collection(Collection::News, false).await;
    orch.delete_record(Collection::News, "n1").await.unwrap();

    // Cache entry was dropped, so the next plain sync goes back out.
    let after = orch.sync_collection(Collection::News, false).await;
    assert_eq!(after.origin, Origin::Remote);
    assert_eq!(stub.fetches(Collection::News), 2);
    assert_eq!(stub.writes.lock().unwrap().len(), 1);
}

#[tokio::test]
async fn create_assigns_an_id_when_missing() {
    let (_dir, db) = scratch_db().await;
    let stub = StubRemote::new();
    let orch = orchestrator(db, RemoteSource::Configured(stub.clone()));

    let mut record = parvis::seed::seed(Collection::News).remove(0);
    record.id = String::new();
    let id = orch.create_record(record).await.unwrap();
    assert!(!id.is_empty());
    assert!(stub.writes.lock().unwrap()[0].starts_with("insert news"));
}

#[tokio::test]
async fn write_path_reports_unconfigured_remote() {
    let (_dir, db) = scratch_db().await;
    let orch = orchestrator(db, RemoteSource::Unconfigured);

    let err = orch.delete_record(Collection::News, "n1").await.unwrap_err();
    assert!(matches!(err, parvis::error::RemoteError::Unconfigured));
}
