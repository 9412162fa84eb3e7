//! Shared test harness: a scriptable stub remote store, a stub object
//! store, and scratch database helpers.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration as ChronoDuration, Utc};
use serde_json::{json, Value};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Once};
use std::time::Duration;
use tempfile::TempDir;

use parvis::db::Database;
use parvis::error::{RemoteError, ResolutionError};
use parvis::model::Collection;
use parvis::remote::RemoteStore;
use parvis::resolver::ObjectStore;

/// What the stub answers for one collection.
#[derive(Clone)]
pub enum Behavior {
    Rows(Vec<Value>),
    Empty,
    Fail,
}

pub struct StubRemote {
    behaviors: Mutex<HashMap<Collection, Behavior>>,
    /// Artificial latency applied to every fetch, read at call time.
    delay: Mutex<Duration>,
    fetch_calls: Mutex<HashMap<Collection, usize>>,
    pub writes: Mutex<Vec<String>>,
    total_fetches: AtomicUsize,
}

impl StubRemote {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            behaviors: Mutex::new(HashMap::new()),
            delay: Mutex::new(Duration::ZERO),
            fetch_calls: Mutex::new(HashMap::new()),
            writes: Mutex::new(Vec::new()),
            total_fetches: AtomicUsize::new(0),
        })
    }

    pub fn set(&self, collection: Collection, behavior: Behavior) {
        self.behaviors.lock().unwrap().insert(collection, behavior);
    }

    pub fn set_all(&self, behavior: Behavior) {
        for c in Collection::ALL {
            self.set(c, behavior.clone());
        }
    }

    pub fn set_delay(&self, delay: Duration) {
        *self.delay.lock().unwrap() = delay;
    }

    pub fn fetches(&self, collection: Collection) -> usize {
        *self.fetch_calls.lock().unwrap().get(&collection).unwrap_or(&0)
    }

    pub fn total_fetches(&self) -> usize {
        self.total_fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl RemoteStore for StubRemote {
    async fn fetch_rows(
        &self,
        collection: Collection,
        _now: DateTime<Utc>,
        _limit: i64,
    ) -> Result<Vec<Value>, RemoteError> {
        let (behavior, delay) = {
            let behaviors = self.behaviors.lock().unwrap();
            let behavior = behaviors.get(&collection).cloned().unwrap_or(Behavior::Empty);
            (behavior, *self.delay.lock().unwrap())
        };
        *self.fetch_calls.lock().unwrap().entry(collection).or_insert(0) += 1;
        self.total_fetches.fetch_add(1, Ordering::SeqCst);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        match behavior {
            Behavior::Rows(rows) => Ok(rows),
            Behavior::Empty => Ok(Vec::new()),
            Behavior::Fail => Err(RemoteError::Transport("stub transport failure".into())),
        }
    }

    async fn insert_row(&self, collection: Collection, row: Value) -> Result<(), RemoteError> {
        self.writes.lock().unwrap().push(format!("insert {collection} {row}"));
        Ok(())
    }

    async fn update_row(&self, collection: Collection, id: &str, patch: Value) -> Result<(), RemoteError> {
        self.writes.lock().unwrap().push(format!("update {collection} {id} {patch}"));
        Ok(())
    }

    async fn delete_row(&self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        self.writes.lock().unwrap().push(format!("delete {collection} {id}"));
        Ok(())
    }
}

/// Object store that prefixes keys with a fake CDN host.
pub struct StubObjects;

#[async_trait]
impl ObjectStore for StubObjects {
    async fn public_url(&self, key: &str) -> Result<String, ResolutionError> {
        Ok(format!("https://cdn.test/{key}"))
    }
}

static INIT_TRACING: Once = Once::new();

/// Route engine diagnostics to the test writer; filter via `RUST_LOG`.
pub fn init_tracing() {
    INIT_TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// A fresh SQLite database in a scratch directory. Keep the `TempDir`
/// alive for the duration of the test.
pub async fn scratch_db() -> (TempDir, Database) {
    init_tracing();
    let dir = TempDir::new().expect("scratch dir");
    let url = scratch_url(&dir);
    let db = Database::connect(Some(&url)).await.expect("connect scratch db");
    db.run_migrations().await.expect("migrate scratch db");
    (dir, db)
}

pub fn scratch_url(dir: &TempDir) -> String {
    format!("sqlite://{}?mode=rwc", dir.path().join("parvis-test.db").display())
}

/// A live row in the remote store's shape, scheduled `hours_ago` in the past
/// (negative for the future).
pub fn live_row(collection: Collection, id: &str, title_en: &str, hours_ago: i64) -> Value {
    let scheduled = (Utc::now() - ChronoDuration::hours(hours_ago)).to_rfc3339();
    let mut row = json!({
        "id": id,
        "title_fr": format!("{title_en} (fr)"),
        "title_en": title_en,
        "description_fr": "",
        "description_en": "",
        "scheduled_at": scheduled,
        "is_published": true,
        "share_count": 0
    });
    row.as_object_mut()
        .unwrap()
        .insert(collection.media_field().into(), json!(format!("https://media.test/{id}")));
    row
}
