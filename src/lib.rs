//! Parvis is an embeddable content sync engine for bilingual community
//! media apps: it fetches news/audio/video collections from a remote
//! store, filters them by publication schedule, resolves media storage
//! keys to public URLs, and caches results in a durable local store —
//! degrading to bundled seed content whenever the remote is unreachable,
//! empty, or not configured. The read path never surfaces an error to the
//! presentation layer.

pub mod controller;
pub mod db;
pub mod error;
pub mod mapping;
pub mod model;
pub mod orchestrator;
pub mod prefs;
pub mod remote;
pub mod resolver;
pub mod rest;
pub mod seed;
pub mod storage;
pub mod visibility;

// --- Library API for embedding ---

/// Convenience re-exports for embedders.
pub mod prelude {
    pub use crate::controller::{RefreshSignal, SyncController};
    pub use crate::error::{MalformedRecord, RemoteError, ResolutionError};
    pub use crate::model::{
        Collection, CollectionResult, ContentRecord, Counters, Locale, LocalizedText, Origin,
        SyncSnapshot, SyncState,
    };
    pub use crate::remote::{RemoteSource, RemoteStore};
    pub use crate::resolver::ObjectStore;
    pub use crate::{Engine, EngineOptions};
}

use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;

use crate::controller::{RefreshSignal, SyncController};
use crate::db::Database;
use crate::error::RemoteError;
use crate::model::{Collection, CollectionResult, ContentRecord, SyncSnapshot, SyncState};
use crate::orchestrator::Orchestrator;
use crate::prefs::Preferences;
use crate::remote::RemoteSource;
use crate::resolver::ObjectStore;

/// Knobs for [`Engine::connect`]. The defaults match the observed client:
/// 1-day content TTL, 10-row pages, 10-second remote timeout, seed-only
/// operation until a remote store is configured.
pub struct EngineOptions {
    /// Database URL; `None` selects a SQLite file in the user's data dir.
    pub database_url: Option<String>,
    pub run_migrations: bool,
    pub remote: RemoteSource,
    pub objects: Option<Arc<dyn ObjectStore>>,
    pub content_ttl_secs: Option<i64>,
    pub page_limit: i64,
    pub fetch_timeout: Duration,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            database_url: None,
            run_migrations: true,
            remote: RemoteSource::Unconfigured,
            objects: None,
            content_ttl_secs: None,
            page_limit: 10,
            fetch_timeout: Duration::from_secs(10),
        }
    }
}

/// Async library entry point. Owns the database, the fetch orchestrator,
/// and the sync controller.
pub struct Engine {
    orchestrator: Arc<Orchestrator>,
    controller: Arc<SyncController>,
    prefs: Preferences,
}

impl Engine {
    /// Initialize the database and (optionally) run migrations. Does not
    /// start any internal runtimes or background syncs.
    pub async fn connect(options: EngineOptions) -> Result<Self> {
        let db = Database::connect(options.database_url.as_deref()).await?;
        if options.run_migrations {
            db.run_migrations().await?;
        }
        // TTL via env with default, overridable per instance
        let content_ttl_secs = options.content_ttl_secs.unwrap_or_else(|| {
            std::env::var("PARVIS_CONTENT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(24 * 3600)
        });
        let orchestrator = Arc::new(Orchestrator::new(
            db.clone(),
            options.remote,
            options.objects,
            content_ttl_secs,
            options.page_limit,
            options.fetch_timeout,
        ));
        let controller = Arc::new(SyncController::new(Arc::clone(&orchestrator)));
        let prefs = Preferences::new(db);
        Ok(Self { orchestrator, controller, prefs })
    }

    // --- read path ---

    /// Current collections, last sync stamp, and in-flight flag.
    pub fn state(&self) -> SyncState {
        self.controller.state()
    }

    /// Sync all collections, serving from still-fresh cache where possible.
    pub async fn refresh(&self) -> SyncSnapshot {
        self.controller.refresh().await
    }

    /// Invalidate the content cache and sync all collections live.
    pub async fn force_refresh(&self) -> SyncSnapshot {
        self.controller.force_refresh().await
    }

    /// Sync a single collection outside a controller round.
    pub async fn sync_collection(&self, collection: Collection, force: bool) -> CollectionResult {
        self.orchestrator.sync_collection(collection, force).await
    }

    /// Forward external refresh signals to the controller.
    pub fn listen(&self, signals: mpsc::Receiver<RefreshSignal>) -> tokio::task::JoinHandle<()> {
        self.controller.listen(signals)
    }

    // --- administrative write path ---

    /// Create a record remotely; assigns a fresh id when none is set.
    /// Returns the record's id.
    pub async fn create_record(&self, record: ContentRecord) -> Result<String, RemoteError> {
        self.orchestrator.create_record(record).await
    }

    pub async fn update_record(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        self.orchestrator.update_record(record).await
    }

    pub async fn delete_record(&self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        self.orchestrator.delete_record(collection, id).await
    }

    pub async fn record_share(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        self.orchestrator.record_share(record).await
    }

    pub async fn record_download(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        self.orchestrator.record_download(record).await
    }

    // --- maintenance ---

    pub fn preferences(&self) -> &Preferences {
        &self.prefs
    }

    /// Drop every cached collection. Returns rows removed.
    pub async fn clear_content_cache(&self) -> Result<u64> {
        self.orchestrator.invalidate_all().await
    }
}
