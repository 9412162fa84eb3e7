use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

use anyhow::Result;

use crate::db::Database;
use crate::error::RemoteError;
use crate::mapping::{records_from_rows, row_from_record};
use crate::model::{Collection, CollectionResult, ContentRecord, Origin};
use crate::remote::RemoteSource;
use crate::resolver::{resolve_ref, ObjectStore};
use crate::seed;
use crate::storage::Storage;
use crate::visibility::filter_visible;

/// Cache key prefix for content collections; preferences live under their
/// own prefix in the same table and survive content invalidation.
pub(crate) const CONTENT_KEY_PREFIX: &str = "content|";

fn cache_key(collection: Collection) -> String {
    format!("{CONTENT_KEY_PREFIX}{collection}")
}

/// Orchestrator owns the cache, the remote source, and object storage, and
/// produces a (possibly degraded) result for every requested collection.
/// Nothing on the read path returns an error to the caller: remote
/// failures, timeouts, and empty responses all degrade to seed data for
/// the affected collection only.
pub struct Orchestrator {
    db: Database,
    remote: RemoteSource,
    objects: Option<Arc<dyn ObjectStore>>,
    content_ttl_secs: i64,
    page_limit: i64,
    fetch_timeout: Duration,
}

impl Orchestrator {
    pub fn new(
        db: Database,
        remote: RemoteSource,
        objects: Option<Arc<dyn ObjectStore>>,
        content_ttl_secs: i64,
        page_limit: i64,
        fetch_timeout: Duration,
    ) -> Self {
        Self { db, remote, objects, content_ttl_secs, page_limit, fetch_timeout }
    }

    /// Sync one collection. Cache short-circuits unless `force`; a live
    /// fetch runs rows through coercion, media resolution, and the
    /// visibility filter before caching the result.
    pub async fn sync_collection(&self, collection: Collection, force: bool) -> CollectionResult {
        let now = Utc::now();
        let key = cache_key(collection);

        if !force {
            if let Some(entry) = self.db.get_cache(&key, now.timestamp()).await.ok().flatten() {
                if let Ok(records) = serde_json::from_str::<Vec<ContentRecord>>(&entry.payload) {
                    debug!(%collection, count = records.len(), "cache hit");
                    return CollectionResult {
                        collection,
                        records,
                        origin: Origin::Cache,
                        fetched_at: Utc
                            .timestamp_opt(entry.written_at, 0)
                            .single()
                            .unwrap_or(now),
                    };
                }
                // Unreadable payload (format drift): fall through to a live fetch.
                warn!(%collection, "discarding unreadable cache payload");
            }
        }

        let (raw, origin) = match self.fetch_remote(collection, now).await {
            Ok(rows) if !rows.is_empty() => {
                debug!(%collection, rows = rows.len(), "fetched live rows");
                (records_from_rows(collection, &rows), Origin::Remote)
            }
            Ok(_) => {
                debug!(%collection, "remote returned no rows, using seed data");
                (seed::seed(collection), Origin::Seed)
            }
            Err(RemoteError::Unconfigured) => {
                debug!(%collection, "remote store not configured, using seed data");
                (seed::seed(collection), Origin::Seed)
            }
            Err(e) => {
                warn!(%collection, error = %e, "remote fetch failed, using seed data");
                (seed::seed(collection), Origin::Seed)
            }
        };

        let mut records = filter_visible(raw, now);
        self.resolve_media(&mut records).await;

        match serde_json::to_string(&records) {
            Ok(payload) => {
                let expires_at = now.timestamp() + self.content_ttl_secs;
                if let Err(e) = self.db.put_cache(&key, &payload, now.timestamp(), expires_at).await {
                    warn!(%collection, error = %e, "failed to write cache entry");
                }
            }
            Err(e) => warn!(%collection, error = %e, "failed to serialize cache payload"),
        }

        CollectionResult { collection, records, origin, fetched_at: now }
    }

    /// Sync every collection concurrently. The fetches are independent;
    /// one collection failing or seeding never affects another.
    pub async fn sync_all(&self, force: bool) -> Vec<CollectionResult> {
        let (news, audios, videos) = futures::join!(
            self.sync_collection(Collection::News, force),
            self.sync_collection(Collection::Audio, force),
            self.sync_collection(Collection::Video, force),
        );
        vec![news, audios, videos]
    }

    /// Drop all cached collections (preferences are untouched).
    pub async fn invalidate_all(&self) -> Result<u64> {
        self.db.clear_cache_prefix(Some(CONTENT_KEY_PREFIX)).await
    }

    /// Drop one cached collection.
    pub async fn invalidate(&self, collection: Collection) -> Result<u64> {
        self.db.remove_cache(&cache_key(collection)).await
    }

    async fn fetch_remote(&self, collection: Collection, now: DateTime<Utc>) -> Result<Vec<Value>, RemoteError> {
        let store = self.remote.store()?;
        match tokio::time::timeout(self.fetch_timeout, store.fetch_rows(collection, now, self.page_limit)).await {
            Ok(result) => result,
            Err(_) => Err(RemoteError::Timeout),
        }
    }

    async fn resolve_media(&self, records: &mut [ContentRecord]) {
        let Some(store) = &self.objects else { return };
        for record in records.iter_mut() {
            if let Some(media_ref) = &record.media_ref {
                let resolved = resolve_ref(store.as_ref(), media_ref).await;
                record.media_ref = Some(resolved);
            }
        }
    }

    // --- administrative write path ---
    //
    // Create/update/delete go straight to the remote store and drop the
    // affected collection's cache entry so the next read refetches.
    // Field-level validation is the embedding UI's concern.

    pub async fn create_record(&self, mut record: ContentRecord) -> Result<String, RemoteError> {
        if record.id.is_empty() {
            record.id = uuid::Uuid::new_v4().to_string();
        }
        let store = self.remote.store()?;
        store.insert_row(record.kind, row_from_record(&record)).await?;
        let _ = self.invalidate(record.kind).await;
        Ok(record.id)
    }

    pub async fn update_record(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        let store = self.remote.store()?;
        store.update_row(record.kind, &record.id, row_from_record(record)).await?;
        let _ = self.invalidate(record.kind).await;
        Ok(())
    }

    pub async fn delete_record(&self, collection: Collection, id: &str) -> Result<(), RemoteError> {
        let store = self.remote.store()?;
        store.delete_row(collection, id).await?;
        let _ = self.invalidate(collection).await;
        Ok(())
    }

    /// Best-effort share-counter bump; the cache is left alone so browsing
    /// state is never perturbed by an engagement ping.
    pub async fn record_share(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        let store = self.remote.store()?;
        let patch = serde_json::json!({ "share_count": record.counters.share_count + 1 });
        store.update_row(record.kind, &record.id, patch).await
    }

    pub async fn record_download(&self, record: &ContentRecord) -> Result<(), RemoteError> {
        let store = self.remote.store()?;
        let next = record.counters.download_count.unwrap_or(0) + 1;
        let patch = serde_json::json!({ "download_count": next });
        store.update_row(record.kind, &record.id, patch).await
    }
}
