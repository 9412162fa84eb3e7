use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// One cached collection payload. `payload` is serialized JSON only, never
/// executable content; timestamps are unix epoch seconds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheEntry {
    pub key: String,
    pub payload: String,
    pub written_at: i64,
    pub expires_at: i64,
}

/// Durable client-local key/value store with per-entry expiry. Backs both
/// the short-TTL content cache and long-lived preferences.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns the entry for `key`, or `None` when missing or expired at `now`.
    async fn get_cache(&self, key: &str, now: i64) -> Result<Option<CacheEntry>>;
    /// Upserts `key` atomically; an existing entry is replaced whole
    /// (last-write-wins, no partial payloads).
    async fn put_cache(&self, key: &str, payload: &str, written_at: i64, expires_at: i64) -> Result<()>;
    /// Removes one entry. Returns the number of rows removed.
    async fn remove_cache(&self, key: &str) -> Result<u64>;
    /// Removes entries whose key starts with `prefix`, or everything when
    /// `None`. Returns the number of rows removed.
    async fn clear_cache_prefix(&self, prefix: Option<&str>) -> Result<u64>;
}
