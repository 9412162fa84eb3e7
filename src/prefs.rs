//! Cookie-equivalent client preferences, persisted in the durable store
//! with a long TTL (365 days, matching the original cookie lifetime).
//! Preference keys share the cache table under their own prefix, so a
//! content force-refresh never wipes them.

use anyhow::Result;
use serde_json::Value;
use tracing::warn;

use crate::db::Database;
use crate::model::Locale;
use crate::orchestrator::CONTENT_KEY_PREFIX;
use crate::storage::Storage;

const PREFS_KEY_PREFIX: &str = "prefs|";
const LANGUAGE_KEY: &str = "prefs|language";
const USER_PREFS_KEY: &str = "prefs|user";
const PREFS_TTL_SECS: i64 = 365 * 24 * 3600;

#[derive(Clone)]
pub struct Preferences {
    db: Database,
}

impl Preferences {
    pub fn new(db: Database) -> Self {
        Self { db }
    }

    /// Stored language, defaulting to French.
    pub async fn language(&self) -> Locale {
        match self.db.get_cache(LANGUAGE_KEY, now_epoch()).await {
            Ok(Some(entry)) => Locale::from_tag(&entry.payload),
            Ok(None) => Locale::Fr,
            Err(e) => {
                warn!(error = %e, "failed to read language preference");
                Locale::Fr
            }
        }
    }

    pub async fn set_language(&self, locale: Locale) -> Result<()> {
        let now = now_epoch();
        self.db.put_cache(LANGUAGE_KEY, locale.as_str(), now, now + PREFS_TTL_SECS).await
    }

    /// Free-form preferences object, or `None` when never written.
    pub async fn user_prefs(&self) -> Result<Option<Value>> {
        let entry = self.db.get_cache(USER_PREFS_KEY, now_epoch()).await?;
        Ok(entry.and_then(|e| serde_json::from_str(&e.payload).ok()))
    }

    /// Shallow-merge `patch` into the stored object, creating it if absent.
    pub async fn merge_user_prefs(&self, patch: Value) -> Result<()> {
        let mut current = self.user_prefs().await?.unwrap_or_else(|| Value::Object(Default::default()));
        if let (Some(target), Some(source)) = (current.as_object_mut(), patch.as_object()) {
            for (k, v) in source {
                target.insert(k.clone(), v.clone());
            }
        } else {
            current = patch;
        }
        let now = now_epoch();
        self.db
            .put_cache(USER_PREFS_KEY, &current.to_string(), now, now + PREFS_TTL_SECS)
            .await
    }

    /// Remove every preference and every cached collection.
    pub async fn clear_all(&self) -> Result<u64> {
        let prefs = self.db.clear_cache_prefix(Some(PREFS_KEY_PREFIX)).await?;
        let content = self.db.clear_cache_prefix(Some(CONTENT_KEY_PREFIX)).await?;
        Ok(prefs + content)
    }
}

fn now_epoch() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs() as i64
}
