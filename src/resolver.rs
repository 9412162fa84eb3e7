use async_trait::async_trait;
use tracing::warn;
use url::Url;

use crate::error::ResolutionError;

/// External object storage: maps an opaque storage key to a public,
/// fetchable URL.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    async fn public_url(&self, key: &str) -> Result<String, ResolutionError>;
}

/// True when `s` already carries a scheme (`https://…`, `mock://…`).
/// Anything that does not parse as an absolute URL is treated as a storage key.
pub fn is_absolute_url(s: &str) -> bool {
    Url::parse(s).is_ok()
}

/// Resolve a media reference to a fetchable URL.
///
/// Absolute URLs pass through unchanged, which makes resolution idempotent.
/// On storage failure the original reference is returned so a broken link
/// never blocks rendering; the failure is logged at warn level.
pub async fn resolve_ref(store: &dyn ObjectStore, media_ref: &str) -> String {
    if is_absolute_url(media_ref) {
        return media_ref.to_string();
    }
    match store.public_url(media_ref).await {
        Ok(url) => url,
        Err(e) => {
            warn!(key = media_ref, error = %e, "media reference left unresolved");
            media_ref.to_string()
        }
    }
}
