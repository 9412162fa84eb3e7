use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::sync::Arc;

use crate::error::RemoteError;
use crate::model::Collection;

/// The external backing store for content rows.
///
/// Read semantics are fixed: rows whose `scheduled_at` is null or has
/// passed, newest first with nulls first, capped at `limit`. Rows are
/// returned untyped; coercion happens at the orchestrator boundary.
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn fetch_rows(
        &self,
        collection: Collection,
        now: DateTime<Utc>,
        limit: i64,
    ) -> Result<Vec<Value>, RemoteError>;

    // Administrative write path.
    async fn insert_row(&self, collection: Collection, row: Value) -> Result<(), RemoteError>;
    async fn update_row(&self, collection: Collection, id: &str, patch: Value) -> Result<(), RemoteError>;
    async fn delete_row(&self, collection: Collection, id: &str) -> Result<(), RemoteError>;
}

/// A remote store that may not be set up yet. The unconfigured state is
/// explicit so callers branch on it instead of talking to a client whose
/// methods silently do nothing.
#[derive(Clone)]
pub enum RemoteSource {
    Configured(Arc<dyn RemoteStore>),
    Unconfigured,
}

impl RemoteSource {
    pub fn is_configured(&self) -> bool {
        matches!(self, RemoteSource::Configured(_))
    }

    /// The store, or `RemoteError::Unconfigured`.
    pub fn store(&self) -> Result<&Arc<dyn RemoteStore>, RemoteError> {
        match self {
            RemoteSource::Configured(store) => Ok(store),
            RemoteSource::Unconfigured => Err(RemoteError::Unconfigured),
        }
    }
}
