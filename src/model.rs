use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named set of content records. The string forms match the remote
/// store's table names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Collection {
    News,
    Audio,
    Video,
}

impl Collection {
    pub const ALL: [Collection; 3] = [Collection::News, Collection::Audio, Collection::Video];

    pub fn as_str(&self) -> &'static str {
        match self {
            Collection::News => "news",
            Collection::Audio => "audios",
            Collection::Video => "videos",
        }
    }

    /// Column carrying the media reference in remote rows of this kind.
    pub fn media_field(&self) -> &'static str {
        match self {
            Collection::News => "image_url",
            Collection::Audio => "audio_url",
            Collection::Video => "youtube_url",
        }
    }
}

impl std::fmt::Display for Collection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Locale {
    Fr,
    En,
}

impl Locale {
    pub fn as_str(&self) -> &'static str {
        match self {
            Locale::Fr => "fr",
            Locale::En => "en",
        }
    }

    /// Parse a language tag, defaulting to French (the app's primary locale).
    pub fn from_tag(tag: &str) -> Locale {
        match tag.trim().to_ascii_lowercase().as_str() {
            "en" => Locale::En,
            _ => Locale::Fr,
        }
    }
}

/// Every user-facing string carries both locales. Missing values degrade to
/// the empty string at construction time so lookups are infallible.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedText {
    pub fr: String,
    pub en: String,
}

impl LocalizedText {
    pub fn new(fr: impl Into<String>, en: impl Into<String>) -> Self {
        Self { fr: fr.into(), en: en.into() }
    }

    pub fn from_parts(fr: Option<String>, en: Option<String>) -> Self {
        Self { fr: fr.unwrap_or_default(), en: en.unwrap_or_default() }
    }

    pub fn get(&self, locale: Locale) -> &str {
        match locale {
            Locale::Fr => &self.fr,
            Locale::En => &self.en,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.fr.is_empty() && self.en.is_empty()
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Counters {
    pub share_count: i64,
    pub download_count: Option<i64>,
}

/// One piece of content, validated at the orchestrator boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentRecord {
    pub id: String,
    pub kind: Collection,
    pub title: LocalizedText,
    pub description: LocalizedText,
    /// Absolute URL or an opaque object-storage key; `None` for records
    /// without media (e.g. text-only news).
    pub media_ref: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub is_published: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    pub counters: Counters,
}

/// Where a collection's records came from on the last sync.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Origin {
    /// Live rows from the remote store.
    Remote,
    /// A still-fresh local cache entry; no network call was made.
    Cache,
    /// The bundled seed dataset (remote failed, returned nothing, or is
    /// not configured).
    Seed,
}

/// Outcome of syncing one collection. Always produced, possibly degraded;
/// `origin` tells the caller which path was taken.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CollectionResult {
    pub collection: Collection,
    pub records: Vec<ContentRecord>,
    pub origin: Origin,
    pub fetched_at: DateTime<Utc>,
}

/// The collections as of the last committed sync round.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub collections: Vec<CollectionResult>,
    pub last_synced_at: Option<DateTime<Utc>>,
}

impl SyncSnapshot {
    pub fn collection(&self, c: Collection) -> Option<&CollectionResult> {
        self.collections.iter().find(|r| r.collection == c)
    }
}

/// Controller state handed to the presentation layer.
#[derive(Debug, Clone)]
pub struct SyncState {
    pub snapshot: SyncSnapshot,
    pub in_flight: bool,
}
