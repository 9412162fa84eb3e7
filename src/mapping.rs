//! Coercion of untyped remote rows into validated `ContentRecord`s.
//!
//! Remote rows arrive as loose JSON shaped like the store's tables
//! (`title_fr`, `title_en`, per-kind media column, ISO-8601 timestamps).
//! Validation happens here, at the orchestrator boundary: a malformed row
//! is quarantined with a diagnostic and never hides its siblings.

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::warn;

use crate::error::MalformedRecord;
use crate::model::{Collection, ContentRecord, Counters, LocalizedText};

pub fn record_from_row(collection: Collection, row: &Value) -> Result<ContentRecord, MalformedRecord> {
    let obj = row.as_object().ok_or_else(|| MalformedRecord {
        id: None,
        reason: "row is not a JSON object".into(),
    })?;

    let id = match obj.get("id").and_then(Value::as_str) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => {
            return Err(MalformedRecord { id: None, reason: "missing or empty id".into() });
        }
    };

    let scheduled_at = parse_timestamp(obj.get("scheduled_at"))
        .map_err(|reason| MalformedRecord { id: Some(id.clone()), reason })?;
    // Creation/update stamps are informational; a bad value degrades to None
    // rather than dropping the row.
    let created_at = parse_timestamp(obj.get("created_at")).unwrap_or(None);
    let updated_at = parse_timestamp(obj.get("updated_at")).unwrap_or(None);

    let media_ref = obj
        .get(collection.media_field())
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(ContentRecord {
        id,
        kind: collection,
        title: LocalizedText::from_parts(string_field(obj, "title_fr"), string_field(obj, "title_en")),
        description: LocalizedText::from_parts(
            string_field(obj, "description_fr"),
            string_field(obj, "description_en"),
        ),
        media_ref,
        scheduled_at,
        is_published: obj.get("is_published").and_then(Value::as_bool),
        created_at,
        updated_at,
        counters: Counters {
            share_count: obj.get("share_count").and_then(Value::as_i64).unwrap_or(0),
            download_count: obj.get("download_count").and_then(Value::as_i64),
        },
    })
}

/// Coerce a batch, dropping malformed rows with a warning. Order is preserved.
pub fn records_from_rows(collection: Collection, rows: &[Value]) -> Vec<ContentRecord> {
    let mut out = Vec::with_capacity(rows.len());
    for row in rows {
        match record_from_row(collection, row) {
            Ok(record) => out.push(record),
            Err(e) => warn!(collection = %collection, error = %e, "dropping malformed remote row"),
        }
    }
    out
}

/// Serialize a record back into the remote store's row shape (write path).
pub fn row_from_record(record: &ContentRecord) -> Value {
    let mut obj = serde_json::Map::new();
    obj.insert("id".into(), Value::String(record.id.clone()));
    obj.insert("title_fr".into(), Value::String(record.title.fr.clone()));
    obj.insert("title_en".into(), Value::String(record.title.en.clone()));
    obj.insert("description_fr".into(), Value::String(record.description.fr.clone()));
    obj.insert("description_en".into(), Value::String(record.description.en.clone()));
    obj.insert(
        record.kind.media_field().into(),
        record.media_ref.clone().map(Value::String).unwrap_or(Value::Null),
    );
    obj.insert(
        "scheduled_at".into(),
        record.scheduled_at.map(|t| Value::String(t.to_rfc3339())).unwrap_or(Value::Null),
    );
    obj.insert(
        "is_published".into(),
        record.is_published.map(Value::Bool).unwrap_or(Value::Null),
    );
    obj.insert("share_count".into(), record.counters.share_count.into());
    if matches!(record.kind, Collection::Audio) {
        obj.insert(
            "download_count".into(),
            record.counters.download_count.map(Value::from).unwrap_or(Value::Null),
        );
    }
    Value::Object(obj)
}

fn string_field(obj: &serde_json::Map<String, Value>, key: &str) -> Option<String> {
    obj.get(key).and_then(Value::as_str).map(str::to_string)
}

/// `Ok(None)` for absent/null, `Ok(Some)` for a valid ISO-8601 string,
/// `Err(reason)` for anything else.
fn parse_timestamp(value: Option<&Value>) -> Result<Option<DateTime<Utc>>, String> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(s)) => DateTime::parse_from_rfc3339(s)
            .map(|t| Some(t.with_timezone(&Utc)))
            .map_err(|e| format!("unparseable timestamp {s:?}: {e}")),
        Some(other) => Err(format!("timestamp is not a string: {other}")),
    }
}
