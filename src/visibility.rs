use chrono::{DateTime, Utc};
use crate::model::ContentRecord;

/// Whether a record should currently be shown.
///
/// A record is hidden when it was explicitly unpublished, or when its
/// schedule date lies in the future. Records with no schedule are visible
/// as long as they are not unpublished. Pure and total; timestamps are
/// already validated upstream, so nothing here can fail.
pub fn is_visible(record: &ContentRecord, now: DateTime<Utc>) -> bool {
    if record.is_published == Some(false) {
        return false;
    }
    match record.scheduled_at {
        None => true,
        Some(at) => at <= now,
    }
}

/// Keep only visible records, preserving the input order.
pub fn filter_visible(records: Vec<ContentRecord>, now: DateTime<Utc>) -> Vec<ContentRecord> {
    records.into_iter().filter(|r| is_visible(r, now)).collect()
}
