//! Record sources.
//!
//! A [`RecordSource`] supplies one bounded batch per object type. Sources
//! either deliver a complete batch (possibly empty, possibly flagged as
//! truncated by the record limit) or fail with
//! [`QualityError::InputUnavailable`](crate::error::QualityError::InputUnavailable);
//! they never hand out partial data silently.

mod csv;
mod json;
mod memory;

pub use self::csv::CsvDirectorySource;
pub use self::json::JsonDirectorySource;
pub use self::memory::MemorySource;

use crate::config::RecordWindow;
use crate::error::Result;
use crate::record::{Record, RecordBatch};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use tracing::debug;

/// Field holding the record creation timestamp.
pub const CREATED_DATE_FIELD: &str = "CreatedDate";

/// Supplies record batches to the engine.
pub trait RecordSource {
    /// Fetch the records of `object_type` that fall inside `window`.
    fn fetch(&self, object_type: &str, window: &RecordWindow) -> Result<RecordBatch>;
}

/// Apply a lookback window and record limit to a fetched batch.
///
/// Records whose `CreatedDate` parses and is older than the lookback period
/// are dropped; records without a usable date are kept. The first
/// `window.limit` remaining records form the batch, which is flagged as
/// truncated when more were available.
pub fn apply_window(batch: RecordBatch, window: &RecordWindow, now: DateTime<Utc>) -> RecordBatch {
    let object_type = batch.object_type().to_string();
    // A lookback reaching past the earliest representable date keeps everything.
    let cutoff = window
        .lookback_days
        .and_then(|days| now.checked_sub_signed(chrono::Duration::days(i64::from(days))));

    let mut in_window: Vec<Record> = batch
        .into_records()
        .into_iter()
        .filter(|record| match (cutoff, created_at(record)) {
            (Some(cutoff), Some(created)) => created >= cutoff,
            _ => true,
        })
        .collect();

    let truncated = in_window.len() > window.limit;
    if truncated {
        debug!(
            "Truncating {} batch from {} to {} records",
            object_type,
            in_window.len(),
            window.limit
        );
        in_window.truncate(window.limit);
    }

    RecordBatch::new(object_type, in_window).truncated(truncated)
}

fn created_at(record: &Record) -> Option<DateTime<Utc>> {
    record.text(CREATED_DATE_FIELD).and_then(parse_timestamp)
}

/// Parse the timestamp formats CRM exports commonly use.
pub fn parse_timestamp(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Some(ts.with_timezone(&Utc));
    }
    // 2024-01-15T10:30:00.000+0000
    if let Ok(ts) = DateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f%z") {
        return Some(ts.with_timezone(&Utc));
    }
    if let Ok(ts) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(ts.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|d| d.and_utc())
}
