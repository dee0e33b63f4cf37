//! In-memory record source.

use super::{RecordSource, apply_window};
use crate::config::RecordWindow;
use crate::error::{QualityError, Result};
use crate::record::RecordBatch;
use chrono::{DateTime, Utc};
use std::collections::HashMap;

/// Holds batches in memory, keyed by object type.
///
/// Object types can be marked unavailable to simulate an upstream outage.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    batches: HashMap<String, RecordBatch>,
    unavailable: HashMap<String, String>,
    reference_time: Option<DateTime<Utc>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a batch under its own object type.
    pub fn with_batch(mut self, batch: RecordBatch) -> Self {
        self.batches.insert(batch.object_type().to_string(), batch);
        self
    }

    /// Make every fetch of `object_type` fail with `reason`.
    pub fn with_unavailable(mut self, object_type: impl Into<String>, reason: impl Into<String>) -> Self {
        self.unavailable.insert(object_type.into(), reason.into());
        self
    }

    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }
}

impl RecordSource for MemorySource {
    fn fetch(&self, object_type: &str, window: &RecordWindow) -> Result<RecordBatch> {
        if let Some(reason) = self.unavailable.get(object_type) {
            return Err(QualityError::unavailable(object_type, reason));
        }

        let batch = self
            .batches
            .get(object_type)
            .cloned()
            .unwrap_or_else(|| RecordBatch::empty(object_type));
        let now = self.reference_time.unwrap_or_else(Utc::now);
        Ok(apply_window(batch, window, now))
    }
}
