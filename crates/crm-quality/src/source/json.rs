//! JSON query-response directory source.

use super::{RecordSource, apply_window};
use crate::config::RecordWindow;
use crate::error::{QualityError, Result};
use crate::record::{RecordBatch, batch_from_json};
use chrono::{DateTime, Utc};
use std::path::PathBuf;
use tracing::info;

/// Reads `<dir>/<ObjectType>.json` files holding saved query responses
/// (`{"totalSize": n, "done": true, "records": [...]}`) or bare arrays.
#[derive(Debug, Clone)]
pub struct JsonDirectorySource {
    dir: PathBuf,
    reference_time: Option<DateTime<Utc>>,
}

impl JsonDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reference_time: None,
        }
    }

    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn path_for(&self, object_type: &str) -> PathBuf {
        self.dir.join(format!("{}.json", object_type))
    }
}

impl RecordSource for JsonDirectorySource {
    fn fetch(&self, object_type: &str, window: &RecordWindow) -> Result<RecordBatch> {
        if !self.dir.is_dir() {
            return Err(QualityError::unavailable(
                object_type,
                format!("source directory '{}' not found", self.dir.display()),
            ));
        }

        let path = self.path_for(object_type);
        if !path.exists() {
            info!("No {} export at {}; treating as empty", object_type, path.display());
            return Ok(RecordBatch::empty(object_type));
        }

        let content =
            std::fs::read_to_string(&path).map_err(|e| QualityError::unavailable(object_type, e))?;
        let value: serde_json::Value = serde_json::from_str(&content)
            .map_err(|e| QualityError::unavailable(object_type, format!("malformed JSON: {}", e)))?;

        let batch = batch_from_json(object_type, &value)?;
        let now = self.reference_time.unwrap_or_else(Utc::now);
        Ok(apply_window(batch, window, now))
    }
}
