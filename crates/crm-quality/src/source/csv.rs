//! CSV export directory source.

use super::{RecordSource, apply_window};
use crate::config::RecordWindow;
use crate::error::{QualityError, Result};
use crate::record::{RecordBatch, batch_from_dataframe};
use chrono::{DateTime, Utc};
use polars::io::csv::read::CsvReadOptions;
use polars::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rows used for schema inference before falling back to all-text columns.
const INFER_SCHEMA_ROWS: usize = 100;

/// Reads `<dir>/<ObjectType>.csv` exports, one file per object type.
///
/// A missing file means "no data" and yields an empty batch. A directory
/// that does not exist or a file that cannot be parsed is reported as
/// unavailable input.
#[derive(Debug, Clone)]
pub struct CsvDirectorySource {
    dir: PathBuf,
    reference_time: Option<DateTime<Utc>>,
}

impl CsvDirectorySource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            reference_time: None,
        }
    }

    /// Pin "now" for the lookback window (defaults to the current time).
    pub fn with_reference_time(mut self, now: DateTime<Utc>) -> Self {
        self.reference_time = Some(now);
        self
    }

    pub fn path_for(&self, object_type: &str) -> PathBuf {
        self.dir.join(format!("{}.csv", object_type))
    }
}

impl RecordSource for CsvDirectorySource {
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

        let df = load_csv_with_fallback(&path)
            .map_err(|e| QualityError::unavailable(object_type, e))?;
        debug!("Loaded {} export: {:?}", object_type, df.shape());

        let batch = batch_from_dataframe(object_type, &df)?;
        let now = self.reference_time.unwrap_or_else(Utc::now);
        Ok(apply_window(batch, window, now))
    }
}

/// Read a CSV file, retrying with every column as text when inference fails.
fn load_csv_with_fallback(path: &Path) -> PolarsResult<DataFrame> {
    match CsvReadOptions::default()
        .with_infer_schema_length(Some(INFER_SCHEMA_ROWS))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
    {
        Ok(df) => return Ok(df),
        Err(e) => {
            debug!("Typed loading of {} failed: {}", path.display(), e);
        }
    }

    // Numeric coercion happens per rule, so text columns lose nothing.
    CsvReadOptions::default()
        .with_infer_schema_length(Some(0))
        .with_has_header(true)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))?
        .finish()
}
