use crate::error::{QualityError, Result};
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::info;

/// Writes JSON reports into an output directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    output_dir: PathBuf,
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self {
            output_dir: PathBuf::from("./outputs"),
        }
    }
}

impl ReportWriter {
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    /// Write `report` as pretty JSON to `<output_dir>/<base_name>_report.json`.
    ///
    /// The output directory is created when missing.
    pub fn write_report_to_file<T: Serialize>(&self, report: &T, base_name: &str) -> Result<PathBuf> {
        if base_name.trim().is_empty() {
            return Err(QualityError::ReportGenerationFailed(
                "report name must not be empty".to_string(),
            ));
        }

        fs::create_dir_all(&self.output_dir)?;

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| QualityError::ReportGenerationFailed(e.to_string()))?;
        let report_path = self.output_dir.join(format!("{}_report.json", base_name));
        let mut file = File::create(&report_path)?;
        file.write_all(json.as_bytes())?;

        info!("Report saved: {}", report_path.display());

        Ok(report_path)
    }
}
