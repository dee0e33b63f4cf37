//! CRM Data Quality Library
//!
//! Detects data-quality defects in CRM records and condenses them into one
//! 0-100 quality score, plus per-campaign ROI and conversion figures.
//!
//! # Overview
//!
//! - **Detection**: missing critical fields and numeric z-score outliers per
//!   object type ([`IssueDetector`])
//! - **Scoring**: severity-weighted, capped penalties ([`QualityScorer`])
//! - **Orchestration**: fetch, detect and score across object types
//!   ([`QualityScan`]), with a separate unweighted issue rate
//! - **Campaign analytics**: ROI and lead conversion per campaign
//! - **Sources**: CSV or JSON export directories, or in-memory batches
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use crm_quality::{CsvDirectorySource, QualityScan, ScanConfig, render_scan_report};
//!
//! let scan = QualityScan::new(ScanConfig::default())?;
//! let report = scan.run(&CsvDirectorySource::new("exports/"))?;
//!
//! println!("{}", render_scan_report(&report));
//! println!("Score: {} ({})", report.quality_score, report.band);
//! ```
//!
//! # Configuration
//!
//! Thresholds are built and validated once, then shared read-only:
//!
//! ```rust,ignore
//! use crm_quality::{IssueDetector, ObjectRules, ThresholdConfig};
//!
//! let thresholds = ThresholdConfig::builder()
//!     .missing_data_threshold(15.0)   // Report fields missing in >15% of records
//!     .anomaly_z_score(2.5)           // Flag values with |z| > 2.5
//!     .build()?;
//!
//! let issues = IssueDetector::new(thresholds).detect(&batch, &ObjectRules::accounts());
//! ```
//!
//! # Scoring
//!
//! Each issue costs `min(weight * percentage / 10, 20)` points, with weight
//! 10/5/2 for HIGH/MEDIUM/LOW. The result is floored at 0 and rounded to one
//! decimal; a scan without issues scores exactly 100.

pub mod campaign;
pub mod config;
pub mod error;
pub mod quality;
pub mod record;
pub mod reporting;
pub mod scan;
pub mod source;
pub mod types;

// Re-exports for convenient access
pub use campaign::{CampaignMetrics, CampaignSummary, DEFAULT_CAMPAIGN_MATCHES, find_campaigns};
pub use config::{
    ConfigValidationError, ObjectRules, RecordWindow, ScanConfig, ThresholdConfig,
    ThresholdConfigBuilder,
};
pub use error::{QualityError, Result as QualityResult, ResultExt};
pub use quality::{DetectionRule, IssueDetector, QualityScore, QualityScorer, ScoreBand};
pub use record::{CoercionError, FieldValue, Record, RecordBatch};
pub use reporting::{NO_ISSUES_MESSAGE, ReportWriter, render_campaigns, render_scan_report};
pub use scan::{IssueRate, ObjectSummary, QualityScan, ScanReport};
pub use source::{CsvDirectorySource, JsonDirectorySource, MemorySource, RecordSource};
pub use types::{Issue, IssueMap, IssueSet, Severity};
