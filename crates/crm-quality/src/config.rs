//! Configuration types for quality scans.
//!
//! Thresholds are an explicit immutable value handed to every detector.
//! They can only be obtained through [`ThresholdConfig::builder()`],
//! [`Default`] or deserialization, and all three paths validate, so an
//! invalid threshold never reaches a scan.

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default percentage of missing values above which a field is reported.
pub const DEFAULT_MISSING_DATA_THRESHOLD: f64 = 10.0;
/// Default absolute z-score above which a numeric value is anomalous.
pub const DEFAULT_ANOMALY_Z_SCORE: f64 = 3.0;
/// Default duplicate percentage. Reserved; no rule consumes it yet.
pub const DEFAULT_DUPLICATE_THRESHOLD: f64 = 5.0;
/// Default lookback window in days.
pub const DEFAULT_LOOKBACK_DAYS: u32 = 30;
/// Default maximum number of records fetched per object type.
pub const DEFAULT_RECORD_LIMIT: usize = 1000;

/// Detection thresholds shared by every rule of a scan.
///
/// # Example
///
/// ```rust,ignore
/// use crm_quality::config::ThresholdConfig;
///
/// let thresholds = ThresholdConfig::builder()
///     .missing_data_threshold(15.0)
///     .anomaly_z_score(2.5)
///     .build()?;
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "ThresholdFields")]
pub struct ThresholdConfig {
    missing_data_threshold: f64,
    anomaly_z_score: f64,
    duplicate_threshold: f64,
}

/// Unvalidated threshold values as they appear in config files.
#[derive(Debug, Deserialize)]
#[serde(default)]
struct ThresholdFields {
    missing_data_threshold: f64,
    anomaly_z_score: f64,
    duplicate_threshold: f64,
}

impl Default for ThresholdFields {
    fn default() -> Self {
        Self {
            missing_data_threshold: DEFAULT_MISSING_DATA_THRESHOLD,
            anomaly_z_score: DEFAULT_ANOMALY_Z_SCORE,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

impl TryFrom<ThresholdFields> for ThresholdConfig {
    type Error = ConfigValidationError;

    fn try_from(fields: ThresholdFields) -> Result<Self, Self::Error> {
        ThresholdConfig::builder()
            .missing_data_threshold(fields.missing_data_threshold)
            .anomaly_z_score(fields.anomaly_z_score)
            .duplicate_threshold(fields.duplicate_threshold)
            .build()
    }
}

impl Default for ThresholdConfig {
    fn default() -> Self {
        Self {
            missing_data_threshold: DEFAULT_MISSING_DATA_THRESHOLD,
            anomaly_z_score: DEFAULT_ANOMALY_Z_SCORE,
            duplicate_threshold: DEFAULT_DUPLICATE_THRESHOLD,
        }
    }
}

impl ThresholdConfig {
    /// Create a new threshold builder.
    pub fn builder() -> ThresholdConfigBuilder {
        ThresholdConfigBuilder::default()
    }

    /// A builder pre-filled with these values, for layering overrides.
    pub fn to_builder(&self) -> ThresholdConfigBuilder {
        ThresholdConfigBuilder {
            missing_data_threshold: Some(self.missing_data_threshold),
            anomaly_z_score: Some(self.anomaly_z_score),
            duplicate_threshold: Some(self.duplicate_threshold),
        }
    }

    /// Percentage (0-100) of missing values above which a field is reported.
    pub fn missing_data_threshold(&self) -> f64 {
        self.missing_data_threshold
    }

    /// Absolute z-score above which a value counts as an anomaly.
    pub fn anomaly_z_score(&self) -> f64 {
        self.anomaly_z_score
    }

    /// Percentage (0-100) of duplicates that would trigger a duplicate issue.
    pub fn duplicate_threshold(&self) -> f64 {
        self.duplicate_threshold
    }

    fn validate(&self) -> Result<(), ConfigValidationError> {
        check_percentage("missing_data_threshold", self.missing_data_threshold)?;
        check_percentage("duplicate_threshold", self.duplicate_threshold)?;

        if !self.anomaly_z_score.is_finite() || self.anomaly_z_score <= 0.0 {
            return Err(ConfigValidationError::InvalidZScore(self.anomaly_z_score));
        }

        Ok(())
    }
}

fn check_percentage(field: &str, value: f64) -> Result<(), ConfigValidationError> {
    if (0.0..=100.0).contains(&value) {
        Ok(())
    } else {
        Err(ConfigValidationError::InvalidThreshold {
            field: field.to_string(),
            value,
        })
    }
}

/// Errors that can occur during configuration validation.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigValidationError {
    #[error("Invalid threshold for '{field}': {value} (must be between 0 and 100)")]
    InvalidThreshold { field: String, value: f64 },

    #[error("Invalid anomaly z-score: {0} (must be a positive number)")]
    InvalidZScore(f64),

    #[error("Invalid record limit: {0} (must be at least 1)")]
    InvalidRecordLimit(usize),

    #[error("Object type name must not be empty")]
    EmptyObjectType,

    #[error("Object type '{0}' is configured more than once")]
    DuplicateObjectType(String),

    #[error("Campaign name query must not be empty")]
    EmptyCampaignQuery,
}

/// Builder for [`ThresholdConfig`] with fluent API.
#[derive(Debug, Default)]
pub struct ThresholdConfigBuilder {
    missing_data_threshold: Option<f64>,
    anomaly_z_score: Option<f64>,
    duplicate_threshold: Option<f64>,
}

impl ThresholdConfigBuilder {
    /// Set the missing-data threshold.
    ///
    /// # Arguments
    /// * `percent` - Value between 0 and 100 (e.g., 10.0 = 10%)
    pub fn missing_data_threshold(mut self, percent: f64) -> Self {
        self.missing_data_threshold = Some(percent);
        self
    }

    /// Set the z-score above which numeric values are anomalous.
    pub fn anomaly_z_score(mut self, z: f64) -> Self {
        self.anomaly_z_score = Some(z);
        self
    }

    /// Set the duplicate threshold (0 - 100).
    pub fn duplicate_threshold(mut self, percent: f64) -> Self {
        self.duplicate_threshold = Some(percent);
        self
    }

    /// Build the thresholds.
    ///
    /// Returns a validated `ThresholdConfig` or an error if validation fails.
    pub fn build(self) -> Result<ThresholdConfig, ConfigValidationError> {
        let config = ThresholdConfig {
            missing_data_threshold: self
                .missing_data_threshold
                .unwrap_or(DEFAULT_MISSING_DATA_THRESHOLD),
            anomaly_z_score: self.anomaly_z_score.unwrap_or(DEFAULT_ANOMALY_Z_SCORE),
            duplicate_threshold: self
                .duplicate_threshold
                .unwrap_or(DEFAULT_DUPLICATE_THRESHOLD),
        };

        config.validate()?;
        Ok(config)
    }
}

/// Which fields to check for one object type.
///
/// Field lists are supplied by the caller; the engine never discovers
/// fields on its own.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectRules {
    /// Object type name, e.g. "Account".
    pub object_type: String,
    /// Fields whose absence is a defect.
    #[serde(default)]
    pub critical_fields: Vec<String>,
    /// Fields checked for statistical outliers.
    #[serde(default)]
    pub numeric_fields: Vec<String>,
    /// Plural noun used in messages. Derived from the object type when unset.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
}

impl ObjectRules {
    /// Rules for an object type with no fields configured yet.
    pub fn new(object_type: impl Into<String>) -> Self {
        Self {
            object_type: object_type.into(),
            critical_fields: Vec::new(),
            numeric_fields: Vec::new(),
            label: None,
        }
    }

    /// Add fields checked by the missing-critical-field rule.
    pub fn critical<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.critical_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Add fields checked by the numeric-outlier rule.
    pub fn numeric<I, S>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.numeric_fields.extend(fields.into_iter().map(Into::into));
        self
    }

    /// Override the plural noun used in issue messages.
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Default account checks.
    pub fn accounts() -> Self {
        Self::new("Account")
            .critical(["Name", "Phone", "BillingStreet"])
            .numeric(["AnnualRevenue"])
    }

    /// Default opportunity checks.
    pub fn opportunities() -> Self {
        Self::new("Opportunity")
            .critical(["CloseDate"])
            .numeric(["Amount"])
    }

    /// Plural, lowercase noun for messages ("accounts", "opportunities").
    pub fn plural_label(&self) -> String {
        if let Some(label) = &self.label {
            return label.clone();
        }

        let lower = self.object_type.to_lowercase();
        if let Some(stem) = lower.strip_suffix('y')
            && !stem.ends_with(['a', 'e', 'i', 'o', 'u'])
        {
            return format!("{stem}ies");
        }

        if lower.ends_with('s') {
            lower
        } else {
            format!("{lower}s")
        }
    }
}

/// Lookback window and size bound applied by record sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordWindow {
    /// Only records created within this many days are scanned.
    /// `None` disables date filtering.
    pub lookback_days: Option<u32>,
    /// Maximum number of records per batch.
    pub limit: usize,
}

impl Default for RecordWindow {
    fn default() -> Self {
        Self {
            lookback_days: Some(DEFAULT_LOOKBACK_DAYS),
            limit: DEFAULT_RECORD_LIMIT,
        }
    }
}

/// Full configuration of a quality scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanConfig {
    #[serde(default)]
    pub thresholds: ThresholdConfig,
    #[serde(default = "default_objects")]
    pub objects: Vec<ObjectRules>,
    #[serde(default)]
    pub window: RecordWindow,
}

fn default_objects() -> Vec<ObjectRules> {
    vec![ObjectRules::accounts(), ObjectRules::opportunities()]
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            thresholds: ThresholdConfig::default(),
            objects: default_objects(),
            window: RecordWindow::default(),
        }
    }
}

impl ScanConfig {
    /// Validate the parts of the configuration not covered by the threshold builder.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        if self.window.limit == 0 {
            return Err(ConfigValidationError::InvalidRecordLimit(self.window.limit));
        }

        let mut seen: Vec<&str> = Vec::with_capacity(self.objects.len());
        for rules in &self.objects {
            let name = rules.object_type.trim();
            if name.is_empty() {
                return Err(ConfigValidationError::EmptyObjectType);
            }
            if seen.iter().any(|s| s.eq_ignore_ascii_case(name)) {
                return Err(ConfigValidationError::DuplicateObjectType(name.to_string()));
            }
            seen.push(name);
        }

        Ok(())
    }

    /// Load and validate a scan configuration from a JSON file.
    pub fn from_json_file(path: impl AsRef<Path>) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())?;
        let config: ScanConfig = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Look up the rules for an object type (case-insensitive).
    pub fn rules_for(&self, object_type: &str) -> Option<&ObjectRules> {
        self.objects
            .iter()
            .find(|r| r.object_type.eq_ignore_ascii_case(object_type))
    }
}
