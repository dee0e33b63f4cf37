//! Numeric-outlier rule based on population z-scores.

use super::detector::{DetectionRule, RuleContext, percentage};
use super::statistics;
use crate::record::RecordBatch;
use crate::types::{Issue, MAX_SAMPLE_VALUES, Severity};
use tracing::debug;

/// Smallest number of valid numeric values the rule will judge.
pub const MIN_OUTLIER_SAMPLE: usize = 11;

/// Reports numeric values lying further than the configured z-score from
/// the mean of their field.
///
/// Absent, null and non-numeric values are left out of the sample; they are
/// the missing-field rule's concern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NumericOutlierRule {
    field: String,
}

impl NumericOutlierRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl DetectionRule for NumericOutlierRule {
    fn issue_name(&self) -> String {
        format!("{}_anomalies", self.field.to_lowercase())
    }

    fn evaluate(&self, batch: &RecordBatch, ctx: &RuleContext<'_>) -> Option<Issue> {
        let sample: Vec<f64> = batch
            .iter()
            .filter_map(|r| r.number(&self.field).ok())
            .collect();

        if sample.len() < MIN_OUTLIER_SAMPLE {
            debug!(
                "{}: only {} numeric '{}' values, need {}",
                batch.object_type(),
                sample.len(),
                self.field,
                MIN_OUTLIER_SAMPLE
            );
            return None;
        }

        let Some(scores) = statistics::z_scores(&sample) else {
            debug!("{}: '{}' has no variance", batch.object_type(), self.field);
            return None;
        };

        let threshold = ctx.thresholds.anomaly_z_score();
        let anomalies: Vec<f64> = sample
            .iter()
            .zip(&scores)
            .filter(|(_, z)| z.abs() > threshold)
            .map(|(value, _)| *value)
            .collect();

        if anomalies.is_empty() {
            return None;
        }

        let count = anomalies.len();
        let samples = anomalies.into_iter().take(MAX_SAMPLE_VALUES).collect();

        Some(
            Issue::new(
                Severity::Medium,
                count,
                percentage(count, sample.len()),
                format!("{} {} with unusual {} values", count, ctx.label, self.field),
            )
            .with_samples(samples),
        )
    }
}
