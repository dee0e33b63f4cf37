//! Missing-critical-field rule.

use super::detector::{DetectionRule, RuleContext, percentage};
use crate::record::RecordBatch;
use crate::types::{Issue, Severity};
use tracing::debug;

/// Missing percentage above which a missing-field issue is HIGH.
pub const HIGH_SEVERITY_MISSING_PCT: f64 = 25.0;

/// Reports a field that is absent or null in too many records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingFieldRule {
    field: String,
}

impl MissingFieldRule {
    pub fn new(field: impl Into<String>) -> Self {
        Self { field: field.into() }
    }

    pub fn field(&self) -> &str {
        &self.field
    }
}

impl DetectionRule for MissingFieldRule {
    fn issue_name(&self) -> String {
        format!("missing_{}", self.field.to_lowercase())
    }

    fn evaluate(&self, batch: &RecordBatch, ctx: &RuleContext<'_>) -> Option<Issue> {
        if batch.is_empty() {
            return None;
        }
        if !batch.has_field(&self.field) {
            debug!(
                "{}: field '{}' not present in any record, skipping",
                batch.object_type(),
                self.field
            );
            return None;
        }

        let missing = batch.iter().filter(|r| r.is_missing(&self.field)).count();
        let missing_pct = percentage(missing, batch.len());

        if missing_pct <= ctx.thresholds.missing_data_threshold() {
            return None;
        }

        let severity = if missing_pct > HIGH_SEVERITY_MISSING_PCT {
            Severity::High
        } else {
            Severity::Medium
        };

        Some(Issue::new(
            severity,
            missing,
            missing_pct,
            format!("{:.1}% of {} missing {}", missing_pct, ctx.label, self.field),
        ))
    }
}
