use super::missing::MissingFieldRule;
use super::outliers::NumericOutlierRule;
use crate::config::{ObjectRules, ThresholdConfig};
use crate::record::RecordBatch;
use crate::types::{Issue, IssueMap};
use tracing::debug;

/// Inputs shared by every rule evaluation of one batch.
#[derive(Debug, Clone, Copy)]
pub struct RuleContext<'a> {
    pub thresholds: &'a ThresholdConfig,
    /// Plural noun for messages, e.g. "accounts".
    pub label: &'a str,
}

/// A single detection rule applied to one field of a batch.
///
/// Rules never fail: data a rule cannot use simply makes it not applicable,
/// and `None` means "nothing to report".
pub trait DetectionRule: Send + Sync {
    /// Key under which an emitted issue is stored.
    fn issue_name(&self) -> String;

    fn evaluate(&self, batch: &RecordBatch, ctx: &RuleContext<'_>) -> Option<Issue>;
}

/// Share of `count` in `total` as a percentage. Zero when `total` is zero.
pub(crate) fn percentage(count: usize, total: usize) -> f64 {
    if total == 0 {
        0.0
    } else {
        100.0 * count as f64 / total as f64
    }
}

/// Applies the configured detection rules to record batches.
///
/// Holds only immutable thresholds, so one detector can serve any number of
/// scans, including concurrent ones.
#[derive(Debug, Clone, Copy, Default)]
pub struct IssueDetector {
    thresholds: ThresholdConfig,
}

impl IssueDetector {
    pub fn new(thresholds: ThresholdConfig) -> Self {
        Self { thresholds }
    }

    pub fn thresholds(&self) -> &ThresholdConfig {
        &self.thresholds
    }

    /// The rules for one object type, in evaluation order: every
    /// missing-field rule, then every numeric-outlier rule.
    pub fn rules_for(rules: &ObjectRules) -> Vec<Box<dyn DetectionRule>> {
        let missing = rules
            .critical_fields
            .iter()
            .map(|f| Box::new(MissingFieldRule::new(f.as_str())) as Box<dyn DetectionRule>);
        let outliers = rules
            .numeric_fields
            .iter()
            .map(|f| Box::new(NumericOutlierRule::new(f.as_str())) as Box<dyn DetectionRule>);

        missing.chain(outliers).collect()
    }

    /// Scan one batch and return its issues keyed by issue name.
    ///
    /// An empty batch yields an empty map.
    pub fn detect(&self, batch: &RecordBatch, rules: &ObjectRules) -> IssueMap {
        let mut issues = IssueMap::new();
        if batch.is_empty() {
            debug!("{}: empty batch, nothing to check", batch.object_type());
            return issues;
        }

        let label = rules.plural_label();
        let ctx = RuleContext {
            thresholds: &self.thresholds,
            label: &label,
        };

        for rule in Self::rules_for(rules) {
            if let Some(issue) = rule.evaluate(batch, &ctx) {
                debug!(
                    "{}: {} -> {} ({:.1}%)",
                    batch.object_type(),
                    rule.issue_name(),
                    issue.severity,
                    issue.percentage
                );
                issues.insert(rule.issue_name(), issue);
            }
        }

        issues
    }
}

static_assertions::assert_impl_all!(IssueDetector: Send, Sync);
static_assertions::assert_impl_all!(ThresholdConfig: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Record;
    use crate::types::Severity;
    use pretty_assertions::assert_eq;

    fn account(phone: Option<&str>, street: Option<&str>, revenue: Option<f64>) -> Record {
        Record::new()
            .with("Name", "Acme")
            .with("Phone", phone)
            .with("BillingStreet", street)
            .with("AnnualRevenue", revenue)
    }

    #[test]
    fn test_percentage() {
        assert_eq!(percentage(3, 10), 30.0);
        assert_eq!(percentage(0, 0), 0.0);
    }

    #[test]
    fn test_rule_order() {
        let names: Vec<String> = IssueDetector::rules_for(&ObjectRules::accounts())
            .iter()
            .map(|r| r.issue_name())
            .collect();
        assert_eq!(
            names,
            vec![
                "missing_name",
                "missing_phone",
                "missing_billingstreet",
                "annualrevenue_anomalies"
            ]
        );
    }

    #[test]
    fn test_empty_batch_returns_empty_map() {
        let detector = IssueDetector::default();
        assert!(
            detector
                .detect(&RecordBatch::empty("Account"), &ObjectRules::accounts())
                .is_empty()
        );
        assert!(
            detector
                .detect(&RecordBatch::empty("Opportunity"), &ObjectRules::opportunities())
                .is_empty()
        );
    }

    #[test]
    fn test_ten_accounts_three_missing_phone() {
        let mut records: Vec<Record> = (0..7)
            .map(|_| account(Some("555-0100"), Some("1 Main St"), Some(1000.0)))
            .collect();
        records.extend((0..3).map(|_| account(None, Some("1 Main St"), Some(1000.0))));

        let issues = IssueDetector::default()
            .detect(&RecordBatch::new("Account", records), &ObjectRules::accounts());

        assert_eq!(issues.len(), 1);
        let issue = &issues["missing_phone"];
        assert_eq!(issue.severity, Severity::High);
        assert_eq!(issue.count, 3);
        assert_eq!(issue.percentage, 30.0);
        assert_eq!(issue.message, "30.0% of accounts missing Phone");
    }

    #[test]
    fn test_missing_and_outlier_rules_combine() {
        let amounts = [10.0, 12.0, 11.0, 9.0, 13.0, 10.0, 11.0, 1000.0, 12.0, 10.0, 11.0, 9.0];
        let records: Vec<Record> = amounts
            .iter()
            .enumerate()
            .map(|(i, a)| {
                let close = (i % 4 != 0).then_some("2024-07-01");
                Record::new().with("Amount", *a).with("CloseDate", close)
            })
            .collect();

        let issues = IssueDetector::default().detect(
            &RecordBatch::new("Opportunity", records),
            &ObjectRules::opportunities(),
        );

        let names: Vec<&str> = issues.keys().map(String::as_str).collect();
        assert_eq!(names, vec!["amount_anomalies", "missing_closedate"]);
        assert_eq!(issues["missing_closedate"].count, 3);
        assert_eq!(issues["missing_closedate"].severity, Severity::Medium);
        assert_eq!(issues["amount_anomalies"].sample_values, Some(vec![1000.0]));
    }

    #[test]
    fn test_thresholds_are_honoured() {
        let records: Vec<Record> = (0..10)
            .map(|i| account((i >= 2).then_some("555-0100"), Some("x"), None))
            .collect();
        let batch = RecordBatch::new("Account", records);

        let lenient = IssueDetector::new(
            ThresholdConfig::builder()
                .missing_data_threshold(20.0)
                .build()
                .unwrap(),
        );
        assert!(lenient.detect(&batch, &ObjectRules::accounts()).is_empty());

        let strict = IssueDetector::default();
        assert!(strict.detect(&batch, &ObjectRules::accounts()).contains_key("missing_phone"));
    }
}
