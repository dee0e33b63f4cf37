use crate::config::ThresholdConfig;
use crate::quality::{QualityScore, ScoreBand};
use crate::types::IssueSet;
use serde::{Deserialize, Serialize};

/// What was scanned for one object type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ObjectSummary {
    pub object_type: String,
    pub records_scanned: usize,
    /// More records were available than the window limit allowed.
    pub truncated: bool,
    pub issue_count: usize,
}

/// Plain "affected records per record" statistic shown next to the score.
///
/// Unlike [`QualityScore`] it ignores severity and caps, so the two figures
/// can disagree. It never feeds into the weighted score.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IssueRate {
    /// Sum of the affected counts of every issue.
    pub total_issue_count: usize,
    pub total_records: usize,
    /// `100 * total_issue_count / total_records`, 0 without records.
    pub percentage: f64,
    /// `100 - percentage`, floored at 0.
    pub naive_score: f64,
}

impl IssueRate {
    pub fn compute(issues: &IssueSet, total_records: usize) -> Self {
        let total_issue_count = issues.affected_count();
        let percentage = if total_records == 0 {
            0.0
        } else {
            100.0 * total_issue_count as f64 / total_records as f64
        };

        Self {
            total_issue_count,
            total_records,
            percentage,
            naive_score: (100.0 - percentage).max(0.0),
        }
    }
}

/// Outcome of one quality scan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScanReport {
    /// Local time the report was produced.
    pub generated_at: String,
    pub thresholds: ThresholdConfig,
    pub objects: Vec<ObjectSummary>,
    pub issues: IssueSet,
    pub quality_score: QualityScore,
    pub band: ScoreBand,
    pub issue_rate: IssueRate,
}

impl ScanReport {
    pub fn total_records(&self) -> usize {
        self.objects.iter().map(|o| o.records_scanned).sum()
    }

    /// True when no object type produced an issue.
    pub fn is_clean(&self) -> bool {
        self.issues.is_empty()
    }

    /// True when any batch was cut at the record limit.
    pub fn has_truncated_batches(&self) -> bool {
        self.objects.iter().any(|o| o.truncated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Issue, IssueMap, Severity};
    use pretty_assertions::assert_eq;

    fn issues_with_counts(counts: &[usize]) -> IssueSet {
        let map: IssueMap = counts
            .iter()
            .enumerate()
            .map(|(i, c)| (format!("issue_{i}"), Issue::new(Severity::Low, *c, 1.0, "m")))
            .collect();
        let mut set = IssueSet::new();
        set.insert("Account", map);
        set
    }

    #[test]
    fn test_issue_rate() {
        let rate = IssueRate::compute(&issues_with_counts(&[3, 2]), 20);
        assert_eq!(rate.total_issue_count, 5);
        assert_eq!(rate.percentage, 25.0);
        assert_eq!(rate.naive_score, 75.0);
    }

    #[test]
    fn test_issue_rate_without_records() {
        let rate = IssueRate::compute(&IssueSet::new(), 0);
        assert_eq!(rate.percentage, 0.0);
        assert_eq!(rate.naive_score, 100.0);
    }

    #[test]
    fn test_naive_score_floors_at_zero() {
        // Several issues can flag the same records, so the rate may exceed 100%.
        let rate = IssueRate::compute(&issues_with_counts(&[10, 10, 10]), 10);
        assert_eq!(rate.percentage, 300.0);
        assert_eq!(rate.naive_score, 0.0);
    }
}
