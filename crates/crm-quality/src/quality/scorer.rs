use crate::types::{Issue, IssueSet};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Score of a scan without any issue.
pub const BASE_SCORE: f64 = 100.0;
/// Largest penalty a single issue can contribute.
pub const MAX_PENALTY_PER_ISSUE: f64 = 20.0;

/// Letter band for a quality score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ScoreBand {
    /// 95 - 100
    A,
    /// 85 - 94.9
    B,
    /// 70 - 84.9
    C,
    /// 50 - 69.9
    D,
    /// below 50
    F,
}

impl ScoreBand {
    pub fn from_score(score: f64) -> Self {
        match score {
            s if s >= 95.0 => Self::A,
            s if s >= 85.0 => Self::B,
            s if s >= 70.0 => Self::C,
            s if s >= 50.0 => Self::D,
            _ => Self::F,
        }
    }
}

impl fmt::Display for ScoreBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let letter = match self {
            Self::A => "A",
            Self::B => "B",
            Self::C => "C",
            Self::D => "D",
            Self::F => "F",
        };
        f.write_str(letter)
    }
}

/// Aggregate quality figure in `[0, 100]`, rounded to one decimal.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QualityScore(f64);

impl QualityScore {
    pub fn value(&self) -> f64 {
        self.0
    }

    pub fn band(&self) -> ScoreBand {
        ScoreBand::from_score(self.0)
    }
}

impl fmt::Display for QualityScore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.1}", self.0)
    }
}

/// Reduces an [`IssueSet`] to a [`QualityScore`].
///
/// Every issue subtracts `min(weight * percentage / 10, 20)` from 100, where
/// the weight is 10/5/2 for HIGH/MEDIUM/LOW. Penalties are independent and
/// additive; the result is floored at 0.
#[derive(Debug, Clone, Copy, Default)]
pub struct QualityScorer;

impl QualityScorer {
    /// Penalty of one issue. Unusable percentages (negative, NaN) count as 0.
    pub fn penalty(issue: &Issue) -> f64 {
        let percentage = if issue.percentage.is_finite() && issue.percentage > 0.0 {
            issue.percentage
        } else {
            0.0
        };
        (issue.severity.weight() * (percentage / 10.0)).min(MAX_PENALTY_PER_ISSUE)
    }

    pub fn score(issue_set: &IssueSet) -> QualityScore {
        let total = issue_set
            .issues()
            .fold(BASE_SCORE, |score, (_, _, issue)| score - Self::penalty(issue));

        QualityScore(round_to_tenth(total.max(0.0)))
    }
}

fn round_to_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

static_assertions::assert_impl_all!(QualityScorer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{IssueMap, Severity};
    use pretty_assertions::assert_eq;

    fn single(severity: Severity, percentage: f64) -> IssueSet {
        let mut issues = IssueMap::new();
        issues.insert("issue".to_string(), Issue::new(severity, 1, percentage, "m"));
        let mut set = IssueSet::new();
        set.insert("Account", issues);
        set
    }

    #[test]
    fn test_empty_set_scores_exactly_100() {
        assert_eq!(QualityScorer::score(&IssueSet::new()).value(), 100.0);

        let mut set = IssueSet::new();
        set.insert("Account", IssueMap::new());
        assert_eq!(QualityScorer::score(&set).value(), 100.0);
    }

    #[test]
    fn test_medium_issue_at_forty_percent() {
        assert_eq!(QualityScorer::score(&single(Severity::Medium, 40.0)).value(), 80.0);
    }

    #[test]
    fn test_penalty_cap() {
        let issue = Issue::new(Severity::High, 1, 200.0, "m");
        assert_eq!(QualityScorer::penalty(&issue), 20.0);
        let issue = Issue::new(Severity::High, 1, 1000.0, "m");
        assert_eq!(QualityScorer::penalty(&issue), 20.0);
        assert_eq!(QualityScorer::score(&single(Severity::High, 250.0)).value(), 80.0);
    }

    #[test]
    fn test_penalties_are_additive_and_floored() {
        let mut accounts = IssueMap::new();
        for i in 0..4 {
            accounts.insert(format!("a{}", i), Issue::new(Severity::High, 3, 30.0, "m"));
        }
        let mut opportunities = IssueMap::new();
        for i in 0..3 {
            opportunities.insert(format!("o{}", i), Issue::new(Severity::High, 9, 90.0, "m"));
        }

        let mut set = IssueSet::new();
        set.insert("Account", accounts);
        assert_eq!(QualityScorer::score(&set).value(), 20.0);

        set.insert("Opportunity", opportunities);
        assert_eq!(QualityScorer::score(&set).value(), 0.0);
    }

    #[test]
    fn test_rounding_to_one_decimal() {
        // 100 - 2 * 1.234 = 97.532
        let score = QualityScorer::score(&single(Severity::Low, 12.34));
        assert_eq!(score.value(), 97.5);
        assert_eq!(score.to_string(), "97.5");
    }

    #[test]
    fn test_monotonic_in_percentage() {
        for severity in [Severity::Low, Severity::Medium, Severity::High] {
            let mut previous = f64::INFINITY;
            for step in 0..=60 {
                let score = QualityScorer::score(&single(severity, step as f64 * 5.0)).value();
                assert!(score <= previous, "{severity} at {}%", step * 5);
                previous = score;
            }
        }
    }

    #[test]
    fn test_severity_ordering_for_equal_percentage() {
        for percentage in [0.0, 5.0, 12.5, 40.0, 100.0] {
            let low = QualityScorer::score(&single(Severity::Low, percentage)).value();
            let medium = QualityScorer::score(&single(Severity::Medium, percentage)).value();
            let high = QualityScorer::score(&single(Severity::High, percentage)).value();
            assert!(low >= medium && medium >= high, "at {}%", percentage);
        }
    }

    #[test]
    fn test_malformed_entries_do_not_penalise() {
        let issue = Issue::new(Severity::High, 1, f64::NAN, "m");
        assert_eq!(QualityScorer::penalty(&issue), 0.0);
        let issue = Issue::new(Severity::High, 1, -50.0, "m");
        assert_eq!(QualityScorer::penalty(&issue), 0.0);

        let value = serde_json::json!({
            "Account": {
                "no_severity": { "percentage": 50.0 },
                "no_percentage": { "severity": "HIGH" },
                "junk": 42
            }
        });
        let set = IssueSet::from_value_lenient(&value);
        // LOW weight 2 at 50% = 10; HIGH without percentage = 0.
        assert_eq!(QualityScorer::score(&set).value(), 90.0);
    }

    #[test]
    fn test_score_band() {
        assert_eq!(ScoreBand::from_score(100.0), ScoreBand::A);
        assert_eq!(ScoreBand::from_score(94.9), ScoreBand::B);
        assert_eq!(ScoreBand::from_score(80.0), ScoreBand::C);
        assert_eq!(ScoreBand::from_score(50.0), ScoreBand::D);
        assert_eq!(ScoreBand::from_score(0.0), ScoreBand::F);
    }
}
