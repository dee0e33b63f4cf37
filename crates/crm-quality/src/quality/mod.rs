//! Data quality detection and scoring.
//!
//! [`IssueDetector`] applies the missing-field and numeric-outlier rules to
//! one batch; [`QualityScorer`] turns the issues of a whole scan into one
//! 0-100 score.

mod detector;
mod missing;
mod outliers;
mod scorer;
pub mod statistics;

pub use detector::{DetectionRule, IssueDetector, RuleContext};
pub use missing::{HIGH_SEVERITY_MISSING_PCT, MissingFieldRule};
pub use outliers::{MIN_OUTLIER_SAMPLE, NumericOutlierRule};
pub use scorer::{BASE_SCORE, MAX_PENALTY_PER_ISSUE, QualityScore, QualityScorer, ScoreBand};
