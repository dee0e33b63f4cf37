//! Scan orchestration.
//!
//! A [`QualityScan`] fetches one batch per configured object type, runs the
//! [`IssueDetector`] over it, merges the results into one [`IssueSet`] and
//! scores it. Object types are scanned one after another; a scan holds no
//! mutable state, so independent scans may run on separate threads.

mod report;

pub use report::{IssueRate, ObjectSummary, ScanReport};

use crate::config::{ObjectRules, ScanConfig};
use crate::error::{QualityError, Result, ResultExt};
use crate::quality::{IssueDetector, QualityScorer};
use crate::source::RecordSource;
use crate::types::{IssueMap, IssueSet};
use chrono::Local;
use tracing::{info, warn};

/// A configured, validated quality scan.
#[derive(Debug, Clone)]
pub struct QualityScan {
    config: ScanConfig,
    detector: IssueDetector,
}

impl QualityScan {
    /// Validate `config` and build a scan from it.
    pub fn new(config: ScanConfig) -> Result<Self> {
        config.validate()?;
        let detector = IssueDetector::new(config.thresholds);
        Ok(Self { config, detector })
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan every configured object type.
    pub fn run(&self, source: &impl RecordSource) -> Result<ScanReport> {
        self.run_rules(source, self.config.objects.iter())
    }

    /// Scan only the named object types, in the given order.
    ///
    /// Fails with [`QualityError::UnknownObjectType`] before fetching
    /// anything when a name has no configured rules.
    pub fn run_only<S: AsRef<str>>(
        &self,
        source: &impl RecordSource,
        object_types: &[S],
    ) -> Result<ScanReport> {
        let selected = object_types
            .iter()
            .map(|name| {
                self.config
                    .rules_for(name.as_ref())
                    .ok_or_else(|| QualityError::UnknownObjectType(name.as_ref().to_string()))
            })
            .collect::<Result<Vec<_>>>()?;

        self.run_rules(source, selected.into_iter())
    }

    /// Fetch and check a single object type.
    pub fn scan_object(
        &self,
        source: &impl RecordSource,
        rules: &ObjectRules,
    ) -> Result<(ObjectSummary, IssueMap)> {
        let object_type = rules.object_type.as_str();
        let batch = source
            .fetch(object_type, &self.config.window)
            .context(format!("Scanning {}", object_type))?;

        if batch.is_truncated() {
            warn!(
                "{} batch was cut at {} records; results cover a partial snapshot",
                object_type,
                batch.len()
            );
        }

        let issues = self.detector.detect(&batch, rules);
        info!(
            "Scanned {} {} records: {} issue(s)",
            batch.len(),
            object_type,
            issues.len()
        );

        let summary = ObjectSummary {
            object_type: object_type.to_string(),
            records_scanned: batch.len(),
            truncated: batch.is_truncated(),
            issue_count: issues.len(),
        };
        Ok((summary, issues))
    }

    fn run_rules<'a>(
        &self,
        source: &impl RecordSource,
        rules: impl Iterator<Item = &'a ObjectRules>,
    ) -> Result<ScanReport> {
        let mut objects = Vec::new();
        let mut issues = IssueSet::new();

        for rules in rules {
            let (summary, found) = self.scan_object(source, rules)?;
            issues.insert(summary.object_type.clone(), found);
            objects.push(summary);
        }

        let total_records = objects.iter().map(|o| o.records_scanned).sum();
        let quality_score = QualityScorer::score(&issues);
        let issue_rate = IssueRate::compute(&issues, total_records);
        info!(
            "Quality score {} ({}) over {} records",
            quality_score,
            quality_score.band(),
            total_records
        );

        Ok(ScanReport {
            generated_at: Local::now().format("%Y-%m-%d %H:%M:%S").to_string(),
            thresholds: self.config.thresholds,
            objects,
            band: quality_score.band(),
            quality_score,
            issue_rate,
            issues,
        })
    }
}

static_assertions::assert_impl_all!(QualityScan: Send, Sync);
