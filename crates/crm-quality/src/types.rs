use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Maximum number of example values attached to an outlier issue.
pub const MAX_SAMPLE_VALUES: usize = 5;

/// How serious a detected issue is.
///
/// Ordered `Low < Medium < High`. Unknown or missing severities coming from
/// external JSON deserialize as [`Severity::Low`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "UPPERCASE", from = "Option<String>")]
pub enum Severity {
    #[default]
    Low,
    Medium,
    High,
}

impl Severity {
    /// Penalty weight used by the quality scorer.
    pub fn weight(&self) -> f64 {
        match self {
            Self::High => 10.0,
            Self::Medium => 5.0,
            Self::Low => 2.0,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::High => "HIGH",
            Self::Medium => "MEDIUM",
            Self::Low => "LOW",
        }
    }
}

impl From<Option<String>> for Severity {
    fn from(value: Option<String>) -> Self {
        match value.as_deref().map(str::trim) {
            Some(s) if s.eq_ignore_ascii_case("high") => Self::High,
            Some(s) if s.eq_ignore_ascii_case("medium") => Self::Medium,
            _ => Self::Low,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One detected data-quality defect.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    #[serde(default)]
    pub severity: Severity,
    #[serde(default)]
    pub count: usize,
    /// Share of the examined records affected, 0 - 100.
    #[serde(default, deserialize_with = "lenient_f64")]
    pub percentage: f64,
    #[serde(default)]
    pub message: String,
    /// Example offending values, outlier rules only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sample_values: Option<Vec<f64>>,
}

fn lenient_f64<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or(0.0))
}

impl Issue {
    pub fn new(severity: Severity, count: usize, percentage: f64, message: impl Into<String>) -> Self {
        Self {
            severity,
            count,
            percentage,
            message: message.into(),
            sample_values: None,
        }
    }

    /// Attach example values, keeping at most [`MAX_SAMPLE_VALUES`].
    pub fn with_samples(mut self, mut samples: Vec<f64>) -> Self {
        samples.truncate(MAX_SAMPLE_VALUES);
        self.sample_values = Some(samples);
        self
    }
}

/// Issues found for one object type, keyed by issue name.
pub type IssueMap = BTreeMap<String, Issue>;

/// Issues for every scanned object type, keyed by object type name.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IssueSet {
    objects: BTreeMap<String, IssueMap>,
}

impl IssueSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store the issues of one object type, replacing earlier results for it.
    pub fn insert(&mut self, object_type: impl Into<String>, issues: IssueMap) {
        self.objects.insert(object_type.into(), issues);
    }

    pub fn get(&self, object_type: &str) -> Option<&IssueMap> {
        self.objects.get(object_type)
    }

    /// Iterate over `(object_type, issues)` pairs.
    pub fn objects(&self) -> impl Iterator<Item = (&str, &IssueMap)> {
        self.objects.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over every issue as `(object_type, issue_name, issue)`.
    pub fn issues(&self) -> impl Iterator<Item = (&str, &str, &Issue)> {
        self.objects.iter().flat_map(|(object, issues)| {
            issues
                .iter()
                .map(move |(name, issue)| (object.as_str(), name.as_str(), issue))
        })
    }

    /// Number of issues across all object types.
    pub fn issue_count(&self) -> usize {
        self.objects.values().map(BTreeMap::len).sum()
    }

    /// Sum of affected-record counts across all issues.
    pub fn affected_count(&self) -> usize {
        self.issues().map(|(_, _, issue)| issue.count).sum()
    }

    /// True when no object type has any issue.
    pub fn is_empty(&self) -> bool {
        self.issue_count() == 0
    }

    /// Build an issue set from loosely structured JSON.
    ///
    /// Entries that are not objects are skipped instead of failing the
    /// whole set, and missing fields fall back to their defaults.
    pub fn from_value_lenient(value: &serde_json::Value) -> Self {
        let mut set = IssueSet::new();
        let Some(objects) = value.as_object() else {
            debug!("Issue set is not a JSON object; treating as empty");
            return set;
        };

        for (object_type, entries) in objects {
            let Some(entries) = entries.as_object() else {
                debug!("Skipping non-object issue group '{}'", object_type);
                continue;
            };

            let issues: IssueMap = entries
                .iter()
                .filter_map(|(name, entry)| {
                    if !entry.is_object() {
                        debug!("Skipping malformed issue '{}.{}'", object_type, name);
                        return None;
                    }
                    match Issue::deserialize(entry) {
                        Ok(issue) => Some((name.clone(), issue)),
                        Err(e) => {
                            debug!("Skipping malformed issue '{}.{}': {}", object_type, name, e);
                            None
                        }
                    }
                })
                .collect();

            set.insert(object_type.clone(), issues);
        }

        set
    }

    /// Like [`from_value_lenient`](Self::from_value_lenient), but also accepts
    /// a saved scan report, recognized by `issues` next to `quality_score`.
    pub fn from_document_lenient(value: &serde_json::Value) -> Self {
        match value.get("issues") {
            Some(nested) if value.get("quality_score").is_some() => {
                debug!("Reading issue set from a scan report");
                Self::from_value_lenient(nested)
            }
            _ => Self::from_value_lenient(value),
        }
    }
}

impl FromIterator<(String, IssueMap)> for IssueSet {
    fn from_iter<T: IntoIterator<Item = (String, IssueMap)>>(iter: T) -> Self {
        Self {
            objects: iter.into_iter().collect(),
        }
    }
}
