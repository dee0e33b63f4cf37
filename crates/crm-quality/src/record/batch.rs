//! Records and record batches.

use super::value::{CoercionError, FieldValue};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A flat, read-only mapping from field name to scalar value.
///
/// A field can be absent (no key) or present with a null value; both count
/// as missing for the quality rules, but [`Record::get`] keeps them apart.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Record {
    fields: BTreeMap<String, FieldValue>,
}

impl Record {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style field insertion.
    pub fn with(mut self, field: impl Into<String>, value: impl Into<FieldValue>) -> Self {
        self.insert(field, value);
        self
    }

    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<FieldValue>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Look up a field. `None` means the record has no such field at all.
    pub fn get(&self, field: &str) -> Option<&FieldValue> {
        self.fields.get(field)
    }

    pub fn contains_field(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    /// True when the field is absent or null.
    pub fn is_missing(&self, field: &str) -> bool {
        self.get(field).is_none_or(FieldValue::is_null)
    }

    /// Read a field as a finite number.
    pub fn number(&self, field: &str) -> Result<f64, CoercionError> {
        self.get(field).ok_or(CoercionError::Absent)?.as_number()
    }

    /// Read a field as text, if it holds text.
    pub fn text(&self, field: &str) -> Option<&str> {
        self.get(field).and_then(FieldValue::as_text)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl<K: Into<String>, V: Into<FieldValue>> FromIterator<(K, V)> for Record {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        Self {
            fields: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}

/// An ordered snapshot of records of one object type.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordBatch {
    object_type: String,
    records: Vec<Record>,
    /// Set by the record source when its limit cut off further records.
    #[serde(default)]
    truncated: bool,
}

impl RecordBatch {
    pub fn new(object_type: impl Into<String>, records: Vec<Record>) -> Self {
        Self {
            object_type: object_type.into(),
            records,
            truncated: false,
        }
    }

    pub fn empty(object_type: impl Into<String>) -> Self {
        Self::new(object_type, Vec::new())
    }

    pub fn object_type(&self) -> &str {
        &self.object_type
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn is_truncated(&self) -> bool {
        self.truncated
    }

    /// Flag the batch as cut off by a record limit.
    pub fn truncated(mut self, truncated: bool) -> Self {
        self.truncated = truncated;
        self
    }

    /// True when at least one record carries the field (even as null).
    pub fn has_field(&self, field: &str) -> bool {
        self.records.iter().any(|r| r.contains_field(field))
    }

    pub fn into_records(self) -> Vec<Record> {
        self.records
    }
}

impl<'a> IntoIterator for &'a RecordBatch {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn account(name: Option<&str>, phone: Option<&str>) -> Record {
        Record::new().with("Name", name).with("Phone", phone)
    }

    #[test]
    fn test_absent_and_null_are_both_missing() {
        let record = Record::new().with("Phone", None::<&str>);
        assert!(record.is_missing("Phone"));
        assert!(record.is_missing("Fax"));
        assert!(record.get("Phone").is_some());
        assert!(record.get("Fax").is_none());
    }

    #[test]
    fn test_number_distinguishes_absent_from_unparseable() {
        let record = Record::new().with("Amount", "lots").with("Score", 5.0);
        assert_eq!(record.number("Missing"), Err(CoercionError::Absent));
        assert!(matches!(
            record.number("Amount"),
            Err(CoercionError::NotNumeric(_))
        ));
        assert_eq!(record.number("Score"), Ok(5.0));
    }

    #[test]
    fn test_record_from_iter() {
        let record: Record = [("Name", "Acme"), ("Status", "Active")].into_iter().collect();
        assert_eq!(record.len(), 2);
        assert_eq!(record.text("Status"), Some("Active"));
    }

    #[test]
    fn test_batch_has_field() {
        let batch = RecordBatch::new(
            "Account",
            vec![account(Some("Acme"), None), account(None, Some("555-0100"))],
        );
        assert_eq!(batch.len(), 2);
        assert!(batch.has_field("Phone"));
        assert!(!batch.has_field("BillingStreet"));
        assert!(!batch.is_truncated());
    }

    #[test]
    fn test_empty_batch() {
        let batch = RecordBatch::empty("Opportunity");
        assert!(batch.is_empty());
        assert_eq!(batch.object_type(), "Opportunity");
        assert!(!batch.has_field("Amount"));
    }
}
