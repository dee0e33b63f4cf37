//! Conversions from tabular and JSON sources into record batches.

use super::batch::{Record, RecordBatch};
use super::value::FieldValue;
use crate::error::{QualityError, Result, ResultExt};
use polars::prelude::*;

/// Key holding per-record metadata in CRM REST responses. Never a data field.
const ATTRIBUTES_KEY: &str = "attributes";

/// Category of a column data type for record conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DtypeCategory {
    /// Integer or floating point numbers
    Numeric,
    /// Boolean type
    Boolean,
    /// Everything else, rendered as text
    Text,
}

/// Check if a DataType is numeric (integer or float).
#[inline]
pub fn is_numeric_dtype(dtype: &DataType) -> bool {
    matches!(
        dtype,
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    )
}

pub fn dtype_category(dtype: &DataType) -> DtypeCategory {
    if is_numeric_dtype(dtype) {
        DtypeCategory::Numeric
    } else if matches!(dtype, DataType::Boolean) {
        DtypeCategory::Boolean
    } else {
        DtypeCategory::Text
    }
}

/// Convert every row of a DataFrame into a [`Record`].
///
/// Nulls stay null; dates and other non-scalar types are rendered as text.
pub fn batch_from_dataframe(object_type: &str, df: &DataFrame) -> Result<RecordBatch> {
    let mut records = vec![Record::new(); df.height()];

    for column in df.get_columns() {
        let series = column.as_materialized_series();
        let name = series.name().to_string();
        let values =
            column_values(series).context(format!("Converting column '{}' of {}", name, object_type))?;

        for (record, value) in records.iter_mut().zip(values) {
            record.insert(name.clone(), value);
        }
    }

    Ok(RecordBatch::new(object_type, records))
}

fn column_values(series: &Series) -> PolarsResult<Vec<FieldValue>> {
    let values = match dtype_category(series.dtype()) {
        DtypeCategory::Numeric => {
            let float_series = series.cast(&DataType::Float64)?;
            float_series
                .f64()?
                .into_iter()
                .map(|v| v.map_or(FieldValue::Null, FieldValue::Number))
                .collect()
        }
        DtypeCategory::Boolean => series
            .bool()?
            .into_iter()
            .map(|v| v.map_or(FieldValue::Null, FieldValue::Bool))
            .collect(),
        DtypeCategory::Text => {
            let string_series = series.cast(&DataType::String)?;
            string_series
                .str()?
                .into_iter()
                .map(|v| v.map_or(FieldValue::Null, |s| FieldValue::Text(s.to_string())))
                .collect()
        }
    };

    Ok(values)
}

impl From<&serde_json::Value> for FieldValue {
    fn from(value: &serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => FieldValue::Null,
            serde_json::Value::Bool(b) => FieldValue::Bool(*b),
            serde_json::Value::Number(n) => n.as_f64().map_or(FieldValue::Null, FieldValue::Number),
            serde_json::Value::String(s) => FieldValue::Text(s.clone()),
            nested => FieldValue::Text(nested.to_string()),
        }
    }
}

/// Convert a JSON query response into a batch.
///
/// Accepts either `{"records": [...]}` (the CRM REST query shape) or a bare
/// array of record objects.
pub fn batch_from_json(object_type: &str, value: &serde_json::Value) -> Result<RecordBatch> {
    let rows = match value {
        serde_json::Value::Array(rows) => rows,
        serde_json::Value::Object(map) => match map.get("records") {
            Some(serde_json::Value::Array(rows)) => rows,
            Some(serde_json::Value::Null) | None => return Ok(RecordBatch::empty(object_type)),
            Some(_) => {
                return Err(QualityError::unavailable(
                    object_type,
                    "'records' is not an array",
                ));
            }
        },
        _ => {
            return Err(QualityError::unavailable(
                object_type,
                "expected a query response object or an array of records",
            ));
        }
    };

    let mut records = Vec::with_capacity(rows.len());
    for (index, row) in rows.iter().enumerate() {
        let Some(fields) = row.as_object() else {
            return Err(QualityError::unavailable(
                object_type,
                format!("record {} is not an object", index),
            ));
        };

        records.push(
            fields
                .iter()
                .filter(|(key, _)| key.as_str() != ATTRIBUTES_KEY)
                .map(|(key, value)| (key.clone(), FieldValue::from(value)))
                .collect::<Record>(),
        );
    }

    Ok(RecordBatch::new(object_type, records))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn test_dtype_category() {
        assert_eq!(dtype_category(&DataType::Int64), DtypeCategory::Numeric);
        assert_eq!(dtype_category(&DataType::Float32), DtypeCategory::Numeric);
        assert_eq!(dtype_category(&DataType::Boolean), DtypeCategory::Boolean);
        assert_eq!(dtype_category(&DataType::String), DtypeCategory::Text);
    }

    #[test]
    fn test_batch_from_dataframe() {
        let df = df![
            "Name" => [Some("Acme"), Some("Globex"), None],
            "AnnualRevenue" => [Some(1_000i64), None, Some(250)],
            "IsActive" => [true, false, true],
        ]
        .unwrap();

        let batch = batch_from_dataframe("Account", &df).unwrap();

        assert_eq!(batch.len(), 3);
        assert_eq!(batch.object_type(), "Account");
        assert_eq!(batch.records()[0].text("Name"), Some("Acme"));
        assert_eq!(batch.records()[0].number("AnnualRevenue"), Ok(1000.0));
        assert!(batch.records()[1].is_missing("AnnualRevenue"));
        assert!(batch.records()[2].is_missing("Name"));
        assert_eq!(
            batch.records()[1].get("IsActive"),
            Some(&FieldValue::Bool(false))
        );
    }

    #[test]
    fn test_batch_from_empty_dataframe() {
        let batch = batch_from_dataframe("Account", &DataFrame::empty()).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_from_query_response() {
        let response = json!({
            "totalSize": 2,
            "done": true,
            "records": [
                {
                    "attributes": { "type": "Opportunity", "url": "/x/1" },
                    "Name": "Renewal",
                    "Amount": 5000,
                    "CloseDate": null
                },
                { "Name": "Upsell", "Amount": "1200.50" }
            ]
        });

        let batch = batch_from_json("Opportunity", &response).unwrap();

        assert_eq!(batch.len(), 2);
        let first = &batch.records()[0];
        assert!(!first.contains_field("attributes"));
        assert_eq!(first.number("Amount"), Ok(5000.0));
        assert!(first.contains_field("CloseDate"));
        assert!(first.is_missing("CloseDate"));
        assert_eq!(batch.records()[1].number("Amount"), Ok(1200.5));
    }

    #[test]
    fn test_batch_from_bare_array() {
        let batch = batch_from_json("Account", &json!([{ "Name": "Acme" }])).unwrap();
        assert_eq!(batch.len(), 1);
    }

    #[test]
    fn test_batch_from_json_without_records_is_empty() {
        let batch = batch_from_json("Account", &json!({ "totalSize": 0, "done": true })).unwrap();
        assert!(batch.is_empty());
    }

    #[test]
    fn test_batch_from_json_rejects_garbage() {
        let err = batch_from_json("Account", &json!("oops")).unwrap_err();
        assert_eq!(err.error_code(), "INPUT_UNAVAILABLE");

        let err = batch_from_json("Account", &json!([1, 2])).unwrap_err();
        assert!(err.to_string().contains("record 0"));
    }
}
