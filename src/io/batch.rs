//! Flattening Arrow record batches into records.
//!
//! Columns become fields in schema order; every row carries every field, with
//! null for missing values. Nested list and struct columns become JSON arrays
//! and objects; temporal columns become ISO-8601 strings.

use crate::record::{Record, RecordSequence};
use arrow::error::ArrowError;
use arrow::json::writer::{LineDelimited, WriterBuilder};
use arrow::record_batch::RecordBatch;

/// Convert one batch into one record per row.
///
/// # Errors
/// Returns an error if a column type has no JSON representation.
pub fn batch_to_records(batch: &RecordBatch) -> Result<RecordSequence, ArrowError> {
    let mut writer = WriterBuilder::new()
        .with_explicit_nulls(true)
        .build::<_, LineDelimited>(Vec::new());
    writer.write(batch)?;
    writer.finish()?;
    let buf = writer.into_inner();

    let mut out = RecordSequence::with_capacity(batch.num_rows());
    for line in buf.split(|b| *b == b'\n').filter(|l| !l.is_empty()) {
        let rec: Record =
            serde_json::from_slice(line).map_err(|e| ArrowError::JsonError(e.to_string()))?;
        out.push(rec);
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::array::{ArrayRef, Int64Array, StringArray};
    use arrow::datatypes::{DataType, Field, Schema};
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn rows_in_field_order_with_nulls() {
        let schema = Arc::new(Schema::new(vec![
            Field::new("name", DataType::Utf8, true),
            Field::new("id", DataType::Int64, false),
        ]));
        let columns: Vec<ArrayRef> = vec![
            Arc::new(StringArray::from(vec![Some("a"), None])),
            Arc::new(Int64Array::from(vec![1, 2])),
        ];
        let batch = RecordBatch::try_new(schema, columns).unwrap();

        let recs = batch_to_records(&batch).unwrap();
        assert_eq!(recs.len(), 2);
        let keys: Vec<&str> = recs[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["name", "id"]);
        assert_eq!(serde_json::Value::Object(recs[1].clone()), json!({"name": null, "id": 2}));
    }

    #[test]
    fn empty_batch_has_no_rows() {
        let schema = Arc::new(Schema::new(vec![Field::new("x", DataType::Int64, true)]));
        let batch = RecordBatch::new_empty(schema);
        assert!(batch_to_records(&batch).unwrap().is_empty());
    }
}
