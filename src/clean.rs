//! Post-decode cleaning of null and blank fields.
//!
//! The decoder calls a [`Clean`] implementation at most once per decode, after
//! every record has been materialized, and only when `drop_nulls` or
//! `drop_blanks` is set. [`FieldCleaner`] is the default.

use crate::record::{Record, RecordSequence};
use serde_json::Value;

/// Strips unwanted fields from a decoded record sequence.
///
/// Implementations must return the same shape they receive: one record out
/// for every record in.
pub trait Clean: Send + Sync {
    fn clean(&self, records: RecordSequence, drop_nulls: bool, drop_blanks: bool)
    -> RecordSequence;
}

/// Removes null fields and blank string fields at every depth.
///
/// A blank string is one that is empty after trimming whitespace. Nested
/// objects, including objects inside arrays, are cleaned the same way.
/// Records are never removed, even when no fields remain.
///
/// ```
/// use recordcodec::clean::{Clean, FieldCleaner};
/// use serde_json::json;
///
/// let rec = json!({"a": "3", "b": "", "c": null}).as_object().unwrap().clone();
/// let out = FieldCleaner.clean(vec![rec], false, true);
/// assert_eq!(serde_json::Value::Object(out[0].clone()), json!({"a": "3", "c": null}));
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FieldCleaner;

impl Clean for FieldCleaner {
    fn clean(
        &self,
        records: RecordSequence,
        drop_nulls: bool,
        drop_blanks: bool,
    ) -> RecordSequence {
        if !drop_nulls && !drop_blanks {
            return records;
        }
        records
            .into_iter()
            .map(|r| clean_record(r, drop_nulls, drop_blanks))
            .collect()
    }
}

fn clean_record(record: Record, drop_nulls: bool, drop_blanks: bool) -> Record {
    record
        .into_iter()
        .filter(|(_, v)| !is_dropped(v, drop_nulls, drop_blanks))
        .map(|(k, v)| (k, clean_value(v, drop_nulls, drop_blanks)))
        .collect()
}

fn clean_value(value: Value, drop_nulls: bool, drop_blanks: bool) -> Value {
    match value {
        Value::Object(map) => Value::Object(clean_record(map, drop_nulls, drop_blanks)),
        Value::Array(items) => Value::Array(
            items
                .into_iter()
                .map(|v| clean_value(v, drop_nulls, drop_blanks))
                .collect(),
        ),
        other => other,
    }
}

fn is_dropped(value: &Value, drop_nulls: bool, drop_blanks: bool) -> bool {
    match value {
        Value::Null => drop_nulls,
        Value::String(s) => drop_blanks && s.trim().is_empty(),
        _ => false,
    }
}
