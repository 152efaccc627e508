//! Record model shared by every decode path.
//!
//! A [`Record`] is an ordered mapping of field name to JSON value. Field order
//! follows the source: header order for CSV, key order for JSON, and
//! field-declaration order for Parquet. `serde_json` is built with
//! `preserve_order`, so the map keeps insertion order.

use serde_json::{Map, Value};

/// One decoded row or object.
pub type Record = Map<String, Value>;

/// The fully materialized result of one decode call.
pub type RecordSequence = Vec<Record>;

/// Convert a parsed JSON value into a [`Record`], returning the value back if
/// it is not an object.
pub(crate) fn into_record(value: Value) -> Result<Record, Value> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(other),
    }
}

/// Short JSON type name used in shape error messages.
pub(crate) fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
