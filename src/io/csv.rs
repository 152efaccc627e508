//! CSV parsing into records.
//!
//! The first row is the header. Each later row becomes a [`Record`] whose keys
//! are the header names in header order and whose values are strings.
//!
//! # Notes
//! - A row with fewer fields than the header fills the missing fields with null.
//! - A row with more fields than the header is malformed.
//! - Empty input (no header row) yields no records.

use crate::error::{DecodeError, ParseError};
use crate::options::Format;
use crate::record::{Record, RecordSequence};
use serde_json::Value;
use std::io::Read;

/// Parse a whole CSV stream.
///
/// # Errors
/// [`DecodeError::SourceUnavailable`] if reading the stream fails, and
/// [`DecodeError::MalformedInput`] for invalid UTF-8 or an over-long row.
/// Errors are annotated with the 1-based record number.
pub fn parse_csv(reader: impl Read, source_name: &str) -> Result<RecordSequence, DecodeError> {
    let mut rdr = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(reader);

    let headers = rdr
        .headers()
        .map_err(|e| csv_error(e, source_name))?
        .clone();

    let mut out = RecordSequence::new();
    for (i, row) in rdr.records().enumerate() {
        let row = row.map_err(|e| csv_error(e, source_name))?;
        if row.len() > headers.len() {
            return Err(DecodeError::malformed(
                Format::Csv,
                ParseError::Shape(format!(
                    "CSV record #{} in {source_name} has {} fields, header has {}",
                    i + 1,
                    row.len(),
                    headers.len()
                )),
            ));
        }
        let mut rec = Record::new();
        for (j, name) in headers.iter().enumerate() {
            let value = row
                .get(j)
                .map_or(Value::Null, |field| Value::String(field.to_string()));
            rec.insert(name.to_string(), value);
        }
        out.push(rec);
    }
    Ok(out)
}

fn csv_error(err: csv::Error, source_name: &str) -> DecodeError {
    if err.is_io_error() {
        DecodeError::unavailable(source_name, std::io::Error::from(err))
    } else {
        DecodeError::malformed(Format::Csv, err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn parse(input: &str) -> Result<RecordSequence, DecodeError> {
        parse_csv(input.as_bytes(), "test.csv")
    }

    #[test]
    fn header_keys_in_order() {
        let recs = parse("b,a\n1,2\n").unwrap();
        let keys: Vec<&String> = recs[0].keys().collect();
        assert_eq!(keys, ["b", "a"]);
    }

    #[test]
    fn trailing_empty_field_is_empty_string() {
        let recs = parse("a,b\n1,2\n3,\n").unwrap();
        assert_eq!(Value::Object(recs[1].clone()), json!({"a": "3", "b": ""}));
    }

    #[test]
    fn short_row_fills_null() {
        let recs = parse("a,b,c\n1\n").unwrap();
        assert_eq!(
            Value::Object(recs[0].clone()),
            json!({"a": "1", "b": null, "c": null})
        );
    }

    #[test]
    fn long_row_is_malformed() {
        let err = parse("a\n1,2\n").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { format: Format::Csv, .. }));
    }

    #[test]
    fn header_only_and_empty_yield_nothing() {
        assert!(parse("a,b\n").unwrap().is_empty());
        assert!(parse("").unwrap().is_empty());
    }

    #[test]
    fn quoted_fields() {
        let recs = parse("name,note\n\"Smith, J\",\"said \"\"hi\"\"\"\n").unwrap();
        assert_eq!(recs[0]["name"], "Smith, J");
        assert_eq!(recs[0]["note"], "said \"hi\"");
    }
}
