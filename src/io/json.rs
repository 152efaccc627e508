//! Single-document JSON parsing into records.
//!
//! The document must be an array of objects. Whitespace-only input is an
//! empty sequence.

use crate::error::{DecodeError, ParseError};
use crate::options::Format;
use crate::record::{RecordSequence, into_record, kind_of};
use serde_json::Value;
use std::io::Read;

/// Parse a whole JSON document.
///
/// # Errors
/// [`DecodeError::SourceUnavailable`] if reading the stream fails, and
/// [`DecodeError::MalformedInput`] for invalid JSON or a top-level value that
/// is not an array of objects.
pub fn parse_json(mut reader: impl Read, source_name: &str) -> Result<RecordSequence, DecodeError> {
    let mut buf = Vec::new();
    reader
        .read_to_end(&mut buf)
        .map_err(|e| DecodeError::unavailable(source_name, e))?;
    if buf.iter().all(u8::is_ascii_whitespace) {
        return Ok(RecordSequence::new());
    }

    let doc: Value =
        serde_json::from_slice(&buf).map_err(|e| DecodeError::malformed(Format::Json, e))?;
    let items = match doc {
        Value::Array(items) => items,
        other => {
            return Err(DecodeError::malformed(
                Format::Json,
                ParseError::Shape(format!(
                    "expected an array of records in {source_name}, found {}",
                    kind_of(&other)
                )),
            ));
        }
    };

    items
        .into_iter()
        .enumerate()
        .map(|(i, item)| {
            into_record(item).map_err(|other| {
                DecodeError::malformed(
                    Format::Json,
                    ParseError::Shape(format!(
                        "element #{} in {source_name} is {}, expected object",
                        i + 1,
                        kind_of(&other)
                    )),
                )
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn array_of_objects() {
        let recs = parse_json(&b"[{\"x\":1},{\"x\":2}]"[..], "t.json").unwrap();
        assert_eq!(recs.len(), 2);
        assert_eq!(recs[1]["x"], json!(2));
    }

    #[test]
    fn nested_values_survive() {
        let recs = parse_json(&b"[{\"a\":{\"b\":[1,null,true]}}]"[..], "t.json").unwrap();
        assert_eq!(recs[0]["a"], json!({"b": [1, null, true]}));
    }

    #[test]
    fn key_order_is_document_order() {
        let recs = parse_json(&b"[{\"z\":1,\"a\":2,\"m\":3}]"[..], "t.json").unwrap();
        let keys: Vec<&str> = recs[0].keys().map(String::as_str).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn top_level_object_is_rejected() {
        let err = parse_json(&b"{\"x\":1}"[..], "t.json").unwrap_err();
        assert!(format!("{:?}", err).contains("found object"));
    }

    #[test]
    fn scalar_element_is_rejected() {
        let err = parse_json(&b"[{\"x\":1}, 3]"[..], "t.json").unwrap_err();
        assert!(matches!(err, DecodeError::MalformedInput { format: Format::Json, .. }));
    }

    #[test]
    fn whitespace_is_empty() {
        assert!(parse_json(&b" \n\t"[..], "t.json").unwrap().is_empty());
    }
}
