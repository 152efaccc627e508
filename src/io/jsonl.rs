//! JSON Lines (JSONL) parsing into records.
//!
//! # Notes
//! - Each line is parsed independently after its terminator (`\n` or `\r\n`)
//!   is stripped; the last line needs no terminator.
//! - Empty/whitespace-only lines are skipped, so trailing blank input adds no record.
//! - Every remaining line must hold one JSON object.

use crate::error::{DecodeError, ParseError};
use crate::options::Format;
use crate::record::{RecordSequence, into_record, kind_of};
use serde_json::Value;
use std::io::{BufRead, BufReader, Read};

/// Parse a JSONL stream.
///
/// # Errors
/// [`DecodeError::SourceUnavailable`] if reading the stream fails, and
/// [`DecodeError::MalformedInput`] naming the 1-based line number when a line
/// is not valid JSON or not an object.
pub fn parse_jsonl(reader: impl Read, source_name: &str) -> Result<RecordSequence, DecodeError> {
    let mut rdr = BufReader::new(reader);
    let mut out = RecordSequence::new();
    let mut line = Vec::new();
    let mut lineno = 0usize;
    loop {
        line.clear();
        let n = rdr
            .read_until(b'\n', &mut line)
            .map_err(|e| DecodeError::unavailable(source_name, e))?;
        if n == 0 {
            break;
        }
        lineno += 1;
        let body = strip_terminator(&line);
        if body.iter().all(u8::is_ascii_whitespace) {
            continue;
        }
        let value: Value = serde_json::from_slice(body).map_err(|source| {
            DecodeError::malformed(
                Format::Jsonl,
                ParseError::JsonLine {
                    line: lineno,
                    source,
                },
            )
        })?;
        let rec = into_record(value).map_err(|other| {
            DecodeError::malformed(
                Format::Jsonl,
                ParseError::Shape(format!(
                    "line {lineno} in {source_name} is {}, expected object",
                    kind_of(&other)
                )),
            )
        })?;
        out.push(rec);
    }
    Ok(out)
}

fn strip_terminator(line: &[u8]) -> &[u8] {
    let line = line.strip_suffix(b"\n").unwrap_or(line);
    line.strip_suffix(b"\r").unwrap_or(line)
}
