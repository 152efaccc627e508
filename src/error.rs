//! Error types for decoding and encoding.
//!
//! The decoder raises exactly one error of its own, [`DecodeError::UnsupportedFormat`].
//! Every other [`DecodeError`] wraps a collaborator's failure (file or stream I/O,
//! gzip transport, a CSV/JSON/Parquet parser) and keeps it reachable through
//! [`std::error::Error::source`].

use crate::options::Format;
use std::io;

/// Failure of a [`decode`](crate::decode) call. Decoding is all-or-nothing, so
/// no records are returned alongside any of these.
#[derive(thiserror::Error, Debug)]
pub enum DecodeError {
    /// `format` was absent or not one of `csv`, `json`, `jsonl`, `parquet`.
    #[error("invalid format {}", display_format(.format))]
    UnsupportedFormat { format: Option<String> },

    /// A compression name other than `none` or `gzip` was parsed.
    #[error("invalid compression {0:?}")]
    UnsupportedCompression(String),

    /// The source could not be opened or read, including corrupt compressed data.
    #[error("error reading {source_name}")]
    SourceUnavailable {
        source_name: String,
        #[source]
        source: io::Error,
    },

    /// The bytes were read but did not parse as the requested format.
    #[error("malformed {format} input")]
    MalformedInput {
        format: Format,
        #[source]
        source: ParseError,
    },

    /// The format or codec was compiled out of this build.
    #[error("feature `{0}` is not enabled")]
    FeatureDisabled(&'static str),
}

fn display_format(format: &Option<String>) -> String {
    match format {
        Some(f) => format!("{f:?}"),
        None => "(none)".to_string(),
    }
}

impl DecodeError {
    pub(crate) fn unavailable(source_name: impl Into<String>, source: io::Error) -> Self {
        DecodeError::SourceUnavailable {
            source_name: source_name.into(),
            source,
        }
    }

    pub(crate) fn malformed(format: Format, source: impl Into<ParseError>) -> Self {
        DecodeError::MalformedInput {
            format,
            source: source.into(),
        }
    }
}

/// The underlying parser failure carried by [`DecodeError::MalformedInput`].
#[derive(thiserror::Error, Debug)]
pub enum ParseError {
    #[cfg(feature = "io-csv")]
    #[error(transparent)]
    Csv(#[from] csv::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// One JSON Lines line failed to parse.
    #[error("line {line}")]
    JsonLine {
        line: usize,
        #[source]
        source: serde_json::Error,
    },

    #[cfg(feature = "io-parquet")]
    #[error(transparent)]
    Parquet(#[from] parquet::errors::ParquetError),

    #[cfg(feature = "arrow")]
    #[error(transparent)]
    Arrow(#[from] arrow::error::ArrowError),

    /// The input parsed but does not have the shape of a record sequence.
    #[error("{0}")]
    Shape(String),
}

/// Failure of the JSON encoder.
#[derive(thiserror::Error, Debug)]
pub enum EncodeError {
    /// No encoding rule matched the value.
    #[error("Object of type {type_name} is not JSON serializable")]
    Unserializable { type_name: &'static str },

    /// A fixed-width integer does not fit a JSON integer (i64 or u64).
    #[error("integer {0} is out of range for JSON")]
    IntegerOutOfRange(String),

    /// A format pattern contains an unknown strftime directive.
    #[error("invalid {category} format {pattern:?}")]
    InvalidPattern {
        category: &'static str,
        pattern: String,
    },

    /// A format mapping named a category the encoder does not have.
    #[error("unknown format category {0:?}")]
    UnknownCategory(String),

    /// A decimal format other than `float` or `string`.
    #[error("invalid decimal format {0:?}")]
    InvalidDecimalFormat(String),

    /// Rendering a date or time with an otherwise valid pattern failed.
    #[error("error formatting {category} value with {pattern:?}")]
    Format {
        category: &'static str,
        pattern: String,
    },

    #[cfg(feature = "arrow")]
    #[error("error converting frame to records")]
    Frame(#[source] arrow::error::ArrowError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}
