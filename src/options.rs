//! Decode configuration.
//!
//! [`DecodeOptions`] follows the crate's config style: public fields, a
//! `Default`, `with_*` builders, and serde support so callers can load it from
//! their own configuration files.
//!
//! ```
//! use recordcodec::{Compression, DecodeOptions};
//!
//! let opts = DecodeOptions::new("csv")
//!     .with_compression(Compression::Gzip)
//!     .with_drop_blanks(true);
//! assert_eq!(opts.format.as_deref(), Some("csv"));
//!
//! let from_json: DecodeOptions =
//!     serde_json::from_str(r#"{"format": "jsonl", "compression": "gzip"}"#).unwrap();
//! assert_eq!(from_json.compression, Compression::Gzip);
//! ```

use crate::error::DecodeError;
use crate::filter::Filters;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Row buffer used by the Parquet reader when `buffer_size` is unset.
pub const DEFAULT_BUFFER_SIZE: usize = 4096;

/// Input encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    Csv,
    Json,
    Jsonl,
    Parquet,
}

impl Format {
    pub fn as_str(self) -> &'static str {
        match self {
            Format::Csv => "csv",
            Format::Json => "json",
            Format::Jsonl => "jsonl",
            Format::Parquet => "parquet",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Format::Csv),
            "json" => Ok(Format::Json),
            "jsonl" => Ok(Format::Jsonl),
            "parquet" => Ok(Format::Parquet),
            other => Err(DecodeError::UnsupportedFormat {
                format: Some(other.to_string()),
            }),
        }
    }
}

/// Transport compression applied around csv/json/jsonl bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Compression {
    #[default]
    None,
    Gzip,
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Compression::None => f.write_str("none"),
            Compression::Gzip => f.write_str("gzip"),
        }
    }
}

impl FromStr for Compression {
    type Err = DecodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" | "none" => Ok(Compression::None),
            "gzip" | "gz" => Ok(Compression::Gzip),
            other => Err(DecodeError::UnsupportedCompression(other.to_string())),
        }
    }
}

/// Options for one decode call.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeOptions {
    /// `csv`, `json`, `jsonl` or `parquet`. Required; kept as text so that an
    /// unknown value surfaces as [`DecodeError::UnsupportedFormat`] at decode time.
    pub format: Option<String>,
    /// Ignored for Parquet.
    pub compression: Compression,
    /// Parquet only: columns to read, in output order, cast to the given types.
    #[cfg(feature = "arrow")]
    #[serde(skip)]
    pub schema: Option<arrow::datatypes::SchemaRef>,
    /// Parquet only: row predicates in disjunctive normal form.
    pub filters: Option<Filters>,
    /// Parquet only: rows per read batch, [`DEFAULT_BUFFER_SIZE`] when unset.
    pub buffer_size: Option<usize>,
    /// Remove string fields that are empty or whitespace.
    pub drop_blanks: bool,
    /// Remove null fields.
    pub drop_nulls: bool,
}

impl DecodeOptions {
    pub fn new(format: impl Into<String>) -> Self {
        Self {
            format: Some(format.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_compression(mut self, compression: Compression) -> Self {
        self.compression = compression;
        self
    }

    #[cfg(feature = "arrow")]
    #[must_use]
    pub fn with_schema(mut self, schema: arrow::datatypes::SchemaRef) -> Self {
        self.schema = Some(schema);
        self
    }

    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = Some(filters);
        self
    }

    #[must_use]
    pub fn with_buffer_size(mut self, buffer_size: usize) -> Self {
        self.buffer_size = Some(buffer_size);
        self
    }

    #[must_use]
    pub fn with_drop_blanks(mut self, drop_blanks: bool) -> Self {
        self.drop_blanks = drop_blanks;
        self
    }

    #[must_use]
    pub fn with_drop_nulls(mut self, drop_nulls: bool) -> Self {
        self.drop_nulls = drop_nulls;
        self
    }

    /// Parse [`format`](Self::format).
    ///
    /// # Errors
    /// [`DecodeError::UnsupportedFormat`] if it is absent or unrecognized.
    pub fn format(&self) -> Result<Format, DecodeError> {
        match &self.format {
            Some(f) => f.parse(),
            None => Err(DecodeError::UnsupportedFormat { format: None }),
        }
    }

    /// Effective Parquet batch size.
    pub fn buffer_size(&self) -> usize {
        self.buffer_size.unwrap_or(DEFAULT_BUFFER_SIZE).max(1)
    }

    pub(crate) fn wants_cleaning(&self) -> bool {
        self.drop_blanks || self.drop_nulls
    }
}
