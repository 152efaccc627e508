//! # recordcodec
//!
//! Decode tabular data from files, standard input, or a pluggable remote
//! filesystem into an in-memory sequence of records. Encode records, and the
//! values JSON has no native form for, back to JSON text.
//!
//! ## Decoding
//!
//! [`decode`] (or a configured [`Decoder`]) reads one source in one of four
//! formats:
//!
//! | format    | shape                                   | gzip |
//! |-----------|-----------------------------------------|------|
//! | `csv`     | header row, string values               | yes  |
//! | `json`    | one top-level array of objects          | yes  |
//! | `jsonl`   | one object per line                     | yes  |
//! | `parquet` | columns flattened into rows             | n/a  |
//!
//! The source is `"-"` for standard input, otherwise a path. With a
//! [`FileSystem`] configured, paths resolve through it; without one they are
//! local. Every decode returns the whole sequence or an error.
//!
//! ```no_run
//! use recordcodec::{Compression, DecodeOptions, decode};
//!
//! # fn main() -> anyhow::Result<()> {
//! let options = DecodeOptions::new("jsonl")
//!     .with_compression(Compression::Gzip)
//!     .with_drop_nulls(true);
//! let records = decode("events.jsonl.gz", &options)?;
//! println!("{} records", records.len());
//! # Ok(())
//! # }
//! ```
//!
//! ## Encoding
//!
//! An [`Encoder`] holds the format choices of [`EncoderFormats`] and converts
//! a [`Value`] tree to JSON. Decimals, dates and times, Arrow record batches,
//! wide integers, float scalars, numeric arrays, IP networks and errors are
//! encoded by an ordered rule chain; see [`Category`].
//!
//! ## Feature Flags
//!
//! - `io-csv` (default): CSV decoding.
//! - `io-parquet` (default): Parquet decoding; implies `arrow`.
//! - `arrow`: record batch support in the encoder.
//! - `compression-gzip` (default): gzip transport decompression.
//!
//! JSON and JSON Lines are always available.
//!
//! ## Module Overview
//!
//! - [`decoder`]: decode dispatch and [`DecoderBuilder`]
//! - [`options`]: [`DecodeOptions`], [`Format`], [`Compression`]
//! - [`filter`]: row filters for Parquet reads
//! - [`clean`]: blank and null field removal
//! - [`encoder`]: JSON encoding and the rule chain
//! - [`io`]: sources, decompression, and per-format parsers
//! - [`testing`]: fixtures for tests

pub mod clean;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod filter;
pub mod io;
pub mod options;
pub mod record;
pub mod source;
pub mod testing;

pub use clean::{Clean, FieldCleaner};
pub use decoder::{Decoder, DecoderBuilder, decode};
pub use encoder::{Category, DecimalFormat, Encoder, EncoderFormats, Opaque, Value, classify};
pub use error::{DecodeError, EncodeError, ParseError};
pub use filter::{FilterOp, Filters, Predicate};
pub use io::fs::{FileSystem, LocalFs};
pub use options::{Compression, DEFAULT_BUFFER_SIZE, DecodeOptions, Format};
pub use record::{Record, RecordSequence};
pub use source::{STDIN, Source};
