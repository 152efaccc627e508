//! Decode dispatch.
//!
//! [`Decoder::decode`] picks a decode path from the format, the compression
//! and the source kind:
//!
//! 1. Parquet goes to the dataset reader, which handles the source kind
//!    itself and ignores transport compression.
//! 2. CSV, JSON and JSON Lines open one byte stream for the source and
//!    compression through [`StreamOpener`], then hand it to that format's
//!    parser. The parser never knows where its bytes came from.
//!
//! Cleaning, when requested, runs once over the full record sequence after
//! decoding. Any failure aborts the call; there are no partial results.
//!
//! ```
//! use recordcodec::{DecodeOptions, Decoder};
//!
//! # fn main() -> Result<(), recordcodec::DecodeError> {
//! let decoder = Decoder::builder()
//!     .stdin(|| Box::new(&b"a,b\n1,2\n3,\n"[..]))
//!     .build();
//! let records = decoder.decode("-", &DecodeOptions::new("csv").with_drop_blanks(true))?;
//! assert_eq!(records[1].get("b"), None);
//! # Ok(())
//! # }
//! ```

use crate::clean::{Clean, FieldCleaner};
use crate::error::DecodeError;
use crate::io::fs::FileSystem;
use crate::io::json::parse_json;
use crate::io::jsonl::parse_jsonl;
use crate::io::stream::{StdinFactory, StreamOpener, process_stdin};
use crate::options::{DecodeOptions, Format};
use crate::record::RecordSequence;
use crate::source::Source;
use std::fmt;
use std::io::Read;
use std::sync::Arc;
use tracing::{debug, trace};

/// Decode `src` with a default [`Decoder`]: process stdin for `"-"`, local
/// files otherwise, and [`FieldCleaner`] for cleaning.
///
/// # Errors
/// See [`Decoder::decode`].
pub fn decode(src: &str, options: &DecodeOptions) -> Result<RecordSequence, DecodeError> {
    Decoder::default().decode(src, options)
}

/// Decodes sources into record sequences.
///
/// A decoder holds its collaborators (an optional [`FileSystem`], the stdin
/// factory, and the [`Clean`] implementation) and no per-call state, so one
/// instance may serve any number of calls.
pub struct Decoder {
    filesystem: Option<Arc<dyn FileSystem>>,
    stdin: StdinFactory,
    cleaner: Arc<dyn Clean>,
}

impl Default for Decoder {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl fmt::Debug for Decoder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Decoder")
            .field("filesystem", &self.filesystem.is_some())
            .finish_non_exhaustive()
    }
}

impl Decoder {
    #[must_use]
    pub fn builder() -> DecoderBuilder {
        DecoderBuilder::default()
    }

    /// Decode `src` according to `options`.
    ///
    /// `src` is `"-"` for standard input, otherwise a path, resolved through the
    /// decoder's filesystem if it has one and locally if not.
    ///
    /// # Errors
    /// - [`DecodeError::UnsupportedFormat`] if `options.format` is absent or unknown.
    /// - [`DecodeError::SourceUnavailable`] if the source cannot be opened or read.
    /// - [`DecodeError::MalformedInput`] if the bytes do not parse.
    /// - [`DecodeError::FeatureDisabled`] if the format or codec is compiled out.
    pub fn decode(
        &self,
        src: &str,
        options: &DecodeOptions,
    ) -> Result<RecordSequence, DecodeError> {
        let format = options.format()?;
        let source = Source::resolve(src, self.filesystem.is_some());
        self.decode_resolved(&source, format, options)
    }

    /// Decode an already resolved [`Source`].
    ///
    /// # Errors
    /// As [`decode`](Self::decode).
    pub fn decode_source(
        &self,
        source: &Source,
        options: &DecodeOptions,
    ) -> Result<RecordSequence, DecodeError> {
        let format = options.format()?;
        self.decode_resolved(source, format, options)
    }

    fn decode_resolved(
        &self,
        source: &Source,
        format: Format,
        options: &DecodeOptions,
    ) -> Result<RecordSequence, DecodeError> {
        debug!(
            source = %source,
            kind = source.kind(),
            format = %format,
            compression = %options.compression,
            "decoding"
        );
        let opener = self.opener();
        let name = source.to_string();

        let records = match format {
            Format::Parquet => parquet_records(source, options, &opener)?,
            Format::Csv => csv_records(opener.open(source, options.compression)?, &name)?,
            Format::Json => parse_json(opener.open(source, options.compression)?, &name)?,
            Format::Jsonl => parse_jsonl(opener.open(source, options.compression)?, &name)?,
        };
        trace!(source = %source, records = records.len(), "decoded");

        if options.wants_cleaning() {
            debug!(
                drop_nulls = options.drop_nulls,
                drop_blanks = options.drop_blanks,
                "cleaning records"
            );
            return Ok(self
                .cleaner
                .clean(records, options.drop_nulls, options.drop_blanks));
        }
        Ok(records)
    }

    fn opener(&self) -> StreamOpener<'_> {
        StreamOpener::new(self.filesystem.as_deref(), &self.stdin)
    }
}

#[cfg(feature = "io-csv")]
fn csv_records(reader: Box<dyn Read>, name: &str) -> Result<RecordSequence, DecodeError> {
    crate::io::csv::parse_csv(reader, name)
}

#[cfg(not(feature = "io-csv"))]
fn csv_records(_reader: Box<dyn Read>, _name: &str) -> Result<RecordSequence, DecodeError> {
    Err(DecodeError::FeatureDisabled("io-csv"))
}

#[cfg(feature = "io-parquet")]
fn parquet_records(
    source: &Source,
    options: &DecodeOptions,
    opener: &StreamOpener<'_>,
) -> Result<RecordSequence, DecodeError> {
    crate::io::parquet::read_parquet(source, options, opener)
}

#[cfg(not(feature = "io-parquet"))]
fn parquet_records(
    _source: &Source,
    _options: &DecodeOptions,
    _opener: &StreamOpener<'_>,
) -> Result<RecordSequence, DecodeError> {
    Err(DecodeError::FeatureDisabled("io-parquet"))
}

/// Builder for [`Decoder`].
#[derive(Default)]
pub struct DecoderBuilder {
    filesystem: Option<Arc<dyn FileSystem>>,
    stdin: Option<StdinFactory>,
    cleaner: Option<Arc<dyn Clean>>,
}

impl DecoderBuilder {
    /// Resolve every non-stdin source through `fs`.
    #[must_use]
    pub fn filesystem(mut self, fs: impl FileSystem + 'static) -> Self {
        self.filesystem = Some(Arc::new(fs));
        self
    }

    #[must_use]
    pub fn shared_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.filesystem = Some(fs);
        self
    }

    /// Replace process stdin. `factory` is called once per stdin decode.
    #[must_use]
    pub fn stdin<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Box<dyn Read> + Send + Sync + 'static,
    {
        self.stdin = Some(Arc::new(factory));
        self
    }

    #[must_use]
    pub fn cleaner(mut self, cleaner: impl Clean + 'static) -> Self {
        self.cleaner = Some(Arc::new(cleaner));
        self
    }

    #[must_use]
    pub fn build(self) -> Decoder {
        Decoder {
            filesystem: self.filesystem,
            stdin: self.stdin.unwrap_or_else(process_stdin),
            cleaner: self.cleaner.unwrap_or_else(|| Arc::new(FieldCleaner)),
        }
    }
}
