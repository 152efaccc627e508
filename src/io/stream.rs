//! Opening a readable byte stream for a source.
//!
//! This is the single place that knows how to turn a [`Source`] and a
//! [`Compression`] into bytes. Format parsers take whatever it returns, so each
//! parser is written once for all source kinds and compressions.

use crate::error::DecodeError;
use crate::io::compression::decompress;
use crate::io::fs::FileSystem;
use crate::options::Compression;
use crate::source::Source;
use std::fs::File;
use std::io::{self, Read};
use std::sync::Arc;

/// Produces a fresh standard-input reader for each decode call.
pub type StdinFactory = Arc<dyn Fn() -> Box<dyn Read> + Send + Sync>;

/// The process's real standard input.
pub fn process_stdin() -> StdinFactory {
    Arc::new(|| Box::new(io::stdin().lock()) as Box<dyn Read>)
}

/// Opens sources for one decoder. Borrowed from the decoder per call.
#[derive(Clone, Copy)]
pub struct StreamOpener<'a> {
    filesystem: Option<&'a dyn FileSystem>,
    stdin: &'a StdinFactory,
}

impl<'a> StreamOpener<'a> {
    pub fn new(filesystem: Option<&'a dyn FileSystem>, stdin: &'a StdinFactory) -> Self {
        Self { filesystem, stdin }
    }

    /// Open `source` without decompression.
    ///
    /// # Errors
    /// [`DecodeError::SourceUnavailable`] if the file or object cannot be opened,
    /// or a remote source is given to an opener without a filesystem.
    pub fn open_raw(&self, source: &Source) -> Result<Box<dyn Read>, DecodeError> {
        match source {
            Source::Stdin => Ok((self.stdin)()),
            Source::Remote(path) => {
                let fs = self.filesystem.ok_or_else(|| {
                    DecodeError::unavailable(
                        source.to_string(),
                        io::Error::new(io::ErrorKind::Unsupported, "no filesystem configured"),
                    )
                })?;
                let reader: Box<dyn Read> = fs
                    .open(path)
                    .map_err(|e| DecodeError::unavailable(source.to_string(), e))?;
                Ok(reader)
            }
            Source::Local(path) => {
                let f = File::open(path)
                    .map_err(|e| DecodeError::unavailable(source.to_string(), e))?;
                Ok(Box::new(f))
            }
        }
    }

    /// Open `source` and wrap it with the decompressor for `compression`.
    ///
    /// # Errors
    /// As [`open_raw`](Self::open_raw), plus [`DecodeError::FeatureDisabled`]
    /// for a compiled-out codec.
    pub fn open(
        &self,
        source: &Source,
        compression: Compression,
    ) -> Result<Box<dyn Read>, DecodeError> {
        let raw = self.open_raw(source)?;
        decompress(raw, compression, &source.to_string())
    }

    /// The files beneath a remote source directory, or an empty list when the
    /// source is not a listable directory.
    ///
    /// # Errors
    /// [`DecodeError::SourceUnavailable`] if the listing fails.
    pub fn list(&self, source: &Source) -> Result<Vec<String>, DecodeError> {
        match (source, self.filesystem) {
            (Source::Remote(path), Some(fs)) => Ok(fs
                .list(path)
                .map_err(|e| DecodeError::unavailable(source.to_string(), e))?
                .unwrap_or_default()),
            _ => Ok(Vec::new()),
        }
    }

    /// Read the whole source into memory, uncompressed.
    ///
    /// # Errors
    /// As [`open_raw`](Self::open_raw), plus read failures.
    pub fn read_all(&self, source: &Source) -> Result<Vec<u8>, DecodeError> {
        let mut buf = Vec::new();
        self.open_raw(source)?
            .read_to_end(&mut buf)
            .map_err(|e| DecodeError::unavailable(source.to_string(), e))?;
        Ok(buf)
    }
}
