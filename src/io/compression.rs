//! Transport compression around csv/json/jsonl byte streams.
//!
//! Compression is chosen explicitly by [`Compression`] in the decode options;
//! nothing is sniffed from file names. Each supported scheme is a
//! [`CompressionCodec`] that wraps a reader with a decompressor.
//!
//! ## Built-in Codecs
//!
//! - **Gzip** via `flate2` (feature: `compression-gzip`). Multi-member
//!   streams, as produced by concatenating gzip files, decode as one stream.
//!
//! A completely empty input decodes to an empty stream rather than a
//! truncated-header error, so an empty `.gz` upload yields no records. Input
//! that does not begin with the codec's magic bytes is rejected before any
//! decompression starts.

use crate::error::DecodeError;
use crate::options::Compression;
use std::io::{self, Read};

/// Pluggable decompression.
pub trait CompressionCodec: Send + Sync {
    /// Human-readable codec name (e.g., "gzip").
    fn name(&self) -> &str;

    /// Magic byte signature at the start of a compressed stream.
    fn magic_bytes(&self) -> &[u8];

    /// Wrap a reader with decompression.
    ///
    /// Takes ownership of the input reader and returns a boxed trait object
    /// that transparently decompresses the stream.
    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>>;
}

/// The codec for `compression`, or `None` for uncompressed input.
///
/// # Errors
/// [`DecodeError::FeatureDisabled`] if the codec was compiled out.
pub fn codec_for(
    compression: Compression,
) -> Result<Option<&'static dyn CompressionCodec>, DecodeError> {
    match compression {
        Compression::None => Ok(None),
        #[cfg(feature = "compression-gzip")]
        Compression::Gzip => Ok(Some(&GzipCodec as &dyn CompressionCodec)),
        #[cfg(not(feature = "compression-gzip"))]
        Compression::Gzip => Err(DecodeError::FeatureDisabled("compression-gzip")),
    }
}

/// Wrap `reader` according to `compression`.
///
/// # Errors
/// [`DecodeError::FeatureDisabled`] for a compiled-out codec, or
/// [`DecodeError::SourceUnavailable`] if the codec cannot start reading.
pub fn decompress(
    reader: Box<dyn Read>,
    compression: Compression,
    source_name: &str,
) -> Result<Box<dyn Read>, DecodeError> {
    match codec_for(compression)? {
        None => Ok(reader),
        Some(codec) => codec.wrap_reader_dyn(reader).map_err(|e| {
            DecodeError::unavailable(format!("{source_name} ({})", codec.name()), e)
        }),
    }
}

#[cfg(feature = "compression-gzip")]
struct GzipCodec;

#[cfg(feature = "compression-gzip")]
impl CompressionCodec for GzipCodec {
    fn name(&self) -> &str {
        "gzip"
    }

    fn magic_bytes(&self) -> &[u8] {
        &[0x1f, 0x8b]
    }

    fn wrap_reader_dyn(&self, reader: Box<dyn Read>) -> io::Result<Box<dyn Read>> {
        use flate2::bufread::MultiGzDecoder;
        use std::io::{BufRead, BufReader};

        let mut buffered = BufReader::new(reader);
        // Peek without consuming; zero bytes means zero records, not a bad header.
        let head = buffered.fill_buf()?;
        if head.is_empty() {
            return Ok(Box::new(io::empty()));
        }
        let magic = self.magic_bytes();
        let n = head.len().min(magic.len());
        if head[..n] != magic[..n] {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                "input is not a gzip stream",
            ));
        }
        Ok(Box::new(MultiGzDecoder::new(buffered)))
    }
}

#[cfg(all(test, feature = "compression-gzip"))]
mod tests {
    use super::*;
    use std::io::{Cursor, Write};

    fn gz(data: &[u8]) -> Vec<u8> {
        let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
        enc.write_all(data).unwrap();
        enc.finish().unwrap()
    }

    fn read_all(compressed: Vec<u8>) -> io::Result<Vec<u8>> {
        let mut out = Vec::new();
        decompress(Box::new(Cursor::new(compressed)), Compression::Gzip, "test")
            .unwrap()
            .read_to_end(&mut out)?;
        Ok(out)
    }

    #[test]
    fn gzip_codec_has_magic() {
        let codec = codec_for(Compression::Gzip).unwrap().unwrap();
        assert_eq!(codec.name(), "gzip");
        assert!(gz(b"x").starts_with(codec.magic_bytes()));
    }

    #[test]
    fn multi_member_gzip_reads_as_one_stream() {
        let mut data = gz(b"a,b\n");
        data.extend(gz(b"1,2\n"));
        assert_eq!(read_all(data).unwrap(), b"a,b\n1,2\n");
    }

    #[test]
    fn zero_bytes_is_an_empty_stream() {
        assert!(read_all(Vec::new()).unwrap().is_empty());
    }

    #[test]
    fn non_gzip_input_is_rejected_up_front() {
        let err = decompress(
            Box::new(Cursor::new(b"definitely not gzip".to_vec())),
            Compression::Gzip,
            "test",
        )
        .err()
        .unwrap();
        match err {
            DecodeError::SourceUnavailable { source_name, source } => {
                assert_eq!(source_name, "test (gzip)");
                assert_eq!(source.kind(), io::ErrorKind::InvalidData);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn none_is_passthrough() {
        let mut out = String::new();
        decompress(Box::new(Cursor::new(b"plain".to_vec())), Compression::None, "t")
            .unwrap()
            .read_to_string(&mut out)
            .unwrap();
        assert_eq!(out, "plain");
    }
}
