//! Fixtures for tests of code that decodes records.
//!
//! These helpers write encoded bytes to temporary files, stand in for
//! standard input, and seed an in-memory remote store, so one payload can be
//! decoded through each source kind.
//!
//! ```
//! use recordcodec::testing::{fake_remote, stdin_bytes};
//! use recordcodec::{DecodeOptions, Decoder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let payload = b"[{\"x\":1}]";
//! let from_stdin = Decoder::builder().stdin(stdin_bytes(payload.to_vec())).build();
//! let from_remote = Decoder::builder()
//!     .filesystem(fake_remote([("bucket", "rows.json", &payload[..])])?)
//!     .build();
//!
//! let options = DecodeOptions::new("json");
//! assert_eq!(
//!     from_stdin.decode("-", &options)?,
//!     from_remote.decode("bucket/rows.json", &options)?
//! );
//! # Ok(())
//! # }
//! ```

use crate::io::cloud::{CloudResult, FakeObjectIO, ObjectIO, ObjectStoreFs};
use crate::options::Compression;
use std::fs;
use std::io::{self, Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A stdin factory that yields `data` on every call.
pub fn stdin_bytes(data: impl Into<Vec<u8>>) -> impl Fn() -> Box<dyn Read> + Send + Sync + 'static {
    let data: Vec<u8> = data.into();
    let data: Arc<[u8]> = Arc::from(data);
    move || Box::new(Cursor::new(Arc::clone(&data))) as Box<dyn Read>
}

/// Gzip `data` as a single member.
///
/// # Errors
/// Returns an error if the encoder fails to write.
#[cfg(feature = "compression-gzip")]
pub fn gzip_bytes(data: &[u8]) -> io::Result<Vec<u8>> {
    use std::io::Write;
    let mut enc = flate2::write::GzEncoder::new(Vec::new(), flate2::Compression::default());
    enc.write_all(data)?;
    enc.finish()
}

/// Encode `data` for the given transport compression.
///
/// # Errors
/// Returns an error if compression fails, or if gzip is requested but the
/// `compression-gzip` feature is off.
pub fn compress(data: &[u8], compression: Compression) -> io::Result<Vec<u8>> {
    match compression {
        Compression::None => Ok(data.to_vec()),
        #[cfg(feature = "compression-gzip")]
        Compression::Gzip => gzip_bytes(data),
        #[cfg(not(feature = "compression-gzip"))]
        Compression::Gzip => Err(io::Error::new(
            io::ErrorKind::Unsupported,
            "compression-gzip feature is disabled",
        )),
    }
}

/// Write `data` to `dir/name`, creating parent directories.
///
/// # Errors
/// Returns an error if a directory or the file cannot be written.
pub fn write_fixture(dir: &Path, name: &str, data: &[u8]) -> io::Result<PathBuf> {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&path, data)?;
    Ok(path)
}

/// A remote filesystem over a [`FakeObjectIO`] holding `(bucket, key, bytes)` objects.
///
/// # Errors
/// Returns an error if an object cannot be stored.
pub fn fake_remote<'a, I>(objects: I) -> CloudResult<ObjectStoreFs<FakeObjectIO>>
where
    I: IntoIterator<Item = (&'a str, &'a str, &'a [u8])>,
{
    let storage = FakeObjectIO::new();
    for (bucket, key, data) in objects {
        storage.put_object(bucket, key, data)?;
    }
    Ok(ObjectStoreFs::new(storage))
}

/// Encode typed rows as one Parquet file in memory.
///
/// The Arrow schema is inferred from `T` with `serde_arrow`, so an empty
/// slice still yields a valid, zero-row file.
///
/// # Errors
/// Returns an error if schema inference, conversion or writing fails.
#[cfg(feature = "io-parquet")]
pub fn parquet_bytes<T>(rows: &[T]) -> anyhow::Result<Vec<u8>>
where
    T: serde::Serialize + serde::Deserialize<'static>,
{
    use anyhow::Context;
    use arrow::datatypes::FieldRef;
    use parquet::arrow::arrow_writer::ArrowWriter;
    use serde_arrow::schema::{SchemaLike, TracingOptions};

    let fields = Vec::<FieldRef>::from_type::<T>(TracingOptions::default())
        .context("infer Arrow schema from row type")?;
    let batch = serde_arrow::to_record_batch(&fields, &rows).context("convert rows to RecordBatch")?;

    let mut writer =
        ArrowWriter::try_new(Vec::new(), batch.schema(), None).context("create ArrowWriter")?;
    writer.write(&batch).context("write batch to parquet")?;
    writer.into_inner().context("close ArrowWriter")
}

/// Write typed rows to a Parquet file at `path`.
///
/// # Returns
/// Number of rows written.
///
/// # Errors
/// As [`parquet_bytes`], plus failure to write the file.
#[cfg(feature = "io-parquet")]
pub fn write_parquet_fixture<T>(path: impl AsRef<Path>, rows: &[T]) -> anyhow::Result<usize>
where
    T: serde::Serialize + serde::Deserialize<'static>,
{
    use anyhow::Context;
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("mkdir -p {}", parent.display()))?;
    }
    let bytes = parquet_bytes(rows)?;
    fs::write(path, bytes).with_context(|| format!("write {}", path.display()))?;
    Ok(rows.len())
}
