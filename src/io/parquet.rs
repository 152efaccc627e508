//! Parquet dataset reading into records.
//!
//! The reader resolves the source itself:
//! - a local file is read directly;
//! - a local directory is read as a dataset: every `*.parquet` file beneath it,
//!   in sorted path order;
//! - a remote directory, one the filesystem lists files under, is read the
//!   same way, each `*.parquet` object buffered in turn;
//! - any other remote path, or stdin, is buffered into memory and read from
//!   there.
//!
//! Batches of `buffer_size` rows are read, projected and cast to `schema` when
//! one is given, flattened into records, and kept only if they satisfy
//! `filters`. The file's own schema is not validated against `schema`; a
//! missing column or impossible cast fails the read instead. Transport
//! `compression` does not apply, since Parquet compresses column chunks
//! internally.

use crate::error::DecodeError;
use crate::filter::Filters;
use crate::io::batch::batch_to_records;
use crate::io::fs::files_under;
use crate::io::stream::StreamOpener;
use crate::options::{DecodeOptions, Format};
use crate::record::RecordSequence;
use crate::source::Source;
use arrow::array::ArrayRef;
use arrow::datatypes::SchemaRef;
use arrow::error::ArrowError;
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use bytes::Bytes;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use parquet::file::reader::ChunkReader;
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Read a Parquet source into records.
///
/// # Errors
/// [`DecodeError::SourceUnavailable`] if a file or object cannot be opened, and
/// [`DecodeError::MalformedInput`] if it is not valid Parquet, a `schema`
/// column is missing or cannot be cast, or a filter names an absent column.
pub fn read_parquet(
    source: &Source,
    options: &DecodeOptions,
    opener: &StreamOpener<'_>,
) -> Result<RecordSequence, DecodeError> {
    let read = ReadSettings {
        batch_size: options.buffer_size(),
        schema: options.schema.as_ref(),
        filters: options.filters.as_ref(),
    };

    match source {
        Source::Local(path) if path.is_dir() => {
            let files = dataset_files(path)?;
            debug!(dir = %path.display(), files = files.len(), "reading parquet dataset");
            let mut out = RecordSequence::new();
            for file in files {
                out.extend(read_local(&file, &read)?);
            }
            Ok(out)
        }
        Source::Local(path) => read_local(path, &read),
        Source::Remote(dir) => {
            let files = dataset_objects(opener.list(source)?);
            if files.is_empty() {
                return read_buffered(source, opener, &read);
            }
            debug!(dir = %dir, files = files.len(), "reading remote parquet dataset");
            let mut out = RecordSequence::new();
            for file in files {
                out.extend(read_buffered(&Source::Remote(file), opener, &read)?);
            }
            Ok(out)
        }
        Source::Stdin => read_buffered(source, opener, &read),
    }
}

fn read_buffered(
    source: &Source,
    opener: &StreamOpener<'_>,
    read: &ReadSettings<'_>,
) -> Result<RecordSequence, DecodeError> {
    let data = Bytes::from(opener.read_all(source)?);
    debug!(source = %source, bytes = data.len(), "reading buffered parquet");
    read_chunks(data, read)
}

struct ReadSettings<'a> {
    batch_size: usize,
    schema: Option<&'a SchemaRef>,
    filters: Option<&'a Filters>,
}

fn read_local(path: &Path, read: &ReadSettings<'_>) -> Result<RecordSequence, DecodeError> {
    let f =
        File::open(path).map_err(|e| DecodeError::unavailable(path.display().to_string(), e))?;
    read_chunks(f, read)
}

fn read_chunks<R: ChunkReader + 'static>(
    input: R,
    read: &ReadSettings<'_>,
) -> Result<RecordSequence, DecodeError> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(input)
        .map_err(|e| DecodeError::malformed(Format::Parquet, e))?;
    let reader = builder
        .with_batch_size(read.batch_size)
        .build()
        .map_err(|e| DecodeError::malformed(Format::Parquet, e))?;

    let mut out = RecordSequence::new();
    for batch in reader {
        let batch = batch.map_err(|e| DecodeError::malformed(Format::Parquet, e))?;
        let batch = match read.schema {
            Some(schema) => project(&batch, schema)
                .map_err(|e| DecodeError::malformed(Format::Parquet, e))?,
            None => batch,
        };
        let rows =
            batch_to_records(&batch).map_err(|e| DecodeError::malformed(Format::Parquet, e))?;
        match read.filters {
            Some(filters) => {
                for row in rows {
                    if filters
                        .matches(&row)
                        .map_err(|e| DecodeError::malformed(Format::Parquet, e))?
                    {
                        out.push(row);
                    }
                }
            }
            None => out.extend(rows),
        }
    }
    Ok(out)
}

/// Select `schema`'s fields from `batch`, in `schema` order, casting columns
/// whose type differs.
fn project(batch: &RecordBatch, schema: &SchemaRef) -> Result<RecordBatch, ArrowError> {
    let columns = schema
        .fields()
        .iter()
        .map(|field| {
            let column = batch.column_by_name(field.name()).ok_or_else(|| {
                ArrowError::SchemaError(format!("column {:?} not found", field.name()))
            })?;
            if column.data_type() == field.data_type() {
                Ok(column.clone())
            } else {
                arrow::compute::cast(column, field.data_type())
            }
        })
        .collect::<Result<Vec<ArrayRef>, ArrowError>>()?;
    let opts = RecordBatchOptions::new().with_row_count(Some(batch.num_rows()));
    RecordBatch::try_new_with_options(schema.clone(), columns, &opts)
}

/// Every `*.parquet` file under `dir`, sorted.
fn dataset_files(dir: &Path) -> Result<Vec<PathBuf>, DecodeError> {
    let files = files_under(dir)
        .map_err(|e| DecodeError::unavailable(dir.display().to_string(), e))?;
    Ok(files.into_iter().filter(|f| is_parquet(f)).collect())
}

/// The `*.parquet` entries of a remote listing, sorted.
fn dataset_objects(listing: Vec<String>) -> Vec<String> {
    let mut files: Vec<String> = listing
        .into_iter()
        .filter(|f| is_parquet(Path::new(f)))
        .collect();
    files.sort();
    files
}

fn is_parquet(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "parquet")
}
