//! The filesystem capability a decoder may be given.
//!
//! When a decoder holds a [`FileSystem`], every non-stdin source path is
//! resolved through it instead of the local filesystem. Text formats only
//! call [`FileSystem::open`]; Parquet also asks [`FileSystem::list`] whether
//! the path is a dataset directory.

use std::fs::File;
use std::io::{self, Read};
use std::path::PathBuf;

/// Opens a path for reading, returning a byte stream.
pub trait FileSystem: Send + Sync {
    /// # Errors
    /// Any I/O error; it surfaces as [`DecodeError::SourceUnavailable`](crate::DecodeError::SourceUnavailable).
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>>;

    /// Every file beneath the directory `dir`, as paths [`open`](Self::open)
    /// accepts. Empty when `dir` is not a directory; `None` when this
    /// filesystem cannot list at all.
    ///
    /// # Errors
    /// Any I/O error from the listing.
    fn list(&self, dir: &str) -> io::Result<Option<Vec<String>>> {
        let _ = dir;
        Ok(None)
    }
}

/// A [`FileSystem`] over local files, optionally rooted at a directory.
#[derive(Debug, Clone, Default)]
pub struct LocalFs {
    root: Option<PathBuf>,
}

impl LocalFs {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative paths against `root`.
    #[must_use]
    pub fn rooted(root: impl Into<PathBuf>) -> Self {
        Self {
            root: Some(root.into()),
        }
    }

    fn resolve(&self, path: &str) -> PathBuf {
        match &self.root {
            Some(root) => root.join(path),
            None => PathBuf::from(path),
        }
    }
}

impl FileSystem for LocalFs {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        Ok(Box::new(File::open(self.resolve(path))?))
    }

    #[cfg(feature = "io-parquet")]
    fn list(&self, dir: &str) -> io::Result<Option<Vec<String>>> {
        let full = self.resolve(dir);
        if !full.is_dir() {
            return Ok(Some(Vec::new()));
        }
        let files = files_under(&full)?;
        Ok(Some(
            files
                .into_iter()
                .map(|path| path.to_string_lossy().into_owned())
                .collect(),
        ))
    }
}

/// Every regular file beneath `dir`, recursively, in sorted path order.
///
/// # Errors
/// Returns an error if the directory cannot be walked.
#[cfg(feature = "io-parquet")]
pub fn files_under(dir: &std::path::Path) -> io::Result<Vec<PathBuf>> {
    let pattern = format!("{}/**/*", glob::Pattern::escape(&dir.to_string_lossy()));
    let entries =
        glob::glob(&pattern).map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry.map_err(io::Error::from)?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}
