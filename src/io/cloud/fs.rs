//! [`FileSystem`] adapter over [`ObjectIO`].

use crate::io::cloud::traits::{CloudIOError, ErrorKind, ObjectIO};
use crate::io::fs::FileSystem;
use std::io::{self, Cursor, Read};

/// Resolves paths of the form `bucket/key` (an optional `scheme://` prefix,
/// such as `s3://`, is ignored) and reads whole objects through `storage`.
/// A directory is a key prefix ending at `/`.
pub struct ObjectStoreFs<O> {
    storage: O,
}

impl<O: ObjectIO> ObjectStoreFs<O> {
    pub fn new(storage: O) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &O {
        &self.storage
    }
}

/// Split `[scheme://]bucket/key` into its bucket and key.
///
/// # Errors
///
/// Returns an `InvalidInput` error if the path has no bucket or no key.
pub fn split_object_path(path: &str) -> Result<(&str, &str), CloudIOError> {
    let rest = path.split_once("://").map_or(path, |(_, rest)| rest);
    match rest.split_once('/') {
        Some((bucket, key)) if !bucket.is_empty() && !key.is_empty() => Ok((bucket, key)),
        _ => Err(CloudIOError::new(
            ErrorKind::InvalidInput,
            format!("expected bucket/key, got {path:?}"),
        )),
    }
}

impl<O: ObjectIO> FileSystem for ObjectStoreFs<O> {
    fn open(&self, path: &str) -> io::Result<Box<dyn Read + Send>> {
        let (bucket, key) = split_object_path(path)?;
        let data = self.storage.get_object(bucket, key)?;
        Ok(Box::new(Cursor::new(data)))
    }

    fn list(&self, dir: &str) -> io::Result<Option<Vec<String>>> {
        let rest = dir.split_once("://").map_or(dir, |(_, rest)| rest);
        let (bucket, key) = rest.split_once('/').unwrap_or((rest, ""));
        if bucket.is_empty() {
            return Err(CloudIOError::new(
                ErrorKind::InvalidInput,
                format!("expected bucket[/prefix], got {dir:?}"),
            )
            .into());
        }
        let key = key.trim_end_matches('/');
        let prefix = (!key.is_empty()).then(|| format!("{key}/"));
        let objects = self.storage.list_objects(bucket, prefix.as_deref())?;
        Ok(Some(
            objects
                .into_iter()
                .map(|object| format!("{bucket}/{}", object.key))
                .collect(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::cloud::FakeObjectIO;

    #[test]
    fn listing_stops_at_the_prefix_boundary() {
        let storage = FakeObjectIO::new();
        for key in ["dir/a", "dir/sub/b", "dirty/c", "top"] {
            storage.put_object("bk", key, b"").unwrap();
        }
        let fs = ObjectStoreFs::new(storage);

        assert_eq!(
            fs.list("bk/dir/").unwrap().unwrap(),
            ["bk/dir/a", "bk/dir/sub/b"]
        );
        assert_eq!(fs.list("s3://bk").unwrap().unwrap().len(), 4);
        assert!(fs.list("bk/top").unwrap().unwrap().is_empty());
        assert!(fs.list("/x").is_err());
    }
}
