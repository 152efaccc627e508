//! In-memory [`ObjectIO`] for tests.

use crate::io::cloud::traits::{CloudIOError, CloudResult, ErrorKind, ObjectIO, ObjectMetadata};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};

type BucketStorage = Arc<Mutex<HashMap<String, HashMap<String, Vec<u8>>>>>;

/// Object storage held in a shared map. Clones share the same objects.
#[derive(Clone, Default)]
pub struct FakeObjectIO {
    storage: BucketStorage,
    reads: Arc<Mutex<usize>>,
}

impl FakeObjectIO {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of successful [`ObjectIO::get_object`] calls so far.
    ///
    /// # Panics
    ///
    /// Panics if the counter mutex is poisoned.
    #[must_use]
    pub fn reads(&self) -> usize {
        *self.reads.lock().expect("reads mutex poisoned")
    }
}

impl ObjectIO for FakeObjectIO {
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()> {
        self.storage
            .lock()
            .expect("storage mutex poisoned")
            .entry(bucket.to_string())
            .or_default()
            .insert(key.to_string(), data.to_vec());
        Ok(())
    }

    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
        let data = {
            let storage = self.storage.lock().expect("storage mutex poisoned");
            storage.get(bucket).and_then(|b| b.get(key)).cloned()
        };
        let data = data.ok_or_else(|| {
            CloudIOError::new(
                ErrorKind::NotFound,
                format!("Object {bucket}/{key} not found"),
            )
        })?;
        *self.reads.lock().expect("reads mutex poisoned") += 1;
        Ok(data)
    }

    fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> CloudResult<Vec<ObjectMetadata>> {
        let storage = self.storage.lock().expect("storage mutex poisoned");
        let objects = storage.get(bucket).ok_or_else(|| {
            CloudIOError::new(ErrorKind::NotFound, format!("Bucket {bucket} not found"))
        })?;

        let mut listed: Vec<ObjectMetadata> = objects
            .iter()
            .filter(|(key, _)| prefix.is_none_or(|p| key.starts_with(p)))
            .map(|(key, data)| ObjectMetadata {
                key: key.clone(),
                size: data.len() as u64,
            })
            .collect();

        drop(storage);
        listed.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(listed)
    }
}
