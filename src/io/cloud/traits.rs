//! Object storage trait and its error type.

use std::error::Error;
use std::fmt;
use std::io;

/// Error from an object storage operation.
#[derive(Debug, Clone)]
pub struct CloudIOError {
    pub message: String,
    pub kind: ErrorKind,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Authorization,
    NotFound,
    InvalidInput,
    Network,
    Timeout,
    ServiceUnavailable,
    Other,
}

impl fmt::Display for CloudIOError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {}", self.kind, self.message)
    }
}

impl Error for CloudIOError {}

impl CloudIOError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            kind,
        }
    }
}

impl From<CloudIOError> for io::Error {
    fn from(err: CloudIOError) -> Self {
        let kind = match err.kind {
            ErrorKind::NotFound => io::ErrorKind::NotFound,
            ErrorKind::Authentication | ErrorKind::Authorization => {
                io::ErrorKind::PermissionDenied
            }
            ErrorKind::InvalidInput => io::ErrorKind::InvalidInput,
            ErrorKind::Timeout => io::ErrorKind::TimedOut,
            ErrorKind::Network | ErrorKind::ServiceUnavailable => io::ErrorKind::ConnectionAborted,
            ErrorKind::Other => io::ErrorKind::Other,
        };
        io::Error::new(kind, err)
    }
}

pub type CloudResult<T> = Result<T, CloudIOError>;

/// One entry of an [`ObjectIO::list_objects`] listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectMetadata {
    pub key: String,
    pub size: u64,
}

/// Blocking access to a bucket/key object store.
///
/// The decoder fetches whole objects with [`get_object`](Self::get_object)
/// and lists a prefix with [`list_objects`](Self::list_objects) when a
/// Parquet source names a directory.
pub trait ObjectIO: Send + Sync {
    /// Store `data` under `bucket/key`, replacing any existing object.
    ///
    /// # Errors
    /// The provider's failure, such as a missing bucket or denied write.
    fn put_object(&self, bucket: &str, key: &str, data: &[u8]) -> CloudResult<()>;

    /// The full contents of `bucket/key`.
    ///
    /// # Errors
    /// [`ErrorKind::NotFound`] for a missing object, or the provider's failure.
    fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>>;

    /// Objects in `bucket` whose key starts with `prefix`, sorted by key.
    ///
    /// # Errors
    /// [`ErrorKind::NotFound`] for a missing bucket, or the provider's failure.
    fn list_objects(&self, bucket: &str, prefix: Option<&str>) -> CloudResult<Vec<ObjectMetadata>>;
}
