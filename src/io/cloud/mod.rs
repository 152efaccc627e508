//! Object storage as a decoder filesystem.
//!
//! [`ObjectIO`] is a small, provider-agnostic, synchronous object-storage
//! trait. [`ObjectStoreFs`] adapts any implementation into a
//! [`FileSystem`](crate::io::fs::FileSystem), resolving `bucket/key` paths, so
//! a decoder can read CSV, JSON, JSON Lines or Parquet objects exactly as it
//! reads local files. [`FakeObjectIO`] keeps objects in memory for tests.
//!
//! ```
//! use recordcodec::io::cloud::{FakeObjectIO, ObjectIO, ObjectStoreFs};
//! use recordcodec::{DecodeOptions, Decoder};
//!
//! # fn main() -> anyhow::Result<()> {
//! let storage = FakeObjectIO::new();
//! storage.put_object("landing", "rows.jsonl", b"{\"x\":1}\n{\"x\":2}\n")?;
//!
//! let decoder = Decoder::builder()
//!     .filesystem(ObjectStoreFs::new(storage))
//!     .build();
//! let records = decoder.decode("landing/rows.jsonl", &DecodeOptions::new("jsonl"))?;
//! assert_eq!(records.len(), 2);
//! # Ok(())
//! # }
//! ```
//!
//! ## Implementing for real providers
//!
//! Implementations wrap their SDK and expose a blocking interface; async SDKs
//! block on their own runtime internally.
//!
//! ```ignore
//! struct S3ObjectIO {
//!     client: aws_sdk_s3::Client,
//!     rt: tokio::runtime::Runtime,
//! }
//!
//! impl ObjectIO for S3ObjectIO {
//!     fn get_object(&self, bucket: &str, key: &str) -> CloudResult<Vec<u8>> {
//!         self.rt.block_on(async { /* ... */ })
//!     }
//!     // ...
//! }
//! ```

pub mod fake;
pub mod fs;
pub mod traits;

pub use fake::*;
pub use fs::*;
pub use traits::*;
