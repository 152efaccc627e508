//! Byte sources, transport decompression, and the per-format parsers.

pub mod cloud;
pub mod compression;
pub mod fs;
pub mod json;
pub mod jsonl;
pub mod stream;

#[cfg_attr(docsrs, doc(cfg(feature = "io-csv")))]
#[cfg(feature = "io-csv")]
pub mod csv;

#[cfg_attr(docsrs, doc(cfg(feature = "arrow")))]
#[cfg(feature = "arrow")]
pub mod batch;

#[cfg_attr(docsrs, doc(cfg(feature = "io-parquet")))]
#[cfg(feature = "io-parquet")]
pub mod parquet;
