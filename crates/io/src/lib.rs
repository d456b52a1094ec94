//! # sift-io
//!
//! Read input signals from CSV or Parquet files and write decompositions as
//! IMF tables. Bridges external file formats into sift-emd's validated
//! [`Signal`](sift_emd::Signal) and out of its [`Imfs`](sift_emd::Imfs).
//!
//! | Extension | Read | Write |
//! |-----------|------|-------|
//! | `.parquet` | one `Float64` column | `imf_1 .. imf_k, residual` |
//! | anything else | one delimited-text column | `imf_1 .. imf_k, residual` |

mod csv_read;
mod csv_write;
mod error;
mod parquet_read;
mod parquet_write;
mod reader;
mod validate;
mod writer;

pub use error::IoError;
pub use reader::{Column, ReaderConfig, read_signal};
pub use writer::{Compression, Format, WriterConfig, column_names, write_imfs};
