//! High-level IMF table writer configuration and orchestration.

use std::path::Path;

use parquet::file::properties::WriterProperties;
use sift_emd::Imfs;
use tracing::info;

use crate::csv_write;
use crate::error::IoError;
use crate::parquet_write;
use crate::reader::is_parquet;
use crate::validate::validate_table_shape;

/// Output file format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    /// Comma-separated text with a header line.
    #[default]
    Csv,
    /// Apache Parquet, one `Float64` column per row of the decomposition.
    Parquet,
}

impl Format {
    /// Picks the format from the file extension (`.parquet` or CSV).
    pub fn from_path(path: &Path) -> Self {
        if is_parquet(path) {
            Self::Parquet
        } else {
            Self::Csv
        }
    }
}

/// Compression algorithm for Parquet output.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Compression {
    /// No compression.
    None,
    /// Snappy compression (fast, moderate ratio).
    #[default]
    Snappy,
    /// Zstd compression (slower, better ratio).
    Zstd,
}

impl Compression {
    fn to_parquet(self) -> Result<parquet::basic::Compression, IoError> {
        Ok(match self {
            Self::None => parquet::basic::Compression::UNCOMPRESSED,
            Self::Snappy => parquet::basic::Compression::SNAPPY,
            Self::Zstd => {
                let level = parquet::basic::ZstdLevel::try_new(3)?;
                parquet::basic::Compression::ZSTD(level)
            }
        })
    }
}

/// Configuration for writing IMF tables.
///
/// `compression` and `row_group_size` apply to Parquet output only.
#[derive(Debug, Clone, PartialEq)]
pub struct WriterConfig {
    /// Output format.
    format: Format,
    /// Parquet compression algorithm.
    compression: Compression,
    /// Maximum number of samples per Parquet row group.
    row_group_size: usize,
}

impl Default for WriterConfig {
    fn default() -> Self {
        Self {
            format: Format::default(),
            compression: Compression::default(),
            row_group_size: 1_000_000,
        }
    }
}

impl WriterConfig {
    /// Sets the output format.
    pub fn with_format(mut self, format: Format) -> Self {
        self.format = format;
        self
    }

    /// Sets the compression algorithm.
    pub fn with_compression(mut self, comp: Compression) -> Self {
        self.compression = comp;
        self
    }

    /// Sets the maximum number of samples per row group.
    pub fn with_row_group_size(mut self, size: usize) -> Self {
        self.row_group_size = size;
        self
    }

    /// Returns the output format.
    pub fn format(&self) -> Format {
        self.format
    }

    /// Returns the Parquet compression algorithm.
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Returns the maximum number of samples per row group.
    pub fn row_group_size(&self) -> usize {
        self.row_group_size
    }

    /// Validates this configuration.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if `row_group_size` is zero.
    pub fn validate(&self) -> Result<(), IoError> {
        if self.row_group_size == 0 {
            return Err(IoError::Validation {
                count: 1,
                details: "row_group_size must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns the column names for a table of `n_rows` decomposition rows:
/// `imf_1` to `imf_{n_rows-1}` followed by `residual`.
///
/// # Example
///
/// ```
/// assert_eq!(sift_io::column_names(3), vec!["imf_1", "imf_2", "residual"]);
/// ```
pub fn column_names(n_rows: usize) -> Vec<String> {
    (1..n_rows)
        .map(|i| format!("imf_{i}"))
        .chain((n_rows > 0).then(|| "residual".to_string()))
        .collect()
}

/// Write a decomposition to a file, one column per IMF plus the residual
/// and one line per sample.
///
/// # Errors
///
/// Returns [`IoError::Validation`] if the configuration is invalid or the
/// table is empty, [`IoError::Csv`] or [`IoError::Parquet`] if writing fails.
pub fn write_imfs(path: &Path, imfs: &Imfs, config: &WriterConfig) -> Result<(), IoError> {
    config.validate()?;
    validate_table_shape(imfs.n_rows()).finish()?;
    let names = column_names(imfs.n_rows());

    match config.format {
        Format::Csv => csv_write::write_table(path, &names, imfs)?,
        Format::Parquet => {
            let props = WriterProperties::builder()
                .set_compression(config.compression.to_parquet()?)
                .set_max_row_group_size(config.row_group_size)
                .build();
            let schema = parquet_write::build_schema(&names);
            let batch = parquet_write::imfs_to_record_batch(imfs, &schema)?;
            parquet_write::write_batches(path, &[batch], &schema, props)?;
        }
    }

    info!(
        path = %path.display(),
        format = ?config.format,
        columns = names.len(),
        samples = imfs.len(),
        "IMF table written"
    );
    Ok(())
}
