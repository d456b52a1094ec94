//! High-level signal reader configuration and orchestration.

use std::fmt;
use std::path::Path;

use sift_emd::Signal;
use tracing::{debug, info};

use crate::csv_read;
use crate::error::IoError;
use crate::parquet_read;
use crate::validate::validate_finite;

/// Selects the column holding the signal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Column {
    /// Zero-based column position.
    Index(usize),
    /// Column name (CSV header or Parquet field name).
    Name(String),
}

impl Default for Column {
    fn default() -> Self {
        Self::Index(0)
    }
}

impl From<&str> for Column {
    /// Parses a column selector: a non-negative integer is an index,
    /// anything else a name.
    fn from(s: &str) -> Self {
        match s.parse::<usize>() {
            Ok(i) => Self::Index(i),
            Err(_) => Self::Name(s.to_string()),
        }
    }
}

impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "{i}"),
            Self::Name(name) => f.write_str(name),
        }
    }
}

/// Configuration for reading a signal from a CSV or Parquet file.
///
/// `has_header` and `delimiter` apply to CSV input only.
#[derive(Debug, Clone, PartialEq)]
pub struct ReaderConfig {
    /// Column holding the signal.
    column: Column,
    /// Whether the first CSV line is a header.
    has_header: bool,
    /// CSV field delimiter.
    delimiter: u8,
}

impl Default for ReaderConfig {
    fn default() -> Self {
        Self {
            column: Column::default(),
            has_header: true,
            delimiter: b',',
        }
    }
}

impl ReaderConfig {
    /// Set the column holding the signal.
    pub fn with_column(mut self, column: Column) -> Self {
        self.column = column;
        self
    }

    /// Set whether the first CSV line is a header.
    pub fn with_has_header(mut self, has_header: bool) -> Self {
        self.has_header = has_header;
        self
    }

    /// Set the CSV field delimiter.
    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Returns the selected column.
    pub fn column(&self) -> &Column {
        &self.column
    }

    /// Returns whether the first CSV line is a header.
    pub fn has_header(&self) -> bool {
        self.has_header
    }

    /// Returns the CSV field delimiter.
    pub fn delimiter(&self) -> u8 {
        self.delimiter
    }

    /// Validate that the configuration is internally consistent.
    ///
    /// # Errors
    ///
    /// Returns [`IoError::Validation`] if the delimiter is a quote, a line
    /// break, or non-ASCII, or if the column name is empty.
    pub fn validate(&self) -> Result<(), IoError> {
        if !self.delimiter.is_ascii() || matches!(self.delimiter, b'"' | b'\n' | b'\r') {
            return Err(IoError::Validation {
                count: 1,
                details: format!("invalid delimiter byte {:#04x}", self.delimiter),
            });
        }
        if let Column::Name(name) = &self.column
            && name.is_empty()
        {
            return Err(IoError::Validation {
                count: 1,
                details: "column name must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

/// Returns `true` if `path` has a `.parquet` extension (case-insensitive).
pub(crate) fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("parquet"))
}

/// Read a signal from a CSV or Parquet file.
///
/// Files ending in `.parquet` are read as Parquet, where the selected column
/// must be `Float64`. Anything else is read as delimited text.
///
/// # Errors
///
/// | Variant | Trigger |
/// |---------|---------|
/// | [`IoError::FileNotFound`] | path does not exist |
/// | [`IoError::MissingColumn`] | selected column absent |
/// | [`IoError::Parse`] | a cell is empty or not a number |
/// | [`IoError::Validation`] | invalid config, or NaN / infinite values |
/// | [`IoError::Csv`] / [`IoError::Parquet`] | underlying format errors |
pub fn read_signal(path: &Path, config: &ReaderConfig) -> Result<Signal, IoError> {
    config.validate()?;
    if !path.exists() {
        return Err(IoError::FileNotFound {
            path: path.to_path_buf(),
        });
    }

    let values = if is_parquet(path) {
        debug!(path = %path.display(), column = %config.column, "reading parquet column");
        parquet_read::read_column(path, &config.column)?
    } else {
        debug!(path = %path.display(), column = %config.column, "reading csv column");
        csv_read::read_column(path, config)?
    };

    validate_finite(&values).finish()?;
    let signal = Signal::new(values)?;
    info!(path = %path.display(), len = signal.len(), "signal read");
    Ok(signal)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_values() {
        let config = ReaderConfig::default();
        assert_eq!(config.column(), &Column::Index(0));
        assert!(config.has_header());
        assert_eq!(config.delimiter(), b',');
        assert!(config.validate().is_ok());
    }

    #[test]
    fn builder_methods() {
        let config = ReaderConfig::default()
            .with_column(Column::Name("flow".into()))
            .with_has_header(false)
            .with_delimiter(b';');
        assert_eq!(config.column(), &Column::Name("flow".into()));
        assert!(!config.has_header());
        assert_eq!(config.delimiter(), b';');
    }

    #[test]
    fn validate_rejects_bad_delimiter() {
        for d in [b'"', b'\n', 0xe9] {
            let err = ReaderConfig::default().with_delimiter(d).validate().unwrap_err();
            assert!(matches!(err, IoError::Validation { count: 1, .. }));
        }
    }

    #[test]
    fn validate_rejects_empty_name() {
        let err = ReaderConfig::default()
            .with_column(Column::Name(String::new()))
            .validate()
            .unwrap_err();
        match err {
            IoError::Validation { details, .. } => assert!(details.contains("column name")),
            other => panic!("expected Validation, got {other:?}"),
        }
    }

    #[test]
    fn column_from_str() {
        assert_eq!(Column::from("3"), Column::Index(3));
        assert_eq!(Column::from("flow"), Column::Name("flow".into()));
        assert_eq!(Column::from("-1"), Column::Name("-1".into()));
        assert_eq!(Column::Index(2).to_string(), "2");
        assert_eq!(Column::Name("x".into()).to_string(), "x");
    }

    #[test]
    fn parquet_extension_detection() {
        assert!(is_parquet(Path::new("out/signal.parquet")));
        assert!(is_parquet(Path::new("SIGNAL.PARQUET")));
        assert!(!is_parquet(Path::new("signal.csv")));
        assert!(!is_parquet(Path::new("signal")));
    }

    #[test]
    fn missing_file() {
        let err = read_signal(Path::new("/nonexistent/signal.csv"), &ReaderConfig::default())
            .unwrap_err();
        assert!(matches!(err, IoError::FileNotFound { .. }));
    }
}
