//! Delimited-text column extraction.

use std::path::Path;

use crate::error::IoError;
use crate::reader::{Column, ReaderConfig};

/// Reads one numeric column from a delimited text file.
///
/// Cells are trimmed before parsing. Rows are numbered from 1, header
/// excluded.
pub(crate) fn read_column(path: &Path, config: &ReaderConfig) -> Result<Vec<f64>, IoError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(config.has_header())
        .delimiter(config.delimiter())
        .trim(csv::Trim::All)
        .flexible(true)
        .from_path(path)?;

    let index = match config.column() {
        Column::Index(i) => *i,
        Column::Name(name) => {
            let missing = || IoError::MissingColumn {
                name: name.clone(),
                path: path.to_path_buf(),
            };
            if !config.has_header() {
                return Err(missing());
            }
            reader
                .headers()?
                .iter()
                .position(|h| h == name)
                .ok_or_else(missing)?
        }
    };

    let mut values = Vec::new();
    for (i, record) in reader.records().enumerate() {
        let record = record?;
        let row = i + 1;
        let cell = record.get(index).ok_or_else(|| IoError::Parse {
            row,
            reason: format!("missing column {index}"),
        })?;
        if cell.is_empty() {
            return Err(IoError::Parse {
                row,
                reason: "empty cell".to_string(),
            });
        }
        let value = cell.parse::<f64>().map_err(|_| IoError::Parse {
            row,
            reason: format!("'{cell}' is not a number"),
        })?;
        values.push(value);
    }
    Ok(values)
}
