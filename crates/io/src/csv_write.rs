//! Delimited-text table output.

use std::path::Path;

use sift_emd::Imfs;

use crate::error::IoError;

/// Writes the rows of `imfs` as columns, one line per sample.
///
/// Values use Rust's shortest round-trip formatting, so reading the file
/// back yields the exact same `f64`s.
pub(crate) fn write_table(path: &Path, names: &[String], imfs: &Imfs) -> Result<(), IoError> {
    let mut writer = csv::Writer::from_path(path)?;
    writer.write_record(names)?;

    let rows: Vec<&[f64]> = imfs.rows().collect();
    let mut record = Vec::with_capacity(rows.len());
    for j in 0..imfs.len() {
        record.clear();
        record.extend(rows.iter().map(|r| r[j].to_string()));
        writer.write_record(&record)?;
    }
    writer.flush().map_err(|e| IoError::Csv {
        reason: e.to_string(),
    })?;
    Ok(())
}
