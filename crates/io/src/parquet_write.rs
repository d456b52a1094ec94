//! Low-level Parquet column building.

use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Array, RecordBatch};
use arrow::datatypes::{DataType, Field, Schema};
use parquet::arrow::ArrowWriter;
use parquet::file::properties::WriterProperties;
use sift_emd::Imfs;

use crate::error::IoError;

/// Builds an Arrow schema with one non-null `Float64` field per name.
pub(crate) fn build_schema(names: &[String]) -> Schema {
    Schema::new(
        names
            .iter()
            .map(|n| Field::new(n, DataType::Float64, false))
            .collect::<Vec<_>>(),
    )
}

/// Converts a decomposition into a [`RecordBatch`], one column per row.
pub(crate) fn imfs_to_record_batch(imfs: &Imfs, schema: &Schema) -> Result<RecordBatch, IoError> {
    let columns: Vec<ArrayRef> = imfs
        .rows()
        .map(|r| Arc::new(Float64Array::from(r.to_vec())) as ArrayRef)
        .collect();
    Ok(RecordBatch::try_new(Arc::new(schema.clone()), columns)?)
}

/// Writes a sequence of [`RecordBatch`]es to a Parquet file at `path`.
pub(crate) fn write_batches(
    path: &Path,
    batches: &[RecordBatch],
    schema: &Schema,
    props: WriterProperties,
) -> Result<(), IoError> {
    let file = std::fs::File::create(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let mut writer = ArrowWriter::try_new(file, Arc::new(schema.clone()), Some(props))?;
    for batch in batches {
        writer.write(batch)?;
    }
    writer.close()?;
    Ok(())
}
