//! Parquet column extraction.

use std::path::Path;

use arrow::array::{Array, AsArray};
use arrow::datatypes::{DataType, Float64Type, Schema};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;

use crate::error::IoError;
use crate::reader::Column;

/// Resolves `column` against the file schema.
fn column_index(schema: &Schema, column: &Column, path: &Path) -> Result<usize, IoError> {
    let index = match column {
        Column::Index(i) => Some(*i).filter(|&i| i < schema.fields().len()),
        Column::Name(name) => schema.index_of(name).ok(),
    };
    index.ok_or_else(|| IoError::MissingColumn {
        name: column.to_string(),
        path: path.to_path_buf(),
    })
}

/// Reads one `Float64` column from a Parquet file.
///
/// # Errors
///
/// Returns [`IoError::MissingColumn`] if the column is absent,
/// [`IoError::Validation`] if it is not `Float64`, and [`IoError::Parse`] for
/// null cells.
pub(crate) fn read_column(path: &Path, column: &Column) -> Result<Vec<f64>, IoError> {
    let file = std::fs::File::open(path).map_err(|e| IoError::Parquet {
        reason: e.to_string(),
    })?;
    let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;

    let schema = builder.schema().clone();
    let index = column_index(&schema, column, path)?;
    let field = schema.field(index);
    if field.data_type() != &DataType::Float64 {
        return Err(IoError::Validation {
            count: 1,
            details: format!(
                "column '{}' has type {}, expected Float64",
                field.name(),
                field.data_type()
            ),
        });
    }

    let mut values = Vec::new();
    for batch in builder.build()? {
        let batch = batch?;
        let array = batch.column(index).as_primitive::<Float64Type>();
        for i in 0..array.len() {
            if array.is_null(i) {
                return Err(IoError::Parse {
                    row: values.len() + 1,
                    reason: "null value".to_string(),
                });
            }
            values.push(array.value(i));
        }
    }
    Ok(values)
}

#[cfg(test)]
mod tests {
    use super::*;
    use arrow::datatypes::Field;

    fn schema() -> Schema {
        Schema::new(vec![
            Field::new("time", DataType::Int64, false),
            Field::new("flow", DataType::Float64, true),
        ])
    }

    #[test]
    fn index_resolution() {
        let path = Path::new("x.parquet");
        assert_eq!(column_index(&schema(), &Column::Index(1), path).unwrap(), 1);
        assert_eq!(
            column_index(&schema(), &Column::Name("flow".into()), path).unwrap(),
            1
        );
    }

    #[test]
    fn missing_columns() {
        let path = Path::new("x.parquet");
        let err = column_index(&schema(), &Column::Index(2), path).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref name, .. } if name == "2"));
        let err = column_index(&schema(), &Column::Name("rain".into()), path).unwrap_err();
        assert!(matches!(err, IoError::MissingColumn { ref name, .. } if name == "rain"));
    }
}
