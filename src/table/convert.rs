//! Arrow `RecordBatch` and Parquet import/export for [`Table`]

use super::{ColumnType, Table};
use crate::record::Value;
use crate::{Error, Result};
use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array, ListArray,
    StringArray,
};
use arrow::datatypes::{DataType, Field, Float64Type, Schema};
use arrow::record_batch::{RecordBatch, RecordBatchOptions};
use std::path::Path;
use std::sync::Arc;

impl Table {
    /// Build a table from a record batch with positional row labels
    /// (`"0"`, `"1"`, ...).
    ///
    /// # Errors
    /// Returns `StorageError` for unsupported column types
    pub fn from_record_batch(batch: &RecordBatch) -> Result<Self> {
        Self::from_batches(std::slice::from_ref(batch))
    }

    /// Build a table from several batches sharing one schema.
    ///
    /// Row labels continue across batches.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty batch list, `StorageError` on a
    /// schema mismatch or unsupported column type
    pub fn from_batches(batches: &[RecordBatch]) -> Result<Self> {
        let first = batches
            .first()
            .ok_or_else(|| Error::InvalidInput("No record batches".to_string()))?;
        let schema = first.schema();

        let mut table = Self::new(
            schema
                .fields()
                .iter()
                .map(|f| Ok((f.name().clone(), ColumnType::from_arrow(f.data_type())?)))
                .collect::<Result<Vec<_>>>()?,
        )?;

        for batch in batches {
            if batch.schema() != schema {
                return Err(Error::StorageError(format!(
                    "Schema mismatch: expected {:?}, got {:?}",
                    schema,
                    batch.schema()
                )));
            }

            let columns = batch
                .columns()
                .iter()
                .map(|array| column_values(array.as_ref()))
                .collect::<Result<Vec<_>>>()?;

            for row in 0..batch.num_rows() {
                let label = table.num_rows().to_string();
                let values = columns.iter().map(|c| c[row].clone()).collect();
                table.push_row(label, values)?;
            }
        }

        Ok(table)
    }

    /// Build a table from a record batch, using `column` as the row labels.
    ///
    /// The label column is dropped from the table's columns.
    ///
    /// # Errors
    /// Returns `ColumnNotFound` if the column does not exist and
    /// `InvalidInput` if it contains nulls or duplicate labels
    pub fn with_index_column(batch: &RecordBatch, column: &str) -> Result<Self> {
        let schema = batch.schema();
        let label_idx = schema
            .index_of(column)
            .map_err(|_| Error::ColumnNotFound(column.to_string()))?;
        let labels = column_values(batch.column(label_idx).as_ref())?;

        let features: Vec<(usize, &Arc<Field>)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(i, _)| *i != label_idx)
            .collect();

        let mut table = Self::new(
            features
                .iter()
                .map(|(_, f)| Ok((f.name().clone(), ColumnType::from_arrow(f.data_type())?)))
                .collect::<Result<Vec<_>>>()?,
        )?;

        let columns = features
            .iter()
            .map(|(i, _)| column_values(batch.column(*i).as_ref()))
            .collect::<Result<Vec<_>>>()?;

        for (row, label) in labels.iter().enumerate() {
            if label.is_null() {
                return Err(Error::InvalidInput(format!(
                    "Null row label at position {row} in column '{column}'"
                )));
            }
            let values = columns.iter().map(|c| c[row].clone()).collect();
            table.push_row(label.to_string(), values)?;
        }

        Ok(table)
    }

    /// Load a table from a Parquet file with positional row labels.
    ///
    /// # Errors
    /// Returns error if the file cannot be read or parsed
    pub fn load_parquet<P: AsRef<Path>>(path: P) -> Result<Self> {
        use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
        use std::fs::File;

        let file = File::open(path.as_ref()).map_err(|e| {
            Error::StorageError(format!("Failed to open Parquet file: {e}"))
        })?;

        let builder = ParquetRecordBatchReaderBuilder::try_new(file)?;
        let reader = builder.build()?;

        let mut batches = Vec::new();
        for batch in reader {
            batches.push(batch?);
        }

        Self::from_batches(&batches)
    }

    /// Export the table's columns (without row labels) as a record batch.
    ///
    /// # Errors
    /// Returns an Arrow error if the batch cannot be assembled
    pub fn to_record_batch(&self) -> Result<RecordBatch> {
        let fields: Vec<Field> = self
            .columns
            .iter()
            .map(|c| Field::new(c.name.as_str(), c.column_type.to_arrow(), true))
            .collect();
        let arrays: Vec<ArrayRef> = self
            .columns
            .iter()
            .map(|c| build_array(c.column_type, &c.values))
            .collect();

        let options = RecordBatchOptions::new().with_row_count(Some(self.num_rows()));
        Ok(RecordBatch::try_new_with_options(
            Arc::new(Schema::new(fields)),
            arrays,
            &options,
        )?)
    }

    /// Write the table's columns to a Parquet file.
    ///
    /// # Errors
    /// Returns error if the file cannot be created or written
    pub fn write_parquet<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        use parquet::arrow::ArrowWriter;
        use std::fs::File;

        let batch = self.to_record_batch()?;
        let file = File::create(path.as_ref())?;
        let mut writer = ArrowWriter::try_new(file, batch.schema(), None)?;
        writer.write(&batch)?;
        writer.close()?;
        Ok(())
    }
}

/// Read an Arrow array into cell values.
fn column_values(array: &dyn Array) -> Result<Vec<Value>> {
    fn downcast<'a, T: 'static>(array: &'a dyn Array, name: &str) -> Result<&'a T> {
        array
            .as_any()
            .downcast_ref::<T>()
            .ok_or_else(|| Error::StorageError(format!("Failed to downcast to {name}")))
    }

    let len = array.len();
    let values: Vec<Value> = match array.data_type() {
        DataType::Boolean => {
            let a = downcast::<BooleanArray>(array, "BooleanArray")?;
            (0..len).map(|i| Value::Bool(a.value(i))).collect()
        }
        DataType::Int32 => {
            let a = downcast::<Int32Array>(array, "Int32Array")?;
            (0..len).map(|i| Value::Int(i64::from(a.value(i)))).collect()
        }
        DataType::Int64 => {
            let a = downcast::<Int64Array>(array, "Int64Array")?;
            (0..len).map(|i| Value::Int(a.value(i))).collect()
        }
        DataType::Float32 => {
            let a = downcast::<Float32Array>(array, "Float32Array")?;
            (0..len).map(|i| Value::Float(f64::from(a.value(i)))).collect()
        }
        DataType::Float64 => {
            let a = downcast::<Float64Array>(array, "Float64Array")?;
            (0..len).map(|i| Value::Float(a.value(i))).collect()
        }
        DataType::Utf8 => {
            let a = downcast::<StringArray>(array, "StringArray")?;
            (0..len).map(|i| Value::Str(a.value(i).to_string())).collect()
        }
        DataType::List(field) if field.data_type() == &DataType::Float64 => {
            let a = downcast::<ListArray>(array, "ListArray")?;
            (0..len)
                .map(|i| {
                    let inner = a.value(i);
                    let inner = downcast::<Float64Array>(inner.as_ref(), "Float64Array")?;
                    Ok(Value::Sequence(
                        inner.iter().map(|v| v.unwrap_or(f64::NAN)).collect(),
                    ))
                })
                .collect::<Result<Vec<_>>>()?
        }
        other => {
            return Err(Error::StorageError(format!(
                "Unsupported column type: {other:?}"
            )))
        }
    };

    // Cell values were read unconditionally above; restore nulls.
    Ok(values
        .into_iter()
        .enumerate()
        .map(|(i, v)| if array.is_null(i) { Value::Null } else { v })
        .collect())
}

/// Build an Arrow array from cell values already coerced to `column_type`.
fn build_array(column_type: ColumnType, values: &[Value]) -> ArrayRef {
    match column_type {
        ColumnType::Boolean => Arc::new(BooleanArray::from(
            values
                .iter()
                .map(|v| match v {
                    Value::Bool(b) => Some(*b),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Int64 => Arc::new(Int64Array::from(
            values
                .iter()
                .map(|v| match v {
                    Value::Int(i) => Some(*i),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Float64 => Arc::new(Float64Array::from(
            values.iter().map(Value::as_f64).collect::<Vec<_>>(),
        )),
        ColumnType::Utf8 => Arc::new(StringArray::from(
            values
                .iter()
                .map(|v| match v {
                    Value::Str(s) => Some(s.as_str()),
                    _ => None,
                })
                .collect::<Vec<_>>(),
        )),
        ColumnType::Float64List => Arc::new(ListArray::from_iter_primitive::<Float64Type, _, _>(
            values.iter().map(|v| match v {
                Value::Sequence(s) => Some(s.iter().copied().map(Some).collect::<Vec<_>>()),
                _ => None,
            }),
        )),
    }
}
