//! Labeled in-memory table (Arrow/Parquet backed)
//!
//! A `Table` is a row-labeled, column-typed grid of [`Value`] cells. Unlike
//! Arrow `RecordBatch`es it supports single-cell assignment, which is what a
//! record sink needs. Arrow and Parquet are the import/export formats:
//!
//! ```rust
//! use frame_forecast::table::{ColumnType, Table};
//!
//! let mut table = Table::new([("a", ColumnType::Int64), ("p", ColumnType::Float64)])?;
//! table.set("0", "a", 1.into())?;
//! table.set("0", "p", 2.5.into())?;
//!
//! let batch = table.to_record_batch()?;
//! assert_eq!(batch.num_rows(), 1);
//! # Ok::<(), frame_forecast::Error>(())
//! ```
//!
//! Assignment follows enlargement semantics: writing to an unknown row label
//! appends a new row whose other cells are `Null`.

mod convert;

use crate::record::Value;
use crate::{Error, Result};
use arrow::datatypes::{DataType, Field};
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Table handle shared between the host and source adapters.
pub type SharedTable = Arc<RwLock<Table>>;

/// Column storage type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnType {
    /// Booleans
    Boolean,
    /// 64-bit integers (Arrow Int32 widens to this)
    Int64,
    /// 64-bit floats (Arrow Float32 widens to this)
    Float64,
    /// UTF-8 strings
    Utf8,
    /// Lists of 64-bit floats
    Float64List,
}

impl ColumnType {
    /// Map an Arrow data type onto a column type.
    ///
    /// # Errors
    /// Returns `StorageError` for unsupported Arrow types
    pub fn from_arrow(data_type: &DataType) -> Result<Self> {
        match data_type {
            DataType::Boolean => Ok(Self::Boolean),
            DataType::Int32 | DataType::Int64 => Ok(Self::Int64),
            DataType::Float32 | DataType::Float64 => Ok(Self::Float64),
            DataType::Utf8 => Ok(Self::Utf8),
            DataType::List(field) if field.data_type() == &DataType::Float64 => {
                Ok(Self::Float64List)
            }
            other => Err(Error::StorageError(format!(
                "Unsupported column type: {other:?}"
            ))),
        }
    }

    /// Arrow data type used on export.
    #[must_use]
    pub fn to_arrow(self) -> DataType {
        match self {
            Self::Boolean => DataType::Boolean,
            Self::Int64 => DataType::Int64,
            Self::Float64 => DataType::Float64,
            Self::Utf8 => DataType::Utf8,
            Self::Float64List => {
                DataType::List(Arc::new(Field::new("item", DataType::Float64, true)))
            }
        }
    }

    /// Apply assignment semantics: accept, widen or reject a value.
    #[allow(clippy::cast_precision_loss)]
    fn coerce(self, column: &str, value: Value) -> Result<Value> {
        match (self, value) {
            (_, Value::Null) => Ok(Value::Null),
            (Self::Boolean, v @ Value::Bool(_))
            | (Self::Int64, v @ Value::Int(_))
            | (Self::Float64, v @ Value::Float(_))
            | (Self::Utf8, v @ Value::Str(_))
            | (Self::Float64List, v @ Value::Sequence(_)) => Ok(v),
            (Self::Float64, Value::Int(v)) => Ok(Value::Float(v as f64)),
            (expected, found) => Err(Error::TypeMismatch {
                column: column.to_string(),
                expected: format!("{expected:?}"),
                found: found.type_name().to_string(),
            }),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    column_type: ColumnType,
    values: Vec<Value>,
}

/// Row-labeled table of typed columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    index: Vec<String>,
    positions: HashMap<String, usize>,
    columns: Vec<Column>,
}

impl Table {
    /// Create an empty table with the given columns.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a column name is repeated
    pub fn new<S, I>(schema: I) -> Result<Self>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, ColumnType)>,
    {
        let mut table = Self::default();
        for (name, column_type) in schema {
            table.add_column(name, column_type)?;
        }
        Ok(table)
    }

    /// Add a column filled with `Null` for existing rows.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the column already exists
    pub fn add_column(&mut self, name: impl Into<String>, column_type: ColumnType) -> Result<()> {
        let name = name.into();
        if self.has_column(&name) {
            return Err(Error::InvalidInput(format!("Duplicate column: {name}")));
        }
        self.columns.push(Column {
            name,
            column_type,
            values: vec![Value::Null; self.index.len()],
        });
        Ok(())
    }

    /// Append a full row.
    ///
    /// # Errors
    /// Returns `InvalidInput` on a duplicate label or wrong arity, and
    /// `TypeMismatch` if a value does not fit its column
    pub fn push_row(&mut self, label: impl Into<String>, values: Vec<Value>) -> Result<()> {
        let label = label.into();
        if self.positions.contains_key(&label) {
            return Err(Error::InvalidInput(format!("Duplicate row label: {label}")));
        }
        if values.len() != self.columns.len() {
            return Err(Error::InvalidInput(format!(
                "Row has {} values, table has {} columns",
                values.len(),
                self.columns.len()
            )));
        }

        let coerced = self
            .columns
            .iter()
            .zip(values)
            .map(|(column, value)| column.column_type.coerce(&column.name, value))
            .collect::<Result<Vec<_>>>()?;

        for (column, value) in self.columns.iter_mut().zip(coerced) {
            column.values.push(value);
        }
        self.positions.insert(label.clone(), self.index.len());
        self.index.push(label);
        Ok(())
    }

    /// Number of rows
    #[must_use]
    pub fn num_rows(&self) -> usize {
        self.index.len()
    }

    /// Number of columns
    #[must_use]
    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Check if the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Column names in table order
    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    /// Type of a column, if it exists
    #[must_use]
    pub fn column_type(&self, name: &str) -> Option<ColumnType> {
        self.column(name).map(|c| c.column_type)
    }

    /// Check if a column exists.
    #[must_use]
    pub fn has_column(&self, name: &str) -> bool {
        self.column(name).is_some()
    }

    /// Row labels in row order
    #[must_use]
    pub fn index(&self) -> &[String] {
        &self.index
    }

    /// Row position of a label
    #[must_use]
    pub fn position_of(&self, label: &str) -> Option<usize> {
        self.positions.get(label).copied()
    }

    /// Read one cell by row label.
    ///
    /// # Errors
    /// Returns `KeyLookup` for an unknown label and `ColumnNotFound` for an
    /// unknown column
    pub fn get(&self, label: &str, column: &str) -> Result<&Value> {
        let column = self
            .column(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        let position = self
            .position_of(label)
            .ok_or_else(|| Error::KeyLookup(format!("No row labelled '{label}'")))?;
        Ok(&column.values[position])
    }

    /// Every column value of the row at `position`, in column name order.
    #[must_use]
    pub fn row(&self, position: usize) -> Option<BTreeMap<String, Value>> {
        (position < self.num_rows()).then(|| {
            self.columns
                .iter()
                .map(|c| (c.name.clone(), c.values[position].clone()))
                .collect()
        })
    }

    /// Assign one cell.
    ///
    /// An unknown `label` appends a new row with `Null` in every column
    /// before the assignment.
    ///
    /// # Errors
    /// Returns `ColumnNotFound` for an unknown column and `TypeMismatch` if the
    /// value does not fit the column
    pub fn set(&mut self, label: &str, column: &str, value: Value) -> Result<()> {
        let column_idx = self
            .column_position(column)
            .ok_or_else(|| Error::ColumnNotFound(column.to_string()))?;
        let value = self.columns[column_idx].column_type.coerce(column, value)?;

        let row = match self.position_of(label) {
            Some(row) => row,
            None => self.append_empty_row(label),
        };
        self.columns[column_idx].values[row] = value;
        Ok(())
    }

    /// Assign several cells of one row at once.
    ///
    /// Every column and value is checked before anything is written, so on
    /// error the table is left unchanged. An unknown `label` appends a row.
    ///
    /// # Errors
    /// Returns `ColumnNotFound` for an unknown column and `TypeMismatch` if a
    /// value does not fit its column
    pub fn set_row<I>(&mut self, label: &str, cells: I) -> Result<()>
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        let cells = cells
            .into_iter()
            .map(|(column, value)| {
                let idx = self
                    .column_position(&column)
                    .ok_or_else(|| Error::ColumnNotFound(column.clone()))?;
                let value = self.columns[idx].column_type.coerce(&column, value)?;
                Ok((idx, value))
            })
            .collect::<Result<Vec<_>>>()?;

        let row = match self.position_of(label) {
            Some(row) => row,
            None => self.append_empty_row(label),
        };
        for (idx, value) in cells {
            self.columns[idx].values[row] = value;
        }
        Ok(())
    }

    /// Wrap the table in a shared handle.
    #[must_use]
    pub fn into_shared(self) -> SharedTable {
        Arc::new(RwLock::new(self))
    }

    fn append_empty_row(&mut self, label: &str) -> usize {
        let row = self.index.len();
        for column in &mut self.columns {
            column.values.push(Value::Null);
        }
        self.positions.insert(label.to_string(), row);
        self.index.push(label.to_string());
        row
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    fn column_position(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }
}
