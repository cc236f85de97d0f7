//! Table-backed record source
//!
//! Proxies a shared [`Table`]: every row is a record keyed by its row label,
//! with all columns as features.

use super::Source;
use crate::record::{Record, Value};
use crate::table::{SharedTable, Table};
use crate::{Error, Result};
use tracing::debug;

/// Prediction name looked up on records passed to `update`.
pub const DEFAULT_PREDICTION_NAME: &str = "target_name";

/// Configuration for [`DataFrameSource`].
#[derive(Debug, Clone)]
pub struct DataFrameSourceConfig {
    table: SharedTable,
    feature_cols: Vec<String>,
    prediction_cols: Vec<String>,
    prediction_name: String,
}

impl DataFrameSourceConfig {
    /// Start building a configuration around a shared table.
    #[must_use]
    pub fn builder(table: SharedTable) -> DataFrameSourceConfigBuilder {
        DataFrameSourceConfigBuilder::new(table)
    }

    /// The proxied table.
    #[must_use]
    pub const fn table(&self) -> &SharedTable {
        &self.table
    }

    /// Feature columns written by `update`.
    #[must_use]
    pub fn feature_cols(&self) -> &[String] {
        &self.feature_cols
    }

    /// Prediction columns written by `update`.
    #[must_use]
    pub fn prediction_cols(&self) -> &[String] {
        &self.prediction_cols
    }

    /// Name of the record prediction whose columns are stored.
    #[must_use]
    pub fn prediction_name(&self) -> &str {
        &self.prediction_name
    }
}

/// Builder for `DataFrameSourceConfig`.
#[derive(Debug)]
pub struct DataFrameSourceConfigBuilder {
    table: SharedTable,
    feature_cols: Vec<String>,
    prediction_cols: Vec<String>,
    prediction_name: String,
}

impl DataFrameSourceConfigBuilder {
    /// Create a builder with no feature or prediction columns.
    #[must_use]
    pub fn new(table: SharedTable) -> Self {
        Self {
            table,
            feature_cols: Vec::new(),
            prediction_cols: Vec::new(),
            prediction_name: DEFAULT_PREDICTION_NAME.to_string(),
        }
    }

    /// Set the feature columns whose values `update` writes.
    #[must_use]
    pub fn feature_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.feature_cols = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the prediction columns whose values `update` writes.
    #[must_use]
    pub fn prediction_cols<I, S>(mut self, cols: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prediction_cols = cols.into_iter().map(Into::into).collect();
        self
    }

    /// Set the record prediction name to store.
    #[must_use]
    pub fn prediction_name(mut self, name: impl Into<String>) -> Self {
        self.prediction_name = name.into();
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    /// Returns `InvalidInput` if a column is both a feature and a prediction
    /// column
    pub fn build(self) -> Result<DataFrameSourceConfig> {
        if let Some(col) = self
            .feature_cols
            .iter()
            .find(|c| self.prediction_cols.contains(c))
        {
            return Err(Error::InvalidInput(format!(
                "Column '{col}' is configured as both feature and prediction column"
            )));
        }

        Ok(DataFrameSourceConfig {
            table: self.table,
            feature_cols: self.feature_cols,
            prediction_cols: self.prediction_cols,
            prediction_name: self.prediction_name,
        })
    }
}

/// Record source proxying a shared table.
#[derive(Debug, Clone)]
pub struct DataFrameSource {
    config: DataFrameSourceConfig,
}

impl DataFrameSource {
    /// Create a source from its configuration.
    #[must_use]
    pub const fn new(config: DataFrameSourceConfig) -> Self {
        Self { config }
    }

    /// The source configuration.
    #[must_use]
    pub const fn config(&self) -> &DataFrameSourceConfig {
        &self.config
    }

    /// Cells to write for a record's configured prediction, or `None` when
    /// there is nothing to write.
    fn prediction_cells(&self, table: &Table, record: &Record) -> Option<Vec<(String, Value)>> {
        let Some(prediction) = record.prediction(&self.config.prediction_name) else {
            debug!(key = record.key(), "no prediction on record, skipping prediction columns");
            return None;
        };

        if let Some(missing) = self
            .config
            .prediction_cols
            .iter()
            .find(|c| !table.has_column(c))
        {
            debug!(
                key = record.key(),
                column = missing.as_str(),
                "prediction column not in table, skipping prediction columns"
            );
            return None;
        }

        Some(
            self.config
                .prediction_cols
                .iter()
                .map(|col| (col.clone(), prediction.get(col).cloned().unwrap_or_default()))
                .collect(),
        )
    }
}

impl Source for DataFrameSource {
    type Records = TableRows;

    async fn update(&self, record: &Record) -> Result<()> {
        let mut table = self.config.table.write().await;

        // Unset features are stored as nulls.
        let mut cells: Vec<(String, Value)> = self
            .config
            .feature_cols
            .iter()
            .map(|col| (col.clone(), record.feature(col).cloned().unwrap_or_default()))
            .collect();

        if let Some(prediction) = self.prediction_cells(&table, record) {
            cells.extend(prediction);
        }

        table.set_row(record.key(), cells)
    }

    async fn records(&self) -> Result<TableRows> {
        let table = self.config.table.read().await;
        let rows: Vec<Record> = table
            .index()
            .iter()
            .enumerate()
            .filter_map(|(position, key)| {
                table
                    .row(position)
                    .map(|features| Record::new(key.clone()).with_features(features))
            })
            .collect();
        Ok(TableRows {
            rows: rows.into_iter(),
        })
    }

    async fn record(&self, key: &str) -> Result<Record> {
        let position: usize = key
            .parse()
            .map_err(|_| Error::KeyLookup(format!("Record key '{key}' is not a row position")))?;

        let table = self.config.table.read().await;
        let features = table.row(position).ok_or_else(|| {
            Error::KeyLookup(format!(
                "Row position {position} out of range for table with {} rows",
                table.num_rows()
            ))
        })?;

        Ok(Record::new(key).with_features(features))
    }
}

/// Scan over a table's rows as they were when `records` was called.
///
/// The table lock is released before the scan is returned, so the caller may
/// `update` the same source while iterating.
#[derive(Debug)]
pub struct TableRows {
    rows: std::vec::IntoIter<Record>,
}

impl Iterator for TableRows {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        self.rows.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.rows.size_hint()
    }
}

impl ExactSizeIterator for TableRows {}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Prediction;
    use crate::table::ColumnType;

    fn three_row_source() -> DataFrameSource {
        let mut table = Table::new([
            ("a", ColumnType::Int64),
            ("b", ColumnType::Int64),
            ("p", ColumnType::Int64),
        ])
        .unwrap();
        for i in 0..3 {
            table
                .push_row(
                    i.to_string(),
                    vec![Value::Int(i), Value::Int(i + 10), Value::Int(-1)],
                )
                .unwrap();
        }

        let config = DataFrameSourceConfig::builder(table.into_shared())
            .feature_cols(["a", "b"])
            .prediction_cols(["p"])
            .build()
            .unwrap();
        DataFrameSource::new(config)
    }

    #[tokio::test]
    async fn test_update_features_and_prediction() {
        let source = three_row_source();
        let record = Record::new("1")
            .with_feature("a", 1)
            .with_feature("b", 2)
            .with_prediction(DEFAULT_PREDICTION_NAME, [("p", 9)].into_iter().collect());

        source.update(&record).await.unwrap();

        let table = source.config().table().read().await;
        assert_eq!(table.get("1", "a").unwrap(), &Value::Int(1));
        assert_eq!(table.get("1", "b").unwrap(), &Value::Int(2));
        assert_eq!(table.get("1", "p").unwrap(), &Value::Int(9));
        assert_eq!(table.get("0", "a").unwrap(), &Value::Int(0));
        assert_eq!(table.get("2", "p").unwrap(), &Value::Int(-1));
    }

    #[tokio::test]
    async fn test_update_without_prediction_keeps_prediction_column() {
        let source = three_row_source();
        let record = Record::new("2").with_feature("a", 7).with_feature("b", 8);

        source.update(&record).await.unwrap();

        let table = source.config().table().read().await;
        assert_eq!(table.get("2", "a").unwrap(), &Value::Int(7));
        assert_eq!(table.get("2", "p").unwrap(), &Value::Int(-1));
    }

    #[tokio::test]
    async fn test_update_other_prediction_name_ignored() {
        let source = three_row_source();
        let record = Record::new("0")
            .with_feature("a", 5)
            .with_feature("b", 5)
            .with_prediction("something_else", Prediction::from_value(3));

        source.update(&record).await.unwrap();

        let table = source.config().table().read().await;
        assert_eq!(table.get("0", "p").unwrap(), &Value::Int(-1));
    }

    #[tokio::test]
    async fn test_update_missing_feature_writes_null() {
        let source = three_row_source();
        source
            .update(&Record::new("0").with_feature("a", 4))
            .await
            .unwrap();

        let table = source.config().table().read().await;
        assert_eq!(table.get("0", "a").unwrap(), &Value::Int(4));
        assert_eq!(table.get("0", "b").unwrap(), &Value::Null);
    }

    #[tokio::test]
    async fn test_update_missing_feature_column_fails() {
        let table = Table::new([("a", ColumnType::Int64)]).unwrap().into_shared();
        let config = DataFrameSourceConfig::builder(table)
            .feature_cols(["a", "zzz"])
            .build()
            .unwrap();
        let source = DataFrameSource::new(config);

        let err = source
            .update(&Record::new("0").with_feature("a", 1))
            .await
            .unwrap_err();
        assert!(err.is_lookup());
        assert_eq!(source.config().table().read().await.num_rows(), 0);
    }

    #[tokio::test]
    async fn test_update_missing_prediction_column_tolerated() {
        let table = Table::new([("a", ColumnType::Int64)]).unwrap().into_shared();
        let config = DataFrameSourceConfig::builder(table)
            .feature_cols(["a"])
            .prediction_cols(["not_there"])
            .build()
            .unwrap();
        let source = DataFrameSource::new(config);

        let record = Record::new("0")
            .with_feature("a", 1)
            .with_prediction(DEFAULT_PREDICTION_NAME, Prediction::from_value(1));
        source.update(&record).await.unwrap();

        assert_eq!(
            source.config().table().read().await.get("0", "a").unwrap(),
            &Value::Int(1)
        );
    }

    #[tokio::test]
    async fn test_records_in_row_order() {
        let source = three_row_source();
        let rows = source.records().await.unwrap();
        assert_eq!(rows.len(), 3);

        let records: Vec<Record> = rows.collect();
        let keys: Vec<&str> = records.iter().map(Record::key).collect();
        assert_eq!(keys, vec!["0", "1", "2"]);
        assert_eq!(records[2].feature("b"), Some(&Value::Int(12)));
        assert_eq!(records[2].features().len(), 3);
    }

    #[tokio::test]
    async fn test_update_inside_records_scan() {
        let source = three_row_source();

        for record in source.records().await.unwrap() {
            let record = record
                .with_prediction(DEFAULT_PREDICTION_NAME, [("p", 9)].into_iter().collect());
            source.update(&record).await.unwrap();
        }

        let table = source.config().table().read().await;
        for label in ["0", "1", "2"] {
            assert_eq!(table.get(label, "p").unwrap(), &Value::Int(9));
        }
        assert_eq!(table.num_rows(), 3);
    }

    #[tokio::test]
    async fn test_record_by_position() {
        let source = three_row_source();
        let record = source.record("1").await.unwrap();

        assert_eq!(record.key(), "1");
        assert_eq!(record.feature("a"), Some(&Value::Int(1)));
        assert_eq!(record.feature("p"), Some(&Value::Int(-1)));
    }

    #[tokio::test]
    async fn test_record_out_of_range() {
        let source = three_row_source();
        let err = source.record("3").await.unwrap_err();
        assert!(matches!(err, Error::KeyLookup(_)));

        let err = source.record("abc").await.unwrap_err();
        assert!(matches!(err, Error::KeyLookup(_)));
    }

    #[test]
    fn test_overlapping_columns_rejected() {
        let table = Table::default().into_shared();
        let result = DataFrameSourceConfig::builder(table)
            .feature_cols(["a", "b"])
            .prediction_cols(["b"])
            .build();
        assert!(result.is_err());
    }
}
