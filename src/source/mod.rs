//! Record sources
//!
//! A [`Source`] is the host-facing record store: models iterate it for
//! training and evaluation, and write results back through `update`.
//!
//! # Example
//!
//! ```rust,no_run
//! use frame_forecast::source::{DataFrameSource, DataFrameSourceConfig, Source};
//! use frame_forecast::table::{ColumnType, Table};
//!
//! # async fn example() -> frame_forecast::Result<()> {
//! let table = Table::new([("y", ColumnType::Float64)])?.into_shared();
//! let config = DataFrameSourceConfig::builder(table)
//!     .feature_cols(["y"])
//!     .build()?;
//! let source = DataFrameSource::new(config);
//!
//! for record in source.records().await? {
//!     println!("{}: {:?}", record.key(), record.features());
//! }
//! # Ok(())
//! # }
//! ```

mod dataframe;

pub use dataframe::{
    DataFrameSource, DataFrameSourceConfig, DataFrameSourceConfigBuilder, TableRows,
    DEFAULT_PREDICTION_NAME,
};

use crate::record::Record;
use crate::Result;
use std::future::Future;

/// Host record-stream interface.
pub trait Source: Send + Sync {
    /// Iterator returned by [`Source::records`]
    type Records: Iterator<Item = Record> + Send;

    /// Write a record's configured columns back to the store.
    fn update(&self, record: &Record) -> impl Future<Output = Result<()>> + Send;

    /// Iterate every record in store order.
    ///
    /// Each call starts a fresh scan of the current state.
    fn records(&self) -> impl Future<Output = Result<Self::Records>> + Send;

    /// Fetch a single record by key.
    fn record(&self, key: &str) -> impl Future<Output = Result<Record>> + Send;

    /// Iterate only the records carrying every named feature (non-null).
    fn with_features(
        &self,
        names: &[String],
    ) -> impl Future<Output = Result<WithFeatures<Self::Records>>> + Send {
        let names = names.to_vec();
        async move { Ok(WithFeatures::new(self.records().await?, names)) }
    }
}

/// Iterator adapter yielding records that carry all of a feature set.
#[derive(Debug)]
pub struct WithFeatures<I> {
    inner: I,
    names: Vec<String>,
}

impl<I> WithFeatures<I> {
    /// Wrap a record iterator.
    #[must_use]
    pub const fn new(inner: I, names: Vec<String>) -> Self {
        Self { inner, names }
    }
}

impl<I: Iterator<Item = Record>> Iterator for WithFeatures<I> {
    type Item = Record;

    fn next(&mut self) -> Option<Record> {
        let names = &self.names;
        self.inner.find(|record| record.has_features(names))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_features_filters() {
        let records = vec![
            Record::new("0").with_feature("a", 1).with_feature("b", 2),
            Record::new("1").with_feature("a", 1),
            Record::new("2").with_feature("a", 1).with_feature("b", crate::record::Value::Null),
            Record::new("3").with_feature("b", 4).with_feature("a", 3),
        ];

        let keys: Vec<String> =
            WithFeatures::new(records.into_iter(), vec!["a".to_string(), "b".to_string()])
                .map(|r| r.key().to_string())
                .collect();

        assert_eq!(keys, vec!["0", "3"]);
    }
}
