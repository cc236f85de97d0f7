//! Prediction - named result attached to a record

use super::Value;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Column holding the predicted value.
pub const VALUE_COLUMN: &str = "value";

/// Column holding the prediction confidence.
pub const CONFIDENCE_COLUMN: &str = "confidence";

/// A prediction result: prediction column name to value.
///
/// Most producers fill the conventional `value` / `confidence` columns via
/// [`Prediction::new`], but any column set is allowed so a table can store
/// whatever the model emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Prediction {
    columns: BTreeMap<String, Value>,
}

impl Prediction {
    /// Create a prediction with `value` and `confidence` columns.
    #[must_use]
    pub fn new(value: impl Into<Value>, confidence: f64) -> Self {
        Self::default()
            .with(VALUE_COLUMN, value)
            .with(CONFIDENCE_COLUMN, confidence)
    }

    /// Create a prediction carrying only a `value` column.
    #[must_use]
    pub fn from_value(value: impl Into<Value>) -> Self {
        Self::default().with(VALUE_COLUMN, value)
    }

    /// Add or replace a column.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(column, value);
        self
    }

    /// Insert a column value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<Value>) {
        self.columns.insert(column.into(), value.into());
    }

    /// Get a column value.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&Value> {
        self.columns.get(column)
    }

    /// The `value` column, if present.
    #[must_use]
    pub fn value(&self) -> Option<&Value> {
        self.get(VALUE_COLUMN)
    }

    /// All columns in name order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.columns.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Prediction {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            columns: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
