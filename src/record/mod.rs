//! Records - the unit exchanged between sources and models
//!
//! ```rust
//! use frame_forecast::record::{Prediction, Record, Value};
//!
//! let mut record = Record::new("1").with_feature("a", 1).with_feature("b", 2);
//! record.set_prediction("target_name", Prediction::from_value(9));
//!
//! assert_eq!(record.feature("a"), Some(&Value::Int(1)));
//! assert!(record.prediction("target_name").is_some());
//! ```

mod prediction;
mod value;

pub use prediction::{Prediction, CONFIDENCE_COLUMN, VALUE_COLUMN};
pub use value::Value;

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A keyed bundle of named feature values, optionally carrying named predictions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    key: String,
    #[serde(default)]
    features: BTreeMap<String, Value>,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    predictions: BTreeMap<String, Prediction>,
}

impl Record {
    /// Create an empty record.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            features: BTreeMap::new(),
            predictions: BTreeMap::new(),
        }
    }

    /// Add a feature (builder style).
    #[must_use]
    pub fn with_feature(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_feature(name, value);
        self
    }

    /// Replace all features.
    #[must_use]
    pub fn with_features<K, V, I>(mut self, features: I) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
        I: IntoIterator<Item = (K, V)>,
    {
        self.features = features
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    /// Add a named prediction (builder style).
    #[must_use]
    pub fn with_prediction(mut self, name: impl Into<String>, prediction: Prediction) -> Self {
        self.set_prediction(name, prediction);
        self
    }

    /// Get the record key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Get a single feature value.
    #[must_use]
    pub fn feature(&self, name: &str) -> Option<&Value> {
        self.features.get(name)
    }

    /// All features in name order.
    #[must_use]
    pub const fn features(&self) -> &BTreeMap<String, Value> {
        &self.features
    }

    /// Set or replace a feature value.
    pub fn set_feature(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.features.insert(name.into(), value.into());
    }

    /// True when every named feature is present and non-null.
    #[must_use]
    pub fn has_features<S: AsRef<str>>(&self, names: &[S]) -> bool {
        names
            .iter()
            .all(|name| self.feature(name.as_ref()).is_some_and(|v| !v.is_null()))
    }

    /// Get a named prediction.
    #[must_use]
    pub fn prediction(&self, name: &str) -> Option<&Prediction> {
        self.predictions.get(name)
    }

    /// Set or replace a named prediction.
    pub fn set_prediction(&mut self, name: impl Into<String>, prediction: Prediction) {
        self.predictions.insert(name.into(), prediction);
    }
}
