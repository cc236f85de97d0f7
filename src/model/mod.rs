//! Trainable models
//!
//! A [`Model`] trains from a [`Source`], scores itself against held-out
//! records, and produces predictions as records.
//!
//! ## Lifecycle
//!
//! ```text
//! Untrained ──train()/load()──> Trained
//!     │                            │
//!     └─ accuracy()/predict()      └─ accuracy()/predict()
//!        fail: ModelNotTrained        succeed
//! ```
//!
//! ## Usage
//!
//! ```rust,no_run
//! use frame_forecast::model::{ExpSmoothingConfig, ExpSmoothingModel, Model};
//! use frame_forecast::source::{DataFrameSource, DataFrameSourceConfig};
//! use frame_forecast::table::Table;
//!
//! # async fn example() -> frame_forecast::Result<()> {
//! let table = Table::load_parquet("data/airline.parquet")?.into_shared();
//! let source = DataFrameSource::new(
//!     DataFrameSourceConfig::builder(table).feature_cols(["passengers"]).build()?,
//! );
//!
//! let config = ExpSmoothingConfig::builder(["passengers"], "passengers", "models/airline")
//!     .seasonal_periodicity(12)
//!     .build()?;
//! let mut model = ExpSmoothingModel::new(config)?;
//!
//! model.train(&source).await?;
//! println!("sMAPE: {}", model.accuracy(&source).await?);
//! for record in model.predict(&source).await? {
//!     println!("{} -> {:?}", record.key(), record.prediction("passengers"));
//! }
//! # Ok(())
//! # }
//! ```

mod artifact;
mod config;
mod exp_smoothing;

pub use artifact::{ModelArtifact, ARTIFACT_FILE_NAME};
pub use config::{ExpSmoothingConfig, ExpSmoothingConfigBuilder, MAX_HORIZON};
pub use exp_smoothing::ExpSmoothingModel;

use crate::record::Record;
use crate::source::Source;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;

/// Host model interface.
pub trait Model: Send + Sync {
    /// Fit the model on every usable record of `source` and persist it.
    fn train<S: Source>(&mut self, source: &S) -> impl Future<Output = Result<()>> + Send;

    /// Score the trained model against `source`.
    fn accuracy<S: Source>(&self, source: &S) -> impl Future<Output = Result<Accuracy>> + Send;

    /// Produce prediction records.
    fn predict<S: Source>(&self, source: &S) -> impl Future<Output = Result<Vec<Record>>> + Send;
}

/// Accuracy score returned by [`Model::accuracy`].
///
/// The meaning of the number is model specific; for forecasters it is an
/// error metric where lower is better.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Accuracy(f64);

impl Accuracy {
    /// Wrap a raw score.
    #[must_use]
    pub const fn new(score: f64) -> Self {
        Self(score)
    }

    /// Raw score.
    #[must_use]
    pub const fn value(self) -> f64 {
        self.0
    }
}

impl fmt::Display for Accuracy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<Accuracy> for f64 {
    fn from(accuracy: Accuracy) -> Self {
        accuracy.0
    }
}
