//! Forecasting primitives
//!
//! The [`Forecaster`] trait is the seam between model adapters and the
//! numerical estimator. [`HoltWinters`] is the bundled implementation.

mod holt_winters;
mod horizon;
mod metrics;

pub use holt_winters::{HoltWinters, SeasonalType};
pub use horizon::ForecastingHorizon;
pub use metrics::smape;

use crate::Result;

/// A univariate time-series estimator.
pub trait Forecaster {
    /// Fit on a series in time order.
    ///
    /// # Errors
    /// Returns error if the series is too short or invalid for the model
    fn fit(&mut self, series: &[f64]) -> Result<()>;

    /// Predict at every position of a horizon.
    ///
    /// # Errors
    /// Returns `ModelNotTrained` before `fit`, `InvalidInput` for positions the
    /// model cannot produce
    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Vec<f64>>;

    /// Whether `fit` has completed.
    fn is_fitted(&self) -> bool;
}
