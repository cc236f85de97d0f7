//! Forecasting horizons

use serde::{Deserialize, Serialize};

/// The set of time positions a forecaster is asked to predict.
///
/// Relative horizons count steps after the training cutoff (`1` is the first
/// unseen point). Absolute horizons name positions on the training index,
/// where `0` is the first training observation; positions at or before the
/// cutoff are in-sample.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForecastingHorizon {
    values: Vec<i64>,
    relative: bool,
}

impl ForecastingHorizon {
    /// Create a horizon from raw positions.
    #[must_use]
    pub const fn new(values: Vec<i64>, relative: bool) -> Self {
        Self { values, relative }
    }

    /// Relative horizon `1..=steps`.
    #[must_use]
    pub fn relative(steps: usize) -> Self {
        Self::new((1..=to_i64(steps)).collect(), true)
    }

    /// Absolute horizon over the given positions.
    #[must_use]
    pub const fn absolute(positions: Vec<i64>) -> Self {
        Self::new(positions, false)
    }

    /// Absolute horizon over a row index `0..len`.
    #[must_use]
    pub fn from_index(len: usize) -> Self {
        Self::absolute((0..to_i64(len)).collect())
    }

    /// Horizon positions.
    #[must_use]
    pub fn values(&self) -> &[i64] {
        &self.values
    }

    /// True for relative horizons.
    #[must_use]
    pub const fn is_relative(&self) -> bool {
        self.relative
    }

    /// Number of positions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Check if the horizon has no positions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Express the horizon as steps after `cutoff` (the last training position).
    #[must_use]
    pub fn to_relative(&self, cutoff: i64) -> Self {
        if self.relative {
            return self.clone();
        }
        Self::new(self.values.iter().map(|p| p - cutoff).collect(), true)
    }

    /// Express the horizon as positions on the training index.
    #[must_use]
    pub fn to_absolute(&self, cutoff: i64) -> Self {
        if !self.relative {
            return self.clone();
        }
        Self::absolute(self.values.iter().map(|h| cutoff + h).collect())
    }
}

fn to_i64(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}
