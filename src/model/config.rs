//! Exponential smoothing model configuration

use crate::forecast::{HoltWinters, SeasonalType};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Largest accepted forecasting horizon and seasonal periodicity.
pub const MAX_HORIZON: usize = 1 << 16;

const fn default_seasonal_periodicity() -> usize {
    12
}

const fn default_smoothing_level() -> f64 {
    0.3
}

const fn default_smoothing_trend() -> f64 {
    0.1
}

const fn default_smoothing_seasonal() -> f64 {
    0.2
}

/// Configuration for [`ExpSmoothingModel`](super::ExpSmoothingModel).
///
/// Deserializes from JSON; only `features`, `predict` and `directory` are
/// required:
///
/// ```rust
/// use frame_forecast::model::ExpSmoothingConfig;
///
/// let config = ExpSmoothingConfig::from_json_str(
///     r#"{"features": ["passengers"], "predict": "passengers", "directory": "/tmp/m", "spd": 4}"#,
/// )?;
/// assert_eq!(config.seasonal_periodicity(), 4);
/// assert_eq!(config.horizon(), 4);
/// # Ok::<(), frame_forecast::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpSmoothingConfig {
    features: Vec<String>,
    predict: String,
    directory: PathBuf,
    #[serde(default = "default_seasonal_periodicity", alias = "spd")]
    seasonal_periodicity: usize,
    #[serde(default, alias = "fh", skip_serializing_if = "Option::is_none")]
    horizon: Option<usize>,
    #[serde(default)]
    seasonal: SeasonalType,
    #[serde(default = "default_smoothing_level")]
    smoothing_level: f64,
    #[serde(default = "default_smoothing_trend")]
    smoothing_trend: f64,
    #[serde(default = "default_smoothing_seasonal")]
    smoothing_seasonal: f64,
}

impl ExpSmoothingConfig {
    /// Start building a configuration.
    ///
    /// # Arguments
    ///
    /// * `features` - Features to train on
    /// * `predict` - Feature holding the value to be predicted
    /// * `directory` - Directory where the trained estimator is saved
    #[must_use]
    pub fn builder<I, S>(
        features: I,
        predict: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> ExpSmoothingConfigBuilder
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ExpSmoothingConfigBuilder::new(features, predict, directory)
    }

    /// Parse and validate a JSON configuration.
    ///
    /// # Errors
    /// Returns `Serialization` for malformed JSON and the `validate` errors
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and validate a JSON configuration file.
    ///
    /// # Errors
    /// Returns `Io` if the file cannot be read, otherwise as `from_json_str`
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_json_str(&std::fs::read_to_string(path)?)
    }

    /// Check the configuration is usable.
    ///
    /// # Errors
    /// Returns `InvalidInput` for empty feature/target names or a horizon
    /// outside `1..=MAX_HORIZON`, and `InvalidParameter` for out-of-range
    /// estimator settings
    pub fn validate(&self) -> Result<()> {
        if self.features.is_empty() {
            return Err(Error::InvalidInput(
                "At least one training feature is required".to_string(),
            ));
        }
        if self.predict.is_empty() {
            return Err(Error::InvalidInput(
                "The feature to predict must be named".to_string(),
            ));
        }
        if self.horizon == Some(0) {
            return Err(Error::InvalidInput(
                "Forecasting horizon must be at least 1".to_string(),
            ));
        }
        if self.horizon() > MAX_HORIZON {
            return Err(Error::InvalidInput(format!(
                "Forecasting horizon {} exceeds the maximum of {MAX_HORIZON}",
                self.horizon()
            )));
        }
        if self.seasonal_periodicity > MAX_HORIZON {
            return Err(Error::InvalidParameter {
                name: "seasonal_periodicity".to_string(),
                reason: format!("must be at most {MAX_HORIZON}"),
            });
        }
        self.estimator().map(|_| ())
    }

    /// Features to train on.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Feature holding the value to be predicted.
    #[must_use]
    pub fn predict(&self) -> &str {
        &self.predict
    }

    /// Directory where the estimator is saved.
    #[must_use]
    pub fn directory(&self) -> &Path {
        &self.directory
    }

    /// Observations per seasonal cycle.
    #[must_use]
    pub const fn seasonal_periodicity(&self) -> usize {
        self.seasonal_periodicity
    }

    /// Number of steps forecast by `predict` (defaults to the periodicity).
    #[must_use]
    pub fn horizon(&self) -> usize {
        self.horizon.unwrap_or(self.seasonal_periodicity)
    }

    /// Seasonality type.
    #[must_use]
    pub const fn seasonal(&self) -> SeasonalType {
        self.seasonal
    }

    /// A fresh, unfitted estimator for this configuration.
    ///
    /// # Errors
    /// Returns `InvalidParameter` for out-of-range settings
    pub fn estimator(&self) -> Result<HoltWinters> {
        HoltWinters::new(
            self.smoothing_level,
            self.smoothing_trend,
            self.smoothing_seasonal,
            self.seasonal_periodicity,
            self.seasonal,
        )
    }
}

/// Builder for `ExpSmoothingConfig`.
#[derive(Debug)]
pub struct ExpSmoothingConfigBuilder {
    config: ExpSmoothingConfig,
}

impl ExpSmoothingConfigBuilder {
    /// Create a builder with default estimator settings.
    #[must_use]
    pub fn new<I, S>(
        features: I,
        predict: impl Into<String>,
        directory: impl Into<PathBuf>,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            config: ExpSmoothingConfig {
                features: features.into_iter().map(Into::into).collect(),
                predict: predict.into(),
                directory: directory.into(),
                seasonal_periodicity: default_seasonal_periodicity(),
                horizon: None,
                seasonal: SeasonalType::default(),
                smoothing_level: default_smoothing_level(),
                smoothing_trend: default_smoothing_trend(),
                smoothing_seasonal: default_smoothing_seasonal(),
            },
        }
    }

    /// Set the seasonal periodicity.
    #[must_use]
    pub const fn seasonal_periodicity(mut self, periodicity: usize) -> Self {
        self.config.seasonal_periodicity = periodicity;
        self
    }

    /// Set the forecasting horizon used by `predict`.
    #[must_use]
    pub const fn horizon(mut self, steps: usize) -> Self {
        self.config.horizon = Some(steps);
        self
    }

    /// Set the seasonality type.
    #[must_use]
    pub const fn seasonal(mut self, seasonal: SeasonalType) -> Self {
        self.config.seasonal = seasonal;
        self
    }

    /// Set the level, trend and seasonal smoothing parameters.
    #[must_use]
    pub const fn smoothing(mut self, level: f64, trend: f64, seasonal: f64) -> Self {
        self.config.smoothing_level = level;
        self.config.smoothing_trend = trend;
        self.config.smoothing_seasonal = seasonal;
        self
    }

    /// Validate and build the configuration.
    ///
    /// # Errors
    /// Returns the `ExpSmoothingConfig::validate` errors
    pub fn build(self) -> Result<ExpSmoothingConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
