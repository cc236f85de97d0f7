//! Exponential smoothing forecast model
//!
//! Adapts [`HoltWinters`] to the [`Model`] lifecycle. Training rows are taken
//! in source order, which is the time order of the fitted series.

use super::{Accuracy, ExpSmoothingConfig, Model, ModelArtifact, ARTIFACT_FILE_NAME};
use crate::forecast::{smape, Forecaster, ForecastingHorizon, HoltWinters};
use crate::record::{Prediction, Record};
use crate::source::Source;
use crate::{Error, Result};
use std::path::PathBuf;
use tracing::{debug, info, warn};

/// Forecast model backed by Holt-Winters exponential smoothing.
///
/// The trained estimator is an owned field; it is set by [`Model::train`] or
/// [`ExpSmoothingModel::load`] and written to
/// `<directory>/forecaster.json`.
#[derive(Debug)]
pub struct ExpSmoothingModel {
    config: ExpSmoothingConfig,
    state: Option<ModelArtifact>,
}

impl ExpSmoothingModel {
    /// Create an untrained model.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid
    pub fn new(config: ExpSmoothingConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            state: None,
        })
    }

    /// Create a model and load a previously saved estimator, if any.
    ///
    /// # Errors
    /// Returns error if the configuration is invalid or the artifact exists
    /// but cannot be read
    pub async fn open(config: ExpSmoothingConfig) -> Result<Self> {
        let mut model = Self::new(config)?;
        model.load().await?;
        Ok(model)
    }

    /// The model configuration.
    #[must_use]
    pub const fn config(&self) -> &ExpSmoothingConfig {
        &self.config
    }

    /// Whether a trained estimator is held.
    #[must_use]
    pub const fn is_trained(&self) -> bool {
        self.state.is_some()
    }

    /// The trained artifact, if any.
    #[must_use]
    pub const fn artifact(&self) -> Option<&ModelArtifact> {
        self.state.as_ref()
    }

    /// Location of the saved estimator.
    #[must_use]
    pub fn artifact_path(&self) -> PathBuf {
        self.config.directory().join(ARTIFACT_FILE_NAME)
    }

    /// Save the trained estimator.
    ///
    /// # Errors
    /// Returns `ModelNotTrained` if there is nothing to save, or I/O errors
    pub async fn save(&self) -> Result<()> {
        let artifact = self
            .state
            .as_ref()
            .ok_or_else(|| Error::ModelNotTrained("Nothing to save".to_string()))?;
        artifact.write(&self.artifact_path()).await
    }

    /// Load the saved estimator.
    ///
    /// Returns `false` and leaves the model untouched if no artifact exists.
    ///
    /// # Errors
    /// Returns error if the artifact exists but cannot be read
    pub async fn load(&mut self) -> Result<bool> {
        let path = self.artifact_path();
        let Some(artifact) = ModelArtifact::read(&path).await? else {
            debug!(path = %path.display(), "no saved model artifact");
            return Ok(false);
        };

        if artifact.forecaster().period() != self.config.seasonal_periodicity() {
            warn!(
                saved = artifact.forecaster().period(),
                configured = self.config.seasonal_periodicity(),
                "saved estimator periodicity differs from configuration"
            );
        }

        info!(
            path = %path.display(),
            records = artifact.num_records(),
            trained_at = %artifact.trained_at(),
            "loaded model artifact"
        );
        self.state = Some(artifact);
        Ok(true)
    }

    fn trained(&self, message: &str) -> Result<&HoltWinters> {
        self.state
            .as_ref()
            .map(ModelArtifact::forecaster)
            .ok_or_else(|| Error::ModelNotTrained(message.to_string()))
    }

    /// Flatten a record's training features, in configured order, into one
    /// numeric row.
    fn feature_row(&self, record: &Record) -> Result<Vec<f64>> {
        let mut row = Vec::with_capacity(self.config.features().len());
        for name in self.config.features() {
            let value = record
                .feature(name)
                .ok_or_else(|| Error::ColumnNotFound(name.clone()))?;
            if !value.flatten_into(&mut row) {
                return Err(Error::TypeMismatch {
                    column: name.clone(),
                    expected: "numeric scalar or sequence".to_string(),
                    found: value.type_name().to_string(),
                });
            }
        }
        Ok(row)
    }
}

/// Reduce a training matrix to the single series the estimator fits.
fn univariate(rows: Vec<Vec<f64>>) -> Result<Vec<f64>> {
    rows.into_iter()
        .enumerate()
        .map(|(i, row)| match row.as_slice() {
            [value] => Ok(*value),
            other => Err(Error::InvalidInput(format!(
                "Training row {i} has {} values; the estimator fits a single series",
                other.len()
            ))),
        })
        .collect()
}

impl Model for ExpSmoothingModel {
    async fn train<S: Source>(&mut self, source: &S) -> Result<()> {
        let mut rows = Vec::new();
        for record in source.with_features(self.config.features()).await? {
            rows.push(self.feature_row(&record)?);
        }

        debug!("Number of training records: {}", rows.len());

        let mut forecaster = self.config.estimator()?;
        forecaster.fit(&univariate(rows)?)?;

        let artifact = ModelArtifact::new(self.config.features().to_vec(), forecaster);
        artifact.write(&self.artifact_path()).await?;

        info!(
            records = artifact.num_records(),
            periodicity = self.config.seasonal_periodicity(),
            "trained exponential smoothing model"
        );
        self.state = Some(artifact);
        Ok(())
    }

    async fn accuracy<S: Source>(&self, source: &S) -> Result<Accuracy> {
        let forecaster = self.trained("Train the model before assessing accuracy")?;

        let target = self.config.predict();
        let mut required = self.config.features().to_vec();
        if !required.iter().any(|f| f == target) {
            required.push(target.to_string());
        }

        let mut test_rows = Vec::new();
        let mut actual = Vec::new();
        for record in source.with_features(&required).await? {
            test_rows.push(self.feature_row(&record)?);

            let value = record
                .feature(target)
                .ok_or_else(|| Error::ColumnNotFound(target.to_string()))?;
            actual.push(value.as_f64().ok_or_else(|| Error::TypeMismatch {
                column: target.to_string(),
                expected: "numeric scalar".to_string(),
                found: value.type_name().to_string(),
            })?);
        }

        // Test rows are positioned by their index on the training timeline.
        let horizon = ForecastingHorizon::from_index(test_rows.len());
        let predicted = forecaster.predict(&horizon)?;
        let score = smape(&actual, &predicted)?;

        debug!(records = actual.len(), smape = score, "assessed accuracy");
        Ok(Accuracy::new(score))
    }

    /// Forecast the configured horizon.
    ///
    /// `source` is not read: the horizon comes from configuration, not from
    /// the records supplied.
    async fn predict<S: Source>(&self, _source: &S) -> Result<Vec<Record>> {
        let forecaster = self.trained("Train the model first before getting predictions")?;

        let horizon = ForecastingHorizon::relative(self.config.horizon());
        let values = forecaster.predict(&horizon)?;

        let cutoff = i64::try_from(forecaster.num_observations()).unwrap_or(i64::MAX) - 1;
        let target = self.config.predict();

        Ok(horizon
            .to_absolute(cutoff)
            .values()
            .iter()
            .zip(values)
            .map(|(position, value)| {
                Record::new(position.to_string())
                    .with_prediction(target, Prediction::from_value(value))
            })
            .collect())
    }
}
