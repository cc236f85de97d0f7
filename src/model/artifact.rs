//! Model Artifact - the persisted form of a trained estimator

use crate::forecast::HoltWinters;
use crate::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::debug;

/// File name of the saved estimator inside the model directory.
pub const ARTIFACT_FILE_NAME: &str = "forecaster.json";

/// A trained estimator plus the metadata needed to reuse it.
///
/// Written once at the end of a successful training run and read back by
/// later model instances, so prediction does not require retraining.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ModelArtifact {
    features: Vec<String>,
    num_records: usize,
    trained_at: DateTime<Utc>,
    forecaster: HoltWinters,
}

impl ModelArtifact {
    /// Wrap a fitted estimator.
    ///
    /// # Arguments
    ///
    /// * `features` - Features the estimator was trained on
    /// * `forecaster` - The fitted estimator
    #[must_use]
    pub fn new(features: Vec<String>, forecaster: HoltWinters) -> Self {
        Self {
            features,
            num_records: forecaster.num_observations(),
            trained_at: Utc::now(),
            forecaster,
        }
    }

    /// Features the estimator was trained on.
    #[must_use]
    pub fn features(&self) -> &[String] {
        &self.features
    }

    /// Number of training records.
    #[must_use]
    pub const fn num_records(&self) -> usize {
        self.num_records
    }

    /// When training finished.
    #[must_use]
    pub const fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// The fitted estimator.
    #[must_use]
    pub const fn forecaster(&self) -> &HoltWinters {
        &self.forecaster
    }

    /// Write the artifact to `path`.
    ///
    /// The data goes to a sibling temporary file which is then renamed over
    /// `path`, so readers never observe a partial artifact.
    ///
    /// # Errors
    /// Returns `Io` or `Serialization` errors
    pub async fn write(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let bytes = serde_json::to_vec(self)?;
        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, &bytes).await?;
        tokio::fs::rename(&tmp, path).await?;

        debug!(path = %path.display(), size_bytes = bytes.len(), "wrote model artifact");
        Ok(())
    }

    /// Read an artifact, returning `None` if `path` does not exist.
    ///
    /// # Errors
    /// Returns `Io` errors other than not-found, or `Serialization` for a
    /// corrupt artifact
    pub async fn read(path: &Path) -> Result<Option<Self>> {
        let bytes = match tokio::fs::read(path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_slice(&bytes)?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::forecast::{Forecaster, SeasonalType};

    fn fitted() -> HoltWinters {
        let mut model = HoltWinters::new(0.3, 0.1, 0.2, 4, SeasonalType::Additive).unwrap();
        model
            .fit(&[1.0, 2.0, 3.0, 4.0, 2.0, 3.0, 4.0, 5.0])
            .unwrap();
        model
    }

    #[tokio::test]
    async fn test_write_then_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(ARTIFACT_FILE_NAME);

        let artifact = ModelArtifact::new(vec!["y".to_string()], fitted());
        artifact.write(&path).await.unwrap();

        let loaded = ModelArtifact::read(&path).await.unwrap().unwrap();
        assert_eq!(loaded, artifact);
        assert_eq!(loaded.num_records(), 8);
        assert!(!path.with_extension("json.tmp").exists());
    }

    #[tokio::test]
    async fn test_read_missing() {
        let dir = tempfile::tempdir().unwrap();
        let loaded = ModelArtifact::read(&dir.path().join(ARTIFACT_FILE_NAME))
            .await
            .unwrap();
        assert!(loaded.is_none());
    }

    #[tokio::test]
    async fn test_read_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(ARTIFACT_FILE_NAME);
        tokio::fs::write(&path, b"not json").await.unwrap();

        assert!(ModelArtifact::read(&path).await.is_err());
    }
}
