//! Exponential smoothing model tests
//!
//! Train / accuracy / predict lifecycle against a `DataFrameSource`, plus
//! estimator persistence across model instances.

use frame_forecast::model::{ExpSmoothingConfig, ExpSmoothingModel, Model, ARTIFACT_FILE_NAME};
use frame_forecast::record::Value;
use frame_forecast::source::{DataFrameSource, DataFrameSourceConfig};
use frame_forecast::table::{ColumnType, Table};
use frame_forecast::Error;
use std::path::Path;

/// Trending monthly series with a yearly cycle.
fn seasonal_series(len: usize) -> Vec<f64> {
    (0..len)
        .map(|t| {
            let t = t as f64;
            100.0 + 2.0 * t + 20.0 * (t * std::f64::consts::PI / 6.0).sin()
        })
        .collect()
}

fn series_source(values: &[f64]) -> DataFrameSource {
    let mut table = Table::new([("y", ColumnType::Float64)]).unwrap();
    for (i, value) in values.iter().enumerate() {
        table.push_row(i.to_string(), vec![Value::Float(*value)]).unwrap();
    }
    DataFrameSource::new(
        DataFrameSourceConfig::builder(table.into_shared())
            .feature_cols(["y"])
            .build()
            .unwrap(),
    )
}

fn model_config(directory: &Path) -> ExpSmoothingConfig {
    ExpSmoothingConfig::builder(["y"], "y", directory)
        .seasonal_periodicity(12)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_accuracy_before_train() {
    let dir = tempfile::tempdir().unwrap();
    let model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let source = series_source(&seasonal_series(48));

    let err = model.accuracy(&source).await.unwrap_err();
    assert!(matches!(err, Error::ModelNotTrained(_)));
}

#[tokio::test]
async fn test_predict_before_train() {
    let dir = tempfile::tempdir().unwrap();
    let model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let source = series_source(&seasonal_series(48));

    let err = model.predict(&source).await.unwrap_err();
    assert!(matches!(err, Error::ModelNotTrained(_)));
    assert!(err.to_string().contains("Train the model first"));
}

#[tokio::test]
async fn test_train_writes_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let source = series_source(&seasonal_series(48));

    model.train(&source).await.unwrap();

    assert!(model.is_trained());
    assert!(dir.path().join(ARTIFACT_FILE_NAME).exists());
    let artifact = model.artifact().unwrap();
    assert_eq!(artifact.num_records(), 48);
    assert_eq!(artifact.features(), ["y".to_string()]);
}

#[tokio::test]
async fn test_train_creates_missing_directory() {
    let dir = tempfile::tempdir().unwrap();
    let nested = dir.path().join("models").join("airline");
    let mut model = ExpSmoothingModel::new(model_config(&nested)).unwrap();

    model
        .train(&series_source(&seasonal_series(36)))
        .await
        .unwrap();

    assert!(nested.join(ARTIFACT_FILE_NAME).exists());
}

#[tokio::test]
async fn test_predict_keys_follow_training_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let source = series_source(&seasonal_series(48));
    model.train(&source).await.unwrap();

    let predictions = model.predict(&source).await.unwrap();

    let keys: Vec<&str> = predictions.iter().map(|r| r.key()).collect();
    let expected: Vec<String> = (48..60).map(|i| i.to_string()).collect();
    assert_eq!(keys, expected);

    for record in &predictions {
        let value = record
            .prediction("y")
            .and_then(|p| p.value())
            .and_then(Value::as_f64)
            .unwrap();
        assert!(value.is_finite());
        assert!(value > 100.0 && value < 300.0, "forecast {value} out of range");
    }
}

#[tokio::test]
async fn test_predict_uses_configured_horizon() {
    let dir = tempfile::tempdir().unwrap();
    let config = ExpSmoothingConfig::builder(["y"], "y", dir.path())
        .seasonal_periodicity(12)
        .horizon(3)
        .build()
        .unwrap();
    let mut model = ExpSmoothingModel::new(config).unwrap();
    let source = series_source(&seasonal_series(24));
    model.train(&source).await.unwrap();

    let predictions = model.predict(&source).await.unwrap();
    assert_eq!(predictions.len(), 3);
    assert_eq!(predictions[0].key(), "24");
}

#[tokio::test]
async fn test_accuracy_on_clean_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let source = series_source(&seasonal_series(48));
    model.train(&source).await.unwrap();

    let accuracy = model.accuracy(&source).await.unwrap();
    assert!(accuracy.value() >= 0.0);
    assert!(accuracy.value() < 0.2, "sMAPE {accuracy} too high");
}

#[tokio::test]
async fn test_reload_predicts_without_retraining() {
    let dir = tempfile::tempdir().unwrap();
    let source = series_source(&seasonal_series(48));

    let mut trained = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    trained.train(&source).await.unwrap();
    let expected = trained.predict(&source).await.unwrap();

    let reloaded = ExpSmoothingModel::open(model_config(dir.path()))
        .await
        .unwrap();
    assert!(reloaded.is_trained());
    assert_eq!(reloaded.predict(&source).await.unwrap(), expected);
}

#[tokio::test]
async fn test_open_without_artifact_is_untrained() {
    let dir = tempfile::tempdir().unwrap();
    let model = ExpSmoothingModel::open(model_config(dir.path()))
        .await
        .unwrap();
    assert!(!model.is_trained());
}

#[tokio::test]
async fn test_insufficient_data_leaves_no_artifact() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();

    let err = model
        .train(&series_source(&seasonal_series(10)))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        Error::InsufficientData {
            required: 24,
            actual: 10
        }
    ));
    assert!(!model.is_trained());
    assert!(!dir.path().join(ARTIFACT_FILE_NAME).exists());
}

#[tokio::test]
async fn test_train_skips_rows_with_missing_features() {
    let dir = tempfile::tempdir().unwrap();
    let values = seasonal_series(24);

    let mut table = Table::new([("y", ColumnType::Float64)]).unwrap();
    for (i, value) in values.iter().enumerate() {
        table.push_row(i.to_string(), vec![Value::Float(*value)]).unwrap();
    }
    table.push_row("gap", vec![Value::Null]).unwrap();
    let source = DataFrameSource::new(
        DataFrameSourceConfig::builder(table.into_shared())
            .feature_cols(["y"])
            .build()
            .unwrap(),
    );

    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    model.train(&source).await.unwrap();

    assert_eq!(model.artifact().unwrap().num_records(), 24);
}

#[tokio::test]
async fn test_multiplicative_rejects_non_positive_series() {
    let dir = tempfile::tempdir().unwrap();
    let mut model = ExpSmoothingModel::new(model_config(dir.path())).unwrap();
    let mut values = seasonal_series(24);
    values[5] = 0.0;

    let err = model.train(&series_source(&values)).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

/// Source with a training column `y` and a separate target column `z`.
fn target_source(y: &[f64], z: &[Option<f64>]) -> DataFrameSource {
    let mut table = Table::new([("y", ColumnType::Float64), ("z", ColumnType::Float64)]).unwrap();
    for (i, (y, z)) in y.iter().zip(z).enumerate() {
        table
            .push_row(i.to_string(), vec![Value::Float(*y), (*z).into()])
            .unwrap();
    }
    DataFrameSource::new(
        DataFrameSourceConfig::builder(table.into_shared())
            .feature_cols(["y", "z"])
            .build()
            .unwrap(),
    )
}

fn target_config(directory: &Path) -> ExpSmoothingConfig {
    ExpSmoothingConfig::builder(["y"], "z", directory)
        .seasonal_periodicity(12)
        .build()
        .unwrap()
}

#[tokio::test]
async fn test_accuracy_scores_against_target_column() {
    let dir = tempfile::tempdir().unwrap();
    let y = seasonal_series(48);

    // Target equal to the training feature scores like a self-target model
    let same: Vec<Option<f64>> = y.iter().copied().map(Some).collect();
    let source = target_source(&y, &same);
    let mut model = ExpSmoothingModel::new(target_config(dir.path())).unwrap();
    model.train(&source).await.unwrap();
    let close = model.accuracy(&source).await.unwrap();
    assert!(close.value() < 0.2, "sMAPE {close} too high");

    // Target at twice the feature level is far from the forecast
    let doubled: Vec<Option<f64>> = y.iter().map(|v| Some(v * 2.0)).collect();
    let far = model.accuracy(&target_source(&y, &doubled)).await.unwrap();
    assert!(far.value() > 0.5, "sMAPE {far} should reflect the target column");
    assert!(far > close);
}

#[tokio::test]
async fn test_accuracy_skips_rows_without_target() {
    let dir = tempfile::tempdir().unwrap();
    let y = seasonal_series(48);

    // The last six rows carry the feature but no target
    let z: Vec<Option<f64>> = y
        .iter()
        .enumerate()
        .map(|(i, v)| (i < 42).then_some(*v))
        .collect();
    let source = target_source(&y, &z);

    let mut model = ExpSmoothingModel::new(target_config(dir.path())).unwrap();
    model.train(&source).await.unwrap();
    assert_eq!(model.artifact().unwrap().num_records(), 48);

    let accuracy = model.accuracy(&source).await.unwrap();
    assert!(accuracy.value().is_finite());
    assert!(accuracy.value() < 0.2, "sMAPE {accuracy} too high");
}

#[tokio::test]
async fn test_accuracy_without_any_target_fails() {
    let dir = tempfile::tempdir().unwrap();
    let y = seasonal_series(24);
    let source = target_source(&y, &vec![None; 24]);

    let mut model = ExpSmoothingModel::new(target_config(dir.path())).unwrap();
    model.train(&source).await.unwrap();

    let err = model.accuracy(&source).await.unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}

#[test]
fn test_config_rejects_empty_features() {
    let err = ExpSmoothingConfig::builder(Vec::<String>::new(), "y", "/tmp/unused")
        .build()
        .unwrap_err();
    assert!(matches!(err, Error::InvalidInput(_)));
}
