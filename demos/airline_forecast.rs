//! Airline passengers forecast
//!
//! Trains a multiplicative Holt-Winters model on the classic monthly airline
//! passengers series (1949-1960), reports in-sample sMAPE and prints a
//! one-year forecast.
//!
//! Run with: cargo run --example airline_forecast
//! Set `RUST_LOG=frame_forecast=debug` to see training logs.

use frame_forecast::model::{ExpSmoothingConfig, ExpSmoothingModel, Model};
use frame_forecast::record::Value;
use frame_forecast::source::{DataFrameSource, DataFrameSourceConfig};
use frame_forecast::table::{ColumnType, Table};
use tracing_subscriber::EnvFilter;

#[rustfmt::skip]
const PASSENGERS: [i64; 144] = [
    112, 118, 132, 129, 121, 135, 148, 148, 136, 119, 104, 118,
    115, 126, 141, 135, 125, 149, 170, 170, 158, 133, 114, 140,
    145, 150, 178, 163, 172, 178, 199, 199, 184, 162, 146, 166,
    171, 180, 193, 181, 183, 218, 230, 242, 209, 191, 172, 194,
    196, 196, 236, 235, 229, 243, 264, 272, 237, 211, 180, 201,
    204, 188, 235, 227, 234, 264, 302, 293, 259, 229, 203, 229,
    242, 233, 267, 269, 270, 315, 364, 347, 312, 274, 237, 278,
    284, 277, 317, 313, 318, 374, 413, 405, 355, 306, 271, 306,
    315, 301, 356, 348, 355, 422, 465, 467, 404, 347, 305, 336,
    340, 318, 362, 348, 363, 435, 491, 505, 404, 359, 310, 337,
    360, 342, 406, 396, 420, 472, 548, 559, 463, 407, 362, 405,
    417, 391, 419, 461, 472, 535, 622, 606, 508, 461, 390, 432,
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Airline Passengers Forecast ===\n");

    // Month labels 1949-01 .. 1960-12
    let mut table = Table::new([("passengers", ColumnType::Int64)])?;
    for (i, passengers) in PASSENGERS.iter().enumerate() {
        let label = format!("{}-{:02}", 1949 + i / 12, i % 12 + 1);
        table.push_row(label, vec![Value::Int(*passengers)])?;
    }
    println!("Loaded {} months", table.num_rows());

    let source = DataFrameSource::new(
        DataFrameSourceConfig::builder(table.into_shared())
            .feature_cols(["passengers"])
            .build()?,
    );

    let directory = std::env::temp_dir().join("frame-forecast-airline");
    let config = ExpSmoothingConfig::builder(["passengers"], "passengers", &directory)
        .seasonal_periodicity(12)
        .horizon(12)
        .build()?;

    let mut model = ExpSmoothingModel::new(config)?;
    model.train(&source).await?;
    println!("Model saved to {}", model.artifact_path().display());

    let accuracy = model.accuracy(&source).await?;
    println!("In-sample sMAPE: {:.4}\n", accuracy.value());

    println!("Step  Forecast");
    for record in model.predict(&source).await? {
        let value = record
            .prediction("passengers")
            .and_then(|p| p.value())
            .and_then(Value::as_f64)
            .unwrap_or(f64::NAN);
        println!("{:>4}  {value:>8.1}", record.key());
    }

    Ok(())
}
