//! # frame-forecast: Table Sources and Forecast Models
//!
//! Two adapters binding an in-memory table and an exponential-smoothing
//! forecaster to a small record/model plugin contract:
//!
//! - [`source::DataFrameSource`] exposes a shared [`table::Table`] as an
//!   iterable, updatable record store.
//! - [`model::ExpSmoothingModel`] trains a Holt-Winters forecaster from any
//!   [`source::Source`], scores it with sMAPE and forecasts a configured
//!   horizon. The fitted estimator is saved to disk and reloaded by later
//!   instances.
//!
//! ## Example
//!
//! ```rust,no_run
//! use frame_forecast::model::{ExpSmoothingConfig, ExpSmoothingModel, Model};
//! use frame_forecast::source::{DataFrameSource, DataFrameSourceConfig};
//! use frame_forecast::table::Table;
//!
//! # async fn run() -> frame_forecast::Result<()> {
//! let table = Table::load_parquet("data/airline.parquet")?.into_shared();
//! let source = DataFrameSource::new(
//!     DataFrameSourceConfig::builder(table)
//!         .feature_cols(["passengers"])
//!         .build()?,
//! );
//!
//! let config = ExpSmoothingConfig::builder(["passengers"], "passengers", "models/airline")
//!     .build()?;
//! let mut model = ExpSmoothingModel::new(config)?;
//! model.train(&source).await?;
//!
//! let forecast = model.predict(&source).await?;
//! println!("{} steps forecast", forecast.len());
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

pub mod error;
pub mod forecast;
pub mod model;
pub mod record;
pub mod source;
pub mod table;

pub use error::{Error, Result};
