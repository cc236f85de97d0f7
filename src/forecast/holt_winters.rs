//! Holt-Winters exponential smoothing
//!
//! Additive trend with additive or multiplicative seasonality:
//!
//! - Additive: `Y_t = Level + Trend + Season + Error`
//! - Multiplicative: `Y_t = (Level + Trend) * Season * Error`
//!
//! Smoothing parameters are fixed at construction; there is no optimiser.

use super::{Forecaster, ForecastingHorizon};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// Seasonal component type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SeasonalType {
    /// Seasonal offsets added to the trend line
    Additive,
    /// Seasonal factors scaling the trend line
    #[default]
    Multiplicative,
}

/// Triple exponential smoothing model.
///
/// # Example
///
/// ```rust
/// use frame_forecast::forecast::{Forecaster, ForecastingHorizon, HoltWinters, SeasonalType};
///
/// let data: Vec<f64> = (0..36)
///     .map(|i| 100.0 + f64::from(i) * 2.0 + 20.0 * (f64::from(i) * std::f64::consts::PI / 6.0).sin())
///     .collect();
///
/// let mut model = HoltWinters::new(0.3, 0.1, 0.2, 12, SeasonalType::Additive)?;
/// model.fit(&data)?;
/// let forecast = model.predict(&ForecastingHorizon::relative(12))?;
/// assert_eq!(forecast.len(), 12);
/// # Ok::<(), frame_forecast::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HoltWinters {
    alpha: f64,
    beta: f64,
    gamma: f64,
    period: usize,
    seasonal_type: SeasonalType,
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    /// One-step-ahead fitted values, one per training observation
    fitted_values: Vec<f64>,
}

impl HoltWinters {
    /// Create an unfitted model.
    ///
    /// # Arguments
    ///
    /// * `alpha` - Level smoothing (0 < alpha < 1)
    /// * `beta` - Trend smoothing (0 < beta < 1)
    /// * `gamma` - Seasonal smoothing (0 < gamma < 1)
    /// * `period` - Observations per seasonal cycle (at least 2)
    /// * `seasonal_type` - Additive or multiplicative seasonality
    ///
    /// # Errors
    /// Returns `InvalidParameter` if any argument is out of range
    pub fn new(
        alpha: f64,
        beta: f64,
        gamma: f64,
        period: usize,
        seasonal_type: SeasonalType,
    ) -> Result<Self> {
        check_unit_interval("alpha", alpha)?;
        check_unit_interval("beta", beta)?;
        check_unit_interval("gamma", gamma)?;
        if period < 2 {
            return Err(Error::InvalidParameter {
                name: "period".to_string(),
                reason: "must be at least 2".to_string(),
            });
        }

        Ok(Self {
            alpha,
            beta,
            gamma,
            period,
            seasonal_type,
            level: 0.0,
            trend: 0.0,
            seasonal: vec![0.0; period],
            fitted_values: Vec::new(),
        })
    }

    /// Seasonal period length
    #[must_use]
    pub const fn period(&self) -> usize {
        self.period
    }

    /// Seasonality type
    #[must_use]
    pub const fn seasonal_type(&self) -> SeasonalType {
        self.seasonal_type
    }

    /// Current (level, trend, seasonal) state
    #[must_use]
    pub fn components(&self) -> (f64, f64, &[f64]) {
        (self.level, self.trend, &self.seasonal)
    }

    /// Number of observations the model was fitted on
    #[must_use]
    pub fn num_observations(&self) -> usize {
        self.fitted_values.len()
    }

    /// One-step-ahead fitted values over the training range
    #[must_use]
    pub fn fitted_values(&self) -> &[f64] {
        &self.fitted_values
    }

    #[allow(clippy::cast_precision_loss)]
    fn initialize(&mut self, data: &[f64]) {
        let p = self.period;
        let first_avg = data[..p].iter().sum::<f64>() / p as f64;
        self.level = first_avg;

        // fit() guarantees two full seasons
        let second_avg = data[p..2 * p].iter().sum::<f64>() / p as f64;
        self.trend = (second_avg - first_avg) / p as f64;

        for (i, s) in self.seasonal.iter_mut().enumerate() {
            *s = match self.seasonal_type {
                SeasonalType::Additive => data[i] - first_avg,
                SeasonalType::Multiplicative => data[i] / first_avg,
            };
        }
    }

    fn combine(&self, base: f64, season: f64) -> f64 {
        match self.seasonal_type {
            SeasonalType::Additive => base + season,
            SeasonalType::Multiplicative => base * season,
        }
    }

    /// Out-of-sample forecast `steps` (>= 1) after the last observation.
    #[allow(clippy::cast_precision_loss)]
    fn forecast(&self, steps: usize) -> f64 {
        let n = self.fitted_values.len();
        let season = self.seasonal[(n + steps - 1) % self.period];
        self.combine(self.level + steps as f64 * self.trend, season)
    }
}

impl Forecaster for HoltWinters {
    fn fit(&mut self, data: &[f64]) -> Result<()> {
        let required = self.period * 2;
        if data.len() < required {
            return Err(Error::InsufficientData {
                required,
                actual: data.len(),
            });
        }
        if self.seasonal_type == SeasonalType::Multiplicative && data.iter().any(|v| *v <= 0.0) {
            return Err(Error::InvalidInput(
                "Multiplicative seasonality requires strictly positive data".to_string(),
            ));
        }
        if data.iter().any(|v| !v.is_finite()) {
            return Err(Error::InvalidInput(
                "Training series contains non-finite values".to_string(),
            ));
        }

        self.initialize(data);

        let mut fitted = Vec::with_capacity(data.len());
        for i in 0..self.period {
            fitted.push(self.combine(self.level, self.seasonal[i]));
        }

        for (i, &value) in data.iter().enumerate().skip(self.period) {
            let idx = i % self.period;
            let prev_level = self.level;
            let prev_seasonal = self.seasonal[idx];

            fitted.push(self.combine(self.level + self.trend, prev_seasonal));

            match self.seasonal_type {
                SeasonalType::Additive => {
                    self.level = self.alpha * (value - prev_seasonal)
                        + (1.0 - self.alpha) * (self.level + self.trend);
                    self.trend =
                        self.beta * (self.level - prev_level) + (1.0 - self.beta) * self.trend;
                    self.seasonal[idx] =
                        self.gamma * (value - self.level) + (1.0 - self.gamma) * prev_seasonal;
                }
                SeasonalType::Multiplicative => {
                    self.level = self.alpha * (value / prev_seasonal)
                        + (1.0 - self.alpha) * (self.level + self.trend);
                    self.trend =
                        self.beta * (self.level - prev_level) + (1.0 - self.beta) * self.trend;
                    self.seasonal[idx] = if self.level.abs() > 1e-10 {
                        self.gamma * (value / self.level) + (1.0 - self.gamma) * prev_seasonal
                    } else {
                        prev_seasonal
                    };
                }
            }
        }

        self.fitted_values = fitted;
        Ok(())
    }

    fn predict(&self, horizon: &ForecastingHorizon) -> Result<Vec<f64>> {
        if !self.is_fitted() {
            return Err(Error::ModelNotTrained(
                "Holt-Winters model has not been fitted".to_string(),
            ));
        }

        let n = self.fitted_values.len();
        let cutoff = i64::try_from(n).unwrap_or(i64::MAX) - 1;

        horizon
            .to_relative(cutoff)
            .values()
            .iter()
            .map(|&step| {
                if step >= 1 {
                    let steps = usize::try_from(step).map_err(|_| {
                        Error::InvalidInput(format!("Horizon step {step} too large"))
                    })?;
                    Ok(self.forecast(steps))
                } else {
                    let position = cutoff + step;
                    usize::try_from(position)
                        .ok()
                        .and_then(|p| self.fitted_values.get(p).copied())
                        .ok_or_else(|| {
                            Error::InvalidInput(format!(
                                "Horizon position {position} precedes the training data"
                            ))
                        })
                }
            })
            .collect()
    }

    fn is_fitted(&self) -> bool {
        !self.fitted_values.is_empty()
    }
}

fn check_unit_interval(name: &str, value: f64) -> Result<()> {
    if 0.0 < value && value < 1.0 {
        Ok(())
    } else {
        Err(Error::InvalidParameter {
            name: name.to_string(),
            reason: "must be between 0 and 1 (exclusive)".to_string(),
        })
    }
}
