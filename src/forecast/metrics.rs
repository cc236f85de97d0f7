//! Forecast accuracy metrics

use crate::{Error, Result};

/// Symmetric Mean Absolute Percentage Error (sMAPE)
///
/// `mean(2 * |a - p| / (|a| + |p|))`, a fraction in `[0, 2]`; `0` is a
/// perfect forecast. Points where actual and predicted are both zero have no
/// defined term and are left out of the mean. If every point is left out the
/// forecasts are exact and the score is `0`.
///
/// # Errors
/// Returns `InvalidInput` if the slices differ in length or are empty
#[allow(clippy::cast_precision_loss)]
pub fn smape(actual: &[f64], predicted: &[f64]) -> Result<f64> {
    if actual.len() != predicted.len() {
        return Err(Error::InvalidInput(format!(
            "sMAPE needs equal lengths: {} actual vs {} predicted",
            actual.len(),
            predicted.len()
        )));
    }
    if actual.is_empty() {
        return Err(Error::InvalidInput("sMAPE of an empty series".to_string()));
    }

    let (sum, count) = actual
        .iter()
        .zip(predicted)
        .filter_map(|(a, p)| {
            let denom = a.abs() + p.abs();
            (denom > 0.0).then(|| 2.0 * (a - p).abs() / denom)
        })
        .fold((0.0, 0_usize), |(sum, count), term| (sum + term, count + 1));

    if count == 0 {
        return Ok(0.0);
    }
    Ok(sum / count as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_smape_perfect() {
        let y = [1.0, 2.0, 3.0];
        assert!(smape(&y, &y).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn test_smape_known_value() {
        // |100-110| * 2 / 210 = 0.095238...
        let score = smape(&[100.0], &[110.0]).unwrap();
        assert!((score - 20.0 / 210.0).abs() < 1e-12);
    }

    #[test]
    fn test_smape_excludes_double_zero() {
        let score = smape(&[0.0, 100.0], &[0.0, 110.0]).unwrap();
        assert!((score - 20.0 / 210.0).abs() < 1e-12);
        assert!(smape(&[0.0], &[0.0]).unwrap().abs() < f64::EPSILON);
    }

    #[test]
    fn test_smape_one_sided_zero_is_maximal() {
        assert!((smape(&[0.0], &[5.0]).unwrap() - 2.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_smape_errors() {
        assert!(smape(&[], &[]).is_err());
        assert!(smape(&[1.0], &[1.0, 2.0]).is_err());
    }
}
