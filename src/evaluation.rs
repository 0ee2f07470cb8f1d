//! Forecast accuracy metrics and train/test backtesting.

use crate::defaults;
use crate::error::{ForecastError, Result};
use crate::models::ModelKind;
use serde::Serialize;

/// The four accuracy metrics reported by a backtest.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EvaluationMetrics {
    /// Mean absolute error.
    pub mae: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute percentage error over non-zero actuals.
    pub mape: f64,
    /// Coefficient of determination.
    pub r_squared: f64,
}

/// Mean absolute error. NaN on empty or mismatched input.
pub fn mae(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).abs())
        .sum::<f64>()
        / actual.len() as f64
}

/// Root mean squared error. NaN on empty or mismatched input.
pub fn rmse(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    (actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum::<f64>()
        / actual.len() as f64)
        .sqrt()
}

/// Mean absolute percentage error, as a percentage.
///
/// Zero actuals are excluded from the denominator; a series with no non-zero
/// actual at all scores 0 rather than dividing by nothing.
pub fn mape(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    let mut sum = 0.0;
    let mut count = 0usize;
    for (a, p) in actual.iter().zip(predicted) {
        if *a != 0.0 {
            sum += ((a - p) / a).abs();
            count += 1;
        }
    }
    if count == 0 {
        0.0
    } else {
        100.0 * sum / count as f64
    }
}

/// Coefficient of determination `1 − SSres/SStot`.
///
/// A constant actual series has `SStot = 0`; that scores 0, not NaN.
pub fn r_squared(actual: &[f64], predicted: &[f64]) -> f64 {
    if actual.is_empty() || actual.len() != predicted.len() {
        return f64::NAN;
    }
    let mean = actual.iter().sum::<f64>() / actual.len() as f64;
    let ss_tot: f64 = actual.iter().map(|a| (a - mean).powi(2)).sum();
    if ss_tot == 0.0 {
        return 0.0;
    }
    let ss_res: f64 = actual
        .iter()
        .zip(predicted)
        .map(|(a, p)| (a - p).powi(2))
        .sum();
    1.0 - ss_res / ss_tot
}

/// All four metrics at once, with the input contract enforced.
pub fn evaluate(actual: &[f64], predicted: &[f64]) -> Result<EvaluationMetrics> {
    if actual.is_empty() {
        return Err(ForecastError::InsufficientData { needed: 1, got: 0 });
    }
    if actual.len() != predicted.len() {
        return Err(ForecastError::DimensionMismatch {
            expected: actual.len(),
            got: predicted.len(),
        });
    }

    Ok(EvaluationMetrics {
        mae: mae(actual, predicted),
        rmse: rmse(actual, predicted),
        mape: mape(actual, predicted),
        r_squared: r_squared(actual, predicted),
    })
}

/// Outcome of one chronological train/test backtest.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BacktestReport {
    pub metrics: EvaluationMetrics,
    /// Held-out actual values.
    pub actual: Vec<f64>,
    /// Model forecasts for the held-out window.
    pub predicted: Vec<f64>,
    pub train_size: usize,
    pub test_size: usize,
}

/// Backtest an arbitrary forecasting function.
///
/// The series is split chronologically: the model fits on the leading
/// `1 − test_ratio` share and forecasts the held-out suffix. Needs at least
/// 5 points, 2 of them for training and 1 held out.
pub fn backtest<F>(values: &[f64], forecast_fn: F, test_ratio: f64) -> Result<BacktestReport>
where
    F: Fn(&[f64], usize) -> Result<Vec<f64>>,
{
    let n = values.len();
    if n < 5 {
        return Err(ForecastError::InsufficientData { needed: 5, got: n });
    }
    if !(0.0..1.0).contains(&test_ratio) || test_ratio == 0.0 {
        return Err(ForecastError::InvalidParameter(format!(
            "test ratio must be in (0, 1), got {test_ratio}"
        )));
    }

    let test_size = ((n as f64 * test_ratio) as usize).max(1);
    let train_size = n - test_size;
    if train_size < 2 {
        return Err(ForecastError::InsufficientData {
            needed: test_size + 2,
            got: n,
        });
    }

    let predicted = forecast_fn(&values[..train_size], test_size)?;
    let actual = values[train_size..].to_vec();
    let metrics = evaluate(&actual, &predicted)?;

    Ok(BacktestReport {
        metrics,
        actual,
        predicted,
        train_size,
        test_size,
    })
}

/// Backtest a [`ModelKind`] with the default 20% held-out share.
pub fn backtest_model(values: &[f64], model: &ModelKind) -> Result<BacktestReport> {
    backtest(
        values,
        |train, horizon| model.forecast(train, horizon),
        defaults::BACKTEST_RATIO,
    )
}
