//! Confidence intervals around point forecasts.
//!
//! Linear regression gets the analytic prediction interval built from its
//! residual standard error and leverage term. Every other family gets the
//! blunt `prediction ± z · σ` band from the historical spread, which is what
//! a short noisy series can honestly support.

use crate::defaults;
use crate::error::{ForecastError, Result};
use crate::models::linear::LinearFit;
use crate::models::ModelKind;
use serde::Serialize;

/// One lower/upper interval pair per prediction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ConfidenceInterval {
    pub lower: f64,
    pub upper: f64,
}

/// Compute intervals for the given predictions at the given level
/// (0.95 or 0.99; anything below 0.99 uses the 95% multiplier).
///
/// Lower bounds are floored at zero in both paths.
pub fn intervals(
    values: &[f64],
    predictions: &[f64],
    model: &ModelKind,
    level: f64,
) -> Result<Vec<ConfidenceInterval>> {
    let n = values.len();
    if n < 2 {
        return Err(ForecastError::InsufficientData { needed: 2, got: n });
    }

    match model {
        ModelKind::Linear => linear_intervals(values, predictions),
        _ => sigma_intervals(values, predictions, level),
    }
}

/// Analytic interval for the regression line: residual standard error times
/// the leverage term `1 + 1/n + (x_new − x̄)² / Sxx`, with a coarse
/// t-multiplier (1.96 beyond n = 30, otherwise 2.0).
fn linear_intervals(values: &[f64], predictions: &[f64]) -> Result<Vec<ConfidenceInterval>> {
    let n = values.len();
    let fit = LinearFit::fit(values)?;

    let sse: f64 = fit.residuals(values).iter().map(|r| r * r).sum();
    let dof = n.saturating_sub(2).max(1);
    let residual_se = (sse / dof as f64).sqrt();

    let x_mean = (n as f64 - 1.0) / 2.0;
    let sxx: f64 = (0..n).map(|i| (i as f64 - x_mean).powi(2)).sum();

    let t = if n > defaults::T_CUTOFF_N {
        defaults::T_LARGE_SAMPLE
    } else {
        defaults::T_SMALL_SAMPLE
    };

    Ok(predictions
        .iter()
        .enumerate()
        .map(|(i, &pred)| {
            let x_new = (n + i) as f64;
            let leverage = 1.0 + 1.0 / n as f64 + (x_new - x_mean).powi(2) / sxx;
            let margin = t * residual_se * leverage.sqrt();
            ConfidenceInterval {
                lower: (pred - margin).max(0.0),
                upper: pred + margin,
            }
        })
        .collect())
}

/// `prediction ± z · σ` from the population standard deviation of the
/// historical series.
fn sigma_intervals(
    values: &[f64],
    predictions: &[f64],
    level: f64,
) -> Result<Vec<ConfidenceInterval>> {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let sigma = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();

    let z = if level >= 0.99 {
        defaults::Z_99
    } else {
        defaults::Z_95
    };

    Ok(predictions
        .iter()
        .map(|&pred| ConfidenceInterval {
            lower: (pred - z * sigma).max(0.0),
            upper: pred + z * sigma,
        })
        .collect())
}
