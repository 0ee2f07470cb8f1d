//! Forecasting orchestrator: validation, time handling, model dispatch, and
//! result assembly.
//!
//! The pipeline is a fixed sequence: validate the request, sort the history,
//! infer the time format and sampling interval, run the selected model over
//! the value sequence, project future timestamps, and summarize. Every call
//! is a pure function of its inputs.

use crate::core::{
    detect_format, detect_interval, project_time, sort_by_time, ForecastStatistics,
    HistoricalPoint, PredictionResult, SeriesPoint,
};
use crate::error::{ForecastError, Result};
use crate::models::{ModelKind, ModelOptions};

/// Produce a multi-period forecast for the given history.
///
/// `periods` must be positive and the history must hold at least 2 points;
/// per-model minimums are enforced at dispatch, before any computation, and
/// model failures come back wrapped with the model name.
pub fn forecast(
    points: &[HistoricalPoint],
    periods: i64,
    model: &ModelKind,
) -> Result<PredictionResult> {
    if periods <= 0 {
        return Err(ForecastError::InvalidPeriods(periods));
    }
    if points.len() < 2 {
        return Err(ForecastError::InsufficientData {
            needed: 2,
            got: points.len(),
        });
    }

    let sorted = sort_by_time(points);
    let format = detect_format(&sorted);
    let interval = detect_interval(&sorted, format);
    let values: Vec<f64> = sorted.iter().map(|p| p.value).collect();

    let raw = model.forecast(&values, periods as usize)?;

    let last_time = sorted[sorted.len() - 1].time;
    let predictions: Vec<SeriesPoint> = raw
        .iter()
        .enumerate()
        .map(|(i, &value)| SeriesPoint {
            time: project_time(last_time, format, interval, i as i64 + 1),
            value,
            is_prediction: true,
        })
        .collect();

    let historical_data: Vec<SeriesPoint> = sorted
        .iter()
        .map(|p| SeriesPoint {
            time: p.time,
            value: p.value,
            is_prediction: false,
        })
        .collect();

    let avg_value = values.iter().sum::<f64>() / values.len() as f64;
    let last_value = values[values.len() - 1];
    let predicted_value = raw[raw.len() - 1];
    let growth_rate = if last_value != 0.0 {
        Some((predicted_value - last_value) / last_value * 100.0)
    } else {
        None
    };

    Ok(PredictionResult {
        predictions,
        historical_data,
        statistics: ForecastStatistics {
            avg_value,
            last_value,
            predicted_value,
            growth_rate,
        },
        time_interval: interval,
        time_format: format,
        model: model.selector().to_string(),
    })
}

/// Forecast from the wire-level contract: a selector string plus an optional
/// bag of model parameters.
pub fn forecast_named(
    points: &[HistoricalPoint],
    periods: i64,
    selector: &str,
    options: &ModelOptions,
) -> Result<PredictionResult> {
    let model = ModelKind::resolve(selector, options)?;
    forecast(points, periods, &model)
}
