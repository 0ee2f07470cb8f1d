//! Structured forecast result returned to the caller.

use crate::core::series::TimeFormat;
use serde::Serialize;

/// One point of the combined historical-plus-forecast series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesPoint {
    /// Integer-coded timestamp, same encoding as the input series.
    pub time: i64,
    /// Observed or predicted value.
    pub value: f64,
    /// `true` for forecast points, `false` for echoed history.
    pub is_prediction: bool,
}

/// Summary statistics computed over the historical series and the forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ForecastStatistics {
    /// Mean of the historical values.
    pub avg_value: f64,
    /// Last historical value in time order.
    pub last_value: f64,
    /// Final predicted value at the end of the horizon.
    pub predicted_value: f64,
    /// Percentage change from the last historical value to the final
    /// prediction. `None` when the last value is zero.
    pub growth_rate: Option<f64>,
}

/// The complete output of one forecasting call.
///
/// Immutable once produced; every call builds a fresh result from its own
/// inputs with no shared state between calls.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PredictionResult {
    /// Forecast points, flagged `isPrediction: true`.
    pub predictions: Vec<SeriesPoint>,
    /// Echoed historical points in time order, flagged `isPrediction: false`,
    /// so a consumer can render one continuous series.
    pub historical_data: Vec<SeriesPoint>,
    /// Summary statistics.
    pub statistics: ForecastStatistics,
    /// Detected sampling interval (months or years per step).
    pub time_interval: i64,
    /// Detected timestamp encoding.
    pub time_format: TimeFormat,
    /// Selector of the model that produced the forecast.
    pub model: String,
}
