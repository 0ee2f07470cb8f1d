//! Core data structures for the forecasting engine.

mod result;
mod series;

pub use result::{ForecastStatistics, PredictionResult, SeriesPoint};
pub use series::{
    detect_format, detect_interval, project_time, sort_by_time, HistoricalPoint, TimeFormat,
};
