//! # trendcast
//!
//! Time series forecasting engine for dashboard-style decision support.
//!
//! Takes a history of integer-timestamped observations (annual or monthly)
//! and produces multi-period forecasts with five model families: linear
//! regression, polynomial regression, moving averages, exponential smoothing,
//! and a simplified ARIMA. Results carry the echoed history, summary
//! statistics, and the inferred time format and interval, ready for
//! serialization to a charting frontend. Confidence intervals and
//! backtesting metrics are available as separate passes.
//!
//! The main entry point is [`engine::forecast`] (typed model) or
//! [`engine::forecast_named`] (selector string plus options, matching the
//! wire contract).

#![allow(clippy::needless_range_loop)]

pub mod confidence;
pub mod core;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod evaluation;
pub mod linalg;
pub mod models;

pub use error::{ForecastError, Result};

pub mod prelude {
    pub use crate::confidence::{intervals, ConfidenceInterval};
    pub use crate::core::{HistoricalPoint, PredictionResult, TimeFormat};
    pub use crate::engine::{forecast, forecast_named};
    pub use crate::error::{ForecastError, Result};
    pub use crate::evaluation::{backtest_model, BacktestReport, EvaluationMetrics};
    pub use crate::models::{ModelKind, ModelOptions};
}
