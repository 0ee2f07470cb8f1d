//! Error types for the trendcast library.

use thiserror::Error;

/// Result type alias for forecasting operations.
pub type Result<T> = std::result::Result<T, ForecastError>;

/// Errors that can occur while fitting or forecasting.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ForecastError {
    /// Insufficient data points for the requested operation.
    #[error("insufficient data: need at least {needed} points, got {got}")]
    InsufficientData { needed: usize, got: usize },

    /// Forecast horizon must be a positive number of periods.
    #[error("invalid periods: {0} (must be positive)")]
    InvalidPeriods(i64),

    /// Unknown model selector string.
    #[error("unsupported model: {0:?}")]
    UnsupportedModel(String),

    /// Invalid parameter value.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// A linear system was degenerate during elimination.
    #[error("singular matrix: pivot below tolerance at column {column}")]
    SingularMatrix { column: usize },

    /// Regression denominator collapsed to zero.
    #[error("degenerate regression: zero variance in the index sequence")]
    DegenerateRegression,

    /// Dimension mismatch between paired sequences.
    #[error("dimension mismatch: expected {expected}, got {got}")]
    DimensionMismatch { expected: usize, got: usize },

    /// A model failed during dispatch; carries the underlying cause.
    #[error("model {name:?} failed: {source}")]
    Model {
        name: &'static str,
        #[source]
        source: Box<ForecastError>,
    },
}

impl ForecastError {
    /// Wrap an error with the name of the model that produced it.
    pub fn in_model(self, name: &'static str) -> Self {
        ForecastError::Model {
            name,
            source: Box::new(self),
        }
    }

    /// The innermost error, unwrapping any model context.
    pub fn root_cause(&self) -> &ForecastError {
        match self {
            ForecastError::Model { source, .. } => source.root_cause(),
            other => other,
        }
    }
}
