//! Forecasting model families and the dispatch layer.

pub mod arima;
pub mod linear;
pub mod moving_average;
pub mod polynomial;
pub mod smoothing;

use crate::error::{ForecastError, Result};
use arima::ArimaParams;
use moving_average::MovingAverageKind;
use serde::Deserialize;
use smoothing::{SmoothingKind, SmoothingParams};

/// Caller-supplied model parameters, mirroring the loosely-typed
/// `modelParams` object of the request contract. Every field is optional;
/// unset fields trigger the per-model auto-estimation described in the model
/// modules.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ModelOptions {
    /// Sub-variant selector ("single"/"double"/"triple"/"auto" for smoothing,
    /// "simple"/"weighted"/"exponential"/"auto" for moving averages).
    #[serde(rename = "type")]
    pub variant: Option<String>,
    pub window_size: Option<usize>,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub season_length: Option<usize>,
    /// Polynomial degree (2 or 3); unset means automatic selection.
    pub degree: Option<usize>,
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
}

/// One variant per model family, each carrying its own parameter record.
///
/// Dispatch is an exhaustive match, so adding a family is a compile error
/// until every consumer handles it.
#[derive(Debug, Clone, PartialEq)]
pub enum ModelKind {
    /// Ordinary least squares over the index sequence.
    Linear,
    /// Single/double/triple exponential smoothing.
    Exponential(SmoothingParams),
    /// Simple/weighted/exponential moving average.
    MovingAverage {
        kind: MovingAverageKind,
        window: Option<usize>,
        alpha: Option<f64>,
    },
    /// Degree-2/3 polynomial least squares.
    Polynomial { degree: Option<usize> },
    /// Simplified ARIMA.
    Arima(ArimaParams),
}

impl ModelKind {
    /// Resolve a selector string plus options into a typed model.
    pub fn resolve(selector: &str, options: &ModelOptions) -> Result<Self> {
        match selector {
            "linear" => Ok(ModelKind::Linear),
            "exponential" => Ok(ModelKind::Exponential(SmoothingParams {
                kind: smoothing_kind(options.variant.as_deref())?,
                alpha: options.alpha,
                beta: options.beta,
                gamma: options.gamma,
                season_length: options.season_length,
            })),
            "movingAverage" => Ok(ModelKind::MovingAverage {
                kind: moving_average_kind(options.variant.as_deref())?,
                window: options.window_size,
                alpha: options.alpha,
            }),
            "polynomial" => Ok(ModelKind::Polynomial {
                degree: options.degree,
            }),
            "arima" => Ok(ModelKind::Arima(ArimaParams {
                p: options.p,
                d: options.d,
                q: options.q,
            })),
            other => Err(ForecastError::UnsupportedModel(other.to_string())),
        }
    }

    /// The selector string this model answers to.
    pub fn selector(&self) -> &'static str {
        match self {
            ModelKind::Linear => "linear",
            ModelKind::Exponential(_) => "exponential",
            ModelKind::MovingAverage { .. } => "movingAverage",
            ModelKind::Polynomial { .. } => "polynomial",
            ModelKind::Arima(_) => "arima",
        }
    }

    /// Minimum historical points this family accepts.
    pub fn min_points(&self) -> usize {
        match self {
            ModelKind::Linear => 2,
            ModelKind::Exponential(_) => 3,
            ModelKind::MovingAverage { .. } => 2,
            ModelKind::Polynomial { .. } => 3,
            ModelKind::Arima(_) => arima::MIN_POINTS,
        }
    }

    /// Run the model over time-sorted values.
    ///
    /// The minimum-data check happens here, before any computation; model
    /// failures come back wrapped with the model's selector. Non-finite
    /// outputs (degenerate smoothing states) are replaced by the last
    /// historical value repeated, never propagated.
    pub fn forecast(&self, values: &[f64], periods: usize) -> Result<Vec<f64>> {
        let name = self.selector();

        if values.len() < self.min_points() {
            return Err(ForecastError::InsufficientData {
                needed: self.min_points(),
                got: values.len(),
            }
            .in_model(name));
        }

        let raw = match self {
            ModelKind::Linear => linear::forecast(values, periods),
            ModelKind::Exponential(params) => smoothing::forecast(values, params, periods),
            ModelKind::MovingAverage {
                kind,
                window,
                alpha,
            } => moving_average::forecast(values, *kind, *window, *alpha, periods),
            ModelKind::Polynomial { degree } => polynomial::forecast(values, *degree, periods),
            ModelKind::Arima(params) => arima::forecast(values, *params, periods),
        }
        .map_err(|e| e.in_model(name))?;

        Ok(sanitize(raw, values))
    }
}

/// Output gate: any non-finite prediction collapses the whole horizon to the
/// last valid historical value. Insufficiency and singularity are real errors
/// and never reach this point.
fn sanitize(raw: Vec<f64>, values: &[f64]) -> Vec<f64> {
    if raw.iter().all(|v| v.is_finite()) {
        return raw;
    }
    let fallback = values
        .iter()
        .rev()
        .find(|v| v.is_finite())
        .copied()
        .unwrap_or(0.0);
    vec![fallback; raw.len()]
}

fn smoothing_kind(variant: Option<&str>) -> Result<SmoothingKind> {
    match variant {
        None | Some("auto") => Ok(SmoothingKind::Auto),
        Some("single") => Ok(SmoothingKind::Single),
        Some("double") => Ok(SmoothingKind::Double),
        Some("triple") => Ok(SmoothingKind::Triple),
        Some(other) => Err(ForecastError::InvalidParameter(format!(
            "unknown smoothing type {other:?}"
        ))),
    }
}

fn moving_average_kind(variant: Option<&str>) -> Result<MovingAverageKind> {
    match variant {
        // "auto" resolves to the simple strategy.
        None | Some("auto") | Some("simple") => Ok(MovingAverageKind::Simple),
        Some("weighted") => Ok(MovingAverageKind::Weighted),
        Some("exponential") => Ok(MovingAverageKind::Exponential),
        Some(other) => Err(ForecastError::InvalidParameter(format!(
            "unknown moving-average type {other:?}"
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_every_selector() {
        let options = ModelOptions::default();
        for selector in ["linear", "exponential", "movingAverage", "polynomial", "arima"] {
            let kind = ModelKind::resolve(selector, &options).unwrap();
            assert_eq!(kind.selector(), selector);
        }
    }

    #[test]
    fn unknown_selector_is_unsupported() {
        assert!(matches!(
            ModelKind::resolve("prophet", &ModelOptions::default()),
            Err(ForecastError::UnsupportedModel(name)) if name == "prophet"
        ));
    }

    #[test]
    fn unknown_sub_variant_is_an_invalid_parameter() {
        let options = ModelOptions {
            variant: Some("quadruple".into()),
            ..Default::default()
        };
        assert!(matches!(
            ModelKind::resolve("exponential", &options),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn auto_moving_average_resolves_to_simple() {
        let options = ModelOptions {
            variant: Some("auto".into()),
            ..Default::default()
        };
        let kind = ModelKind::resolve("movingAverage", &options).unwrap();
        assert!(matches!(
            kind,
            ModelKind::MovingAverage {
                kind: MovingAverageKind::Simple,
                ..
            }
        ));
    }

    #[test]
    fn options_deserialize_from_camel_case_json() {
        let options: ModelOptions = serde_json::from_str(
            r#"{"type":"double","alpha":0.4,"seasonLength":12,"windowSize":3}"#,
        )
        .unwrap();

        assert_eq!(options.variant.as_deref(), Some("double"));
        assert_eq!(options.alpha, Some(0.4));
        assert_eq!(options.season_length, Some(12));
        assert_eq!(options.window_size, Some(3));
        assert_eq!(options.p, None);
    }

    #[test]
    fn min_points_per_family() {
        let options = ModelOptions::default();
        let expectations = [
            ("linear", 2),
            ("exponential", 3),
            ("movingAverage", 2),
            ("polynomial", 3),
            ("arima", 20),
        ];
        for (selector, needed) in expectations {
            let kind = ModelKind::resolve(selector, &options).unwrap();
            assert_eq!(kind.min_points(), needed, "{selector}");
        }
    }

    #[test]
    fn short_series_fails_wrapped_with_the_model_name() {
        let kind = ModelKind::resolve("arima", &ModelOptions::default()).unwrap();
        let err = kind.forecast(&[1.0; 15], 3).unwrap_err();

        assert!(matches!(err, ForecastError::Model { name: "arima", .. }));
        assert_eq!(
            err.root_cause(),
            &ForecastError::InsufficientData { needed: 20, got: 15 }
        );
    }

    #[test]
    fn sanitize_replaces_a_poisoned_forecast() {
        let cleaned = sanitize(vec![1.0, f64::NAN, 3.0], &[10.0, 12.0]);
        assert_eq!(cleaned, vec![12.0, 12.0, 12.0]);
    }

    #[test]
    fn sanitize_passes_finite_forecasts_through() {
        let cleaned = sanitize(vec![1.0, 2.0], &[10.0, 12.0]);
        assert_eq!(cleaned, vec![1.0, 2.0]);
    }
}
