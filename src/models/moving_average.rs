//! Moving-average forecasting: simple, weighted, and exponential variants.
//!
//! All three share the same extrapolation shape: a base level from the most
//! recent window plus a per-step trend term. The trend comes from comparing
//! two consecutive windows when the series is long enough to hold them, and
//! is zero otherwise, so a constant series forecasts flat under every variant.

use crate::defaults;
use crate::error::{ForecastError, Result};

/// Moving-average strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovingAverageKind {
    /// Unweighted mean of the last window.
    Simple,
    /// Linearly increasing weights `1..w` over the last window.
    Weighted,
    /// Classic EMA recurrence over the whole series.
    Exponential,
}

/// A configured moving-average model.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MovingAverage {
    kind: MovingAverageKind,
    window: Option<usize>,
    alpha: Option<f64>,
}

impl MovingAverage {
    /// Create a model; `window` and `alpha` fall back to the centralized
    /// defaults when unset.
    pub fn new(kind: MovingAverageKind, window: Option<usize>, alpha: Option<f64>) -> Self {
        Self {
            kind,
            window,
            alpha,
        }
    }

    /// Strategy in use.
    pub fn kind(&self) -> MovingAverageKind {
        self.kind
    }

    /// Effective window size for a series of length `n`.
    pub fn window_for(&self, n: usize) -> usize {
        self.window
            .unwrap_or_else(|| defaults::moving_average_window(n))
            .min(n.saturating_sub(1))
            .max(1)
    }

    /// Effective smoothing factor, clamped into the open unit interval.
    pub fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(defaults::ALPHA).clamp(0.0001, 0.9999)
    }

    /// Forecast `periods` values ahead.
    pub fn forecast(&self, values: &[f64], periods: usize) -> Result<Vec<f64>> {
        let n = values.len();
        if n < 2 {
            return Err(ForecastError::InsufficientData { needed: 2, got: n });
        }
        if self.window == Some(0) {
            return Err(ForecastError::InvalidParameter(
                "window size must be positive".into(),
            ));
        }

        let (base, trend) = match self.kind {
            MovingAverageKind::Simple => self.windowed_level(values, mean),
            MovingAverageKind::Weighted => self.windowed_level(values, weighted_mean),
            MovingAverageKind::Exponential => self.ema_level(values),
        };

        Ok((0..periods)
            .map(|i| base + trend * (i + 1) as f64)
            .collect())
    }

    /// Base level and per-step trend from the last one or two windows.
    fn windowed_level(&self, values: &[f64], level: fn(&[f64]) -> f64) -> (f64, f64) {
        let n = values.len();
        let w = self.window_for(n);

        let base = level(&values[n - w..]);
        let trend = if n >= 2 * w {
            let previous = level(&values[n - 2 * w..n - w]);
            (base - previous) / w as f64
        } else {
            0.0
        };

        (base, trend)
    }

    /// Base level and per-step trend from the EMA track. The trend is the
    /// average step over the last three smoothed values.
    fn ema_level(&self, values: &[f64]) -> (f64, f64) {
        let alpha = self.alpha();

        let mut ema = Vec::with_capacity(values.len());
        let mut current = values[0];
        ema.push(current);
        for &y in &values[1..] {
            current = alpha * y + (1.0 - alpha) * current;
            ema.push(current);
        }

        let m = ema.len();
        let trend = if m >= 3 {
            (ema[m - 1] - ema[m - 3]) / 2.0
        } else {
            0.0
        };

        (ema[m - 1], trend)
    }
}

fn mean(window: &[f64]) -> f64 {
    window.iter().sum::<f64>() / window.len() as f64
}

fn weighted_mean(window: &[f64]) -> f64 {
    let w = window.len();
    let weight_sum = (w * (w + 1)) as f64 / 2.0;
    window
        .iter()
        .enumerate()
        .map(|(j, &y)| (j + 1) as f64 * y)
        .sum::<f64>()
        / weight_sum
}

/// Forecast in one call.
pub fn forecast(
    values: &[f64],
    kind: MovingAverageKind,
    window: Option<usize>,
    alpha: Option<f64>,
    periods: usize,
) -> Result<Vec<f64>> {
    MovingAverage::new(kind, window, alpha).forecast(values, periods)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const CONSTANT: [f64; 6] = [5.0, 5.0, 5.0, 5.0, 5.0, 5.0];

    #[test]
    fn constant_series_forecasts_flat_under_every_variant() {
        for kind in [
            MovingAverageKind::Simple,
            MovingAverageKind::Weighted,
            MovingAverageKind::Exponential,
        ] {
            let preds = forecast(&CONSTANT, kind, None, None, 4).unwrap();
            assert_eq!(preds.len(), 4);
            for p in preds {
                assert_relative_eq!(p, 5.0, epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn simple_follows_a_linear_trend() {
        // Slope 2; two windows of 3 differ by 6, so trend per step is 2.
        let values: Vec<f64> = (0..9).map(|i| 2.0 * i as f64).collect();
        let preds = forecast(&values, MovingAverageKind::Simple, Some(3), None, 3).unwrap();

        // Last window mean = (12 + 14 + 16) / 3 = 14; forecasts 16, 18, 20.
        assert_relative_eq!(preds[0], 16.0, epsilon = 1e-10);
        assert_relative_eq!(preds[1], 18.0, epsilon = 1e-10);
        assert_relative_eq!(preds[2], 20.0, epsilon = 1e-10);
    }

    #[test]
    fn weighted_mean_leans_toward_recent_values() {
        // Window [1, 2, 3] with weights 1,2,3 -> (1 + 4 + 9) / 6
        let values = vec![0.0, 0.0, 0.0, 1.0, 2.0, 3.0];
        let model = MovingAverage::new(MovingAverageKind::Weighted, Some(3), None);
        let preds = model.forecast(&values, 1).unwrap();

        let expected_base = 14.0 / 6.0;
        // Previous window is all zeros, so trend = base / 3.
        let expected = expected_base + expected_base / 3.0;
        assert_relative_eq!(preds[0], expected, epsilon = 1e-10);
    }

    #[test]
    fn short_series_skips_the_trend_term() {
        // n = 5 < 2w = 6: forecast is the flat window mean.
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        let preds = forecast(&values, MovingAverageKind::Simple, Some(3), None, 2).unwrap();

        assert_relative_eq!(preds[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(preds[1], 4.0, epsilon = 1e-10);
    }

    #[test]
    fn exponential_trend_uses_the_last_three_ema_values() {
        let values: Vec<f64> = (0..10).map(|i| i as f64).collect();
        let model = MovingAverage::new(MovingAverageKind::Exponential, None, Some(0.5));
        let preds = model.forecast(&values, 2).unwrap();

        // Rising series: EMA rises, forecasts keep rising.
        assert!(preds[0] > values[9] - 2.0);
        assert!(preds[1] > preds[0]);
    }

    #[test]
    fn default_window_is_a_third_of_the_series() {
        let model = MovingAverage::new(MovingAverageKind::Simple, None, None);
        assert_eq!(model.window_for(12), 4);
        assert_eq!(model.window_for(4), 2);
        // Capped below the series length.
        assert_eq!(model.window_for(2), 1);
    }

    #[test]
    fn oversized_window_is_capped() {
        let model = MovingAverage::new(MovingAverageKind::Simple, Some(50), None);
        assert_eq!(model.window_for(6), 5);
    }

    #[test]
    fn alpha_is_clamped_into_the_open_interval() {
        let model = MovingAverage::new(MovingAverageKind::Exponential, None, Some(1.5));
        assert!(model.alpha() < 1.0);
        let model = MovingAverage::new(MovingAverageKind::Exponential, None, Some(-0.2));
        assert!(model.alpha() > 0.0);
    }

    #[test]
    fn one_point_is_insufficient() {
        assert!(matches!(
            forecast(&[1.0], MovingAverageKind::Simple, None, None, 2),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }

    #[test]
    fn zero_window_is_rejected() {
        assert!(matches!(
            forecast(&CONSTANT, MovingAverageKind::Simple, Some(0), None, 2),
            Err(ForecastError::InvalidParameter(_))
        ));
    }
}
