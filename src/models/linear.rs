//! Ordinary least squares linear regression over the index sequence.
//!
//! The independent variable is the zero-based position in time-sorted order,
//! not the raw timestamp. Raw years (2020, 2021, ...) make the normal
//! equations ill-conditioned; 0..n-1 does not.

use crate::error::{ForecastError, Result};

/// A fitted least-squares line `value = slope * index + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    slope: f64,
    intercept: f64,
    n: usize,
}

impl LinearFit {
    /// Fit a line to the values by closed-form OLS.
    ///
    /// Requires at least 2 points. The denominator `n·Σx² − (Σx)²` cannot be
    /// zero for n ≥ 2 distinct indices, but it is still checked rather than
    /// trusted.
    pub fn fit(values: &[f64]) -> Result<Self> {
        let n = values.len();
        if n < 2 {
            return Err(ForecastError::InsufficientData { needed: 2, got: n });
        }

        let nf = n as f64;
        let mut sum_x = 0.0;
        let mut sum_y = 0.0;
        let mut sum_xy = 0.0;
        let mut sum_xx = 0.0;
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            sum_x += x;
            sum_y += y;
            sum_xy += x * y;
            sum_xx += x * x;
        }

        let denominator = nf * sum_xx - sum_x * sum_x;
        if denominator == 0.0 {
            return Err(ForecastError::DegenerateRegression);
        }

        let slope = (nf * sum_xy - sum_x * sum_y) / denominator;
        let intercept = (sum_y - slope * sum_x) / nf;

        Ok(Self {
            slope,
            intercept,
            n,
        })
    }

    /// Fitted slope per index step.
    pub fn slope(&self) -> f64 {
        self.slope
    }

    /// Fitted intercept at index 0.
    pub fn intercept(&self) -> f64 {
        self.intercept
    }

    /// Number of points the line was fitted on.
    pub fn len(&self) -> usize {
        self.n
    }

    /// Evaluate the line at an arbitrary index.
    pub fn predict_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    /// Extrapolate the line over the next `periods` future indices
    /// `n, n+1, ..`. Negative outputs are allowed; the value domain includes
    /// signed quantities.
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (0..periods)
            .map(|i| self.predict_at((self.n + i) as f64))
            .collect()
    }

    /// In-sample residuals `value[i] - fitted[i]`.
    pub fn residuals(&self, values: &[f64]) -> Vec<f64> {
        values
            .iter()
            .enumerate()
            .map(|(i, &y)| y - self.predict_at(i as f64))
            .collect()
    }
}

/// Fit and forecast in one call.
pub fn forecast(values: &[f64], periods: usize) -> Result<Vec<f64>> {
    Ok(LinearFit::fit(values)?.forecast(periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn fits_an_exact_line() {
        // value = index + 1
        let fit = LinearFit::fit(&[1.0, 2.0, 3.0]).unwrap();

        assert_relative_eq!(fit.slope(), 1.0, epsilon = 1e-10);
        assert_relative_eq!(fit.intercept(), 1.0, epsilon = 1e-10);

        let preds = fit.forecast(2);
        assert_relative_eq!(preds[0], 4.0, epsilon = 1e-10);
        assert_relative_eq!(preds[1], 5.0, epsilon = 1e-10);
    }

    #[test]
    fn fits_a_noisy_line() {
        let values: Vec<f64> = (0..20)
            .map(|i| 5.0 + 2.0 * i as f64 + if i % 2 == 0 { 0.1 } else { -0.1 })
            .collect();
        let fit = LinearFit::fit(&values).unwrap();

        assert_relative_eq!(fit.slope(), 2.0, epsilon = 0.05);
        assert_relative_eq!(fit.intercept(), 5.0, epsilon = 0.5);
    }

    #[test]
    fn declining_series_forecasts_negative_values() {
        let fit = LinearFit::fit(&[2.0, 1.0, 0.0, -1.0]).unwrap();
        let preds = fit.forecast(3);

        assert_relative_eq!(preds[0], -2.0, epsilon = 1e-10);
        assert_relative_eq!(preds[2], -4.0, epsilon = 1e-10);
    }

    #[test]
    fn constant_series_forecasts_flat() {
        let fit = LinearFit::fit(&[7.0, 7.0, 7.0, 7.0]).unwrap();
        assert_relative_eq!(fit.slope(), 0.0, epsilon = 1e-10);

        for pred in fit.forecast(5) {
            assert_relative_eq!(pred, 7.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn residuals_of_an_exact_fit_are_zero() {
        let values = [1.0, 3.0, 5.0, 7.0];
        let fit = LinearFit::fit(&values).unwrap();
        for r in fit.residuals(&values) {
            assert_relative_eq!(r, 0.0, epsilon = 1e-10);
        }
    }

    #[test]
    fn single_point_is_insufficient() {
        assert!(matches!(
            LinearFit::fit(&[1.0]),
            Err(ForecastError::InsufficientData { needed: 2, got: 1 })
        ));
    }
}
