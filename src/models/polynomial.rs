//! Polynomial least-squares regression over the index sequence.
//!
//! Builds the normal-equations system from power sums of the indices and
//! solves it with the shared elimination kernel. Degrees 2 and 3 are
//! supported; auto mode fits both (data permitting) and keeps the better
//! in-sample R².

use crate::error::{ForecastError, Result};
use crate::evaluation::r_squared;
use crate::linalg;

/// A fitted polynomial `value = Σ coefficients[j] · index^j`.
#[derive(Debug, Clone, PartialEq)]
pub struct PolynomialFit {
    coefficients: Vec<f64>,
    n: usize,
}

impl PolynomialFit {
    /// Fit a polynomial of the given degree (2 or 3).
    ///
    /// Requires `degree + 1` points; collinear or degenerate data surfaces as
    /// [`ForecastError::SingularMatrix`] from the solver.
    pub fn fit(values: &[f64], degree: usize) -> Result<Self> {
        if !(2..=3).contains(&degree) {
            return Err(ForecastError::InvalidParameter(format!(
                "polynomial degree must be 2 or 3, got {degree}"
            )));
        }

        let n = values.len();
        if n < degree + 1 {
            return Err(ForecastError::InsufficientData {
                needed: degree + 1,
                got: n,
            });
        }

        let terms = degree + 1;

        // Power sums S_k = Σ i^k and moments T_j = Σ i^j · y_i over the
        // index sequence; the normal matrix is A[j][k] = S_{j+k}.
        let mut power_sums = vec![0.0; 2 * degree + 1];
        let mut moments = vec![0.0; terms];
        for (i, &y) in values.iter().enumerate() {
            let x = i as f64;
            let mut xp = 1.0;
            for (k, sum) in power_sums.iter_mut().enumerate() {
                *sum += xp;
                if k < terms {
                    moments[k] += xp * y;
                }
                xp *= x;
            }
        }

        let matrix: Vec<Vec<f64>> = (0..terms)
            .map(|j| (0..terms).map(|k| power_sums[j + k]).collect())
            .collect();

        let coefficients = linalg::solve(matrix, moments)?;

        Ok(Self { coefficients, n })
    }

    /// Fit with automatic degree selection.
    ///
    /// With fewer than 4 points only degree 2 is attempted; otherwise both
    /// degrees are fitted and scored by in-sample R². A degree-3 fit that
    /// fails (singular system) simply leaves the degree-2 fit in place.
    pub fn fit_auto(values: &[f64]) -> Result<Self> {
        let quadratic = Self::fit(values, 2)?;
        if values.len() < 4 {
            return Ok(quadratic);
        }

        match Self::fit(values, 3) {
            Ok(cubic) if cubic.r_squared(values) > quadratic.r_squared(values) => Ok(cubic),
            _ => Ok(quadratic),
        }
    }

    /// Fitted coefficients, constant term first.
    pub fn coefficients(&self) -> &[f64] {
        &self.coefficients
    }

    /// Degree of the fitted polynomial.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Evaluate the polynomial at an arbitrary index.
    pub fn predict_at(&self, x: f64) -> f64 {
        // Horner evaluation, highest coefficient first.
        self.coefficients
            .iter()
            .rev()
            .fold(0.0, |acc, &c| acc * x + c)
    }

    /// Extrapolate over the next `periods` future indices.
    pub fn forecast(&self, periods: usize) -> Vec<f64> {
        (0..periods)
            .map(|i| self.predict_at((self.n + i) as f64))
            .collect()
    }

    /// In-sample coefficient of determination.
    pub fn r_squared(&self, values: &[f64]) -> f64 {
        let fitted: Vec<f64> = (0..values.len())
            .map(|i| self.predict_at(i as f64))
            .collect();
        r_squared(values, &fitted)
    }
}

/// Fit and forecast in one call. `degree: None` selects the degree
/// automatically.
pub fn forecast(values: &[f64], degree: Option<usize>, periods: usize) -> Result<Vec<f64>> {
    let fit = match degree {
        Some(d) => PolynomialFit::fit(values, d)?,
        None => PolynomialFit::fit_auto(values)?,
    };
    Ok(fit.forecast(periods))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn recovers_an_exact_quadratic() {
        // value = 2 + 3i + i^2
        let values: Vec<f64> = (0..8)
            .map(|i| 2.0 + 3.0 * i as f64 + (i * i) as f64)
            .collect();
        let fit = PolynomialFit::fit(&values, 2).unwrap();

        assert_relative_eq!(fit.coefficients()[0], 2.0, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients()[1], 3.0, epsilon = 1e-6);
        assert_relative_eq!(fit.coefficients()[2], 1.0, epsilon = 1e-6);

        // Forecast continues the curve: i = 8 -> 2 + 24 + 64 = 90
        let preds = fit.forecast(2);
        assert_relative_eq!(preds[0], 90.0, epsilon = 1e-5);
        assert_relative_eq!(preds[1], 2.0 + 27.0 + 81.0, epsilon = 1e-5);
    }

    #[test]
    fn recovers_an_exact_cubic() {
        let values: Vec<f64> = (0..10).map(|i| 1.0 + (i * i * i) as f64).collect();
        let fit = PolynomialFit::fit(&values, 3).unwrap();

        assert_eq!(fit.degree(), 3);
        assert_relative_eq!(fit.coefficients()[3], 1.0, epsilon = 1e-5);
    }

    #[test]
    fn auto_prefers_cubic_for_cubic_data() {
        let values: Vec<f64> = (0..12).map(|i| (i * i * i) as f64 - 4.0 * i as f64).collect();
        let fit = PolynomialFit::fit_auto(&values).unwrap();
        assert_eq!(fit.degree(), 3);
    }

    #[test]
    fn auto_with_three_points_stays_quadratic() {
        let fit = PolynomialFit::fit_auto(&[1.0, 4.0, 9.0]).unwrap();
        assert_eq!(fit.degree(), 2);
    }

    #[test]
    fn degree_out_of_range_is_rejected() {
        let values = vec![1.0, 2.0, 3.0, 4.0, 5.0];
        assert!(matches!(
            PolynomialFit::fit(&values, 4),
            Err(ForecastError::InvalidParameter(_))
        ));
        assert!(matches!(
            PolynomialFit::fit(&values, 1),
            Err(ForecastError::InvalidParameter(_))
        ));
    }

    #[test]
    fn too_few_points_for_the_degree() {
        assert!(matches!(
            PolynomialFit::fit(&[1.0, 2.0, 3.0], 3),
            Err(ForecastError::InsufficientData { needed: 4, got: 3 })
        ));
    }

    #[test]
    fn perfect_fit_has_unit_r_squared() {
        let values: Vec<f64> = (0..6).map(|i| (i * i) as f64).collect();
        let fit = PolynomialFit::fit(&values, 2).unwrap();
        assert_relative_eq!(fit.r_squared(&values), 1.0, epsilon = 1e-9);
    }
}
