//! Dense linear solver for the small systems arising in least-squares fits.
//!
//! Both the polynomial normal equations (size `degree + 1`) and the ARIMA
//! Yule-Walker system (size = AR order) funnel through [`solve`]. Systems are
//! tiny, so plain Gaussian elimination with partial pivoting is plenty.

use crate::defaults::SINGULAR_PIVOT_TOLERANCE;
use crate::error::{ForecastError, Result};

/// Solve `A · x = b` by Gaussian elimination with partial pivoting.
///
/// At each elimination step the row with the largest absolute entry in the
/// pivot column is swapped up. A pivot magnitude below `1e-10` means the
/// system is degenerate (collinear data, zero variance) and yields
/// [`ForecastError::SingularMatrix`] instead of a garbage solution.
pub fn solve(mut a: Vec<Vec<f64>>, mut b: Vec<f64>) -> Result<Vec<f64>> {
    let n = b.len();

    if a.len() != n {
        return Err(ForecastError::DimensionMismatch {
            expected: n,
            got: a.len(),
        });
    }
    for row in &a {
        if row.len() != n {
            return Err(ForecastError::DimensionMismatch {
                expected: n,
                got: row.len(),
            });
        }
    }
    if n == 0 {
        return Ok(Vec::new());
    }

    // Forward elimination with partial pivoting.
    for col in 0..n {
        let mut pivot_row = col;
        for row in (col + 1)..n {
            if a[row][col].abs() > a[pivot_row][col].abs() {
                pivot_row = row;
            }
        }

        if a[pivot_row][col].abs() < SINGULAR_PIVOT_TOLERANCE {
            return Err(ForecastError::SingularMatrix { column: col });
        }

        if pivot_row != col {
            a.swap(col, pivot_row);
            b.swap(col, pivot_row);
        }

        for row in (col + 1)..n {
            let factor = a[row][col] / a[col][col];
            if factor == 0.0 {
                continue;
            }
            for k in col..n {
                a[row][k] -= factor * a[col][k];
            }
            b[row] -= factor * b[col];
        }
    }

    // Back substitution.
    let mut x = vec![0.0; n];
    for row in (0..n).rev() {
        let mut sum = b[row];
        for col in (row + 1)..n {
            sum -= a[row][col] * x[col];
        }
        x[row] = sum / a[row][row];
    }

    Ok(x)
}
