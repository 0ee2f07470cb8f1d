//! Simplified ARIMA: differencing, Yule-Walker AR estimation, and
//! inverse-differencing reconstruction.
//!
//! The MA component is not estimated separately; `q` is accepted and folded
//! into the AR order, which keeps the pipeline a pure linear solve instead of
//! an innovations or likelihood iteration. Forecasts are produced recursively
//! on the differenced scale, feeding each forecast back as history, then
//! integrated back to the original scale.

use crate::error::{ForecastError, Result};
use crate::linalg;

/// Minimum series length for any ARIMA fit.
pub const MIN_POINTS: usize = 20;

/// Caller-supplied ARIMA order; unset components are estimated from the data.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArimaParams {
    pub p: Option<usize>,
    pub d: Option<usize>,
    pub q: Option<usize>,
}

/// A fully resolved (p, d, q) order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ArimaOrder {
    pub p: usize,
    pub d: usize,
    pub q: usize,
}

impl ArimaOrder {
    /// Effective AR order with the MA component folded in.
    pub fn ar_order(&self) -> usize {
        self.p + self.q
    }

    /// Minimum points needed to fit this order.
    pub fn min_points(&self) -> usize {
        self.p + self.d + self.q + 5
    }
}

/// Resolve unset order components with the auto heuristic: difference once
/// when it removes at least 20% of the variance (and the series is long
/// enough to judge), keep the AR order small relative to n.
pub fn resolve_order(values: &[f64], params: ArimaParams) -> ArimaOrder {
    let n = values.len();

    let d = params.d.unwrap_or_else(|| {
        if n >= 15 {
            let var0 = population_variance(values);
            let var1 = population_variance(&difference(values, 1));
            if var0 > 0.0 && var1 / var0 < 0.8 {
                1
            } else {
                0
            }
        } else {
            0
        }
    });

    ArimaOrder {
        p: params.p.unwrap_or_else(|| 2.min(n / 10)),
        d,
        q: params.q.unwrap_or_else(|| 1.min(n / 15)),
    }
}

/// Fit and forecast in one call.
pub fn forecast(values: &[f64], params: ArimaParams, periods: usize) -> Result<Vec<f64>> {
    let n = values.len();
    if n < MIN_POINTS {
        return Err(ForecastError::InsufficientData {
            needed: MIN_POINTS,
            got: n,
        });
    }

    let order = resolve_order(values, params);
    if n < order.min_points() {
        return Err(ForecastError::InsufficientData {
            needed: order.min_points(),
            got: n,
        });
    }

    let differenced = difference(values, order.d);
    let ar_order = order.ar_order();
    if differenced.len() <= ar_order {
        return Err(ForecastError::InsufficientData {
            needed: ar_order + order.d + 1,
            got: n,
        });
    }

    let phi = if ar_order == 0 {
        Vec::new()
    } else {
        yule_walker(&differenced, ar_order)?
    };
    let mean = differenced.iter().sum::<f64>() / differenced.len() as f64;

    // Recursive AR forecast on the differenced scale. `history` starts as
    // observed ++ nothing and grows by one forecast per step, so the
    // recurrence reads its own output without touching the input series.
    let mut history = differenced.clone();
    for _ in 0..periods {
        let t = history.len();
        let mut pred = mean;
        for (i, &coefficient) in phi.iter().enumerate() {
            pred += coefficient * (history[t - 1 - i] - mean);
        }
        history.push(pred);
    }
    let forecast_diff = &history[differenced.len()..];

    Ok(integrate(forecast_diff, values, order.d))
}

/// Difference a series `d` times: `diff[i] = value[i+1] - value[i]`.
pub fn difference(series: &[f64], d: usize) -> Vec<f64> {
    let mut result = series.to_vec();
    for _ in 0..d {
        if result.len() <= 1 {
            return Vec::new();
        }
        result = result.windows(2).map(|w| w[1] - w[0]).collect();
    }
    result
}

/// Invert `d` rounds of differencing by cumulative summation, seeding each
/// round from the tail of the original series.
pub fn integrate(differenced: &[f64], original: &[f64], d: usize) -> Vec<f64> {
    if d == 0 {
        return differenced.to_vec();
    }

    let mut result = differenced.to_vec();
    for level in (0..d).rev() {
        let seed = *difference(original, level).last().unwrap_or(&0.0);
        let mut cumulative = seed;
        for value in result.iter_mut() {
            cumulative += *value;
            *value = cumulative;
        }
    }
    result
}

/// Sample autocorrelations at lags `0..=max_lag`.
pub fn autocorrelations(series: &[f64], max_lag: usize) -> Vec<f64> {
    let n = series.len();
    let mean = series.iter().sum::<f64>() / n as f64;
    let denominator: f64 = series.iter().map(|x| (x - mean).powi(2)).sum();

    (0..=max_lag)
        .map(|lag| {
            if denominator == 0.0 || lag >= n {
                return 0.0;
            }
            let numerator: f64 = (lag..n)
                .map(|i| (series[i] - mean) * (series[i - lag] - mean))
                .sum();
            numerator / denominator
        })
        .collect()
}

/// Estimate AR coefficients from the Yule-Walker equations: the Toeplitz
/// system `R · φ = r` over the sample autocorrelations. A zero-variance
/// series makes the system singular, which is surfaced rather than patched.
pub fn yule_walker(series: &[f64], order: usize) -> Result<Vec<f64>> {
    let acf = autocorrelations(series, order);

    let matrix: Vec<Vec<f64>> = (0..order)
        .map(|i| {
            (0..order)
                .map(|j| acf[(i as isize - j as isize).unsigned_abs()])
                .collect()
        })
        .collect();
    let rhs: Vec<f64> = acf[1..=order].to_vec();

    linalg::solve(matrix, rhs)
}

fn population_variance(series: &[f64]) -> f64 {
    if series.is_empty() {
        return 0.0;
    }
    let mean = series.iter().sum::<f64>() / series.len() as f64;
    series.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / series.len() as f64
}
