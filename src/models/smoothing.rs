//! Exponential smoothing family: single, double (Holt), and triple
//! (Holt-Winters) variants with automatic type selection.
//!
//! The model equations are:
//! - Single: `s_t = α × y_t + (1-α) × s_{t-1}`
//! - Double: `l_t = α × y_t + (1-α) × (l_{t-1} + b_{t-1})`,
//!   `b_t = β × (l_t - l_{t-1}) + (1-β) × b_{t-1}`
//! - Triple adds a multiplicative seasonal index updated with γ.
//!
//! Unset smoothing factors are grid-searched against one-step-ahead squared
//! error on the trailing 30% of the series; if no candidate produces a finite
//! score the centralized defaults take over.

use crate::defaults;
use crate::error::{ForecastError, Result};
use crate::models::linear::LinearFit;

/// Smoothing variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SmoothingKind {
    /// Level only; forecasts are flat.
    Single,
    /// Holt level + trend.
    Double,
    /// Holt-Winters level + trend + multiplicative season.
    Triple,
    /// Pick a variant from the data.
    Auto,
}

/// Caller-supplied smoothing parameters; unset fields are auto-estimated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothingParams {
    pub kind: SmoothingKind,
    pub alpha: Option<f64>,
    pub beta: Option<f64>,
    pub gamma: Option<f64>,
    pub season_length: Option<usize>,
}

impl Default for SmoothingParams {
    fn default() -> Self {
        Self {
            kind: SmoothingKind::Auto,
            alpha: None,
            beta: None,
            gamma: None,
            season_length: None,
        }
    }
}

/// Forecast `periods` values ahead with the configured smoothing variant.
pub fn forecast(values: &[f64], params: &SmoothingParams, periods: usize) -> Result<Vec<f64>> {
    let n = values.len();
    if n < 3 {
        return Err(ForecastError::InsufficientData { needed: 3, got: n });
    }

    let season_length = params.season_length.unwrap_or(defaults::SEASON_LENGTH);
    if season_length < 2 {
        return Err(ForecastError::InvalidParameter(format!(
            "season length must be at least 2, got {season_length}"
        )));
    }

    let kind = match params.kind {
        SmoothingKind::Auto => select_kind(values, season_length),
        fixed => fixed,
    };

    match kind {
        SmoothingKind::Single => single(values, params, periods),
        SmoothingKind::Double => double(values, params, periods),
        SmoothingKind::Triple => triple(values, params, season_length, periods),
        SmoothingKind::Auto => unreachable!("auto resolved above"),
    }
}

/// Route to triple/double/single from the data: seasonality first when two
/// full cycles exist, otherwise a trend test.
fn select_kind(values: &[f64], season_length: usize) -> SmoothingKind {
    if values.len() >= 2 * season_length && has_seasonality(values, season_length) {
        SmoothingKind::Triple
    } else if has_trend(values) {
        SmoothingKind::Double
    } else {
        SmoothingKind::Single
    }
}

/// Trend heuristic: the OLS slope against the index is compared with the
/// value range spread over the series length.
pub fn has_trend(values: &[f64]) -> bool {
    let Ok(fit) = LinearFit::fit(values) else {
        return false;
    };
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let range = max - min;

    fit.slope().abs() > defaults::TREND_SLOPE_THRESHOLD * (range / values.len() as f64)
}

/// Seasonality heuristic: coefficient of variation of the per-phase means
/// across full cycles.
pub fn has_seasonality(values: &[f64], season_length: usize) -> bool {
    let cycles = values.len() / season_length;
    if cycles < 2 {
        return false;
    }

    let phase_means = phase_means(values, season_length, cycles);
    let mean = phase_means.iter().sum::<f64>() / phase_means.len() as f64;
    let variance = phase_means
        .iter()
        .map(|m| (m - mean).powi(2))
        .sum::<f64>()
        / phase_means.len() as f64;

    // NaN from a zero mean compares false, which is the right answer for an
    // all-zero series.
    variance.sqrt() / mean.abs() > defaults::SEASONALITY_CV_THRESHOLD
}

/// Mean value at each phase `0..season_length` over the given full cycles.
fn phase_means(values: &[f64], season_length: usize, cycles: usize) -> Vec<f64> {
    (0..season_length)
        .map(|phase| {
            (0..cycles)
                .map(|c| values[c * season_length + phase])
                .sum::<f64>()
                / cycles as f64
        })
        .collect()
}

// --- single ---------------------------------------------------------------

fn single(values: &[f64], params: &SmoothingParams, periods: usize) -> Result<Vec<f64>> {
    let alpha = match params.alpha {
        Some(a) => a.clamp(0.0001, 0.9999),
        None => {
            grid_search(values, &alpha_grid(), &[defaults::BETA], |vals, a, _| {
                single_score(vals, a)
            })
            .0
        }
    };

    let mut smoothed = values[0];
    for &y in &values[1..] {
        smoothed = alpha * y + (1.0 - alpha) * smoothed;
    }

    Ok(vec![smoothed; periods])
}

fn single_score(values: &[f64], alpha: f64) -> f64 {
    let mut smoothed = values[0];
    let start = score_start(values.len());
    let mut sse = 0.0;
    for (t, &y) in values.iter().enumerate().skip(1) {
        if t >= start {
            let error = y - smoothed;
            sse += error * error;
        }
        smoothed = alpha * y + (1.0 - alpha) * smoothed;
    }
    sse
}

// --- double (Holt) --------------------------------------------------------

fn double(values: &[f64], params: &SmoothingParams, periods: usize) -> Result<Vec<f64>> {
    let (alpha, beta) = resolve_alpha_beta(values, params, double_score);

    let state = double_track(values, alpha, beta, score_start(values.len()));

    Ok((0..periods)
        .map(|i| state.level + (i + 1) as f64 * state.trend)
        .collect())
}

struct HoltState {
    level: f64,
    trend: f64,
    sse: f64,
}

/// Run the Holt recurrences, accumulating one-step squared error from
/// `score_from` onward.
fn double_track(values: &[f64], alpha: f64, beta: f64, score_from: usize) -> HoltState {
    let mut level = values[0];
    let mut trend = values[1] - values[0];
    let mut sse = 0.0;

    for (t, &y) in values.iter().enumerate().skip(1) {
        if t >= score_from {
            let error = y - (level + trend);
            sse += error * error;
        }
        let level_prev = level;
        level = alpha * y + (1.0 - alpha) * (level_prev + trend);
        trend = beta * (level - level_prev) + (1.0 - beta) * trend;
    }

    HoltState { level, trend, sse }
}

fn double_score(values: &[f64], alpha: f64, beta: f64) -> f64 {
    double_track(values, alpha, beta, score_start(values.len())).sse
}

// --- triple (Holt-Winters) ------------------------------------------------

fn triple(
    values: &[f64],
    params: &SmoothingParams,
    season_length: usize,
    periods: usize,
) -> Result<Vec<f64>> {
    let n = values.len();
    if n < 2 * season_length {
        return Err(ForecastError::InsufficientData {
            needed: 2 * season_length,
            got: n,
        });
    }

    let gamma = params
        .gamma
        .unwrap_or(defaults::GAMMA)
        .clamp(0.0001, 0.9999);
    let (alpha, beta) = resolve_alpha_beta(values, params, |vals, a, b| {
        triple_score(vals, season_length, a, b, gamma)
    });

    let TripleState {
        level,
        trend,
        seasonal,
        ..
    } = triple_track(values, season_length, alpha, beta, gamma, score_start(n));

    Ok((0..periods)
        .map(|i| (level + (i + 1) as f64 * trend) * seasonal[(n + i) % season_length])
        .collect())
}

struct TripleState {
    level: f64,
    trend: f64,
    seasonal: Vec<f64>,
    sse: f64,
}

/// Initialize from per-phase means and run the Holt-Winters recurrences,
/// accumulating one-step squared error from `score_from` onward.
fn triple_track(
    values: &[f64],
    season_length: usize,
    alpha: f64,
    beta: f64,
    gamma: f64,
    score_from: usize,
) -> TripleState {
    let cycles = values.len() / season_length;

    // Seasonal indices: per-phase means normalized so they average 1.
    let means = phase_means(values, season_length, cycles);
    let overall = means.iter().sum::<f64>() / season_length as f64;
    let mut seasonal: Vec<f64> = means.iter().map(|m| m / overall).collect();

    // Level starts at the first-season mean; trend at the per-period change
    // between the first two season means.
    let first_season: f64 = values[..season_length].iter().sum::<f64>() / season_length as f64;
    let second_season: f64 = values[season_length..2 * season_length].iter().sum::<f64>()
        / season_length as f64;
    let mut level = first_season;
    let mut trend = (second_season - first_season) / season_length as f64;
    let mut sse = 0.0;

    for (t, &y) in values.iter().enumerate() {
        let phase = t % season_length;
        if t >= score_from {
            let error = y - (level + trend) * seasonal[phase];
            sse += error * error;
        }
        let level_prev = level;
        level = alpha * (y / seasonal[phase]) + (1.0 - alpha) * (level_prev + trend);
        trend = beta * (level - level_prev) + (1.0 - beta) * trend;
        seasonal[phase] = gamma * (y / level) + (1.0 - gamma) * seasonal[phase];
    }

    TripleState {
        level,
        trend,
        seasonal,
        sse,
    }
}

fn triple_score(values: &[f64], season_length: usize, alpha: f64, beta: f64, gamma: f64) -> f64 {
    triple_track(
        values,
        season_length,
        alpha,
        beta,
        gamma.clamp(0.0001, 0.9999),
        score_start(values.len()),
    )
    .sse
}

// --- parameter search -----------------------------------------------------

/// First index of the trailing 30% scoring window, never before index 1.
fn score_start(n: usize) -> usize {
    (((1.0 - defaults::GRID_SEARCH_TEST_SHARE) * n as f64) as usize).max(1)
}

fn alpha_grid() -> Vec<f64> {
    (1..=9).map(|k| k as f64 * 0.1).collect()
}

fn beta_grid() -> Vec<f64> {
    (1..=10).map(|k| k as f64 * 0.05).collect()
}

/// Take α/β from the caller where given and grid-search the rest.
fn resolve_alpha_beta<F>(values: &[f64], params: &SmoothingParams, score: F) -> (f64, f64)
where
    F: Fn(&[f64], f64, f64) -> f64,
{
    match (params.alpha, params.beta) {
        (Some(a), Some(b)) => (a.clamp(0.0001, 0.9999), b.clamp(0.0001, 0.9999)),
        (alpha, beta) => {
            let alphas = match alpha {
                Some(a) => vec![a.clamp(0.0001, 0.9999)],
                None => alpha_grid(),
            };
            let betas = match beta {
                Some(b) => vec![b.clamp(0.0001, 0.9999)],
                None => beta_grid(),
            };
            grid_search(values, &alphas, &betas, score)
        }
    }
}

/// Search α ∈ {0.1..0.9 step 0.1} × β ∈ {0.05..0.5 step 0.05} (or whatever
/// candidate lists the caller pins down), keeping the pair with the lowest
/// finite one-step-ahead score. Falls back to the centralized defaults when
/// every candidate blows up.
fn grid_search<F>(values: &[f64], alphas: &[f64], betas: &[f64], score: F) -> (f64, f64)
where
    F: Fn(&[f64], f64, f64) -> f64,
{
    let mut best = (defaults::ALPHA, defaults::BETA);
    let mut best_score = f64::INFINITY;

    for &alpha in alphas {
        for &beta in betas {
            let s = score(values, alpha, beta);
            if s.is_finite() && s < best_score {
                best_score = s;
                best = (alpha, beta);
            }
        }
    }

    best
}
