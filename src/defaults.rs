//! Centralized fallback constants shared across the model families.
//!
//! Every "safe default" the engine can silently fall back to lives here, so a
//! reader can audit them in one place instead of chasing literals through the
//! smoothing and interval code.

/// Default level smoothing factor when `alpha` is unset and optimization
/// yields nothing usable.
pub const ALPHA: f64 = 0.3;

/// Default trend smoothing factor when `beta` is unset and optimization
/// yields nothing usable.
pub const BETA: f64 = 0.1;

/// Default seasonal smoothing factor for Holt-Winters.
pub const GAMMA: f64 = 0.1;

/// Default season length (monthly data with a yearly cycle).
pub const SEASON_LENGTH: usize = 12;

/// Pivot magnitude below which a linear system is treated as singular.
pub const SINGULAR_PIVOT_TOLERANCE: f64 = 1e-10;

/// z-score for a 95% two-sided normal interval.
pub const Z_95: f64 = 1.96;

/// z-score for a 99% two-sided normal interval.
pub const Z_99: f64 = 2.576;

/// t-multiplier used for the linear-regression interval when n > 30.
pub const T_LARGE_SAMPLE: f64 = 1.96;

/// Coarse t-multiplier used for the linear-regression interval when n <= 30.
pub const T_SMALL_SAMPLE: f64 = 2.0;

/// Sample-size cutoff between the two t-multipliers above.
pub const T_CUTOFF_N: usize = 30;

/// Share of the series held out when backtesting.
pub const BACKTEST_RATIO: f64 = 0.2;

/// Share of the series used as the one-step-ahead scoring window during
/// smoothing-parameter grid search (the trailing 30%).
pub const GRID_SEARCH_TEST_SHARE: f64 = 0.3;

/// Threshold on the phase-mean coefficient of variation above which a series
/// is treated as seasonal.
pub const SEASONALITY_CV_THRESHOLD: f64 = 0.1;

/// Scale factor on `range / n` against which the regression slope is compared
/// when testing for a trend.
pub const TREND_SLOPE_THRESHOLD: f64 = 0.1;

/// Default moving-average window for a series of length `n`: one third of the
/// series, at least 2, and never the whole series.
pub fn moving_average_window(n: usize) -> usize {
    (n / 3).max(2).min(n.saturating_sub(1))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn window_is_a_third_of_the_series() {
        assert_eq!(moving_average_window(12), 4);
        assert_eq!(moving_average_window(30), 10);
    }

    #[test]
    fn window_never_drops_below_two_or_covers_everything() {
        assert_eq!(moving_average_window(3), 2);
        assert_eq!(moving_average_window(4), 2);
        // For very short series the n-1 cap wins over the floor of 2.
        assert_eq!(moving_average_window(2), 1);
    }
}
