//! Historical series points and integer-coded time handling.
//!
//! Timestamps are plain integers: either a 4-digit year (`2024`) or a 6-digit
//! year-month (`202403`, i.e. `year * 100 + month`). The format is inferred
//! from the data, never declared by the caller.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single observed point of the historical series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HistoricalPoint {
    /// Integer-coded timestamp (`YYYY` or `YYYY * 100 + MM`).
    pub time: i64,
    /// Observed value. Signed quantities (growth rates, deltas) are fine.
    pub value: f64,
}

impl HistoricalPoint {
    /// Create a new point.
    pub fn new(time: i64, value: f64) -> Self {
        Self { time, value }
    }
}

/// Inferred encoding of the integer timestamps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TimeFormat {
    /// 4-digit year.
    Year,
    /// 6-digit `YYYY * 100 + MM`.
    YearMonth,
}

impl TimeFormat {
    /// Map a timestamp onto a linear axis: years stay as-is, year-months
    /// become a running month index so deltas across year boundaries work.
    fn position(&self, time: i64) -> i64 {
        match self {
            TimeFormat::Year => time,
            TimeFormat::YearMonth => {
                let year = time / 100;
                let month = time % 100;
                year * 12 + (month - 1)
            }
        }
    }
}

/// Return the points sorted by ascending time.
///
/// The sort is stable, so duplicate timestamps keep their caller order and
/// stay as independent observations.
pub fn sort_by_time(points: &[HistoricalPoint]) -> Vec<HistoricalPoint> {
    let mut sorted = points.to_vec();
    sorted.sort_by_key(|p| p.time);
    sorted
}

/// Infer the time encoding of a series.
///
/// A series is year-month when every timestamp is a 6-digit integer in
/// `[100000, 999999]`; anything else is treated as plain years.
pub fn detect_format(points: &[HistoricalPoint]) -> TimeFormat {
    let all_six_digit = !points.is_empty()
        && points
            .iter()
            .all(|p| (100_000..=999_999).contains(&p.time));
    if all_six_digit {
        TimeFormat::YearMonth
    } else {
        TimeFormat::Year
    }
}

/// Infer the sampling interval of a time-sorted series.
///
/// Computes the pairwise deltas between consecutive points (months for
/// year-month data, years otherwise) and picks the most frequent positive
/// delta. Ties go to the smaller delta; a series with no positive delta
/// (all duplicates) defaults to 1.
pub fn detect_interval(sorted: &[HistoricalPoint], format: TimeFormat) -> i64 {
    let mut counts: BTreeMap<i64, usize> = BTreeMap::new();
    for pair in sorted.windows(2) {
        let delta = format.position(pair[1].time) - format.position(pair[0].time);
        if delta > 0 {
            *counts.entry(delta).or_insert(0) += 1;
        }
    }

    counts
        .into_iter()
        .max_by(|(delta_a, count_a), (delta_b, count_b)| {
            // Highest count wins; on ties the BTreeMap order makes the
            // smaller delta the max_by survivor.
            count_a.cmp(count_b).then(delta_b.cmp(delta_a))
        })
        .map(|(delta, _)| delta)
        .unwrap_or(1)
}

/// Project a timestamp `steps` intervals into the future.
///
/// Year-month projection carries months into years explicitly, so `202311`
/// advanced by 3 months lands on `202402`.
pub fn project_time(time: i64, format: TimeFormat, interval: i64, steps: i64) -> i64 {
    match format {
        TimeFormat::Year => time + interval * steps,
        TimeFormat::YearMonth => {
            let months = format.position(time) + interval * steps;
            let year = months.div_euclid(12);
            let month = months.rem_euclid(12) + 1;
            year * 100 + month
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn points(times: &[i64]) -> Vec<HistoricalPoint> {
        times
            .iter()
            .map(|&t| HistoricalPoint::new(t, 0.0))
            .collect()
    }

    #[test]
    fn sorting_is_stable_for_duplicate_times() {
        let input = vec![
            HistoricalPoint::new(2021, 3.0),
            HistoricalPoint::new(2020, 1.0),
            HistoricalPoint::new(2020, 2.0),
        ];
        let sorted = sort_by_time(&input);

        assert_eq!(sorted[0].value, 1.0);
        assert_eq!(sorted[1].value, 2.0);
        assert_eq!(sorted[2].value, 3.0);
    }

    #[test]
    fn four_digit_years_detected() {
        assert_eq!(detect_format(&points(&[2020, 2021, 2022])), TimeFormat::Year);
    }

    #[test]
    fn six_digit_year_months_detected() {
        assert_eq!(
            detect_format(&points(&[202001, 202002, 202003])),
            TimeFormat::YearMonth
        );
    }

    #[test]
    fn mixed_widths_fall_back_to_years() {
        assert_eq!(detect_format(&points(&[2020, 202002])), TimeFormat::Year);
    }

    #[test]
    fn interval_is_the_modal_delta() {
        // Deltas: 1, 1, 2, 1 -> mode 1
        let sorted = points(&[2018, 2019, 2020, 2022, 2023]);
        assert_eq!(detect_interval(&sorted, TimeFormat::Year), 1);
    }

    #[test]
    fn monthly_interval_spans_year_boundaries() {
        let sorted = points(&[202311, 202312, 202401, 202402]);
        assert_eq!(detect_interval(&sorted, TimeFormat::YearMonth), 1);

        let quarterly = points(&[202303, 202306, 202309, 202312, 202403]);
        assert_eq!(detect_interval(&quarterly, TimeFormat::YearMonth), 3);
    }

    #[test]
    fn all_duplicate_times_default_to_interval_one() {
        let sorted = points(&[2020, 2020, 2020]);
        assert_eq!(detect_interval(&sorted, TimeFormat::Year), 1);
    }

    #[test]
    fn tied_delta_counts_prefer_the_smaller_delta() {
        // Deltas: 1, 2 -> both seen once
        let sorted = points(&[2020, 2021, 2023]);
        assert_eq!(detect_interval(&sorted, TimeFormat::Year), 1);
    }

    #[test]
    fn year_projection_is_plain_addition() {
        assert_eq!(project_time(2023, TimeFormat::Year, 1, 3), 2026);
        assert_eq!(project_time(2023, TimeFormat::Year, 2, 2), 2027);
    }

    #[test]
    fn month_projection_carries_into_the_next_year() {
        assert_eq!(project_time(202311, TimeFormat::YearMonth, 1, 1), 202312);
        assert_eq!(project_time(202311, TimeFormat::YearMonth, 1, 2), 202401);
        assert_eq!(project_time(202311, TimeFormat::YearMonth, 1, 3), 202402);
        assert_eq!(project_time(202312, TimeFormat::YearMonth, 3, 4), 202412);
    }
}
