//! Per-window trend projection and multi-window consensus.
//!
//! A window projector slices the most recent N days of a series, reports an
//! already-realized crossing when one exists, and otherwise extrapolates a
//! fitted linear trend to the target percent. The consensus selector runs
//! the projector over a fixed set of lookback windows and picks the lower
//! median of the resulting dates.

use crate::crossing::find_crossing;
use crate::regression::fit_line;
use crate::time_series::{PercentSample, ShapeSeries};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Readiness target, in percent.
pub const READINESS_TARGET: f64 = 100.0;

/// Canonical lookback window lengths, in days.
pub const DEFAULT_WINDOWS: [u32; 4] = [7, 14, 30, 60];

const MILLIS_PER_DAY: f64 = 86_400_000.0;

/// Outcome of projecting one lookback window.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", content = "date", rename_all = "snake_case")]
pub enum ProjectionOutcome {
    /// The window already contains a crossing at this instant (exact sample
    /// date, or interpolated between the bracketing samples).
    Reached(DateTime<Utc>),
    /// Target not yet reached; extrapolated crossing under a positive trend.
    Projected(DateTime<Utc>),
    /// Flat or declining trend, or fewer than 2 usable samples.
    NoTrend,
}

impl ProjectionOutcome {
    /// The crossing instant carried by `Reached` or `Projected`.
    pub fn date(&self) -> Option<DateTime<Utc>> {
        match self {
            ProjectionOutcome::Reached(date) | ProjectionOutcome::Projected(date) => Some(*date),
            ProjectionOutcome::NoTrend => None,
        }
    }
}

/// Projects the crossing date for one lookback window.
///
/// Takes the most recent `window_days` entries (the whole series when it is
/// shorter), checks for a realized crossing first, then fits a least-squares
/// line over (day offset, percent) and extrapolates it to `target`.
pub fn project(series: &ShapeSeries, window_days: u32, target: f64) -> ProjectionOutcome {
    let samples = series.percent_samples();
    if samples.is_empty() {
        return ProjectionOutcome::NoTrend;
    }

    let len = samples.len().min(window_days as usize);
    let window = &samples[samples.len() - len..];

    if let Some(date) = find_crossing(window, target) {
        return ProjectionOutcome::Reached(date);
    }

    let usable: Vec<&PercentSample> = window
        .iter()
        .filter(|sample| sample.percent.is_finite())
        .collect();
    if usable.len() < 2 {
        return ProjectionOutcome::NoTrend;
    }

    let x: Vec<f64> = usable.iter().map(|s| day_offset(s.timestamp)).collect();
    let y: Vec<f64> = usable.iter().map(|s| s.percent).collect();

    let Some(fit) = fit_line(&x, &y) else {
        return ProjectionOutcome::NoTrend;
    };
    if fit.slope <= 0.0 {
        return ProjectionOutcome::NoTrend;
    }

    let target_x = (target - fit.intercept) / fit.slope;
    if !target_x.is_finite() {
        return ProjectionOutcome::NoTrend;
    }

    match day_offset_to_instant(target_x) {
        Some(date) => ProjectionOutcome::Projected(date),
        None => ProjectionOutcome::NoTrend,
    }
}

/// Picks the single recommended crossing date across a set of windows.
///
/// Collects every `Reached` or `Projected` date, sorts ascending, and takes
/// the lower median (index `(count - 1) / 2`, favoring the earlier of the
/// two central dates on even counts). `None` when no window produced a date.
pub fn recommend(series: &ShapeSeries, windows: &[u32], target: f64) -> Option<DateTime<Utc>> {
    let dates: Vec<DateTime<Utc>> = windows
        .iter()
        .filter_map(|window_days| project(series, *window_days, target).date())
        .collect();
    lower_median(dates)
}

/// Lower-median element of a date list.
fn lower_median(mut dates: Vec<DateTime<Utc>>) -> Option<DateTime<Utc>> {
    if dates.is_empty() {
        return None;
    }
    dates.sort();
    Some(dates[(dates.len() - 1) / 2])
}

/// Continuous day count since the Unix epoch.
fn day_offset(instant: DateTime<Utc>) -> f64 {
    instant.timestamp_millis() as f64 / MILLIS_PER_DAY
}

/// Converts a (possibly fractional) epoch day count back to an instant,
/// rounded to the nearest whole millisecond. `None` when the offset falls
/// outside the representable range.
fn day_offset_to_instant(days: f64) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp_millis((days * MILLIS_PER_DAY).round() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn series(entries: &[(NaiveDate, f64)]) -> ShapeSeries {
        entries.iter().copied().collect()
    }

    #[test]
    fn empty_series_is_no_trend() {
        assert_eq!(
            project(&ShapeSeries::new(), 30, READINESS_TARGET),
            ProjectionOutcome::NoTrend
        );
    }

    #[test]
    fn single_sample_is_no_trend_regardless_of_value() {
        let s = series(&[(day(2025, 1, 1), 0.95)]);
        assert_eq!(project(&s, 7, READINESS_TARGET), ProjectionOutcome::NoTrend);
    }

    #[test]
    fn flat_series_is_no_trend() {
        let s = series(&[
            (day(2025, 1, 1), 0.60),
            (day(2025, 1, 8), 0.60),
            (day(2025, 1, 15), 0.60),
        ]);
        assert_eq!(
            project(&s, 30, READINESS_TARGET),
            ProjectionOutcome::NoTrend
        );
    }

    #[test]
    fn declining_series_is_no_trend() {
        let s = series(&[
            (day(2025, 1, 1), 0.80),
            (day(2025, 1, 8), 0.70),
            (day(2025, 1, 15), 0.60),
        ]);
        assert_eq!(
            project(&s, 30, READINESS_TARGET),
            ProjectionOutcome::NoTrend
        );
    }

    #[test]
    fn crossing_inside_window_reports_reached_with_interpolated_date() {
        // 90% -> 105% over 7 days: crossing lands 2/3 through the gap.
        let s = series(&[
            (day(2025, 1, 1), 0.80),
            (day(2025, 1, 8), 0.90),
            (day(2025, 1, 15), 1.05),
        ]);

        match project(&s, 30, READINESS_TARGET) {
            ProjectionOutcome::Reached(date) => {
                assert_eq!(date.to_rfc3339(), "2025-01-12T16:00:00+00:00");
                assert_eq!(date.date_naive(), day(2025, 1, 12));
            }
            other => panic!("expected Reached, got {:?}", other),
        }
    }

    #[test]
    fn upward_sub_target_series_projects_future_date() {
        let s = series(&[
            (day(2025, 1, 1), 0.50),
            (day(2025, 1, 15), 0.55),
            (day(2025, 2, 1), 0.60),
        ]);

        match project(&s, 60, READINESS_TARGET) {
            ProjectionOutcome::Projected(date) => {
                assert!(date.date_naive() > day(2025, 2, 1), "projection must be in the future");
                // ~0.32 percent/day from 60%: roughly 140 days out.
                assert!(date.date_naive() < day(2026, 1, 1));
            }
            other => panic!("expected Projected, got {:?}", other),
        }
    }

    #[test]
    fn window_longer_than_series_uses_entire_series() {
        let s = series(&[(day(2025, 1, 1), 0.50), (day(2025, 1, 2), 0.51)]);

        // 365-day window over 2 samples behaves like the full series.
        let wide = project(&s, 365, READINESS_TARGET);
        let exact = project(&s, 2, READINESS_TARGET);
        assert_eq!(wide, exact);
        assert!(matches!(wide, ProjectionOutcome::Projected(_)));
    }

    #[test]
    fn short_window_ignores_older_upward_samples() {
        // Full history rises, but the last 3 samples are flat: a 3-day
        // window must see no trend while a wide window projects.
        let s = series(&[
            (day(2025, 1, 1), 0.40),
            (day(2025, 1, 2), 0.50),
            (day(2025, 1, 3), 0.60),
            (day(2025, 1, 4), 0.60),
            (day(2025, 1, 5), 0.60),
        ]);

        assert_eq!(project(&s, 3, READINESS_TARGET), ProjectionOutcome::NoTrend);
        assert!(matches!(
            project(&s, 30, READINESS_TARGET),
            ProjectionOutcome::Projected(_)
        ));
    }

    #[test]
    fn lower_median_picks_earlier_of_two_central_dates() {
        let dates: Vec<DateTime<Utc>> = [
            day(2025, 1, 20),
            day(2025, 1, 10),
            day(2025, 1, 25),
            day(2025, 1, 15),
        ]
        .iter()
        .map(|d| crate::time_series::day_start_utc(*d))
        .collect();

        let median = lower_median(dates).unwrap();
        assert_eq!(median.date_naive(), day(2025, 1, 15));
    }

    #[test]
    fn lower_median_odd_count_is_middle_element() {
        let dates: Vec<DateTime<Utc>> = [day(2025, 1, 10), day(2025, 1, 20), day(2025, 1, 30)]
            .iter()
            .map(|d| crate::time_series::day_start_utc(*d))
            .collect();
        assert_eq!(lower_median(dates).unwrap().date_naive(), day(2025, 1, 20));
    }

    #[test]
    fn lower_median_empty_is_none() {
        assert_eq!(lower_median(Vec::new()), None);
    }

    #[test]
    fn recommend_returns_none_when_every_window_is_trendless() {
        let s = series(&[
            (day(2025, 1, 1), 0.80),
            (day(2025, 1, 8), 0.70),
            (day(2025, 1, 15), 0.60),
        ]);
        assert_eq!(recommend(&s, &DEFAULT_WINDOWS, READINESS_TARGET), None);
    }

    #[test]
    fn recommend_returns_a_date_for_an_upward_series() {
        let s: ShapeSeries = (0..20)
            .map(|i| {
                (
                    day(2025, 1, 1) + chrono::Duration::days(i),
                    0.50 + 0.01 * i as f64,
                )
            })
            .collect();

        let recommended = recommend(&s, &DEFAULT_WINDOWS, READINESS_TARGET).unwrap();
        assert!(recommended.date_naive() > day(2025, 1, 20));
    }

    #[test]
    fn outcome_serializes_with_status_tag() {
        let json = serde_json::to_value(ProjectionOutcome::NoTrend).unwrap();
        assert_eq!(json, serde_json::json!({ "status": "no_trend" }));

        let reached = ProjectionOutcome::Reached(crate::time_series::day_start_utc(day(2025, 1, 12)));
        let json = serde_json::to_value(reached).unwrap();
        assert_eq!(json["status"], "reached");
    }
}
