//! Per-series report assembly for the rendering layer.
//!
//! The report is the only structure the (out-of-scope) presentation layer
//! consumes: latest observed percent, the per-window projection outcomes,
//! the consensus date, and the observed full-series crossing date. The
//! reached-vs-consensus reconciliation lives here as one documented rule
//! instead of being recomposed ad hoc by callers.

use crate::crossing::find_crossing;
use crate::normalize::normalize;
use crate::projection::{project, recommend, ProjectionOutcome};
use crate::source::DocumentSource;
use crate::time_series::ShapeSeries;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Projection summary for one percentage-tracked series.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShapeReport {
    /// Most recent observed reading, scaled to percent
    pub latest_observed_percent: Option<f64>,
    /// One projection outcome per configured lookback window (days)
    pub projections_by_window: BTreeMap<u32, ProjectionOutcome>,
    /// Lower-median consensus of the windowed crossing dates
    pub recommended_date: Option<NaiveDate>,
    /// Observed crossing date over the full, unwindowed series
    pub already_reached_date: Option<NaiveDate>,
}

impl ShapeReport {
    /// Builds the report for one series.
    ///
    /// Everything is recomputed from scratch; the report holds no state
    /// across render cycles.
    pub fn build(series: &ShapeSeries, windows: &[u32], target: f64) -> Self {
        let projections_by_window: BTreeMap<u32, ProjectionOutcome> = windows
            .iter()
            .map(|window_days| (*window_days, project(series, *window_days, target)))
            .collect();

        let recommended_date =
            recommend(series, windows, target).map(|instant| instant.date_naive());
        let already_reached_date =
            find_crossing(&series.percent_samples(), target).map(|instant| instant.date_naive());

        ShapeReport {
            latest_observed_percent: series.latest_percent(),
            projections_by_window,
            recommended_date,
            already_reached_date,
        }
    }

    /// The single date to display: an observed full-series crossing takes
    /// precedence over the extrapolated consensus date.
    pub fn display_date(&self) -> Option<NaiveDate> {
        self.already_reached_date.or(self.recommended_date)
    }
}

/// Combined per-athlete dashboard payload: marathon-readiness projections
/// plus the latest VO2max reading.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AthleteReport {
    /// User label the documents were fetched for
    pub user: String,
    /// Marathon-readiness projection summary
    pub marathon: ShapeReport,
    /// Most recent VO2max reading, raw units
    pub vo2max_latest: Option<f64>,
}

impl AthleteReport {
    /// Builds the report for one athlete from named documents
    /// (`<user>_marathon`, `<user>_vo2`).
    ///
    /// An absent or malformed document degrades to an empty series, which in
    /// turn degrades every derived field to `None`/`NoTrend`.
    pub fn build(source: &dyn DocumentSource, user: &str, windows: &[u32], target: f64) -> Self {
        let marathon_series = source
            .document(&format!("{}_marathon", user))
            .map(|doc| normalize(&doc))
            .unwrap_or_default();
        let vo2_series = source
            .document(&format!("{}_vo2", user))
            .map(|doc| normalize(&doc))
            .unwrap_or_default();

        AthleteReport {
            user: user.to_string(),
            marathon: ShapeReport::build(&marathon_series, windows, target),
            vo2max_latest: vo2_series.latest().map(|(_, reading)| reading),
        }
    }
}
