use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A single percentage sample consumed by the regression and crossing
/// primitives.
///
/// `percent` is the stored reading scaled by 100 (a reading of 0.65 becomes
/// 65.0). The timestamp is midnight UTC of the sample's calendar day for
/// samples taken from a [`ShapeSeries`]; interpolated crossing instants may
/// carry sub-day precision.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PercentSample {
    /// Instant of the sample
    pub timestamp: DateTime<Utc>,
    /// Reading scaled to percent (0.65 stored -> 65.0)
    pub percent: f64,
}

impl PercentSample {
    /// Creates a new PercentSample.
    pub fn new(timestamp: DateTime<Utc>, percent: f64) -> Self {
        PercentSample { timestamp, percent }
    }
}

/// Canonical date-keyed reading series.
///
/// An ordered mapping from UTC calendar day to a numeric reading in
/// [0, +inf), typically a goal fraction (0.65 = 65%). Keys are unique;
/// missing days are simply absent. Iteration is chronological because the
/// keys are real parsed dates, not date-like strings.
///
/// A series is rebuilt from a freshly fetched document on every render cycle
/// and never mutated after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ShapeSeries {
    values: BTreeMap<NaiveDate, f64>,
}

impl ShapeSeries {
    /// Creates an empty series.
    pub fn new() -> Self {
        ShapeSeries {
            values: BTreeMap::new(),
        }
    }

    /// Inserts a reading for a calendar day, replacing any existing reading
    /// for the same day (last-wins duplicate rule).
    pub fn insert(&mut self, day: NaiveDate, reading: f64) {
        self.values.insert(day, reading);
    }

    /// Number of days with a reading.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the series holds no readings.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates (day, reading) pairs in chronological order.
    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &f64)> {
        self.values.iter()
    }

    /// The most recent (day, reading) pair, if any.
    pub fn latest(&self) -> Option<(NaiveDate, f64)> {
        self.values.iter().next_back().map(|(d, v)| (*d, *v))
    }

    /// The most recent reading scaled to percent.
    pub fn latest_percent(&self) -> Option<f64> {
        self.latest().map(|(_, reading)| reading * 100.0)
    }

    /// Converts the whole series into percent samples in chronological
    /// order, each stamped at midnight UTC of its calendar day.
    pub fn percent_samples(&self) -> Vec<PercentSample> {
        self.values
            .iter()
            .map(|(day, reading)| PercentSample::new(day_start_utc(*day), reading * 100.0))
            .collect()
    }
}

impl FromIterator<(NaiveDate, f64)> for ShapeSeries {
    fn from_iter<I: IntoIterator<Item = (NaiveDate, f64)>>(iter: I) -> Self {
        let mut series = ShapeSeries::new();
        for (day, reading) in iter {
            series.insert(day, reading);
        }
        series
    }
}

/// Midnight UTC of a calendar day.
pub fn day_start_utc(day: NaiveDate) -> DateTime<Utc> {
    day.and_time(NaiveTime::MIN).and_utc()
}
