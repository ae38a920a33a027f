//! Threshold crossing detection over chronologically ordered samples.

use crate::time_series::PercentSample;
use chrono::{DateTime, Duration, Utc};

/// Finds the instant a percentage series first reaches `target`.
///
/// Scans chronologically, skipping non-finite samples. Returns the first
/// sample's timestamp when it already meets the target; otherwise, when a
/// sample at or above target follows one below it, returns the linearly
/// interpolated crossing instant between the two, with the interpolation
/// fraction clamped to [0, 1] and the result rounded to the nearest whole
/// millisecond. Returns `None` when no sample reaches the target.
pub fn find_crossing(samples: &[PercentSample], target: f64) -> Option<DateTime<Utc>> {
    let mut previous: Option<&PercentSample> = None;

    for sample in samples {
        if !sample.percent.is_finite() {
            continue;
        }

        if sample.percent >= target {
            return Some(match previous {
                Some(prev) => interpolate_crossing(prev, sample, target),
                None => sample.timestamp,
            });
        }

        previous = Some(sample);
    }

    None
}

/// Blends the timestamps of two bracketing samples by the fraction of the
/// percent gap covered at `target`.
fn interpolate_crossing(
    below: &PercentSample,
    at_or_above: &PercentSample,
    target: f64,
) -> DateTime<Utc> {
    let gap = at_or_above.percent - below.percent;
    let fraction = if gap.abs() < f64::EPSILON {
        1.0
    } else {
        ((target - below.percent) / gap).clamp(0.0, 1.0)
    };

    let span_ms = (at_or_above.timestamp - below.timestamp).num_milliseconds() as f64;
    let offset_ms = (span_ms * fraction).round() as i64;
    below.timestamp + Duration::milliseconds(offset_ms)
}
