//! Ordinary least-squares line fitting.
//!
//! A pure primitive over parallel slices of x (day offsets) and y (percent)
//! values, composed by the window projector.

/// Result of a least-squares fit: `y = slope * x + intercept`.
///
/// Slope is percent per day; intercept is the percent at day-offset zero.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
}

/// Numeric tolerance below which the x-variance is treated as zero.
const VARIANCE_EPSILON: f64 = 1e-12;

/// Fits an ordinary least-squares line through (x, y) pairs.
///
/// Returns `None` when the slices are empty or their lengths differ. When
/// every x is identical (zero x-variance within tolerance) the fit degrades
/// to a flat line through the mean of y rather than failing, so callers
/// never divide by zero downstream.
pub fn fit_line(x: &[f64], y: &[f64]) -> Option<LinearFit> {
    if x.is_empty() || x.len() != y.len() {
        return None;
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let mut covariance = 0.0;
    let mut variance = 0.0;
    for (&xi, &yi) in x.iter().zip(y.iter()) {
        covariance += (xi - mean_x) * (yi - mean_y);
        variance += (xi - mean_x) * (xi - mean_x);
    }

    if variance.abs() < VARIANCE_EPSILON {
        return Some(LinearFit {
            slope: 0.0,
            intercept: mean_y,
        });
    }

    let slope = covariance / variance;
    Some(LinearFit {
        slope,
        intercept: mean_y - slope * mean_x,
    })
}
