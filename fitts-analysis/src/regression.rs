//! Ordinary least squares of movement time on index of difficulty.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionResult {
    /// Milliseconds per bit.
    pub slope: f64,
    /// Milliseconds.
    pub intercept: f64,
    /// NaN when the movement times have no variance.
    pub r_squared: f64,
    /// `1000 / slope` bits/s; NaN when the slope is zero.
    pub throughput: f64,
    pub points: usize,
}

/// Outcome of the fit. Only `Fitted` carries a model; the other variants are
/// reported, never raised.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum Regression {
    Fitted(RegressionResult),
    /// Fewer than two points.
    InsufficientData { points: usize },
    /// Every point has the same ID, so no unique line exists.
    Degenerate { points: usize },
}

impl Regression {
    pub fn result(&self) -> Option<&RegressionResult> {
        match self {
            Regression::Fitted(r) => Some(r),
            _ => None,
        }
    }
}

/// Fits `y = slope * x + intercept`.
pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Regression {
    let points = xs.len().min(ys.len());
    if points < 2 {
        return Regression::InsufficientData { points };
    }
    let (xs, ys) = (&xs[..points], &ys[..points]);

    let n = points as f64;
    let mean_x = xs.iter().sum::<f64>() / n;
    let mean_y = ys.iter().sum::<f64>() / n;

    let mut sxx = 0.0;
    let mut sxy = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let dx = x - mean_x;
        sxx += dx * dx;
        sxy += dx * (y - mean_y);
    }
    if sxx == 0.0 {
        return Regression::Degenerate { points };
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;

    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let predicted = slope * x + intercept;
        ss_res += (y - predicted).powi(2);
        ss_tot += (y - mean_y).powi(2);
    }
    let r_squared = if ss_tot != 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        f64::NAN
    };
    let throughput = if slope != 0.0 { 1000.0 / slope } else { f64::NAN };

    Regression::Fitted(RegressionResult {
        slope,
        intercept,
        r_squared,
        throughput,
        points,
    })
}
