//! Population-relative quantile binning of intended distances.
//!
//! Edges are the 25th, 50th and 75th percentiles of the observed distances, so
//! the bins are recomputed from every dataset rather than taken from a fixed
//! table. Bins are right-closed and the smallest value belongs to the first bin;
//! a value equal to an edge falls into the lower bin. Non-finite values are left
//! out of the edges and stay unbinned.

use crate::stats::{mean, percentile_sorted};
use serde::Serialize;
use std::fmt;

pub const BIN_COUNT: usize = 4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum DistanceBin {
    #[serde(rename = "D1_near")]
    Near,
    #[serde(rename = "D2_mid")]
    Mid,
    #[serde(rename = "D3_far")]
    Far,
    #[serde(rename = "D4_farthest")]
    Farthest,
}

impl DistanceBin {
    pub const ALL: [DistanceBin; BIN_COUNT] = [
        DistanceBin::Near,
        DistanceBin::Mid,
        DistanceBin::Far,
        DistanceBin::Farthest,
    ];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn label(self) -> &'static str {
        match self {
            DistanceBin::Near => "D1_near",
            DistanceBin::Mid => "D2_mid",
            DistanceBin::Far => "D3_far",
            DistanceBin::Farthest => "D4_farthest",
        }
    }
}

impl fmt::Display for DistanceBin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Inner edges (25/50/75th percentiles) of the finite values. `None` when there
/// are none.
pub fn quartile_edges(values: &[f64]) -> Option<[f64; BIN_COUNT - 1]> {
    let mut sorted: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    sorted.sort_by(f64::total_cmp);
    Some([
        percentile_sorted(&sorted, 0.25)?,
        percentile_sorted(&sorted, 0.50)?,
        percentile_sorted(&sorted, 0.75)?,
    ])
}

/// Assigns every finite value to one of the four ordinal bins, in input order.
pub fn assign_bins(values: &[f64]) -> Vec<Option<DistanceBin>> {
    let Some(edges) = quartile_edges(values) else {
        return vec![None; values.len()];
    };
    values
        .iter()
        .map(|&v| {
            v.is_finite().then(|| {
                let idx = edges.iter().take_while(|&&edge| v > edge).count();
                DistanceBin::ALL[idx]
            })
        })
        .collect()
}

/// Mean value of each bin; `None` for bins nobody fell into.
pub fn bin_means(values: &[f64], bins: &[Option<DistanceBin>]) -> [Option<f64>; BIN_COUNT] {
    let mut members: [Vec<f64>; BIN_COUNT] = Default::default();
    for (&v, bin) in values.iter().zip(bins) {
        if let Some(bin) = bin {
            members[bin.index()].push(v);
        }
    }
    members.map(|m| mean(&m))
}
