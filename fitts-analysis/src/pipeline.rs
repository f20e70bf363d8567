//! Batch transform from the raw trial log to Fitts' Law quantities.
//!
//! The pipeline never mutates its input. Running it twice on the same records
//! yields the same rows, fit and summaries.

use crate::aggregate::{
    DifficultySummary, ParticipantSummary, difficulty_summaries, participant_summaries,
};
use crate::binning::{BIN_COUNT, DistanceBin, assign_bins, bin_means};
use crate::difficulty::{index_of_difficulty, rounded_id};
use crate::error::AnalysisError;
use crate::regression::{Regression, fit_linear};
use crate::stats::median;
use fitts_core::{Point, TrialRecord, distance};
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    Left,
    Right,
}

/// A trial-log row enriched with the derived analysis columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AnalysisRow {
    pub trial: u32,
    pub participant: String,
    pub circle_radius: f64,
    pub circle_center_x: f64,
    pub circle_center_y: f64,
    pub time_taken: f64,
    pub distance: f64,
    pub errors: u32,
    pub direction: String,
    pub success: bool,
    pub start_time: f64,
    pub diameter: f64,
    /// Distance from the target center to the inferred screen center.
    pub intended_distance: f64,
    #[serde(rename = "MT_ms")]
    pub mt_ms: f64,
    pub error_flag: u8,
    pub direction_derived: Side,
    /// `None` when the intended distance is not finite.
    pub distance_bin: Option<DistanceBin>,
    /// Mean intended distance of the row's bin.
    #[serde(rename = "D_bin_value")]
    pub d_bin_value: Option<f64>,
    #[serde(rename = "ID_raw")]
    pub id_raw: Option<f64>,
    #[serde(rename = "ID")]
    pub id: Option<f64>,
}

#[derive(Debug, Clone)]
pub struct Analysis {
    /// Per-axis median of all target centers.
    pub inferred_center: Point,
    pub bin_means: [Option<f64>; BIN_COUNT],
    pub rows: Vec<AnalysisRow>,
    pub regression: Regression,
    pub participants: Vec<ParticipantSummary>,
    pub difficulties: Vec<DifficultySummary>,
}

impl Analysis {
    /// Distinct IDs in ascending order.
    pub fn unique_ids(&self) -> Vec<f64> {
        self.difficulties.iter().map(|d| d.id).collect()
    }
}

pub fn analyze(records: &[TrialRecord]) -> Result<Analysis, AnalysisError> {
    let xs: Vec<f64> = records.iter().map(|r| r.circle_center_x).collect();
    let ys: Vec<f64> = records.iter().map(|r| r.circle_center_y).collect();
    let (Some(cx), Some(cy)) = (median(&xs), median(&ys)) else {
        return Err(AnalysisError::EmptyLog);
    };
    let inferred_center = Point::new(cx, cy);
    log::info!(
        "Inferred screen center ({:.1}, {:.1}) from {} rows",
        cx,
        cy,
        records.len()
    );

    let intended: Vec<f64> = records
        .iter()
        .map(|r| distance(r.center(), inferred_center))
        .collect();
    let bins = assign_bins(&intended);
    let unbinned = bins.iter().filter(|b| b.is_none()).count();
    if unbinned > 0 {
        log::warn!("{unbinned} rows have no finite target center and stay unbinned");
    }
    let means = bin_means(&intended, &bins);
    for bin in DistanceBin::ALL {
        if let Some(m) = means[bin.index()] {
            log::debug!("{bin}: mean distance {m:.2} px");
        }
    }

    let rows: Vec<AnalysisRow> = records
        .iter()
        .zip(intended.iter().zip(&bins))
        .map(|(r, (&intended_distance, &bin))| {
            let diameter = 2.0 * r.circle_radius;
            let d_bin_value = bin.and_then(|b| means[b.index()]);
            let id_raw = d_bin_value.and_then(|d| index_of_difficulty(d, diameter));
            AnalysisRow {
                trial: r.trial,
                participant: r.participant.clone(),
                circle_radius: r.circle_radius,
                circle_center_x: r.circle_center_x,
                circle_center_y: r.circle_center_y,
                time_taken: r.time_taken,
                distance: r.distance,
                errors: r.errors,
                direction: r.direction.clone(),
                success: r.success,
                start_time: r.start_time,
                diameter,
                intended_distance,
                mt_ms: r.time_taken * 1000.0,
                error_flag: u8::from(r.errors != 0 || !r.success),
                direction_derived: if r.circle_center_x < cx {
                    Side::Left
                } else {
                    Side::Right
                },
                distance_bin: bin,
                d_bin_value,
                id_raw,
                id: id_raw.map(rounded_id),
            }
        })
        .collect();

    let (ids, times): (Vec<f64>, Vec<f64>) = rows
        .iter()
        .filter_map(|row| row.id.map(|id| (id, row.mt_ms)))
        .unzip();
    let regression = fit_linear(&ids, &times);
    match &regression {
        Regression::Fitted(r) => log::info!(
            "MT = {:.3} * ID + {:.3} (R^2 {:.3}, IP {:.3} bits/s, n = {})",
            r.slope,
            r.intercept,
            r.r_squared,
            r.throughput,
            r.points
        ),
        Regression::InsufficientData { points } => {
            log::warn!("Regression skipped: {points} rows with an ID")
        }
        Regression::Degenerate { points } => {
            log::warn!("Regression skipped: all {points} rows share one ID")
        }
    }

    let participants = participant_summaries(&rows);
    let difficulties = difficulty_summaries(&rows);

    Ok(Analysis {
        inferred_center,
        bin_means: means,
        rows,
        regression,
        participants,
        difficulties,
    })
}
