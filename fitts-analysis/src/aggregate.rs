use crate::difficulty::{ID_DECIMALS, index_of_performance};
use crate::pipeline::AnalysisRow;
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantSummary {
    pub participant: String,
    #[serde(rename = "MT_ms_mean")]
    pub mt_ms_mean: f64,
    pub error_rate: f64,
    /// Mean over rows with a finite intended distance.
    pub distance_mean: f64,
    pub trials: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultySummary {
    pub id: f64,
    /// Mean movement time, milliseconds.
    pub mt: f64,
    pub error_rate: f64,
    pub trials: usize,
    /// `ID / (MT / 1000)`, bits/s.
    pub ip: f64,
}

#[derive(Default)]
struct Accumulator {
    mt_ms: f64,
    errors: f64,
    distance: f64,
    distance_count: usize,
    count: usize,
}

impl Accumulator {
    fn add(&mut self, row: &AnalysisRow) {
        self.mt_ms += row.mt_ms;
        self.errors += row.error_flag as f64;
        if row.intended_distance.is_finite() {
            self.distance += row.intended_distance;
            self.distance_count += 1;
        }
        self.count += 1;
    }

    fn mean(sum: f64, count: usize) -> f64 {
        sum / count as f64
    }
}

/// Per-participant means, ordered by participant id.
pub fn participant_summaries(rows: &[AnalysisRow]) -> Vec<ParticipantSummary> {
    let mut groups: BTreeMap<&str, Accumulator> = BTreeMap::new();
    for row in rows {
        groups.entry(row.participant.as_str()).or_default().add(row);
    }
    groups
        .into_iter()
        .map(|(participant, acc)| ParticipantSummary {
            participant: participant.to_string(),
            mt_ms_mean: Accumulator::mean(acc.mt_ms, acc.count),
            error_rate: Accumulator::mean(acc.errors, acc.count),
            distance_mean: Accumulator::mean(acc.distance, acc.distance_count),
            trials: acc.count,
        })
        .collect()
}

/// Per-ID means in ascending ID order. Rows without an ID are left out.
pub fn difficulty_summaries(rows: &[AnalysisRow]) -> Vec<DifficultySummary> {
    let scale = 10f64.powi(ID_DECIMALS);
    // IDs are already rounded, so scaling gives an exact integer key
    let mut groups: BTreeMap<i64, (f64, Accumulator)> = BTreeMap::new();
    for row in rows {
        if let Some(id) = row.id {
            let key = (id * scale).round() as i64;
            groups
                .entry(key)
                .or_insert_with(|| (id, Accumulator::default()))
                .1
                .add(row);
        }
    }
    groups
        .into_values()
        .map(|(id, acc)| {
            let mt = Accumulator::mean(acc.mt_ms, acc.count);
            DifficultySummary {
                id,
                mt,
                error_rate: Accumulator::mean(acc.errors, acc.count),
                trials: acc.count,
                ip: index_of_performance(id, mt),
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::analyze;
    use fitts_core::TrialRecord;

    fn record(participant: &str, radius: f64, x: f64, secs: f64, errors: u32) -> TrialRecord {
        TrialRecord {
            trial: 1,
            participant: participant.to_string(),
            circle_radius: radius,
            circle_center_x: x,
            circle_center_y: 200.0,
            time_taken: secs,
            distance: 0.0,
            errors,
            direction: "random".to_string(),
            success: true,
            start_time: 0.0,
        }
    }

    #[test]
    fn test_participant_mean_movement_time() {
        let records = vec![
            record("Person B", 20.0, 100.0, 1.0, 0),
            record("Person B", 20.0, 300.0, 2.0, 1),
            record("Person B", 20.0, 500.0, 3.0, 0),
            record("Person A", 10.0, 400.0, 0.5, 0),
        ];
        let analysis = analyze(&records).unwrap();
        let summaries = participant_summaries(&analysis.rows);
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].participant, "Person A");
        let b = &summaries[1];
        assert_eq!(b.participant, "Person B");
        assert!((b.mt_ms_mean - 2000.0).abs() < 1e-9);
        assert!((b.error_rate - 1.0 / 3.0).abs() < 1e-12);
        assert_eq!(b.trials, 3);
    }

    #[test]
    fn test_ip_monotonic_in_id_at_equal_mt() {
        // same distance from center, two widths: two IDs with equal MT
        let records = vec![
            record("A", 10.0, 100.0, 0.8, 0),
            record("A", 40.0, 500.0, 0.8, 0),
            record("A", 10.0, 500.0, 0.8, 0),
            record("A", 40.0, 100.0, 0.8, 0),
        ];
        let analysis = analyze(&records).unwrap();
        let d = difficulty_summaries(&analysis.rows);
        assert_eq!(d.len(), 2);
        assert!(d[0].id < d[1].id);
        assert_eq!(d[0].mt, d[1].mt);
        assert!(d[0].ip < d[1].ip);
        assert!((d[1].ip - d[1].id / 0.8).abs() < 1e-9);
    }
}
