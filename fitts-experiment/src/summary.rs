use fitts_core::TrialRecord;
use serde::Serialize;

/// End-of-session figures shown to the participant.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SessionSummary {
    pub participant: String,
    pub completed: usize,
    pub total: usize,
    /// Mean click time over successful trials, seconds.
    pub mean_time_secs: f64,
    /// Mean misses per recorded trial.
    pub mean_errors: f64,
    /// Percentage of recorded trials that succeeded.
    pub success_rate: f64,
}

impl SessionSummary {
    pub fn from_records(participant: &str, records: &[TrialRecord], total: usize) -> Self {
        let mut summary = Self {
            participant: participant.to_string(),
            completed: records.len(),
            total,
            mean_time_secs: 0.0,
            mean_errors: 0.0,
            success_rate: 0.0,
        };
        if records.is_empty() {
            return summary;
        }

        let successes: Vec<&TrialRecord> = records.iter().filter(|r| r.success).collect();
        if !successes.is_empty() {
            summary.mean_time_secs =
                successes.iter().map(|r| r.time_taken).sum::<f64>() / successes.len() as f64;
        }
        summary.mean_errors =
            records.iter().map(|r| r.errors as f64).sum::<f64>() / records.len() as f64;
        summary.success_rate = successes.len() as f64 / records.len() as f64 * 100.0;
        summary
    }
}
