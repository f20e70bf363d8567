//! Tabular outputs of an analysis run.

use crate::aggregate::{DifficultySummary, ParticipantSummary};
use crate::error::AnalysisError;
use crate::pipeline::{Analysis, AnalysisRow, analyze};
use crate::reader::read_trial_log;
use crate::stats::round_to;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Decimal places of the binned difficulty table.
pub const TABLE_DECIMALS: i32 = 3;

/// One line of the binned results table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DifficultyTableRow {
    #[serde(rename = "ID")]
    pub id: f64,
    #[serde(rename = "MT")]
    pub mt: f64,
    #[serde(rename = "Error")]
    pub error: f64,
    #[serde(rename = "IP")]
    pub ip: f64,
}

impl From<&DifficultySummary> for DifficultyTableRow {
    fn from(d: &DifficultySummary) -> Self {
        Self {
            id: round_to(d.id, TABLE_DECIMALS),
            mt: round_to(d.mt, TABLE_DECIMALS),
            error: round_to(d.error_rate, TABLE_DECIMALS),
            ip: round_to(d.ip, TABLE_DECIMALS),
        }
    }
}

/// Sink for the three result tables.
pub trait ReportEmitter {
    fn emit_trials(&mut self, rows: &[AnalysisRow]) -> Result<(), AnalysisError>;
    fn emit_participants(&mut self, rows: &[ParticipantSummary]) -> Result<(), AnalysisError>;
    fn emit_difficulty(&mut self, rows: &[DifficultyTableRow]) -> Result<(), AnalysisError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub trials: PathBuf,
    pub participants: PathBuf,
    pub difficulty: PathBuf,
}

impl OutputPaths {
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            trials: dir.join("fitts_clean_trials.csv"),
            participants: dir.join("fitts_participant_summary.csv"),
            difficulty: dir.join("Fitts_Law_results_binned.csv"),
        }
    }
}

/// Writes each table to its own CSV file, replacing earlier output.
pub struct CsvReportEmitter {
    paths: OutputPaths,
}

impl CsvReportEmitter {
    pub fn new(paths: OutputPaths) -> Self {
        Self { paths }
    }

    /// Creates `dir` if needed and uses the default file names inside it.
    pub fn in_dir(dir: impl AsRef<Path>) -> Result<Self, AnalysisError> {
        fs::create_dir_all(dir.as_ref())?;
        Ok(Self::new(OutputPaths::in_dir(dir)))
    }

    pub fn paths(&self) -> &OutputPaths {
        &self.paths
    }

    fn write<T: Serialize>(path: &Path, rows: &[T]) -> Result<(), AnalysisError> {
        let wrap = |source| AnalysisError::Write {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::Writer::from_path(path).map_err(wrap)?;
        for row in rows {
            writer.serialize(row).map_err(wrap)?;
        }
        writer.flush()?;
        log::info!("Wrote {} rows to {}", rows.len(), path.display());
        Ok(())
    }
}

impl ReportEmitter for CsvReportEmitter {
    fn emit_trials(&mut self, rows: &[AnalysisRow]) -> Result<(), AnalysisError> {
        Self::write(&self.paths.trials, rows)
    }

    fn emit_participants(&mut self, rows: &[ParticipantSummary]) -> Result<(), AnalysisError> {
        Self::write(&self.paths.participants, rows)
    }

    fn emit_difficulty(&mut self, rows: &[DifficultyTableRow]) -> Result<(), AnalysisError> {
        Self::write(&self.paths.difficulty, rows)
    }
}

pub fn difficulty_table(analysis: &Analysis) -> Vec<DifficultyTableRow> {
    analysis.difficulties.iter().map(Into::into).collect()
}

pub fn write_reports<E: ReportEmitter + ?Sized>(
    analysis: &Analysis,
    emitter: &mut E,
) -> Result<(), AnalysisError> {
    emitter.emit_trials(&analysis.rows)?;
    emitter.emit_participants(&analysis.participants)?;
    emitter.emit_difficulty(&difficulty_table(analysis))
}

/// Reads the log at `input`, analyzes it and emits every table.
pub fn run_pipeline<E: ReportEmitter + ?Sized>(
    input: impl AsRef<Path>,
    emitter: &mut E,
) -> Result<Analysis, AnalysisError> {
    let records = read_trial_log(input)?;
    let analysis = analyze(&records)?;
    write_reports(&analysis, emitter)?;
    Ok(analysis)
}
