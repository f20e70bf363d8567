//! Offline Fitts' Law analysis of recorded trial logs.

pub mod aggregate;
pub mod binning;
pub mod difficulty;
pub mod error;
pub mod pipeline;
pub mod reader;
pub mod regression;
pub mod report;
pub mod stats;

pub use aggregate::{DifficultySummary, ParticipantSummary};
pub use binning::{BIN_COUNT, DistanceBin};
pub use error::AnalysisError;
pub use pipeline::{Analysis, AnalysisRow, Side, analyze};
pub use reader::{read_records, read_trial_log};
pub use regression::{Regression, RegressionResult};
pub use report::{
    CsvReportEmitter, DifficultyTableRow, OutputPaths, ReportEmitter, difficulty_table, run_pipeline,
    write_reports,
};
