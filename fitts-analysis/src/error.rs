use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("trial log contains no rows")]
    EmptyLog,
    #[error("failed to read trial log {path}: {source}")]
    Read { path: PathBuf, source: csv::Error },
    #[error("failed to write report {path}: {source}")]
    Write { path: PathBuf, source: csv::Error },
    #[error("report I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
