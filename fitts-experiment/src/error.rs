use std::path::PathBuf;
use thiserror::Error;

/// Configuration problems, all detected before the first trial.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("participant id must not be empty")]
    EmptyParticipant,
    #[error("at least one target size is required")]
    NoTargetSizes,
    #[error("target size {0} must be positive")]
    NonPositiveSize(f64),
    #[error("at least one target distance is required")]
    NoDistances,
    #[error("at least one direction is required")]
    NoDirections,
    #[error("repetitions per configuration must be at least 1")]
    NoRepetitions,
    #[error("{0} planned trials exceed the trial numbering range")]
    TooManyTrials(usize),
    #[error("canvas {width}x{height} cannot fit a target of radius {radius}")]
    CanvasTooSmall { radius: f64, width: f64, height: f64 },
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse config {path}: {source}")]
    Parse {
        path: PathBuf,
        source: serde_json::Error,
    },
}

/// Failure to persist a completed trial.
#[derive(Error, Debug)]
pub enum RecordError {
    #[error("trial log I/O failed: {0}")]
    Io(#[from] std::io::Error),
    #[error("trial log write failed: {0}")]
    Csv(#[from] csv::Error),
}

#[derive(Error, Debug)]
pub enum SessionError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Record(#[from] RecordError),
}
