//! Reading the trial log written by the experiment.

use crate::error::AnalysisError;
use fitts_core::TrialRecord;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub fn read_trial_log(path: impl AsRef<Path>) -> Result<Vec<TrialRecord>, AnalysisError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| AnalysisError::Read {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    let records = read_records(file).map_err(|source| match source {
        AnalysisError::Csv(source) => AnalysisError::Read {
            path: path.to_path_buf(),
            source,
        },
        other => other,
    })?;
    log::info!("Loaded {} trials from {}", records.len(), path.display());
    Ok(records)
}

/// Parses a headered trial log from any reader.
pub fn read_records<R: Read>(reader: R) -> Result<Vec<TrialRecord>, AnalysisError> {
    let mut rdr = csv::Reader::from_reader(reader);
    let mut records = Vec::new();
    for row in rdr.deserialize() {
        records.push(row?);
    }
    Ok(records)
}
