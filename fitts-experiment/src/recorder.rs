use crate::error::RecordError;
use fitts_core::TrialRecord;
use std::fs::{File, OpenOptions};
use std::path::{Path, PathBuf};

/// Sink for completed trials, called in completion order.
pub trait TrialRecorder {
    fn record(&mut self, record: &TrialRecord) -> Result<(), RecordError>;
}

/// Appends trials to a CSV log, one flushed row per acquisition.
pub struct CsvTrialRecorder {
    path: PathBuf,
    writer: csv::Writer<File>,
}

impl CsvTrialRecorder {
    /// Opens `path` for appending. The header row is only written when the file
    /// did not exist yet, so successive sessions share one log.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, RecordError> {
        let path = path.as_ref().to_path_buf();
        let existed = path.is_file();
        let file = OpenOptions::new().create(true).append(true).open(&path)?;
        let writer = csv::WriterBuilder::new()
            .has_headers(!existed)
            .from_writer(file);
        log::info!(
            "Trial log {} ({})",
            path.display(),
            if existed { "appending" } else { "new file" }
        );
        Ok(Self { path, writer })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl TrialRecorder for CsvTrialRecorder {
    fn record(&mut self, record: &TrialRecord) -> Result<(), RecordError> {
        self.writer.serialize(record)?;
        self.writer.flush()?;
        Ok(())
    }
}

/// Keeps records in memory.
#[derive(Debug, Default, Clone)]
pub struct MemoryRecorder {
    pub records: Vec<TrialRecord>,
}

impl TrialRecorder for MemoryRecorder {
    fn record(&mut self, record: &TrialRecord) -> Result<(), RecordError> {
        self.records.push(record.clone());
        Ok(())
    }
}

impl<W: TrialRecorder + ?Sized> TrialRecorder for &mut W {
    fn record(&mut self, record: &TrialRecord) -> Result<(), RecordError> {
        (**self).record(record)
    }
}
