pub mod config;
pub mod error;
pub mod generator;
pub mod plan;
pub mod recorder;
pub mod session;
pub mod summary;
pub mod trial;

pub use config::ExperimentConfig;
pub use error::{ConfigError, RecordError, SessionError};
pub use generator::TargetGenerator;
pub use plan::{TrialCondition, TrialPlan};
pub use recorder::{CsvTrialRecorder, MemoryRecorder, TrialRecorder};
pub use session::{SessionEvent, TrialSession};
pub use summary::SessionSummary;
pub use trial::ActiveTrial;
