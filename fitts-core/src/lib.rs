pub mod geometry;
pub mod record;
pub mod state;
pub mod target;

pub use geometry::{Bounds, Point, distance, is_hit};
pub use record::TrialRecord;
pub use state::{Outcome, SessionState};
pub use target::Target;
