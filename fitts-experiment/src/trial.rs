use fitts_core::Target;
use fitts_timing::Timestamp;

/// The target currently on screen and everything measured about it so far.
#[derive(Debug, Clone)]
pub struct ActiveTrial {
    pub target: Target,
    pub misses: u32,
    /// Reset on every presentation of the target, including retries.
    pub started: Timestamp,
}

impl ActiveTrial {
    pub fn new(target: Target, started: Timestamp) -> Self {
        Self {
            target,
            misses: 0,
            started,
        }
    }
}
