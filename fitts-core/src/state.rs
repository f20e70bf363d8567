use serde::{Deserialize, Serialize};

/// Result of evaluating a click against the active target.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Outcome {
    Hit,
    Miss,
}

/// States of a trial session.
#[derive(Copy, Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SessionState {
    #[default]
    Idle,
    AwaitingClick,
    AwaitingContinue(Outcome),
    Completed,
    Aborted,
}

impl SessionState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Aborted)
    }

    /// Clicks are only evaluated while a target is live.
    pub fn accepts_clicks(&self) -> bool {
        matches!(self, Self::AwaitingClick)
    }

    pub fn awaiting_continue(&self) -> bool {
        matches!(self, Self::AwaitingContinue(_))
    }

    pub fn feedback(&self) -> Option<Outcome> {
        match self {
            Self::AwaitingContinue(outcome) => Some(*outcome),
            _ => None,
        }
    }
}
