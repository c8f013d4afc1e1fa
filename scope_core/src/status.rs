//! Outcome of one poll tick.

use crate::error::PollError;

/// Exactly one of these is produced per non-paused tick.
#[derive(Debug, Clone, PartialEq)]
pub enum PollOutcome {
    /// A plausible reading that goes into the history.
    Success(f64),
    /// Classified failure; the history is left untouched.
    Failed(PollError),
}

impl PollOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn error(&self) -> Option<&PollError> {
        match self {
            Self::Success(_) => None,
            Self::Failed(e) => Some(e),
        }
    }
}

/// What a tick did to the shared telemetry.
#[derive(Debug, Clone, PartialEq)]
pub enum Tick {
    /// Pause flag was set; no I/O, nothing changed.
    Paused,
    /// Outcome applied to the store and counters.
    Recorded(PollOutcome),
    /// A `clear()` happened while the request was in flight; the outcome
    /// belongs to the previous generation and was dropped.
    Discarded(PollOutcome),
}
