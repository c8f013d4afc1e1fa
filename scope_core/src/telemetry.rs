//! Telemetry Store: history, run counters and last error, updated together.
use std::time::SystemTime;

use crate::error::PollError;
use crate::stats::{Summary, summarize};
use crate::status::PollOutcome;
use crate::store::RingBuffer;

/// Poll attempts since start or the last clear.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunCounters {
    pub success: u64,
    pub errors: u64,
}

impl RunCounters {
    pub fn attempts(&self) -> u64 {
        self.success.saturating_add(self.errors)
    }
}

/// Mutable telemetry state. Lives behind the session lock; never shared
/// without it.
#[derive(Debug)]
pub struct Telemetry {
    history: RingBuffer<f64>,
    counters: RunCounters,
    last_error: Option<PollError>,
    last_update: Option<SystemTime>,
    /// Bumped by every `clear()`; ticks started in an older generation are
    /// not applied.
    generation: u64,
}

impl Telemetry {
    pub fn new(capacity: usize) -> Self {
        Self {
            history: RingBuffer::with_capacity(capacity),
            counters: RunCounters::default(),
            last_error: None,
            last_update: None,
            generation: 0,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn capacity(&self) -> usize {
        self.history.capacity()
    }

    /// Apply one classified outcome observed at wall time `at`.
    pub fn record(&mut self, outcome: &PollOutcome, at: SystemTime) {
        match outcome {
            PollOutcome::Success(v) => {
                self.history.push(*v);
                self.counters.success = self.counters.success.saturating_add(1);
                self.last_error = None;
                self.last_update = Some(at);
            }
            PollOutcome::Failed(e) => {
                self.counters.errors = self.counters.errors.saturating_add(1);
                self.last_error = Some(e.clone());
            }
        }
    }

    /// Empty the history and zero counters and last error.
    pub fn clear(&mut self) {
        self.history.clear();
        self.counters = RunCounters::default();
        self.last_error = None;
        self.last_update = None;
        self.generation = self.generation.wrapping_add(1);
    }

    /// Independent copy of the current state.
    pub fn snapshot(&self) -> TelemetrySnapshot {
        TelemetrySnapshot {
            readings: self.history.to_vec(),
            capacity: self.history.capacity(),
            counters: self.counters,
            last_error: self.last_error.clone(),
            last_update: self.last_update,
        }
    }
}

/// Owned, consistent view of the telemetry at one instant.
#[derive(Debug, Clone, PartialEq)]
pub struct TelemetrySnapshot {
    /// Oldest → newest.
    pub readings: Vec<f64>,
    pub capacity: usize,
    pub counters: RunCounters,
    pub last_error: Option<PollError>,
    /// Wall time of the newest reading.
    pub last_update: Option<SystemTime>,
}

impl TelemetrySnapshot {
    pub fn latest(&self) -> Option<f64> {
        self.readings.last().copied()
    }

    pub fn summary(&self) -> Option<Summary> {
        summarize(&self.readings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failure_keeps_history_and_sets_error() {
        let mut t = Telemetry::new(4);
        let at = SystemTime::UNIX_EPOCH;
        t.record(&PollOutcome::Success(5.0), at);
        t.record(&PollOutcome::Failed(PollError::Timeout), SystemTime::now());
        let s = t.snapshot();
        assert_eq!(s.readings, vec![5.0]);
        assert_eq!(s.counters, RunCounters { success: 1, errors: 1 });
        assert_eq!(s.last_error, Some(PollError::Timeout));
        assert_eq!(s.last_update, Some(at));

        t.record(&PollOutcome::Success(6.0), at);
        assert_eq!(t.snapshot().last_error, None);
    }

    #[test]
    fn clear_bumps_generation() {
        let mut t = Telemetry::new(4);
        t.record(&PollOutcome::Success(1.0), SystemTime::now());
        let g = t.generation();
        t.clear();
        assert_eq!(t.generation(), g + 1);
        let s = t.snapshot();
        assert!(s.readings.is_empty());
        assert_eq!(s.last_update, None);
        assert_eq!(s.counters.attempts(), 0);
        assert_eq!(s.capacity, 4);
    }
}
