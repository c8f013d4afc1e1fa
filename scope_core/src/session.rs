//! Explicitly owned session context shared by the poller, the dispatcher
//! and the display.
//!
//! Telemetry (history, counters, last error, clear generation) sits behind
//! one mutex so every read is a consistent snapshot. The pause and stop
//! flags are atomics checked once per tick.
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant, SystemTime};

use scope_traits::SensorKind;

use crate::error::{BuildError, PollError, Result};
use crate::status::{PollOutcome, Tick};
use crate::telemetry::{Telemetry, TelemetrySnapshot};

/// Largest history the builder accepts.
pub const MAX_CAPACITY: usize = 1_000_000;

/// Transient operator message (tare result), shown for a while and then
/// dropped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub text: String,
    /// Why the command failed; `None` on success.
    pub error: Option<PollError>,
    pub at: Instant,
}

impl Notice {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Proof that a tick started in a given clear generation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickTicket {
    generation: u64,
}

#[derive(Debug)]
pub struct Session {
    kind: SensorKind,
    telemetry: Mutex<Telemetry>,
    paused: AtomicBool,
    stop: AtomicBool,
    notice: Mutex<Option<Notice>>,
}

#[derive(Debug, Default)]
pub struct SessionBuilder {
    kind: Option<SensorKind>,
    capacity: Option<usize>,
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: SensorKind) -> Self {
        self.kind = Some(kind);
        self
    }

    /// History length; defaults to the kind's capacity.
    pub fn capacity(mut self, capacity: usize) -> Self {
        self.capacity = Some(capacity);
        self
    }

    pub fn build(self) -> Result<Session> {
        let kind = self
            .kind
            .ok_or_else(|| eyre::Report::new(BuildError::MissingKind))?;
        let capacity = self.capacity.unwrap_or_else(|| kind.default_capacity());
        if capacity == 0 {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "capacity must be >= 1",
            )));
        }
        if capacity > MAX_CAPACITY {
            return Err(eyre::Report::new(BuildError::InvalidConfig(
                "capacity out of range",
            )));
        }
        Ok(Session::new(kind, capacity))
    }
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    fn new(kind: SensorKind, capacity: usize) -> Self {
        Self {
            kind,
            telemetry: Mutex::new(Telemetry::new(capacity)),
            paused: AtomicBool::new(false),
            stop: AtomicBool::new(false),
            notice: Mutex::new(None),
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn capacity(&self) -> usize {
        self.telemetry().capacity()
    }

    // Every mutation is a single Telemetry call, so a poisoned lock still
    // guards consistent data.
    fn telemetry(&self) -> MutexGuard<'_, Telemetry> {
        self.telemetry.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Mark the start of a tick; pair with `commit`.
    pub fn begin_tick(&self) -> TickTicket {
        TickTicket {
            generation: self.telemetry().generation(),
        }
    }

    /// Apply `outcome` unless a clear happened since `ticket` was issued.
    pub fn commit(&self, ticket: TickTicket, outcome: PollOutcome) -> Tick {
        let mut t = self.telemetry();
        if t.generation() != ticket.generation {
            return Tick::Discarded(outcome);
        }
        t.record(&outcome, SystemTime::now());
        Tick::Recorded(outcome)
    }

    pub fn snapshot(&self) -> TelemetrySnapshot {
        self.telemetry().snapshot()
    }

    /// Empty the history, zero counters and last error, and drop any
    /// pending notice. Pause is untouched.
    pub fn clear(&self) {
        self.telemetry().clear();
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = None;
    }

    pub fn is_paused(&self) -> bool {
        self.paused.load(Ordering::Acquire)
    }

    pub fn set_paused(&self, paused: bool) {
        self.paused.store(paused, Ordering::Release);
    }

    /// Flip the pause flag, returning the new state.
    pub fn toggle_pause(&self) -> bool {
        !self.paused.fetch_xor(true, Ordering::AcqRel)
    }

    /// Ask every loop to finish at its next boundary. Returns `false` when
    /// a stop was already requested.
    pub fn request_stop(&self) -> bool {
        !self.stop.swap(true, Ordering::AcqRel)
    }

    pub fn is_stopped(&self) -> bool {
        self.stop.load(Ordering::Acquire)
    }

    pub fn post_notice(&self, notice: Notice) {
        *self.notice.lock().unwrap_or_else(PoisonError::into_inner) = Some(notice);
    }

    /// The current notice, if it is younger than `ttl` at `now`.
    pub fn notice(&self, now: Instant, ttl: Duration) -> Option<Notice> {
        let guard = self.notice.lock().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|n| now.saturating_duration_since(n.at) < ttl)
            .cloned()
    }
}
