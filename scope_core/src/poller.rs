//! Background telemetry acquisition.
//!
//! Spawns a thread that owns the `Sensor`, issues one bounded-timeout read
//! per tick, classifies the result and commits it to the shared session.
//!
//! Safety: Each `Poller` spawns exactly one thread that is shut down and
//! joined when the `Poller` is stopped or dropped, preventing thread leaks.
use std::any::Any;
use std::cell::Cell;
use std::panic::{self, AssertUnwindSafe};
use std::sync::{Arc, Once};
use std::time::Duration;

use scope_traits::Sensor;
use scope_traits::clock::Clock;

use crate::classify::classify;
use crate::config::PollCfg;
use crate::error::PollError;
use crate::session::Session;
use crate::status::{PollOutcome, Tick};

/// Run one tick against `sensor` and commit the outcome.
///
/// A paused session does no I/O. A panicking transport is classified as
/// `OtherError` instead of unwinding into the caller.
pub fn poll_once<S: Sensor + ?Sized>(session: &Session, sensor: &mut S, timeout: Duration) -> Tick {
    if session.is_paused() {
        return Tick::Paused;
    }
    let ticket = session.begin_tick();
    let outcome = match catch_transport(|| sensor.read(timeout)) {
        Ok(result) => classify(session.kind(), result),
        Err(msg) => PollOutcome::Failed(PollError::Other(msg)),
    };
    session.commit(ticket, outcome)
}

thread_local! {
    static IN_TRANSPORT: Cell<bool> = const { Cell::new(false) };
}

static QUIET_HOOK: Once = Once::new();

/// Run one device call, turning a panic into its message.
pub(crate) fn catch_transport<T>(call: impl FnOnce() -> T) -> Result<T, String> {
    IN_TRANSPORT.with(|f| f.set(true));
    let result = panic::catch_unwind(AssertUnwindSafe(call));
    IN_TRANSPORT.with(|f| f.set(false));
    result.map_err(|payload| panic_message(payload.as_ref()))
}

/// Keep panics raised inside a device call off stderr. They are already
/// reported as `OtherError`, so the hook only logs them at debug level;
/// every other panic goes to the previously installed hook. Installs once.
pub fn quiet_transport_panics() {
    QUIET_HOOK.call_once(|| {
        let prev = panic::take_hook();
        panic::set_hook(Box::new(move |info| {
            if IN_TRANSPORT.with(Cell::get) {
                tracing::debug!(location = ?info.location(), "sensor transport panicked");
            } else {
                prev(info);
            }
        }));
    });
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "sensor transport panicked".to_string()
    }
}

pub struct Poller {
    session: Arc<Session>,
    /// Join handle for graceful thread cleanup; yields the number of ticks run
    join_handle: Option<std::thread::JoinHandle<u64>>,
}

impl Poller {
    pub fn spawn<S, C>(session: Arc<Session>, mut sensor: S, cfg: &PollCfg, clock: C) -> Self
    where
        S: Sensor + Send + 'static,
        C: Clock + Send + 'static,
    {
        let shared = Arc::clone(&session);
        let interval = cfg.interval;
        let timeout = cfg.timeout;

        let join_handle = std::thread::spawn(move || {
            let mut ticks: u64 = 0;
            let mut failing: Option<PollError> = None;
            loop {
                if shared.is_stopped() {
                    tracing::debug!("Poller thread received shutdown signal");
                    break;
                }

                let started = clock.now();
                match poll_once(&shared, &mut sensor, timeout) {
                    Tick::Paused => {}
                    Tick::Recorded(PollOutcome::Success(value)) => {
                        ticks += 1;
                        tracing::trace!(value, "poll ok");
                        if let Some(prev) = failing.take() {
                            tracing::info!(after = %prev, "device readings recovered");
                        }
                    }
                    Tick::Recorded(PollOutcome::Failed(e)) => {
                        ticks += 1;
                        tracing::debug!(error = %e, kind = e.kind_name(), "poll failed");
                        if failing.as_ref() != Some(&e) {
                            tracing::warn!(error = %e, "device poll failing");
                            failing = Some(e);
                        }
                    }
                    Tick::Discarded(outcome) => {
                        ticks += 1;
                        tracing::debug!(?outcome, "tick overlapped a clear; outcome dropped");
                    }
                }

                // Check shutdown before sleep to avoid unnecessary delay
                if shared.is_stopped() {
                    break;
                }
                clock.sleep_rest_of(interval, started);
            }
            tracing::trace!(ticks, "Poller thread exiting cleanly");
            ticks
        });

        Self {
            session,
            join_handle: Some(join_handle),
        }
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Signal the loop to stop and wait for the current tick to finish.
    /// Returns the number of ticks that reached the device; `None` once
    /// already stopped.
    pub fn stop(&mut self) -> Option<u64> {
        self.session.request_stop();
        let handle = self.join_handle.take()?;
        match handle.join() {
            Ok(ticks) => {
                tracing::trace!(ticks, "Poller thread joined successfully");
                Some(ticks)
            }
            Err(e) => {
                tracing::warn!(?e, "Poller thread panicked during shutdown");
                None
            }
        }
    }
}

impl Drop for Poller {
    fn drop(&mut self) {
        // The thread exits at its next loop boundary: after the current
        // sleep (one interval at most) or the in-flight read (one timeout).
        let _ = self.stop();
    }
}
