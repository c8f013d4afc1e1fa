//! Operator commands: tare, pause/resume, clear and shutdown.
//!
//! Commands act on the session directly and never go through a poll tick.
//! Only `tare` touches the device, with its own bounded timeout, so the
//! live dashboard hands commands to a `CommandWorker` thread and keeps
//! rendering while a tare is in flight.
use std::str::FromStr;
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Duration;

use crossbeam_channel as xch;
use scope_traits::Sensor;
use scope_traits::clock::{Clock, MonotonicClock};
use thiserror::Error;

use crate::classify::classify_error;
use crate::error::PollError;
use crate::poller::catch_transport;
use crate::session::{Notice, Session};

/// One operator request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Tare,
    Pause,
    Resume,
    TogglePause,
    Clear,
    Shutdown,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown command '{0}' (expected t, p, r, space, c or q)")]
pub struct ParseCommandError(pub String);

impl FromStr for Command {
    type Err = ParseCommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        // A bare space toggles; anything else is trimmed first.
        if s == " " {
            return Ok(Self::TogglePause);
        }
        match s.trim().to_ascii_lowercase().as_str() {
            "t" | "tare" => Ok(Self::Tare),
            "p" | "pause" => Ok(Self::Pause),
            "r" | "resume" => Ok(Self::Resume),
            "toggle" => Ok(Self::TogglePause),
            "c" | "clear" => Ok(Self::Clear),
            "q" | "quit" | "exit" => Ok(Self::Shutdown),
            other => Err(ParseCommandError(other.to_string())),
        }
    }
}

/// Applies commands to a session. Owns its own sensor handle so a tare
/// never contends with the poller's connection.
pub struct Dispatcher<S, C = MonotonicClock> {
    session: Arc<Session>,
    sensor: S,
    timeout: Duration,
    clock: C,
}

impl<S: Sensor> Dispatcher<S, MonotonicClock> {
    pub fn new(session: Arc<Session>, sensor: S, timeout: Duration) -> Self {
        Self::with_clock(session, sensor, timeout, MonotonicClock::new())
    }
}

impl<S: Sensor, C: Clock> Dispatcher<S, C> {
    pub fn with_clock(session: Arc<Session>, sensor: S, timeout: Duration, clock: C) -> Self {
        Self {
            session,
            sensor,
            timeout,
            clock,
        }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    /// Zero the device. The outcome is posted as a transient notice and
    /// returned; history, counters and Last Error are left alone.
    pub fn tare(&mut self) -> Notice {
        let kind = self.session.kind();
        let (text, error) = if kind.supports_tare() {
            let timeout = self.timeout;
            let sensor = &mut self.sensor;
            let reason = match catch_transport(|| sensor.tare(timeout)) {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(classify_error(kind, e.as_ref())),
                Err(msg) => Some(PollError::Other(msg)),
            };
            match reason {
                None => {
                    tracing::info!("tare completed");
                    ("Tare completed!".to_string(), None)
                }
                Some(reason) => {
                    tracing::warn!(error = %reason, kind = reason.kind_name(), "tare failed");
                    (format!("Tare failed: {reason}"), Some(reason))
                }
            }
        } else {
            let reason = format!("not supported by {kind} sensors");
            (format!("Tare failed: {reason}"), Some(PollError::Other(reason)))
        };
        let notice = Notice {
            text,
            error,
            at: self.clock.now(),
        };
        self.session.post_notice(notice.clone());
        notice
    }

    pub fn pause(&self) {
        self.session.set_paused(true);
        tracing::debug!("polling paused");
    }

    pub fn resume(&self) {
        self.session.set_paused(false);
        tracing::debug!("polling resumed");
    }

    /// Returns the new pause state.
    pub fn toggle_pause(&self) -> bool {
        let paused = self.session.toggle_pause();
        tracing::debug!(paused, "pause toggled");
        paused
    }

    pub fn clear(&self) {
        self.session.clear();
        tracing::debug!("telemetry cleared");
    }

    /// Request every loop to stop. Idempotent; returns `false` when a stop
    /// was already pending.
    pub fn shutdown(&self) -> bool {
        let first = self.session.request_stop();
        if first {
            tracing::info!("shutdown requested");
        }
        first
    }

    /// Apply one command. Returns the notice produced by a tare.
    pub fn dispatch(&mut self, cmd: Command) -> Option<Notice> {
        match cmd {
            Command::Tare => return Some(self.tare()),
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            Command::TogglePause => {
                self.toggle_pause();
            }
            Command::Clear => self.clear(),
            Command::Shutdown => {
                self.shutdown();
            }
        }
        None
    }
}

/// How often an idle worker rechecks the stop flag.
const STOP_CHECK: Duration = Duration::from_millis(50);

/// Owns a `Dispatcher` on its own thread and applies commands as they
/// arrive. The thread ends when the session stops or every sender is gone;
/// it is joined on `join` or drop.
pub struct CommandWorker {
    session: Arc<Session>,
    join_handle: Option<JoinHandle<u64>>,
}

impl CommandWorker {
    pub fn spawn<S, C>(mut dispatcher: Dispatcher<S, C>, rx: xch::Receiver<Command>) -> Self
    where
        S: Sensor + Send + 'static,
        C: Clock + Send + 'static,
    {
        let session = Arc::clone(dispatcher.session());
        let join_handle = std::thread::Builder::new()
            .name("commands".into())
            .spawn(move || {
                let mut handled: u64 = 0;
                while !dispatcher.session().is_stopped() {
                    match rx.recv_timeout(STOP_CHECK) {
                        Ok(cmd) => {
                            tracing::debug!(?cmd, "command received");
                            dispatcher.dispatch(cmd);
                            handled += 1;
                        }
                        Err(xch::RecvTimeoutError::Timeout) => {}
                        Err(xch::RecvTimeoutError::Disconnected) => break,
                    }
                }
                tracing::trace!(handled, "command worker exiting");
                handled
            });
        let join_handle = match join_handle {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!(error = %e, "command worker unavailable");
                None
            }
        };
        Self {
            session,
            join_handle,
        }
    }

    pub fn is_running(&self) -> bool {
        self.join_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Wait for the worker to finish. Does not request a stop by itself;
    /// an in-flight tare completes first. Returns the number of commands
    /// handled, `None` once already joined.
    pub fn join(&mut self) -> Option<u64> {
        let handle = self.join_handle.take()?;
        match handle.join() {
            Ok(handled) => Some(handled),
            Err(e) => {
                tracing::warn!(?e, "command worker panicked");
                None
            }
        }
    }
}

impl Drop for CommandWorker {
    fn drop(&mut self) {
        self.session.request_stop();
        let _ = self.join();
    }
}
