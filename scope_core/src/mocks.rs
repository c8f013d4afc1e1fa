//! Test and helper sensors for scope_core.
use std::error::Error;
use std::io;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use scope_traits::Sensor;

/// A sensor that always errors; useful when only the dispatcher or the
/// display is under test.
pub struct NoopSensor;

impl Sensor for NoopSensor {
    fn read(&mut self, _timeout: Duration) -> Result<f64, Box<dyn Error + Send + Sync>> {
        Err(Box::new(io::Error::other("noop sensor")))
    }

    fn tare(&mut self, _timeout: Duration) -> Result<(), Box<dyn Error + Send + Sync>> {
        Err(Box::new(io::Error::other("noop sensor")))
    }
}

/// One scripted reply.
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    Value(f64),
    TimedOut,
    Refused,
    /// Error carrying only a message.
    Fail(String),
    /// The transport panics mid-request.
    Panic,
}

/// Replays a fixed script of replies; repeats the last step once the
/// script is exhausted. Counts reads and tares through shared handles.
#[derive(Debug, Clone)]
pub struct ScriptedSensor {
    script: Vec<Step>,
    next: usize,
    reads: Arc<AtomicUsize>,
    tares: Arc<AtomicUsize>,
    tare_fails: bool,
    tare_delay: Duration,
}

impl ScriptedSensor {
    pub fn new(script: Vec<Step>) -> Self {
        Self {
            script,
            next: 0,
            reads: Arc::new(AtomicUsize::new(0)),
            tares: Arc::new(AtomicUsize::new(0)),
            tare_fails: false,
            tare_delay: Duration::ZERO,
        }
    }

    pub fn values(values: &[f64]) -> Self {
        Self::new(values.iter().copied().map(Step::Value).collect())
    }

    /// Make every tare fail with a timeout.
    pub fn failing_tare(mut self) -> Self {
        self.tare_fails = true;
        self
    }

    /// Make every tare block for `delay` before answering.
    pub fn slow_tare(mut self, delay: Duration) -> Self {
        self.tare_delay = delay;
        self
    }

    /// Shared read counter; stays valid after the sensor moves to a thread.
    pub fn reads(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }

    pub fn tares(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.tares)
    }
}

impl Sensor for ScriptedSensor {
    fn read(&mut self, _timeout: Duration) -> Result<f64, Box<dyn Error + Send + Sync>> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        let step = match self.script.get(self.next).or_else(|| self.script.last()) {
            Some(s) => s.clone(),
            None => return Err("script is empty".into()),
        };
        self.next = self.next.saturating_add(1);
        match step {
            Step::Value(v) => Ok(v),
            Step::TimedOut => Err(Box::new(io::Error::new(
                io::ErrorKind::TimedOut,
                "operation timed out",
            ))),
            Step::Refused => Err(Box::new(io::Error::new(
                io::ErrorKind::ConnectionRefused,
                "connection refused",
            ))),
            Step::Fail(msg) => Err(msg.into()),
            Step::Panic => panic!("scripted transport panic"),
        }
    }

    fn tare(&mut self, _timeout: Duration) -> Result<(), Box<dyn Error + Send + Sync>> {
        if !self.tare_delay.is_zero() {
            std::thread::sleep(self.tare_delay);
        }
        self.tares.fetch_add(1, Ordering::SeqCst);
        if self.tare_fails {
            return Err(Box::new(io::Error::new(
                io::ErrorKind::TimedOut,
                "operation timed out",
            )));
        }
        Ok(())
    }
}
