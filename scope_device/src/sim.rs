//! Offline stand-in for the device, used by `--sim` and tests.
use std::str::FromStr;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use scope_traits::{Sensor, SensorKind};

use crate::error::DeviceError;

/// A failure the simulator reports on every read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fault {
    Timeout,
    Refused,
    Status(u16),
    /// Device answers, but with a negative value.
    Negative,
}

impl FromStr for Fault {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        match s.as_str() {
            "timeout" => Ok(Self::Timeout),
            "refused" => Ok(Self::Refused),
            "negative" => Ok(Self::Negative),
            other => other
                .strip_prefix("http")
                .and_then(|code| code.parse::<u16>().ok())
                .map(Self::Status)
                .ok_or_else(|| format!("unknown simulated fault '{other}'")),
        }
    }
}

/// Produces a slow wave around a kind-specific baseline.
#[derive(Debug, Clone)]
pub struct SimulatedSensor {
    kind: SensorKind,
    tick: u64,
    zero: f64,
    fault: Option<Fault>,
}

impl SimulatedSensor {
    pub fn new(kind: SensorKind) -> Self {
        Self {
            kind,
            tick: 0,
            zero: 0.0,
            fault: None,
        }
    }

    pub fn with_fault(mut self, fault: Fault) -> Self {
        self.fault = Some(fault);
        self
    }

    /// Turn this sensor into a handle that can be cloned across threads.
    pub fn shared(self) -> SharedSim {
        SharedSim(Arc::new(Mutex::new(self)))
    }

    fn raw(&self) -> f64 {
        let (base, amp) = match self.kind {
            SensorKind::Weight => (250.0, 40.0),
            SensorKind::Distance => (400.0, 150.0),
        };
        let phase = self.tick as f64 / 20.0;
        (base + amp * phase.sin()).round()
    }
}

impl Sensor for SimulatedSensor {
    fn read(
        &mut self,
        _timeout: Duration,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        self.tick = self.tick.wrapping_add(1);
        match self.fault {
            Some(Fault::Timeout) => return Err(Box::new(DeviceError::Timeout)),
            Some(Fault::Refused) => return Err(Box::new(DeviceError::ConnectionRefused)),
            Some(Fault::Status(code)) => return Err(Box::new(DeviceError::Status(code))),
            Some(Fault::Negative) => return Ok(-1.0),
            None => {}
        }
        let value = (self.raw() - self.zero).max(0.0);
        tracing::trace!(value, kind = %self.kind, "simulated read");
        Ok(value)
    }

    fn tare(&mut self, _timeout: Duration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        if !self.kind.supports_tare() {
            return Err(Box::new(DeviceError::Unsupported(self.kind)));
        }
        self.zero = self.raw();
        tracing::debug!(zero = self.zero, "simulated tare");
        Ok(())
    }
}

/// Cloneable handle to one simulated device: a tare through any clone
/// shifts the readings seen by every other clone.
#[derive(Debug, Clone)]
pub struct SharedSim(Arc<Mutex<SimulatedSensor>>);

impl SharedSim {
    fn lock(&self) -> MutexGuard<'_, SimulatedSensor> {
        self.0.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Sensor for SharedSim {
    fn read(&mut self, timeout: Duration) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        self.lock().read(timeout)
    }

    fn tare(&mut self, timeout: Duration) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        self.lock().tare(timeout)
    }
}
