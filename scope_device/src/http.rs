//! Blocking HTTP client for the device's REST API.
//!
//! Only `/api/sensor_read` is used: `GET` for a reading, `PUT {"tare": true}`
//! to zero the load cell. Each call carries its own timeout.
use std::error::Error as StdError;
use std::io;
use std::time::Duration;

use scope_traits::{Sensor, SensorKind};
use serde_json::Value;

use crate::error::{DeviceError, Result};

const SENSOR_READ_PATH: &str = "/api/sensor_read";

#[derive(Clone)]
pub struct HttpSensor {
    agent: ureq::Agent,
    base_url: String,
    kind: SensorKind,
}

impl std::fmt::Debug for HttpSensor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HttpSensor")
            .field("base_url", &self.base_url)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl HttpSensor {
    /// `timeout` is the agent-wide ceiling; `read`/`tare` may pass a
    /// tighter one per request.
    pub fn new(base_url: &str, kind: SensorKind, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self {
            agent,
            base_url: base_url.trim().trim_end_matches('/').to_string(),
            kind,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.kind
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn endpoint(&self) -> String {
        format!("{}{}", self.base_url, SENSOR_READ_PATH)
    }

    /// One `GET /api/sensor_read`, decoded to the kind's field.
    pub fn fetch(&self, timeout: Duration) -> Result<f64> {
        let resp = self
            .agent
            .get(&self.endpoint())
            .timeout(timeout)
            .call()
            .map_err(map_ureq_error)?;
        let body: Value = resp.into_json().map_err(map_body_error)?;
        let value = extract_reading(&body, self.kind.field())?;
        tracing::trace!(value, kind = %self.kind, "sensor_read");
        Ok(value)
    }

    /// One `PUT /api/sensor_read` with `{"tare": true}`.
    pub fn send_tare(&self, timeout: Duration) -> Result<()> {
        if !self.kind.supports_tare() {
            return Err(DeviceError::Unsupported(self.kind));
        }
        self.agent
            .put(&self.endpoint())
            .timeout(timeout)
            .send_json(serde_json::json!({ "tare": true }))
            .map_err(map_ureq_error)?;
        tracing::debug!(url = %self.endpoint(), "tare acknowledged");
        Ok(())
    }
}

impl Sensor for HttpSensor {
    fn read(
        &mut self,
        timeout: Duration,
    ) -> std::result::Result<f64, Box<dyn StdError + Send + Sync>> {
        Ok(self.fetch(timeout)?)
    }

    fn tare(&mut self, timeout: Duration) -> std::result::Result<(), Box<dyn StdError + Send + Sync>> {
        Ok(self.send_tare(timeout)?)
    }
}

/// Pull the reading out of a `sensor_read` body such as `{"weight": 12.5}`.
///
/// A missing or `null` field is reported as `MissingField`, which callers
/// treat like a negative reading.
pub fn extract_reading(body: &Value, field: &'static str) -> Result<f64> {
    match body.get(field) {
        None | Some(Value::Null) => Err(DeviceError::MissingField(field)),
        Some(v) => v
            .as_f64()
            .ok_or_else(|| DeviceError::Decode(format!("'{field}' is not a number: {v}"))),
    }
}

fn map_ureq_error(err: ureq::Error) -> DeviceError {
    match err {
        ureq::Error::Status(code, _) => DeviceError::Status(code),
        ureq::Error::Transport(t) => map_transport(&t),
    }
}

fn map_transport(t: &ureq::Transport) -> DeviceError {
    match io_error_kind(t) {
        Some(io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock) => return DeviceError::Timeout,
        Some(io::ErrorKind::ConnectionRefused) => return DeviceError::ConnectionRefused,
        _ => {}
    }
    match t.kind() {
        ureq::ErrorKind::ConnectionFailed | ureq::ErrorKind::Dns => DeviceError::ConnectionRefused,
        _ => DeviceError::Transport(t.to_string()),
    }
}

fn map_body_error(err: io::Error) -> DeviceError {
    match err.kind() {
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => DeviceError::Timeout,
        _ => DeviceError::Decode(err.to_string()),
    }
}

/// First `io::ErrorKind` found while walking the source chain.
fn io_error_kind(err: &(dyn StdError + 'static)) -> Option<io::ErrorKind> {
    let mut cur = Some(err);
    while let Some(e) = cur {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            return Some(io.kind());
        }
        cur = e.source();
    }
    None
}
