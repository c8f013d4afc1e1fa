//! Seams shared by every sensorscope crate: the `Sensor` device trait,
//! the `SensorKind` descriptor and the `Clock` abstraction.
pub mod clock;
pub mod kind;

pub use clock::{Clock, ManualClock, MonotonicClock};
pub use kind::SensorKind;

pub trait Sensor {
    /// Read one raw value from the device. Negative values are passed
    /// through unchanged; the caller decides whether they are plausible.
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>>;

    /// Ask the device to zero itself.
    fn tare(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>>;
}

impl<S: Sensor + ?Sized> Sensor for Box<S> {
    fn read(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<f64, Box<dyn std::error::Error + Send + Sync>> {
        (**self).read(timeout)
    }

    fn tare(
        &mut self,
        timeout: std::time::Duration,
    ) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
        (**self).tare(timeout)
    }
}
