//! Device backends implementing `scope_traits::Sensor`.
//!
//! - `HttpSensor` talks to the real module over its REST API.
//! - `SimulatedSensor` runs without a device (CLI `--sim`, tests).
pub mod error;
pub mod http;
pub mod sim;

pub use error::DeviceError;
pub use http::{HttpSensor, extract_reading};
pub use sim::{Fault, SharedSim, SimulatedSensor};
