//! Maps `Box<dyn Error>` from the `Sensor` boundary to a typed `PollOutcome`.
//!
//! The trait in `scope_traits` uses `Box<dyn Error + Send + Sync>` so any
//! transport can plug in; this module converts those to the fixed failure
//! taxonomy, with an optional feature-gated path for
//! `scope_device::DeviceError` downcasting.

use std::error::Error;
use std::io;

use scope_traits::SensorKind;

use crate::error::PollError;
use crate::status::PollOutcome;

/// Classify the result of one `Sensor::read` into exactly one outcome.
pub fn classify(
    kind: SensorKind,
    result: Result<f64, Box<dyn Error + Send + Sync>>,
) -> PollOutcome {
    match result {
        Ok(v) if v.is_finite() && v >= 0.0 => PollOutcome::Success(v),
        Ok(_) => PollOutcome::Failed(PollError::InvalidReading { field: kind.field() }),
        Err(e) => PollOutcome::Failed(classify_error(kind, e.as_ref())),
    }
}

/// Map a sensor-boundary error to a `PollError`.
///
/// Attempts to downcast known device error types first, then looks for
/// `io::Error` kinds in the source chain, then falls back to string-based
/// heuristics.
pub fn classify_error(kind: SensorKind, e: &(dyn Error + 'static)) -> PollError {
    // Feature-gated: try to downcast to DeviceError for precise mapping
    #[cfg(feature = "device-errors")]
    {
        use scope_device::DeviceError;
        if let Some(de) = e.downcast_ref::<DeviceError>() {
            return match de {
                DeviceError::Timeout => PollError::Timeout,
                DeviceError::ConnectionRefused => PollError::ConnectionRefused,
                DeviceError::Status(code) => PollError::Http(*code),
                DeviceError::MissingField(field) => PollError::InvalidReading { field: *field },
                other => PollError::Other(other.to_string()),
            };
        }
    }

    if let Some(k) = io_error_kind(e) {
        match k {
            io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock => return PollError::Timeout,
            io::ErrorKind::ConnectionRefused => return PollError::ConnectionRefused,
            _ => {}
        }
    }

    // Fallback: string-based detection
    let s = e.to_string();
    let lower = s.to_lowercase();
    if lower.contains("timeout") || lower.contains("timed out") {
        PollError::Timeout
    } else if lower.contains("connection refused") {
        PollError::ConnectionRefused
    } else if lower.contains("invalid reading") {
        PollError::InvalidReading { field: kind.field() }
    } else {
        PollError::Other(s)
    }
}

fn io_error_kind(err: &(dyn Error + 'static)) -> Option<io::ErrorKind> {
    let mut cur = Some(err);
    while let Some(e) = cur {
        if let Some(io) = e.downcast_ref::<io::Error>() {
            return Some(io.kind());
        }
        cur = e.source();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn boxed(e: impl Error + Send + Sync + 'static) -> Box<dyn Error + Send + Sync> {
        Box::new(e)
    }

    #[test]
    fn non_negative_values_succeed() {
        assert_eq!(
            classify(SensorKind::Weight, Ok(0.0)),
            PollOutcome::Success(0.0)
        );
        assert_eq!(
            classify(SensorKind::Weight, Ok(12.5)),
            PollOutcome::Success(12.5)
        );
    }

    #[test]
    fn negative_and_nan_values_are_invalid() {
        for v in [-1.0, -0.5, f64::NAN, f64::INFINITY] {
            assert_eq!(
                classify(SensorKind::Distance, Ok(v)),
                PollOutcome::Failed(PollError::InvalidReading { field: "distance" })
            );
        }
    }

    #[test]
    fn io_kinds_map_without_device_types() {
        let e = boxed(io::Error::new(io::ErrorKind::TimedOut, "slow"));
        assert_eq!(classify_error(SensorKind::Weight, e.as_ref()), PollError::Timeout);
        let e = boxed(io::Error::new(io::ErrorKind::ConnectionRefused, "nope"));
        assert_eq!(
            classify_error(SensorKind::Weight, e.as_ref()),
            PollError::ConnectionRefused
        );
    }

    #[test]
    fn strings_fall_back_to_heuristics() {
        let e: Box<dyn Error + Send + Sync> = "sensor timeout".into();
        assert_eq!(classify_error(SensorKind::Weight, e.as_ref()), PollError::Timeout);
        let e: Box<dyn Error + Send + Sync> = "boom".into();
        assert_eq!(
            classify_error(SensorKind::Weight, e.as_ref()),
            PollError::Other("boom".into())
        );
    }

    #[cfg(feature = "device-errors")]
    #[test]
    fn device_errors_map_precisely() {
        use scope_device::DeviceError;
        let cases = [
            (DeviceError::Timeout, PollError::Timeout),
            (DeviceError::ConnectionRefused, PollError::ConnectionRefused),
            (DeviceError::Status(503), PollError::Http(503)),
            (
                DeviceError::MissingField("weight"),
                PollError::InvalidReading { field: "weight" },
            ),
        ];
        for (de, want) in cases {
            let e = boxed(de);
            assert_eq!(classify_error(SensorKind::Weight, e.as_ref()), want);
        }
        let e = boxed(DeviceError::Decode("eof".into()));
        assert!(matches!(
            classify_error(SensorKind::Weight, e.as_ref()),
            PollError::Other(_)
        ));
    }
}
