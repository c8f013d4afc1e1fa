use std::fmt;
use std::time::Duration;

/// Which sensor the dashboard is pointed at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SensorKind {
    /// HX711 load cell, grams.
    #[default]
    Weight,
    /// HC-SR04 ultrasonic ranger, millimeters.
    Distance,
}

impl SensorKind {
    /// JSON field carrying the value in `GET /api/sensor_read`.
    pub const fn field(self) -> &'static str {
        match self {
            Self::Weight => "weight",
            Self::Distance => "distance",
        }
    }

    pub const fn unit(self) -> &'static str {
        match self {
            Self::Weight => "g",
            Self::Distance => "mm",
        }
    }

    pub const fn unit_long(self) -> &'static str {
        match self {
            Self::Weight => "grams (g)",
            Self::Distance => "millimeters (mm)",
        }
    }

    pub const fn title(self) -> &'static str {
        match self {
            Self::Weight => "HX711 Weight Sensor",
            Self::Distance => "HC-SR04 Ultrasonic Sensor",
        }
    }

    /// History length used when the config does not set one.
    pub const fn default_capacity(self) -> usize {
        match self {
            Self::Weight => 200,
            Self::Distance => 100,
        }
    }

    /// Poll interval used when the config does not set one.
    pub const fn default_interval(self) -> Duration {
        match self {
            Self::Weight => Duration::from_millis(100),
            Self::Distance => Duration::from_millis(1),
        }
    }

    /// Only the load cell can be zeroed remotely.
    pub const fn supports_tare(self) -> bool {
        matches!(self, Self::Weight)
    }
}

impl fmt::Display for SensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.field())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_follow_the_two_dashboards() {
        assert_eq!(SensorKind::Weight.default_capacity(), 200);
        assert_eq!(SensorKind::Distance.default_capacity(), 100);
        assert_eq!(
            SensorKind::Distance.default_interval(),
            Duration::from_millis(1)
        );
        assert!(SensorKind::Weight.supports_tare());
        assert!(!SensorKind::Distance.supports_tare());
    }

    #[test]
    fn display_uses_field_name() {
        assert_eq!(SensorKind::Distance.to_string(), "distance");
    }
}
