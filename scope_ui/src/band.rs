//! Value bands and their display colors.
use scope_traits::SensorKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Band {
    /// Weight exactly zero.
    Empty,
    Light,
    Medium,
    Heavy,
    Close,
    Near,
    Far,
}

impl Band {
    pub fn of(kind: SensorKind, value: f64) -> Self {
        match kind {
            SensorKind::Weight if value == 0.0 => Self::Empty,
            SensorKind::Weight if value < 100.0 => Self::Light,
            SensorKind::Weight if value < 300.0 => Self::Medium,
            SensorKind::Weight => Self::Heavy,
            SensorKind::Distance if value < 100.0 => Self::Close,
            SensorKind::Distance if value < 300.0 => Self::Near,
            SensorKind::Distance => Self::Far,
        }
    }

    /// ANSI SGR sequence for the band.
    pub const fn ansi(self) -> &'static str {
        match self {
            Self::Empty => GRAY,
            Self::Light | Self::Near => ORANGE,
            Self::Medium => BLUE,
            Self::Heavy | Self::Close => RED,
            Self::Far => GREEN,
        }
    }
}

pub(crate) const RESET: &str = "\x1b[0m";
pub(crate) const GRAY: &str = "\x1b[90m";
pub(crate) const ORANGE: &str = "\x1b[38;5;208m";
pub(crate) const BLUE: &str = "\x1b[34m";
pub(crate) const RED: &str = "\x1b[31m";
pub(crate) const GREEN: &str = "\x1b[32m";
pub(crate) const YELLOW: &str = "\x1b[33m";
