//! Runtime configuration for the poll and display loops.
//!
//! These are resolved, validated values; the TOML schema lives in
//! `scope_config` and is mapped here by `conversions`.
use std::time::Duration;

use scope_traits::SensorKind;

/// Poller settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollCfg {
    pub kind: SensorKind,
    /// Tick period.
    pub interval: Duration,
    /// Per-request timeout; a slower answer is classified as a timeout.
    pub timeout: Duration,
    /// History length.
    pub capacity: usize,
}

impl PollCfg {
    pub fn for_kind(kind: SensorKind) -> Self {
        Self {
            kind,
            interval: kind.default_interval(),
            timeout: Duration::from_secs(2),
            capacity: kind.default_capacity(),
        }
    }
}

impl Default for PollCfg {
    fn default() -> Self {
        Self::for_kind(SensorKind::default())
    }
}

/// Display refresher settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayCfg {
    pub refresh: Duration,
    /// How long a tare notice stays visible.
    pub notice_ttl: Duration,
}

impl Default for DisplayCfg {
    fn default() -> Self {
        Self {
            refresh: Duration::from_millis(100),
            notice_ttl: Duration::from_secs(3),
        }
    }
}
