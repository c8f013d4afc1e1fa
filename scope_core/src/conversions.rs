//! `From` implementations bridging `scope_config` types to `scope_core` types.

use scope_traits::SensorKind;

use crate::config::{DisplayCfg, PollCfg};
use crate::util::duration_from_ms;

// ── SensorKind ───────────────────────────────────────────────────────────────

/// Map the config's sensor kind onto the trait-level kind.
pub const fn sensor_kind(k: scope_config::SensorKindCfg) -> SensorKind {
    match k {
        scope_config::SensorKindCfg::Weight => SensorKind::Weight,
        scope_config::SensorKindCfg::Distance => SensorKind::Distance,
    }
}

// ── PollCfg ──────────────────────────────────────────────────────────────────

impl From<&scope_config::Config> for PollCfg {
    fn from(c: &scope_config::Config) -> Self {
        let kind = sensor_kind(c.device.kind);
        Self {
            kind,
            interval: c
                .poll
                .interval_ms
                .map_or_else(|| kind.default_interval(), duration_from_ms),
            timeout: duration_from_ms(c.device.timeout_ms),
            capacity: c.poll.capacity.unwrap_or_else(|| kind.default_capacity()),
        }
    }
}

// ── DisplayCfg ───────────────────────────────────────────────────────────────

impl From<&scope_config::Display> for DisplayCfg {
    fn from(c: &scope_config::Display) -> Self {
        Self {
            refresh: duration_from_ms(c.refresh_ms),
            notice_ttl: std::time::Duration::from_millis(c.notice_ms),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn config_kinds_map_one_to_one() {
        assert_eq!(sensor_kind(scope_config::SensorKindCfg::Weight), SensorKind::Weight);
        assert_eq!(sensor_kind(scope_config::SensorKindCfg::Distance), SensorKind::Distance);
    }

    #[test]
    fn poll_cfg_falls_back_to_kind_defaults() {
        let cfg = scope_config::load_toml("[device]\nkind = \"distance\"\n").unwrap();
        let poll = PollCfg::from(&cfg);
        assert_eq!(poll.kind, SensorKind::Distance);
        assert_eq!(poll.capacity, 100);
        assert_eq!(poll.interval, Duration::from_millis(1));
        assert_eq!(poll.timeout, Duration::from_secs(2));
    }

    #[test]
    fn poll_cfg_uses_explicit_values() {
        let cfg =
            scope_config::load_toml("[poll]\ninterval_ms = 250\ncapacity = 3\n").unwrap();
        let poll = PollCfg::from(&cfg);
        assert_eq!(poll.kind, SensorKind::Weight);
        assert_eq!(poll.capacity, 3);
        assert_eq!(poll.interval, Duration::from_millis(250));
    }
}
