#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
//! Config schema for the sensor dashboards.
//!
//! - `Config` and sub-structs are deserialized from TOML and validated.
//! - Every section is optional; per-sensor defaults (capacity, poll
//!   interval) are left as `None` here and resolved by the core.
use serde::Deserialize;
use std::path::Path;

/// Upper bound for any single timing knob, in milliseconds.
const MAX_TIMING_MS: u64 = 60_000;
const MAX_CAPACITY: usize = 1_000_000;

#[derive(Debug, Deserialize, Clone, Copy, Default, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum SensorKindCfg {
    #[default]
    Weight,
    Distance,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Device {
    /// Base URL of the device, e.g. "http://192.168.1.233". Optional when
    /// the simulator is used.
    pub base_url: Option<String>,
    pub kind: SensorKindCfg,
    /// Per-request timeout for every device call
    pub timeout_ms: u64,
}

impl Default for Device {
    fn default() -> Self {
        Self {
            base_url: None,
            kind: SensorKindCfg::Weight,
            timeout_ms: 2000,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Poll {
    /// Delay between poll ticks; defaults per sensor kind when absent.
    pub interval_ms: Option<u64>,
    /// Rolling history length; defaults per sensor kind when absent.
    pub capacity: Option<usize>,
}

#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct Display {
    pub refresh_ms: u64,
    /// How long a tare status message stays on screen
    pub notice_ms: u64,
    pub color: bool,
}

impl Default for Display {
    fn default() -> Self {
        Self {
            refresh_ms: 100,
            notice_ms: 3000,
            color: true,
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Logging {
    pub file: Option<String>,  // path to .log (JSON lines)
    pub level: Option<String>, // "info","debug"
    /// Log rotation policy: "never" | "daily" | "hourly" (default: never)
    pub rotation: Option<String>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    pub device: Device,
    pub poll: Poll,
    pub display: Display,
    pub logging: Logging,
}

pub fn load_toml(s: &str) -> Result<Config, toml::de::Error> {
    toml::from_str::<Config>(s)
}

/// Read, parse and validate a config file.
pub fn load_file(path: &Path) -> eyre::Result<Config> {
    let text = std::fs::read_to_string(path)
        .map_err(|e| eyre::eyre!("read config {}: {}", path.display(), e))?;
    let cfg = load_toml(&text).map_err(|e| eyre::eyre!("parse config {}: {}", path.display(), e))?;
    cfg.validate()?;
    Ok(cfg)
}

impl Config {
    pub fn validate(&self) -> eyre::Result<()> {
        // Device
        if let Some(url) = self.device.base_url.as_deref() {
            let url = url.trim();
            if url.is_empty() {
                eyre::bail!("device.base_url must not be empty");
            }
            if !(url.starts_with("http://") || url.starts_with("https://")) {
                eyre::bail!("device.base_url must start with http:// or https://");
            }
        }
        if self.device.timeout_ms == 0 {
            eyre::bail!("device.timeout_ms must be >= 1");
        }
        if self.device.timeout_ms > MAX_TIMING_MS {
            eyre::bail!("device.timeout_ms is unreasonably large (>60s)");
        }

        // Poll
        if let Some(ms) = self.poll.interval_ms {
            if ms == 0 {
                eyre::bail!("poll.interval_ms must be >= 1");
            }
            if ms > MAX_TIMING_MS {
                eyre::bail!("poll.interval_ms is unreasonably large (>60s)");
            }
        }
        if let Some(cap) = self.poll.capacity {
            if cap == 0 {
                eyre::bail!("poll.capacity must be >= 1");
            }
            if cap > MAX_CAPACITY {
                eyre::bail!("poll.capacity is unreasonably large (>1000000)");
            }
        }

        // Display
        if self.display.refresh_ms == 0 {
            eyre::bail!("display.refresh_ms must be >= 1");
        }
        if self.display.refresh_ms > 10_000 {
            eyre::bail!("display.refresh_ms is unreasonably large (>10s)");
        }
        if self.display.notice_ms > MAX_TIMING_MS {
            eyre::bail!("display.notice_ms is unreasonably large (>60s)");
        }

        // Logging
        if let Some(rot) = self.logging.rotation.as_deref()
            && !matches!(rot, "never" | "daily" | "hourly")
        {
            eyre::bail!("logging.rotation must be one of never|daily|hourly, got '{rot}'");
        }

        Ok(())
    }
}
