//! CLI argument definitions and shared statics.

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use scope_config::SensorKindCfg;
use std::path::PathBuf;
use std::sync::OnceLock;

/// Whether the user asked for JSON output (controls structured error output).
pub static JSON_MODE: OnceLock<bool> = OnceLock::new();

#[derive(Parser, Debug)]
#[command(
    name = "sensorscope",
    version,
    about = "Live diagnostic dashboard for an HTTP weight/distance sensor"
)]
pub struct Cli {
    /// Path to config TOML (optional; every section has defaults)
    #[arg(long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Device base URL, e.g. http://192.168.1.233 (overrides device.base_url)
    #[arg(long, value_name = "URL")]
    pub url: Option<String>,

    /// Sensor kind (overrides device.kind)
    #[arg(long, value_enum, value_name = "KIND")]
    pub kind: Option<KindArg>,

    /// Log as JSON lines and print JSON results
    #[arg(long, action = ArgAction::SetTrue)]
    pub json: bool,

    /// Console log level (error|warn|info|debug|trace)
    #[arg(long = "log-level", value_name = "LEVEL")]
    pub log_level: Option<String>,

    /// Command to execute
    #[command(subcommand)]
    pub cmd: Commands,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
pub enum KindArg {
    Weight,
    Distance,
}

impl From<KindArg> for SensorKindCfg {
    fn from(k: KindArg) -> Self {
        match k {
            KindArg::Weight => SensorKindCfg::Weight,
            KindArg::Distance => SensorKindCfg::Distance,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Poll the device continuously and show a live dashboard
    Watch {
        /// Use the built-in simulator instead of a device
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
        /// Poll interval in ms (overrides poll.interval_ms)
        #[arg(long, value_name = "MS")]
        interval_ms: Option<u64>,
        /// History length (overrides poll.capacity)
        #[arg(long, value_name = "N")]
        capacity: Option<usize>,
        /// Display refresh period in ms (overrides display.refresh_ms)
        #[arg(long, value_name = "MS")]
        refresh_ms: Option<u64>,
        /// Stop after this many ms (headless runs)
        #[arg(long, value_name = "MS")]
        duration_ms: Option<u64>,
        /// Append frames instead of redrawing; no colors
        #[arg(long, action = ArgAction::SetTrue)]
        plain: bool,
    },
    /// Take one reading and print it
    Read {
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
    },
    /// Zero the scale
    Tare {
        #[arg(long, action = ArgAction::SetTrue)]
        sim: bool,
    },
}

impl Commands {
    pub fn sim(&self) -> bool {
        match self {
            Self::Watch { sim, .. } | Self::Read { sim } | Self::Tare { sim } => *sim,
        }
    }
}
