#![cfg_attr(all(not(debug_assertions), not(test)), deny(warnings))]
#![cfg_attr(
    all(not(debug_assertions), not(test)),
    deny(clippy::all, clippy::pedantic, clippy::nursery)
)]
#![allow(clippy::module_name_repetitions, clippy::missing_errors_doc)]
#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! Core telemetry engine (transport-agnostic).
//!
//! This crate polls a remote sensor, keeps a bounded history of recent
//! readings and exposes consistent views of it to a display loop. All
//! device interaction goes through the `scope_traits::Sensor` trait.
//!
//! ## Architecture
//!
//! - **Poller**: one bounded-timeout read per tick on a dedicated thread
//!   (`poller` module), results classified by `classify`
//! - **Telemetry Store**: fixed-capacity ring plus run counters and last
//!   error, updated under one lock (`store`, `telemetry`)
//! - **Stats Aggregator**: min / max / mean / population std dev over a
//!   snapshot (`stats`)
//! - **Display Refresher**: separately paced loop producing
//!   `DashboardView`s (`refresher`)
//! - **Command Dispatcher**: tare, pause, clear, shutdown, applied on a
//!   `CommandWorker` thread (`dispatcher`)
//!
//! All shared state lives in an explicitly owned [`Session`].
//!
//! ## Concurrency
//!
//! A `clear()` bumps a generation counter. A tick records the generation
//! when it starts and its outcome is dropped if the generation moved, so
//! an append that was in flight across a clear never reappears.

pub mod classify;
pub mod config;
pub mod conversions;
pub mod dispatcher;
pub mod error;
pub mod mocks;
pub mod poller;
pub mod refresher;
pub mod session;
pub mod stats;
pub mod status;
pub mod store;
pub mod telemetry;
pub mod util;

pub use classify::{classify, classify_error};
pub use config::{DisplayCfg, PollCfg};
pub use dispatcher::{Command, CommandWorker, Dispatcher, ParseCommandError};
pub use error::{BuildError, PollError, Report, Result, ScopeError};
pub use poller::{Poller, poll_once, quiet_transport_panics};
pub use refresher::{DashboardView, Refresher};
pub use session::{Notice, Session, SessionBuilder};
pub use stats::{Summary, summarize};
pub use status::{PollOutcome, Tick};
pub use store::RingBuffer;
pub use telemetry::{RunCounters, TelemetrySnapshot};
