//! Command execution: config mapping, device assembly, and the watch loop.

use std::io::{self, BufRead, IsTerminal, Write};
use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel as xch;
use scope_config::Config;
use scope_core::error::{Result, ScopeError};
use scope_core::{
    Command, CommandWorker, DashboardView, Dispatcher, DisplayCfg, PollCfg, PollOutcome, Poller,
    Session, classify, quiet_transport_panics,
};
use scope_device::{Fault, HttpSensor, SimulatedSensor};
use scope_traits::clock::MonotonicClock;
use scope_traits::{Sensor, SensorKind};
use scope_ui::{CLEAR_SCREEN, RenderOptions, render};
use serde_json::json;

/// Env hook used by integration tests to make the simulator fail.
pub const SIM_FAULT_ENV: &str = "SCOPE_TEST_SIM_FAULT";

/// Effective settings after the config file and CLI overrides are merged.
#[derive(Debug, Clone)]
pub struct Settings {
    pub base_url: Option<String>,
    pub poll: PollCfg,
    pub display: DisplayCfg,
    pub color: bool,
    pub json: bool,
}

impl Settings {
    pub fn from_config(cfg: &Config, json: bool) -> Self {
        Self {
            base_url: cfg.device.base_url.clone(),
            poll: cfg.into(),
            display: (&cfg.display).into(),
            color: cfg.display.color,
            json,
        }
    }

    pub fn kind(&self) -> SensorKind {
        self.poll.kind
    }

    /// Target shown in the dashboard header.
    pub fn target(&self, sim: bool) -> String {
        match (&self.base_url, sim) {
            (_, true) => "simulator".to_string(),
            (Some(url), false) => HttpSensor::new(url, self.kind(), self.poll.timeout).endpoint(),
            (None, false) => "--".to_string(),
        }
    }
}

fn sim_fault() -> Result<Option<Fault>> {
    match std::env::var(SIM_FAULT_ENV) {
        Ok(v) if !v.trim().is_empty() => v
            .parse::<Fault>()
            .map(Some)
            .map_err(|e| eyre::Report::new(ScopeError::Config(e))),
        _ => Ok(None),
    }
}

/// Device backend. Returns two handles to the same device: one for the
/// poller, one for the command dispatcher.
type SensorPair = (Box<dyn Sensor + Send>, Box<dyn Sensor + Send>);

pub fn open_device(settings: &Settings, sim: bool) -> Result<SensorPair> {
    let kind = settings.kind();
    if sim {
        let mut dev = SimulatedSensor::new(kind);
        if let Some(fault) = sim_fault()? {
            tracing::info!(?fault, "simulator fault injected");
            dev = dev.with_fault(fault);
        }
        let shared = dev.shared();
        return Ok((Box::new(shared.clone()), Box::new(shared)));
    }
    let Some(url) = settings.base_url.as_deref() else {
        return Err(eyre::Report::new(ScopeError::Config(
            "no device URL: set device.base_url, pass --url, or use --sim".to_string(),
        )));
    };
    let http = HttpSensor::new(url, kind, settings.poll.timeout);
    tracing::info!(endpoint = %http.endpoint(), %kind, "using HTTP device");
    Ok((Box::new(http.clone()), Box::new(http)))
}

fn session_for(settings: &Settings) -> Result<Arc<Session>> {
    let session = Session::builder()
        .kind(settings.kind())
        .capacity(settings.poll.capacity)
        .build()?;
    Ok(Arc::new(session))
}

/// One classified read.
pub fn run_read(settings: &Settings, sim: bool) -> Result<()> {
    let (mut sensor, _) = open_device(settings, sim)?;
    let kind = settings.kind();
    match classify(kind, sensor.read(settings.poll.timeout)) {
        PollOutcome::Success(value) => {
            tracing::debug!(value, "read ok");
            if settings.json {
                println!(
                    "{}",
                    json!({ "kind": kind.field(), "value": value, "unit": kind.unit() })
                );
            } else {
                println!("{} {}", scope_ui::format_value(value), kind.unit());
            }
            Ok(())
        }
        PollOutcome::Failed(e) => Err(eyre::Report::new(ScopeError::Poll(e))),
    }
}

/// One-shot tare; prints the status message.
pub fn run_tare(settings: &Settings, sim: bool) -> Result<()> {
    let (_, sensor) = open_device(settings, sim)?;
    let session = session_for(settings)?;
    let mut dispatcher = Dispatcher::new(session, sensor, settings.poll.timeout);
    let notice = dispatcher.tare();
    if settings.json {
        println!("{}", json!({ "ok": notice.is_ok(), "message": notice.text }));
    } else {
        println!("{}", notice.text);
    }
    match notice.error {
        None => Ok(()),
        Some(e) => Err(eyre::Report::new(ScopeError::Tare(e))),
    }
}

fn frame_json(view: &DashboardView) -> serde_json::Value {
    let summary = view.summary.as_ref();
    json!({
        "kind": view.kind.field(),
        "latest": view.latest,
        "min": summary.map(|s| s.min),
        "max": summary.map(|s| s.max),
        "mean": summary.map(|s| s.mean),
        "std_dev": summary.and_then(|s| s.std_dev),
        "success": view.counters.success,
        "errors": view.counters.errors,
        "readings": view.readings,
        "capacity": view.capacity,
        "last_error": view.last_error.as_ref().map(ToString::to_string),
        "notice": view.notice.as_ref().map(|n| n.text.clone()),
        "paused": view.paused,
    })
}

/// Forward operator lines from stdin as commands. The thread ends on EOF,
/// on `q`, or when the receiver is gone.
fn spawn_stdin_reader(tx: xch::Sender<Command>) {
    let spawned = std::thread::Builder::new()
        .name("stdin-commands".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line.trim().is_empty() && line != " " {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(cmd) => {
                        if tx.send(cmd).is_err() || cmd == Command::Shutdown {
                            break;
                        }
                    }
                    Err(e) => tracing::warn!(error = %e, "ignoring input"),
                }
            }
            tracing::trace!("stdin reader exiting");
        });
    if let Err(e) = spawned {
        tracing::warn!(error = %e, "stdin command reader unavailable");
    }
}

/// Live dashboard until `q`, Ctrl-C, or `duration` elapses.
pub fn run_watch(settings: &Settings, sim: bool, duration: Option<Duration>, plain: bool) -> Result<()> {
    let (poll_sensor, cmd_sensor) = open_device(settings, sim)?;
    let session = session_for(settings)?;

    {
        let session = Arc::clone(&session);
        if let Err(e) = ctrlc::set_handler(move || {
            session.request_stop();
        }) {
            tracing::warn!(error = %e, "failed to install Ctrl-C handler");
        }
    }

    quiet_transport_panics();
    let (tx, rx) = xch::unbounded();
    spawn_stdin_reader(tx);

    tracing::info!(
        kind = %settings.kind(),
        interval = ?settings.poll.interval,
        refresh = ?settings.display.refresh,
        capacity = settings.poll.capacity,
        "watch start"
    );
    let mut poller = Poller::spawn(
        Arc::clone(&session),
        poll_sensor,
        &settings.poll,
        MonotonicClock::new(),
    );
    let mut commands = CommandWorker::spawn(
        Dispatcher::new(Arc::clone(&session), cmd_sensor, settings.poll.timeout),
        rx,
    );
    let refresher = scope_core::Refresher::new(Arc::clone(&session), settings.display.clone());

    let opts = RenderOptions {
        target: settings.target(sim),
        interval: settings.poll.interval,
        color: settings.color && !plain && io::stdout().is_terminal(),
        show_help: !plain,
    };
    let redraw = !plain && !settings.json && io::stdout().is_terminal();

    let frames = refresher.run(duration, |view| {
        let mut out = io::stdout().lock();
        let written = if settings.json {
            writeln!(out, "{}", frame_json(view))
        } else if redraw {
            write!(out, "{CLEAR_SCREEN}{}", render(view, &opts))
        } else {
            writeln!(out, "{}", render(view, &opts))
        };
        if written.and_then(|()| out.flush()).is_err() {
            // stdout closed; nothing left to show
            session.request_stop();
        }
    });

    session.request_stop();
    let handled = commands.join().unwrap_or_default();
    let ticks = poller.stop().unwrap_or_default();
    let snap = session.snapshot();
    tracing::info!(
        frames,
        ticks,
        commands = handled,
        success = snap.counters.success,
        errors = snap.counters.errors,
        "watch finished"
    );
    Ok(())
}
