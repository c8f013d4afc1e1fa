#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
//! `sensorscope`: live diagnostic dashboard for an HTTP sensor module.

mod cli;
mod error_fmt;
mod run;

use std::path::Path;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use eyre::WrapErr;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer, Registry, fmt};

use crate::cli::{Cli, Commands, JSON_MODE};
use crate::error_fmt::{exit_code_for_error, format_error_json, humanize};
use crate::run::Settings;

type BoxedLayer = Box<dyn Layer<Registry> + Send + Sync>;

/// Console logs go to stderr so stdout stays clean for frames and results.
/// The file sink (if configured) always writes JSON lines; the returned
/// guard must live until exit so buffered lines are flushed.
fn init_tracing(cli: &Cli, cfg: &scope_config::Config) -> eyre::Result<Option<WorkerGuard>> {
    let level = cli
        .log_level
        .clone()
        .or_else(|| cfg.logging.level.clone())
        .unwrap_or_else(|| "warn".to_string());
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&level))
        .wrap_err_with(|| format!("invalid log level '{level}'"))?;

    let mut layers: Vec<BoxedLayer> = Vec::new();
    if cli.json {
        layers.push(fmt::layer().json().with_writer(std::io::stderr).boxed());
    } else {
        layers.push(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .boxed(),
        );
    }

    let mut guard = None;
    if let Some(file) = cfg.logging.file.as_deref() {
        let path = Path::new(file);
        let dir = path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .unwrap_or_else(|| Path::new("."));
        let name = path
            .file_name()
            .map_or_else(|| "sensorscope.log".into(), |n| n.to_os_string());
        let appender = match cfg.logging.rotation.as_deref() {
            Some("daily") => tracing_appender::rolling::daily(dir, name),
            Some("hourly") => tracing_appender::rolling::hourly(dir, name),
            _ => tracing_appender::rolling::never(dir, name),
        };
        let (writer, g) = tracing_appender::non_blocking(appender);
        guard = Some(g);
        layers.push(
            fmt::layer()
                .json()
                .with_ansi(false)
                .with_writer(writer)
                .boxed(),
        );
    }

    tracing_subscriber::registry()
        .with(layers)
        .with(filter)
        .try_init()
        .wrap_err("install tracing subscriber")?;
    Ok(guard)
}

/// Load the config file (or defaults) and fold in CLI overrides, then
/// validate the result as a whole.
fn load_config(cli: &Cli) -> eyre::Result<scope_config::Config> {
    let mut cfg = match &cli.config {
        Some(path) => scope_config::load_file(path)?,
        None => scope_config::Config::default(),
    };
    if let Some(url) = &cli.url {
        cfg.device.base_url = Some(url.clone());
    }
    if let Some(kind) = cli.kind {
        cfg.device.kind = kind.into();
    }
    if let Commands::Watch {
        interval_ms,
        capacity,
        refresh_ms,
        ..
    } = &cli.cmd
    {
        if interval_ms.is_some() {
            cfg.poll.interval_ms = *interval_ms;
        }
        if capacity.is_some() {
            cfg.poll.capacity = *capacity;
        }
        if let Some(ms) = refresh_ms {
            cfg.display.refresh_ms = *ms;
        }
    }
    cfg.validate()?;
    Ok(cfg)
}

fn execute(cli: &Cli, cfg: &scope_config::Config) -> eyre::Result<()> {
    let settings = Settings::from_config(cfg, cli.json);
    let sim = cli.cmd.sim();
    match &cli.cmd {
        Commands::Watch {
            duration_ms, plain, ..
        } => run::run_watch(
            &settings,
            sim,
            duration_ms.map(Duration::from_millis),
            *plain,
        ),
        Commands::Read { .. } => run::run_read(&settings, sim),
        Commands::Tare { .. } => run::run_tare(&settings, sim),
    }
}

fn report(err: &eyre::Report) -> ExitCode {
    if JSON_MODE.get().copied().unwrap_or(false) {
        eprintln!("{}", format_error_json(err));
    } else {
        eprintln!("{}", humanize(err));
    }
    tracing::debug!(error = ?err, "command failed");
    let code = exit_code_for_error(err);
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    let _ = JSON_MODE.set(cli.json);
    let _ = color_eyre::install();

    let cfg = match load_config(&cli) {
        Ok(cfg) => cfg,
        Err(e) => return report(&e),
    };
    let _guard = match init_tracing(&cli, &cfg) {
        Ok(g) => g,
        Err(e) => return report(&e),
    };

    match execute(&cli, &cfg) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => report(&e),
    }
}
