//! Plain-text dashboard frame.
use std::fmt::Write as _;
use std::time::{Duration, SystemTime};

use chrono::{DateTime, Local};
use scope_core::DashboardView;
use scope_core::util::rate_hz;

use crate::band::{self, Band};

/// Clears the terminal and homes the cursor.
pub const CLEAR_SCREEN: &str = "\x1b[2J\x1b[H";

#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Endpoint shown in the header.
    pub target: String,
    pub interval: Duration,
    /// Emit ANSI colors.
    pub color: bool,
    pub show_help: bool,
}

/// Reading as the device reported it: whole numbers without a fraction.
pub fn format_value(v: f64) -> String {
    if v.fract() == 0.0 && v.abs() < 1e15 {
        format!("{v:.0}")
    } else {
        format!("{v}")
    }
}

fn format_time(t: SystemTime) -> String {
    DateTime::<Local>::from(t).format("%H:%M:%S%.3f").to_string()
}

fn paint(out: &mut String, color: bool, sgr: &str, text: &str) {
    if color {
        let _ = write!(out, "{sgr}{text}{}", band::RESET);
    } else {
        out.push_str(text);
    }
}

/// Build one frame for `view`.
pub fn render(view: &DashboardView, opts: &RenderOptions) -> String {
    let unit = view.kind.unit();
    let mut out = String::with_capacity(512);

    let _ = writeln!(out, "{} Test", view.kind.title());
    let _ = writeln!(
        out,
        "Target: {} | Update: {}ms ({:.1} Hz)",
        opts.target,
        opts.interval.as_millis(),
        rate_hz(opts.interval)
    );
    out.push('\n');

    out.push_str("    ");
    match view.latest {
        Some(v) => {
            let text = format!("{} {unit}", format_value(v));
            paint(&mut out, opts.color, Band::of(view.kind, v).ansi(), &text);
        }
        None => paint(&mut out, opts.color, band::GRAY, &format!("-- {unit}")),
    }
    let _ = writeln!(out, "    {}", view.kind.unit_long());
    let _ = writeln!(
        out,
        "Last update: {}",
        view.last_update.map_or_else(|| "--".to_string(), format_time)
    );
    out.push('\n');

    let _ = writeln!(out, "Statistics (last {} readings)", view.capacity);
    match &view.summary {
        Some(s) => {
            let std_dev = s
                .std_dev
                .map_or_else(|| "--".to_string(), |d| format!("{d:.1} {unit}"));
            let _ = writeln!(
                out,
                "Min: {} {unit} | Max: {} {unit} | Avg: {:.1} {unit} | StdDev: {std_dev}",
                format_value(s.min),
                format_value(s.max),
                s.mean,
            );
        }
        None => out.push_str("Min: -- | Max: -- | Avg: -- | StdDev: --\n"),
    }
    let _ = writeln!(
        out,
        "Success: {} | Errors: {} | Readings: {}/{}",
        view.counters.success, view.counters.errors, view.readings, view.capacity
    );
    out.push_str("Last Error: ");
    match &view.last_error {
        Some(e) => paint(&mut out, opts.color, band::RED, &e.to_string()),
        None => paint(&mut out, opts.color, band::GREEN, "None"),
    }
    out.push('\n');

    if let Some(n) = &view.notice {
        let sgr = if n.is_ok() { band::GREEN } else { band::RED };
        paint(&mut out, opts.color, sgr, &n.text);
        out.push('\n');
    }
    if view.paused {
        paint(&mut out, opts.color, band::YELLOW, "[PAUSED]");
        out.push('\n');
    }
    if opts.show_help {
        out.push_str("\nCommands: ");
        if view.kind.supports_tare() {
            out.push_str("t=tare  ");
        }
        out.push_str("p=pause  r=resume  c=clear  q=quit  (then Enter)\n");
    }
    out
}
