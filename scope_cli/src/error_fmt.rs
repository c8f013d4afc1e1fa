//! Human-readable error descriptions and structured JSON error formatting.

use scope_core::error::{BuildError, PollError, ScopeError};

fn explain_poll(e: &PollError) -> String {
    match e {
        PollError::Timeout => format!(
            "What happened: {e}.\nLikely causes: The device is offline or too slow to answer within device.timeout_ms.\nHow to fix: Check power and Wi-Fi on the device, or raise device.timeout_ms in the config."
        ),
        PollError::ConnectionRefused => format!(
            "What happened: {e}.\nLikely causes: Wrong IP address, or the device web server is not running.\nHow to fix: Verify the address with --url or device.base_url and that the device has booted."
        ),
        PollError::Http(code) => format!(
            "What happened: {e}.\nLikely causes: The device answered but rejected the request (status {code}).\nHow to fix: Make sure the firmware exposes /api/sensor_read and the --kind matches the device."
        ),
        PollError::InvalidReading { field } => format!(
            "What happened: {e}.\nLikely causes: The {field} sensor is disconnected or not yet calibrated.\nHow to fix: Check the sensor wiring, then tare or recalibrate on the device."
        ),
        PollError::Other(_) => format!(
            "What happened: {e}.\nLikely causes: See logs.\nHow to fix: Re-run with --log-level=debug or set RUST_LOG for more detail."
        ),
    }
}

/// Map an eyre::Report to a human-readable explanation with likely causes and fix hints.
pub fn humanize(err: &eyre::Report) -> String {
    // Typed matches first
    if let Some(se) = err.downcast_ref::<ScopeError>() {
        return match se {
            ScopeError::Poll(e) => explain_poll(e),
            ScopeError::Tare(e) => format!("Tare failed.\n{}", explain_poll(e)),
            ScopeError::Config(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Missing or out-of-range values in the TOML or on the command line.\nHow to fix: Edit the config file or flags, then rerun."
            ),
        };
    }

    if let Some(be) = err.downcast_ref::<BuildError>() {
        return match be {
            BuildError::MissingKind => {
                "What happened: No sensor kind was selected.\nLikely causes: The session was built without a kind.\nHow to fix: Pass --kind weight|distance or set device.kind.".to_string()
            }
            BuildError::InvalidConfig(msg) => format!(
                "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range history capacity.\nHow to fix: Use a capacity between 1 and 1000000."
            ),
        };
    }

    // String-based heuristics for errors coming from config loading
    let msg = err.to_string();
    let lower = msg.to_ascii_lowercase();

    if lower.starts_with("read config") {
        return format!(
            "What happened: Could not read the config file.\nLikely causes: Wrong path or missing permissions.\nHow to fix: Check the --config path. Original: {msg}"
        );
    }

    if lower.starts_with("parse config") {
        return format!(
            "What happened: The config file is not valid TOML for this tool.\nLikely causes: A typo, a misplaced section, or an unknown sensor kind.\nHow to fix: Compare against etc/sensorscope.toml. Original: {msg}"
        );
    }

    if lower.starts_with("device.")
        || lower.starts_with("poll.")
        || lower.starts_with("display.")
        || lower.starts_with("logging.")
    {
        return format!(
            "What happened: Invalid configuration ({msg}).\nLikely causes: Out-of-range values in the TOML or on the command line.\nHow to fix: Edit the config file or flags, then rerun."
        );
    }

    // Generic fallback
    let mut cause = String::new();
    if let Some(src) = err.source() {
        cause = format!(" Cause: {src}");
    }
    format!(
        "Something went wrong.{cause}\nHow to fix: Re-run with --log-level=debug for details. Original: {msg}"
    )
}

/// Stable exit codes: 3 timeout, 4 refused, 5 HTTP error, 6 invalid reading,
/// 1 for everything else.
pub fn exit_code_for_error(err: &eyre::Report) -> i32 {
    match err.downcast_ref::<ScopeError>() {
        Some(ScopeError::Poll(e) | ScopeError::Tare(e)) => match e {
            PollError::Timeout => 3,
            PollError::ConnectionRefused => 4,
            PollError::Http(_) => 5,
            PollError::InvalidReading { .. } => 6,
            PollError::Other(_) => 1,
        },
        _ => 1,
    }
}

/// Structured JSON for errors when --json is enabled.
pub fn format_error_json(err: &eyre::Report) -> String {
    use serde_json::json;

    if let Some(ScopeError::Poll(e) | ScopeError::Tare(e)) = err.downcast_ref::<ScopeError>() {
        return json!({
            "reason": e.kind_name(),
            "error": e.to_string(),
            "message": humanize(err),
        })
        .to_string();
    }

    // Generic error JSON
    json!({ "reason": "Error", "message": humanize(err) }).to_string()
}
