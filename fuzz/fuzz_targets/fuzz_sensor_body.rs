#![no_main]
use libfuzzer_sys::fuzz_target;
use scope_core::{Command, PollOutcome, classify};
use scope_device::extract_reading;
use scope_traits::SensorKind;

fuzz_target!(|data: &str| {
    // Operator input never panics.
    let _ = data.parse::<Command>();

    // Arbitrary device bodies classify to exactly one outcome, and only
    // non-negative finite values are ever accepted.
    let Ok(body) = serde_json::from_str::<serde_json::Value>(data) else {
        return;
    };
    for kind in [SensorKind::Weight, SensorKind::Distance] {
        let result = extract_reading(&body, kind.field())
            .map_err(|e| Box::new(e) as Box<dyn std::error::Error + Send + Sync>);
        if let PollOutcome::Success(v) = classify(kind, result) {
            assert!(v.is_finite() && v >= 0.0);
        }
    }
});
